// CLI binary — exiting on unrecoverable errors is standard for CLI tools.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::unreachable, clippy::indexing_slicing)]

use std::io::Read;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::Value;

use cmdcraft::error::AppError;
use cmdcraft::model::Draft;
use cmdcraft::paths;
use cmdcraft::project;
use cmdcraft::registry::params::{
    HelpParams, ListSubcommandsParams, PresetNameParams, RenderParams, SubcommandIdParams,
};
use cmdcraft::registry::{catalog, execute::execute, Command, CommandOutput};
use cmdcraft::settings;
use cmdcraft::state::AppState;

// ── CLI argument parsing ─────────────────────────────────────────

#[derive(Parser)]
#[command(name = "cmdcraft-cli", about = "Build Minecraft execute commands", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config directory override
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Session draft file; `exec` edits are saved back to it
    #[arg(long, global = true)]
    draft: Option<PathBuf>,

    /// Output raw JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render `{ chain, runCommand }` JSON or a saved draft from a file or stdin
    Render {
        /// Read JSON from this file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
        /// Override the run command
        #[arg(long)]
        run: Option<String>,
    },
    /// List subcommands
    Subcommands {
        /// position, context, condition or store
        #[arg(long)]
        category: Option<String>,
    },
    /// Show one subcommand with its fields and defaults
    Subcommand { id: String },
    /// List presets
    Presets,
    /// Show and render one preset
    Preset { name: String },
    /// Run any registry command, e.g. `exec add_step '{"subcommandId":"as"}'`
    Exec {
        name: String,
        /// JSON params
        params: Option<String>,
    },
    /// Print every registry command with its JSON schema
    Tools,
    /// Describe a command, category or subcommand
    Describe { topic: Option<String> },
}

// ── State initialization ─────────────────────────────────────────

fn initialize_state(
    config_dir: Option<PathBuf>,
    draft: Option<&PathBuf>,
    raw_json: bool,
) -> Arc<AppState> {
    let app_config_dir = config_dir.unwrap_or_else(paths::default_config_dir);
    let loaded_settings = settings::load_with_tracing(&app_config_dir);

    let mut state = AppState::new(loaded_settings, app_config_dir);
    if let Some(path) = draft {
        let loaded = project::load_draft(path)
            .unwrap_or_else(|e| fail(&AppError::from(e), raw_json));
        state = state.with_initial_draft(loaded);
    }
    Arc::new(state)
}

fn read_render_input(file: Option<&PathBuf>) -> RenderParams {
    let text = match file {
        Some(path) => std::fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Failed to read '{}': {e}", path.display());
            process::exit(1);
        }),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).unwrap_or_else(|e| {
                eprintln!("Failed to read stdin: {e}");
                process::exit(1);
            });
            buf
        }
    };
    if text.trim().is_empty() {
        return RenderParams::default();
    }
    let value: Value = serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("Invalid render input: {e}");
        process::exit(1);
    });
    // A saved draft file nests its steps under `chain.steps`.
    let parsed = if value.get("chain").is_some_and(Value::is_object) {
        serde_json::from_value::<Draft>(value).map(|draft| RenderParams {
            chain: draft.chain.to_steps(),
            run_command: draft.run_command,
        })
    } else {
        serde_json::from_value::<RenderParams>(value)
    };
    parsed.unwrap_or_else(|e| {
        eprintln!("Invalid render input: {e}");
        process::exit(1);
    })
}

fn build_command(cmd: Commands) -> Command {
    match cmd {
        Commands::Render { file, run } => {
            let mut params = read_render_input(file.as_ref());
            if let Some(run) = run {
                params.run_command = run;
            }
            Command::Render(params)
        }
        Commands::Subcommands { category } => {
            Command::ListSubcommands(ListSubcommandsParams { category })
        }
        Commands::Subcommand { id } => Command::GetSubcommand(SubcommandIdParams { id }),
        Commands::Presets => Command::ListPresets,
        Commands::Preset { name } => Command::GetPreset(PresetNameParams { name }),
        Commands::Exec { name, params } => {
            let input = match params {
                Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                    eprintln!("Invalid JSON params: {e}");
                    process::exit(1);
                }),
                None => Value::Null,
            };
            catalog::deserialize_from_tool_call(&name, &input).unwrap_or_else(|e| {
                eprintln!("Error: {e}");
                process::exit(1);
            })
        }
        Commands::Describe { topic } => Command::Help(HelpParams { topic }),
        // Tools is handled before this function is called
        Commands::Tools => unreachable!(),
    }
}

// ── Output formatting ────────────────────────────────────────────

fn print_output(output: &CommandOutput, raw_json: bool) {
    if raw_json {
        let json = serde_json::json!({
            "message": output.message,
            "result": output.result,
        });
        println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        return;
    }
    println!("{}", output.message);
}

fn fail(err: &AppError, raw_json: bool) -> ! {
    if raw_json {
        let json = serde_json::json!({ "error": err });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
    } else {
        eprintln!("Error: {err}");
    }
    process::exit(1);
}

// ── Main ─────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    if matches!(cli.command, Commands::Tools) {
        println!(
            "{}",
            serde_json::to_string_pretty(&catalog::to_json_schema()).unwrap_or_default()
        );
        return;
    }

    let state = initialize_state(cli.config_dir, cli.draft.as_ref(), cli.json);
    let cmd = build_command(cli.command);
    let undoable = cmd.info().undoable;

    match execute(&state, cmd) {
        Ok(output) => {
            if let Some(path) = cli.draft.as_ref().filter(|_| undoable) {
                let saved = state.with_draft(|draft| project::save_draft(path, draft));
                if let Err(e) = saved {
                    fail(&AppError::from(e), cli.json);
                }
            }
            print_output(&output, cli.json);
        }
        Err(e) => fail(&e, cli.json),
    }
}
