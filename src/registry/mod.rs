pub mod catalog;
pub mod execute;
pub mod handlers;
pub mod params;

use serde::{Deserialize, Serialize};

// ── Param types (used in Command enum) ──────────────────────────
use params::{
    ClearFieldParams, HelpParams, InstanceParams, ListSubcommandsParams, MoveStepParams,
    PresetNameParams, RenderParams, SetRunCommandParams, SubcommandIdParams, UpdateFieldParams,
};

// ── Return types (used in CommandResult enum) ───────────────────
use crate::dispatcher::UndoState;
use crate::model::{ChainStep, Draft, InstanceId, Preset, SubcommandDefinition};
use crate::serializer::RenderedCommand;

// ── Handler modules (dispatch targets) ──────────────────────────
use handlers::{edit, history, query, render};

// ── Command metadata ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandCategory {
    Render,
    Edit,
    History,
    Catalog,
}

impl CommandCategory {
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Render => "render",
            Self::Edit => "edit",
            Self::History => "history",
            Self::Catalog => "catalog",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Render => "Turn a chain and run command into an execute command",
            Self::Edit => "Add, remove, reorder and configure steps of the session chain",
            Self::History => "Undo, redo",
            Self::Catalog => "Browse subcommands and presets",
        }
    }

    pub fn all() -> &'static [CommandCategory] {
        &[Self::Render, Self::Edit, Self::History, Self::Catalog]
    }
}

pub struct CommandInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub category: CommandCategory,
    pub undoable: bool,
}

// ── Command output ──────────────────────────────────────────────

/// Result of executing a Command.
/// `message` serves the CLI, `result` carries typed data for HTTP clients.
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutput {
    pub message: String,
    pub result: CommandResult,
}

impl CommandOutput {
    pub fn new(message: impl Into<String>, result: CommandResult) -> Self {
        Self {
            message: message.into(),
            result,
        }
    }
}

// ── define_commands! macro ──────────────────────────────────────

/// Single source of truth for all commands. Generates:
/// 1. `Command` enum (serde-tagged)
/// 2. `CommandResult` enum (serde-tagged)
/// 3. `Command::info()` — metadata (name, description, category, undoable)
/// 4. `Command::dispatch()` — execute against the session
/// 5. `Command::registry_entries()` — catalog entries with JSON schemas
/// 6. `Command::from_tool_call()` — deserialize from (name, JSON) pair
macro_rules! define_commands {
    (
        params {
            $(
                [ $pc:expr $(, $pf:ident)* ]
                $pv:ident ( $pp:ty ) $( -> $pr:ty )?
                => $ph:path, $pn:literal : $pd:literal ;
            )*
        }
        no_params {
            $(
                [ $nc:expr $(, $nf:ident)* ]
                $nv:ident $( -> $nr:ty )?
                => $nh:path, $nn:literal : $nd:literal ;
            )*
        }
    ) => {
        // ── 1. Command enum ──
        /// Unified command type. Every surface (CLI, HTTP) dispatches through
        /// the same executor.
        #[derive(Debug, Clone, Serialize, Deserialize)]
        #[serde(tag = "command", content = "params")]
        pub enum Command {
            $( $pv($pp), )*
            $( $nv, )*
        }

        // ── 2. CommandResult enum ──
        /// Typed result for every command, discriminated by `command`.
        #[derive(Debug, Clone, Serialize)]
        #[serde(tag = "command", content = "data")]
        pub enum CommandResult {
            $( $pv $( ($pr) )?, )*
            $( $nv $( ($nr) )?, )*
        }

        // ── 3. Command::info() ──
        impl Command {
            pub fn info(&self) -> CommandInfo {
                match self {
                    $( Command::$pv(_) => CommandInfo {
                        name: $pn,
                        description: $pd,
                        category: $pc,
                        undoable: define_commands!(@has_flag undoable; $($pf)*),
                    }, )*
                    $( Command::$nv => CommandInfo {
                        name: $nn,
                        description: $nd,
                        category: $nc,
                        undoable: define_commands!(@has_flag undoable; $($nf)*),
                    }, )*
                }
            }
        }

        // ── 4. Command::dispatch() ──
        impl Command {
            pub(crate) fn dispatch(
                self,
                state: &std::sync::Arc<crate::state::AppState>,
            ) -> Result<CommandOutput, crate::error::AppError> {
                match self {
                    $( Command::$pv(p) => $ph(state, p), )*
                    $( Command::$nv => $nh(state), )*
                }
            }
        }

        // ── 5. Command::registry_entries() ──
        impl Command {
            pub(crate) fn registry_entries() -> Vec<catalog::CommandRegistryEntry> {
                vec![
                    $( catalog::entry(
                        CommandInfo {
                            name: $pn,
                            description: $pd,
                            category: $pc,
                            undoable: define_commands!(@has_flag undoable; $($pf)*),
                        },
                        catalog::schema_value::<$pp>(),
                    ), )*
                    $( catalog::entry(
                        CommandInfo {
                            name: $nn,
                            description: $nd,
                            category: $nc,
                            undoable: define_commands!(@has_flag undoable; $($nf)*),
                        },
                        catalog::empty_object_schema(),
                    ), )*
                ]
            }
        }

        // ── 6. Command::from_tool_call() ──
        impl Command {
            pub(crate) fn from_tool_call(
                name: &str,
                input: &serde_json::Value,
            ) -> Result<Command, String> {
                match name {
                    $( $pn => Ok(Command::$pv(catalog::de(input)?)), )*
                    $( $nn => Ok(Command::$nv), )*
                    _ => Err(format!("Unknown command: {name}")),
                }
            }
        }
    };

    // Flag helper — check whether `undoable` appears in a list of flags.
    (@has_flag undoable; undoable $($rest:ident)*) => { true };
    (@has_flag undoable; $_other:ident $($rest:ident)*) => { define_commands!(@has_flag undoable; $($rest)*) };
    (@has_flag undoable;) => { false };
}

// ── Command definitions ─────────────────────────────────────────

define_commands! {
    params {
        // ── Render (1) ──────────────────────────────────────────
        [CommandCategory::Render]
        Render(RenderParams) -> RenderedCommand
        => render::render, "render": "Render a chain and run command into one execute command. Stateless; does not touch the session.";

        // ── Edit (7, all undoable) ──────────────────────────────
        [CommandCategory::Edit, undoable]
        AddStep(ChainStep) -> InstanceId
        => edit::add_step, "add_step": "Append a subcommand step to the chain. Returns the new instance id.";

        [CommandCategory::Edit, undoable]
        RemoveStep(InstanceParams)
        => edit::remove_step, "remove_step": "Remove a step from the chain by instance id.";

        [CommandCategory::Edit, undoable]
        MoveStep(MoveStepParams) -> bool
        => edit::move_step, "move_step": "Swap a step with its neighbour. Returns false when already at the end it moves toward.";

        [CommandCategory::Edit, undoable]
        UpdateField(UpdateFieldParams)
        => edit::update_field, "update_field": "Set one config field of a step.";

        [CommandCategory::Edit, undoable]
        ClearField(ClearFieldParams)
        => edit::clear_field, "clear_field": "Remove one config field of a step so its default applies.";

        [CommandCategory::Edit, undoable]
        SetRunCommand(SetRunCommandParams)
        => edit::set_run_command, "set_run_command": "Set the command that follows `run`.";

        [CommandCategory::Edit, undoable]
        ApplyPreset(PresetNameParams)
        => edit::apply_preset, "apply_preset": "Replace the chain and run command with a named preset.";

        // ── Catalog (4) ─────────────────────────────────────────
        [CommandCategory::Catalog]
        ListSubcommands(ListSubcommandsParams) -> Vec<SubcommandDefinition>
        => query::list_subcommands, "list_subcommands": "List subcommand definitions, optionally for one category.";

        [CommandCategory::Catalog]
        GetSubcommand(SubcommandIdParams) -> SubcommandDefinition
        => query::get_subcommand, "get_subcommand": "Get one subcommand definition with its fields and defaults.";

        [CommandCategory::Catalog]
        GetPreset(PresetNameParams) -> Preset
        => query::get_preset, "get_preset": "Get a preset by name.";

        [CommandCategory::Catalog]
        Help(HelpParams) -> String
        => query::help, "help": "Discover commands, categories and subcommands. Call with no args for an overview.";
    }
    no_params {
        // ── Render (2) ──────────────────────────────────────────
        [CommandCategory::Render]
        RenderDraft -> RenderedCommand
        => render::render_draft, "render_draft": "Render the session chain and run command.";

        [CommandCategory::Render]
        GetDraft -> Box<Draft>
        => render::get_draft, "get_draft": "Get the session chain (with instance ids) and run command.";

        // ── Edit (1) ────────────────────────────────────────────
        [CommandCategory::Edit, undoable]
        ResetChain => edit::reset_chain, "reset_chain": "Remove every step and clear the run command.";

        // ── History (3) ─────────────────────────────────────────
        [CommandCategory::History]
        Undo => history::undo, "undo": "Undo the last edit.";

        [CommandCategory::History]
        Redo => history::redo, "redo": "Redo the last undone edit.";

        [CommandCategory::History]
        GetUndoState -> UndoState
        => history::get_undo_state, "get_undo_state": "Get undo/redo availability and descriptions.";

        // ── Catalog (1) ─────────────────────────────────────────
        [CommandCategory::Catalog]
        ListPresets -> Vec<Preset>
        => query::list_presets, "list_presets": "List every preset.";
    }
}
