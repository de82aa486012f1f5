#![allow(clippy::needless_pass_by_value)]

use std::sync::Arc;

use crate::error::AppError;
use crate::model::{
    definitions, definitions_in, find_definition, find_preset, presets, ChainStep, FieldKind,
    SubcommandCategory, SubcommandDefinition,
};
use crate::registry::catalog;
use crate::registry::params::{
    HelpParams, ListSubcommandsParams, PresetNameParams, SubcommandIdParams,
};
use crate::registry::{CommandOutput, CommandResult};
use crate::serializer::{defaults, render_command};
use crate::state::AppState;

pub fn list_subcommands(
    _state: &Arc<AppState>,
    p: ListSubcommandsParams,
) -> Result<CommandOutput, AppError> {
    let defs: Vec<SubcommandDefinition> = match p.category.as_deref().map(str::trim) {
        None | Some("") => definitions().to_vec(),
        Some(slug) => {
            let category =
                SubcommandCategory::from_slug(slug).ok_or_else(|| AppError::ValidationError {
                    message: format!(
                        "Unknown category \"{slug}\". Expected one of: {}",
                        SubcommandCategory::all()
                            .iter()
                            .map(SubcommandCategory::slug)
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                })?;
            definitions_in(category).copied().collect()
        }
    };
    let lines: Vec<String> = defs
        .iter()
        .map(|d| format!("  {} [{}] {}", d.id, d.category.slug(), d.syntax))
        .collect();
    Ok(CommandOutput::new(
        format!("{} subcommand(s):\n{}", defs.len(), lines.join("\n")),
        CommandResult::ListSubcommands(defs),
    ))
}

pub fn get_subcommand(
    _state: &Arc<AppState>,
    p: SubcommandIdParams,
) -> Result<CommandOutput, AppError> {
    let def = lookup(&p.id)?;
    Ok(CommandOutput::new(describe_subcommand(def), CommandResult::GetSubcommand(*def)))
}

pub fn list_presets(_state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let all = presets();
    let lines: Vec<String> = all
        .iter()
        .map(|p| format!("  {}: {}", p.name, p.description))
        .collect();
    Ok(CommandOutput::new(
        format!("{} preset(s):\n{}", all.len(), lines.join("\n")),
        CommandResult::ListPresets(all),
    ))
}

pub fn get_preset(_state: &Arc<AppState>, p: PresetNameParams) -> Result<CommandOutput, AppError> {
    let preset = find_preset(&p.name).ok_or_else(|| AppError::NotFound {
        what: format!("Preset \"{}\"", p.name),
    })?;
    let message = format!(
        "{}: {}\n{}",
        preset.name,
        preset.description,
        render_command(&preset.chain, &preset.run_command)
    );
    Ok(CommandOutput::new(message, CommandResult::GetPreset(preset)))
}

pub fn help(_state: &Arc<AppState>, p: HelpParams) -> Result<CommandOutput, AppError> {
    let topic = p.topic.as_deref().map(str::trim).filter(|t| !t.is_empty());
    let text = match topic {
        Some(id) if find_definition(id).is_some() && !is_command_or_category(id) => {
            find_definition(id).map(describe_subcommand).unwrap_or_default()
        }
        Some(slug) if SubcommandCategory::from_slug(slug).is_some() => {
            subcommand_category_help(slug)
        }
        _ => {
            let mut text = catalog::help_text(topic);
            if topic.is_none() {
                text.push_str("\nUse help({topic: \"as\"}) to describe a subcommand, or ");
                text.push_str("help({topic: \"condition\"}) to list a subcommand category.");
            }
            text
        }
    };
    Ok(CommandOutput::new(text.clone(), CommandResult::Help(text)))
}

fn lookup(id: &str) -> Result<&'static SubcommandDefinition, AppError> {
    find_definition(id.trim()).ok_or_else(|| AppError::NotFound {
        what: format!("Subcommand \"{}\"", id.trim()),
    })
}

fn is_command_or_category(topic: &str) -> bool {
    catalog::command_registry()
        .iter()
        .any(|e| e.name == topic || e.category.slug() == topic)
}

fn subcommand_category_help(slug: &str) -> String {
    let mut lines = Vec::new();
    if let Some(category) = SubcommandCategory::from_slug(slug) {
        lines.push(format!("{} subcommands: {}", category.slug(), category.description()));
        for def in definitions_in(category) {
            lines.push(format!("  - {}: {}", def.id, def.syntax));
        }
    }
    lines.join("\n")
}

fn describe_subcommand(def: &SubcommandDefinition) -> String {
    let mut lines = vec![
        format!("{} ({}): {}", def.label, def.id, def.description),
        format!("Category: {} | Syntax: {}", def.category.slug(), def.syntax),
    ];
    if def.fields.is_empty() {
        lines.push("No fields.".to_string());
    } else {
        lines.push("Fields:".to_string());
        for f in def.fields {
            let kind = match f.kind {
                FieldKind::Selector => "selector".to_string(),
                FieldKind::Coordinate => "coordinate".to_string(),
                FieldKind::Resource => "resource".to_string(),
                FieldKind::Text => "text".to_string(),
                FieldKind::Enum(options) => options.join(" | "),
            };
            lines.push(format!("  {} ({kind}) default \"{}\"", f.name, f.default));
        }
    }
    let example = render_command(&[ChainStep::new(def.id)], defaults::RUN_COMMAND);
    lines.push(format!("Example: {example}"));
    lines.join("\n")
}
