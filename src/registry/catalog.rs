#![allow(clippy::needless_pass_by_value)]

use schemars::schema_for;
use serde::Serialize;
use serde_json::Value;

use super::{CommandCategory, CommandInfo};

/// A registry entry: metadata + JSON schema for the params.
#[derive(Debug, Clone, Serialize)]
pub struct CommandRegistryEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub category: CommandCategory,
    pub undoable: bool,
    pub param_schema: Value,
}

pub(super) fn empty_object_schema() -> Value {
    serde_json::json!({ "type": "object", "properties": {} })
}

pub(super) fn schema_value<T: schemars::JsonSchema>() -> Value {
    let root = schema_for!(T);
    serde_json::to_value(root).unwrap_or(empty_object_schema())
}

pub(super) fn entry(info: CommandInfo, param_schema: Value) -> CommandRegistryEntry {
    CommandRegistryEntry {
        name: info.name,
        description: info.description,
        category: info.category,
        undoable: info.undoable,
        param_schema,
    }
}

pub(super) fn de<T: serde::de::DeserializeOwned>(input: &Value) -> Result<T, String> {
    // Commands without required params accept an absent body.
    let input = if input.is_null() {
        serde_json::json!({})
    } else {
        input.clone()
    };
    serde_json::from_value(input).map_err(|e| e.to_string())
}

/// The complete command registry, auto-generated from param struct schemas.
pub fn command_registry() -> Vec<CommandRegistryEntry> {
    super::Command::registry_entries()
}

/// Generate help text for command discovery.
/// Three tiers: no topic → categories, category → command list, command → full schema.
pub fn help_text(topic: Option<&str>) -> String {
    let registry = command_registry();

    match topic.map(str::trim).filter(|t| !t.is_empty()) {
        None => {
            let mut lines = vec!["Available command categories:".to_string()];
            for cat in CommandCategory::all() {
                let count = registry.iter().filter(|e| e.category == *cat).count();
                if count > 0 {
                    lines.push(format!("  {} ({count}) — {}", cat.slug(), cat.description()));
                }
            }
            lines.push(String::new());
            lines.push("Use help({topic: \"edit\"}) to list commands in a category.".to_string());
            lines.push("Use help({topic: \"add_step\"}) for full parameter details.".to_string());
            lines.join("\n")
        }
        Some(topic) => {
            // Command name first (tier 3: full schema)
            if let Some(entry) = registry.iter().find(|e| e.name == topic) {
                let schema_str = serde_json::to_string_pretty(&entry.param_schema)
                    .unwrap_or_else(|_| "{}".to_string());
                return format!(
                    "{}: {}\nCategory: {} | Undoable: {}\n\nParameters:\n{}",
                    entry.name,
                    entry.description,
                    entry.category.slug(),
                    if entry.undoable { "yes" } else { "no" },
                    schema_str,
                );
            }

            // Category name (tier 2: command list)
            let matching: Vec<&CommandRegistryEntry> = registry
                .iter()
                .filter(|e| e.category.slug().eq_ignore_ascii_case(topic))
                .collect();

            if matching.is_empty() {
                format!("Unknown topic: \"{topic}\". Use help() to see categories and commands.")
            } else {
                let mut lines = vec![format!("{topic} commands:")];
                for entry in &matching {
                    lines.push(format!("  - {}: {}", entry.name, entry.description));
                }
                lines.push(String::new());
                lines.push(
                    "Use help({topic: \"command_name\"}) for parameter details.".to_string(),
                );
                lines.join("\n")
            }
        }
    }
}

/// Generate JSON Schema formatted tool list (for REST).
pub fn to_json_schema() -> Value {
    Value::Array(
        command_registry()
            .iter()
            .map(|e| {
                serde_json::json!({
                    "name": e.name,
                    "description": e.description,
                    "category": e.category,
                    "undoable": e.undoable,
                    "inputSchema": e.param_schema,
                })
            })
            .collect(),
    )
}

/// Deserialize a tool call (name + JSON input) into a Command.
pub fn deserialize_from_tool_call(name: &str, input: &Value) -> Result<super::Command, String> {
    super::Command::from_tool_call(name, input)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn registry_names_are_unique() {
        let mut seen = HashSet::new();
        for entry in command_registry() {
            assert!(seen.insert(entry.name), "duplicate command {}", entry.name);
        }
    }

    #[test]
    fn param_schemas_are_objects() {
        for entry in command_registry() {
            assert!(entry.param_schema.is_object(), "{}", entry.name);
        }
    }

    #[test]
    fn render_schema_lists_chain_and_run_command() {
        let registry = command_registry();
        let render = registry.iter().find(|e| e.name == "render").unwrap();
        let props = &render.param_schema["properties"];
        assert!(props.get("chain").is_some());
        assert!(props.get("runCommand").is_some());
    }

    #[test]
    fn help_tiers() {
        assert!(help_text(None).starts_with("Available command categories:"));
        assert!(help_text(Some("edit")).contains("add_step"));
        assert!(help_text(Some("move_step")).contains("Undoable: yes"));
        assert!(help_text(Some("bogus")).starts_with("Unknown topic"));
    }

    #[test]
    fn tool_call_deserializes_params() {
        let cmd = deserialize_from_tool_call(
            "update_field",
            &serde_json::json!({ "instance": 3, "field": "target", "value": "@a" }),
        )
        .unwrap();
        assert_eq!(cmd.info().name, "update_field");
        assert!(deserialize_from_tool_call("nope", &Value::Null).is_err());
        assert!(deserialize_from_tool_call("move_step", &serde_json::json!({})).is_err());
    }

    #[test]
    fn tool_call_accepts_missing_body_for_optional_params() {
        let cmd = deserialize_from_tool_call("list_subcommands", &Value::Null).unwrap();
        assert_eq!(cmd.info().name, "list_subcommands");
        let cmd = deserialize_from_tool_call("undo", &Value::Null).unwrap();
        assert!(!cmd.info().undoable);
    }
}
