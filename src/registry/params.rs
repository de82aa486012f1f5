use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{ChainStep, InstanceId, MoveDirection};

// ── Render params ───────────────────────────────────────────────

/// Stateless render input: `{ chain: [{subcommandId, config}], runCommand }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenderParams {
    /// Ordered execute subcommands.
    #[serde(default)]
    pub chain: Vec<ChainStep>,
    /// Command after `run`. Blank renders `say Hello!`.
    #[serde(default)]
    pub run_command: String,
}

// ── Edit params ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InstanceParams {
    pub instance: InstanceId,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MoveStepParams {
    pub instance: InstanceId,
    pub direction: MoveDirection,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateFieldParams {
    pub instance: InstanceId,
    /// Field name, e.g. `target` or `sourceObjective`.
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClearFieldParams {
    pub instance: InstanceId,
    pub field: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SetRunCommandParams {
    pub run_command: String,
}

// ── Catalog params ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PresetNameParams {
    /// Preset name, matched case-insensitively.
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SubcommandIdParams {
    pub id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListSubcommandsParams {
    /// `position`, `context`, `condition` or `store`. Omit for all.
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct HelpParams {
    /// A category, a command name, or a subcommand id.
    #[serde(default)]
    pub topic: Option<String>,
}
