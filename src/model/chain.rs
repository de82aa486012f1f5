use std::fmt;

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::AppError;

/// Field name → field value. Insertion order is kept so a saved draft
/// serializes back the way the user filled it in.
pub type FieldMap = IndexMap<String, String>;

/// Session-unique handle for one step in a chain.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS, JsonSchema,
)]
#[serde(transparent)]
#[ts(export)]
pub struct InstanceId(pub u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The wire shape of one chain entry: `{ subcommandId, config }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ChainStep {
    pub subcommand_id: String,
    #[serde(default)]
    pub config: FieldMap,
}

impl ChainStep {
    pub fn new(subcommand_id: impl Into<String>) -> Self {
        Self {
            subcommand_id: subcommand_id.into(),
            config: FieldMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(field.into(), value.into());
        self
    }
}

/// A step the user has added to their chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SubcommandInstance {
    pub id: InstanceId,
    pub subcommand_id: String,
    #[serde(default)]
    pub config: FieldMap,
}

/// Anything the serializer can render a clause from.
pub trait ClauseSource {
    fn subcommand_id(&self) -> &str;
    fn config(&self) -> &FieldMap;
}

impl ClauseSource for ChainStep {
    fn subcommand_id(&self) -> &str {
        &self.subcommand_id
    }

    fn config(&self) -> &FieldMap {
        &self.config
    }
}

impl ClauseSource for SubcommandInstance {
    fn subcommand_id(&self) -> &str {
        &self.subcommand_id
    }

    fn config(&self) -> &FieldMap {
        &self.config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum MoveDirection {
    Up,
    Down,
}

// ── Chain ───────────────────────────────────────────────────────

/// Ordered list of execute clauses. Order is the literal clause order of the
/// rendered command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Chain {
    pub steps: Vec<SubcommandInstance>,
    /// Next id handed out by [`Chain::add`]. Never reused within a chain, even
    /// after removal or reset.
    #[serde(default)]
    next_id: u64,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a chain from wire-shape steps, assigning fresh ids.
    pub fn from_steps(steps: impl IntoIterator<Item = ChainStep>) -> Self {
        let mut chain = Self::new();
        chain.replace_with(steps);
        chain
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SubcommandInstance> {
        self.steps.iter()
    }

    /// Append a step. Returns the new instance id.
    pub fn add(&mut self, step: ChainStep) -> InstanceId {
        let id = self.allocate_id();
        self.steps.push(SubcommandInstance {
            id,
            subcommand_id: step.subcommand_id,
            config: step.config,
        });
        id
    }

    pub fn position_of(&self, id: InstanceId) -> Option<usize> {
        self.steps.iter().position(|s| s.id == id)
    }

    pub fn get(&self, id: InstanceId) -> Option<&SubcommandInstance> {
        self.steps.iter().find(|s| s.id == id)
    }

    fn get_mut(&mut self, id: InstanceId) -> Result<&mut SubcommandInstance, AppError> {
        self.steps
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found(id))
    }

    /// Remove a step, returning it.
    pub fn remove(&mut self, id: InstanceId) -> Result<SubcommandInstance, AppError> {
        let index = self.position_of(id).ok_or_else(|| not_found(id))?;
        Ok(self.steps.remove(index))
    }

    /// Swap a step with its neighbour. Moving the first step up or the last
    /// step down leaves the chain unchanged and returns `Ok(false)`.
    pub fn move_step(
        &mut self,
        id: InstanceId,
        direction: MoveDirection,
    ) -> Result<bool, AppError> {
        let index = self.position_of(id).ok_or_else(|| not_found(id))?;
        let other = match direction {
            MoveDirection::Up => index.checked_sub(1),
            MoveDirection::Down => Some(index + 1).filter(|&i| i < self.steps.len()),
        };
        match other {
            Some(other) => {
                self.steps.swap(index, other);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Set one config field on a step. An empty value is stored as-is; the
    /// serializer treats it as unset.
    pub fn update_field(
        &mut self,
        id: InstanceId,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), AppError> {
        let step = self.get_mut(id)?;
        step.config.insert(field.into(), value.into());
        Ok(())
    }

    /// Drop a config field so the serializer falls back to its default.
    /// Returns whether the field was present.
    pub fn clear_field(&mut self, id: InstanceId, field: &str) -> Result<bool, AppError> {
        let step = self.get_mut(id)?;
        Ok(step.config.shift_remove(field).is_some())
    }

    /// Remove every step. Ids keep counting up.
    pub fn reset(&mut self) {
        self.steps.clear();
    }

    /// Replace the whole chain, e.g. from a preset.
    pub fn replace_with(&mut self, steps: impl IntoIterator<Item = ChainStep>) {
        self.steps.clear();
        for step in steps {
            self.add(step);
        }
    }

    /// The chain in wire shape, without instance ids.
    pub fn to_steps(&self) -> Vec<ChainStep> {
        self.steps
            .iter()
            .map(|s| ChainStep {
                subcommand_id: s.subcommand_id.clone(),
                config: s.config.clone(),
            })
            .collect()
    }

    fn allocate_id(&mut self) -> InstanceId {
        // Keep ids unique even for chains deserialized without a counter.
        let floor = self.steps.iter().map(|s| s.id.0 + 1).max().unwrap_or(0);
        let id = self.next_id.max(floor);
        self.next_id = id + 1;
        InstanceId(id)
    }
}

fn not_found(id: InstanceId) -> AppError {
    AppError::NotFound {
        what: format!("Chain step {id}"),
    }
}

// ── Draft ───────────────────────────────────────────────────────

/// A chain plus the command it runs: everything needed to render one
/// `execute` command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Draft {
    #[serde(default)]
    pub chain: Chain,
    #[serde(default)]
    pub run_command: String,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear both the chain and the run command.
    pub fn reset(&mut self) {
        self.chain.reset();
        self.run_command.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn ids(chain: &Chain) -> Vec<&str> {
        chain.iter().map(|s| s.subcommand_id.as_str()).collect()
    }

    fn sample() -> (Chain, InstanceId, InstanceId, InstanceId) {
        let mut chain = Chain::new();
        let a = chain.add(ChainStep::new("as"));
        let b = chain.add(ChainStep::new("at"));
        let c = chain.add(ChainStep::new("positioned"));
        (chain, a, b, c)
    }

    #[test]
    fn add_assigns_distinct_ids() {
        let (_, a, b, c) = sample();
        assert_ne!(a, b);
        assert_ne!(b, c);
    }

    #[test]
    fn move_swaps_with_neighbour() {
        let (mut chain, _, b, _) = sample();
        assert!(chain.move_step(b, MoveDirection::Up).unwrap());
        assert_eq!(ids(&chain), vec!["at", "as", "positioned"]);
        assert!(chain.move_step(b, MoveDirection::Down).unwrap());
        assert_eq!(ids(&chain), vec!["as", "at", "positioned"]);
    }

    #[test]
    fn move_is_clamped_at_the_ends() {
        let (mut chain, a, _, c) = sample();
        let before = chain.clone();
        assert!(!chain.move_step(a, MoveDirection::Up).unwrap());
        assert!(!chain.move_step(c, MoveDirection::Down).unwrap());
        assert_eq!(chain, before);
    }

    #[test]
    fn unknown_instance_is_not_found() {
        let (mut chain, ..) = sample();
        let err = chain.remove(InstanceId(99)).unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
        assert!(chain.update_field(InstanceId(99), "target", "@a").is_err());
        assert!(chain.move_step(InstanceId(99), MoveDirection::Up).is_err());
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let (mut chain, _, _, c) = sample();
        chain.remove(c).unwrap();
        let d = chain.add(ChainStep::new("in"));
        assert!(d > c);
    }

    #[test]
    fn update_and_clear_field() {
        let (mut chain, a, ..) = sample();
        chain.update_field(a, "target", "@e[type=cow]").unwrap();
        assert_eq!(chain.get(a).unwrap().config["target"], "@e[type=cow]");
        assert!(chain.clear_field(a, "target").unwrap());
        assert!(!chain.clear_field(a, "target").unwrap());
    }

    #[test]
    fn deserialized_chain_without_counter_keeps_ids_unique() {
        let json = r#"{"steps":[{"id":4,"subcommandId":"as","config":{}}]}"#;
        let mut chain: Chain = serde_json::from_str(json).unwrap();
        let id = chain.add(ChainStep::new("at"));
        assert_eq!(id, InstanceId(5));
    }

    #[test]
    fn step_wire_shape_is_camel_case() {
        let step: ChainStep =
            serde_json::from_str(r#"{"subcommandId":"as","config":{"target":"@p"}}"#).unwrap();
        assert_eq!(step, ChainStep::new("as").with("target", "@p"));
        let missing_config: ChainStep = serde_json::from_str(r#"{"subcommandId":"at"}"#).unwrap();
        assert!(missing_config.config.is_empty());
    }
}
