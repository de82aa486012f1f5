use std::time::Instant;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::AppError;
use crate::model::{ChainStep, Draft, InstanceId, MoveDirection, Preset};
use crate::settings::DEFAULT_MAX_UNDO_LEVELS;

/// An undoable edit to the session draft. Each variant corresponds to one
/// user action in the chain builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EditCommand {
    AddStep {
        step: ChainStep,
    },
    RemoveStep {
        instance: InstanceId,
    },
    MoveStep {
        instance: InstanceId,
        direction: MoveDirection,
    },
    UpdateField {
        instance: InstanceId,
        field: String,
        value: String,
    },
    ClearField {
        instance: InstanceId,
        field: String,
    },
    SetRunCommand {
        run_command: String,
    },
    ApplyPreset {
        preset: Preset,
    },
    Reset,
}

impl EditCommand {
    /// Human-readable description for undo tooltips.
    pub fn description(&self) -> String {
        match self {
            EditCommand::AddStep { step } => format!("Add \"{}\"", step.subcommand_id),
            EditCommand::RemoveStep { instance } => format!("Remove step {instance}"),
            EditCommand::MoveStep {
                instance,
                direction,
            } => {
                let dir = match direction {
                    MoveDirection::Up => "up",
                    MoveDirection::Down => "down",
                };
                format!("Move step {instance} {dir}")
            }
            EditCommand::UpdateField { field, .. } => format!("Edit {field}"),
            EditCommand::ClearField { field, .. } => format!("Clear {field}"),
            EditCommand::SetRunCommand { .. } => "Edit run command".to_string(),
            EditCommand::ApplyPreset { preset } => format!("Load preset \"{}\"", preset.name),
            EditCommand::Reset => "Reset chain".to_string(),
        }
    }

    /// Typing into one field sends one edit per keystroke; those share a key
    /// so they undo together.
    fn coalesce_key(&self) -> Option<String> {
        match self {
            EditCommand::UpdateField {
                instance, field, ..
            } => Some(format!("field:{}:{field}", instance.0)),
            EditCommand::SetRunCommand { .. } => Some("run_command".to_string()),
            _ => None,
        }
    }
}

/// Result of applying an EditCommand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EditOutcome {
    Added(InstanceId),
    /// A move that hit the chain boundary reports `false`.
    Moved(bool),
    Unit,
}

/// Undo/redo state for the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UndoState {
    pub can_undo: bool,
    pub can_redo: bool,
    pub undo_description: Option<String>,
    pub redo_description: Option<String>,
}

/// The draft before an edit, plus the edit's description.
struct UndoEntry {
    description: String,
    snapshot: Draft,
    /// When set, consecutive edits with the same coalesce key reuse this
    /// entry's snapshot instead of pushing a new one.
    coalesce_key: Option<String>,
}

/// Maximum elapsed time between two coalescing edits for them to share one
/// undo entry.
const COALESCE_WINDOW: std::time::Duration = std::time::Duration::from_millis(500);

/// Applies edits to a draft with snapshot-based undo/redo.
pub struct CommandDispatcher {
    undo_stack: Vec<UndoEntry>,
    redo_stack: Vec<UndoEntry>,
    max_undo_levels: usize,
    last_coalesce_key: Option<String>,
    last_coalesce_time: Option<Instant>,
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandDispatcher {
    pub fn new() -> Self {
        Self::with_max_undo_levels(DEFAULT_MAX_UNDO_LEVELS)
    }

    pub fn with_max_undo_levels(max_undo_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_undo_levels: max_undo_levels.max(1),
            last_coalesce_key: None,
            last_coalesce_time: None,
        }
    }

    /// Apply an edit to the draft, recording an undo entry.
    ///
    /// A move clamped at the chain boundary changes nothing and records
    /// nothing. Failed edits leave both the draft and the history untouched.
    pub fn execute(
        &mut self,
        draft: &mut Draft,
        cmd: &EditCommand,
    ) -> Result<EditOutcome, AppError> {
        self.execute_at(draft, cmd, Instant::now())
    }

    fn execute_at(
        &mut self,
        draft: &mut Draft,
        cmd: &EditCommand,
        now: Instant,
    ) -> Result<EditOutcome, AppError> {
        let description = cmd.description();
        let new_coalesce_key = cmd.coalesce_key();

        // Only the newest undo entry can absorb an edit.
        let coalesce_idx = new_coalesce_key.as_ref().and_then(|new_key| {
            let key_matches = self.last_coalesce_key.as_ref() == Some(new_key);
            let within_window = self
                .last_coalesce_time
                .is_some_and(|t| now.duration_since(t) < COALESCE_WINDOW);
            let top = self.undo_stack.len().checked_sub(1)?;
            let top_matches = self
                .undo_stack
                .last()
                .is_some_and(|e| e.coalesce_key.as_ref() == Some(new_key));
            (key_matches && within_window && top_matches).then_some(top)
        });

        let snapshot = draft.clone();
        let outcome = apply(draft, cmd)?;
        if outcome == EditOutcome::Moved(false) {
            return Ok(outcome);
        }
        tracing::debug!(edit = %description, steps = draft.chain.len(), "applied edit");

        if let Some(idx) = coalesce_idx {
            // Keep the snapshot from before the first edit of the run.
            if let Some(entry) = self.undo_stack.get_mut(idx) {
                entry.description = description;
            }
        } else {
            self.undo_stack.push(UndoEntry {
                description,
                snapshot,
                coalesce_key: new_coalesce_key.clone(),
            });
            if self.undo_stack.len() > self.max_undo_levels {
                self.undo_stack.remove(0);
            }
        }
        self.redo_stack.clear();

        if new_coalesce_key.is_some() {
            self.last_coalesce_key = new_coalesce_key;
            self.last_coalesce_time = Some(now);
        } else {
            self.break_coalescing();
        }

        Ok(outcome)
    }

    /// Undo the last edit. Returns the description of what was undone.
    pub fn undo(&mut self, draft: &mut Draft) -> Result<String, AppError> {
        self.break_coalescing();
        let entry = self.undo_stack.pop().ok_or(AppError::ValidationError {
            message: "Nothing to undo".into(),
        })?;
        let current = std::mem::replace(draft, entry.snapshot);
        self.redo_stack.push(UndoEntry {
            description: entry.description.clone(),
            snapshot: current,
            coalesce_key: None,
        });
        Ok(entry.description)
    }

    /// Redo the last undone edit. Returns the description of what was redone.
    pub fn redo(&mut self, draft: &mut Draft) -> Result<String, AppError> {
        self.break_coalescing();
        let entry = self.redo_stack.pop().ok_or(AppError::ValidationError {
            message: "Nothing to redo".into(),
        })?;
        let current = std::mem::replace(draft, entry.snapshot);
        self.undo_stack.push(UndoEntry {
            description: entry.description.clone(),
            snapshot: current,
            coalesce_key: None,
        });
        Ok(entry.description)
    }

    pub fn undo_state(&self) -> UndoState {
        UndoState {
            can_undo: !self.undo_stack.is_empty(),
            can_redo: !self.redo_stack.is_empty(),
            undo_description: self.undo_stack.last().map(|e| e.description.clone()),
            redo_description: self.redo_stack.last().map(|e| e.description.clone()),
        }
    }

    /// Clear all undo/redo history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.break_coalescing();
    }

    fn break_coalescing(&mut self) {
        self.last_coalesce_key = None;
        self.last_coalesce_time = None;
    }
}

fn apply(draft: &mut Draft, cmd: &EditCommand) -> Result<EditOutcome, AppError> {
    match cmd {
        EditCommand::AddStep { step } => Ok(EditOutcome::Added(draft.chain.add(step.clone()))),
        EditCommand::RemoveStep { instance } => {
            draft.chain.remove(*instance)?;
            Ok(EditOutcome::Unit)
        }
        EditCommand::MoveStep {
            instance,
            direction,
        } => draft
            .chain
            .move_step(*instance, *direction)
            .map(EditOutcome::Moved),
        EditCommand::UpdateField {
            instance,
            field,
            value,
        } => {
            draft.chain.update_field(*instance, field.as_str(), value.as_str())?;
            Ok(EditOutcome::Unit)
        }
        EditCommand::ClearField { instance, field } => {
            draft.chain.clear_field(*instance, field)?;
            Ok(EditOutcome::Unit)
        }
        EditCommand::SetRunCommand { run_command } => {
            draft.run_command.clone_from(run_command);
            Ok(EditOutcome::Unit)
        }
        EditCommand::ApplyPreset { preset } => {
            draft.apply_preset(preset);
            Ok(EditOutcome::Unit)
        }
        EditCommand::Reset => {
            draft.reset();
            Ok(EditOutcome::Unit)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing, clippy::panic)]
mod tests {
    use super::*;
    use crate::model::find_preset;
    use crate::serializer::render_draft;
    use std::time::Duration;

    fn add(d: &mut CommandDispatcher, draft: &mut Draft, id: &str) -> InstanceId {
        match d
            .execute(draft, &EditCommand::AddStep { step: ChainStep::new(id) })
            .unwrap()
        {
            EditOutcome::Added(id) => id,
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn undo_restores_previous_draft() {
        let mut d = CommandDispatcher::new();
        let mut draft = Draft::new();
        add(&mut d, &mut draft, "as");
        add(&mut d, &mut draft, "at");
        assert_eq!(render_draft(&draft), "execute as @s at @s run say Hello!");

        assert_eq!(d.undo(&mut draft).unwrap(), "Add \"at\"");
        assert_eq!(render_draft(&draft), "execute as @s run say Hello!");
        d.redo(&mut draft).unwrap();
        assert_eq!(render_draft(&draft), "execute as @s at @s run say Hello!");
    }

    #[test]
    fn nothing_to_undo_is_an_error() {
        let mut d = CommandDispatcher::new();
        let mut draft = Draft::new();
        assert!(matches!(d.undo(&mut draft), Err(AppError::ValidationError { .. })));
        assert!(matches!(d.redo(&mut draft), Err(AppError::ValidationError { .. })));
    }

    #[test]
    fn clamped_move_records_nothing() {
        let mut d = CommandDispatcher::new();
        let mut draft = Draft::new();
        let first = add(&mut d, &mut draft, "as");
        add(&mut d, &mut draft, "at");
        let before = d.undo_state();

        let outcome = d
            .execute(
                &mut draft,
                &EditCommand::MoveStep {
                    instance: first,
                    direction: MoveDirection::Up,
                },
            )
            .unwrap();
        assert_eq!(outcome, EditOutcome::Moved(false));
        assert_eq!(d.undo_state(), before);
    }

    #[test]
    fn failed_edit_leaves_history_alone() {
        let mut d = CommandDispatcher::new();
        let mut draft = Draft::new();
        add(&mut d, &mut draft, "as");
        let err = d
            .execute(&mut draft, &EditCommand::RemoveStep { instance: InstanceId(42) })
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
        assert_eq!(d.undo_state().undo_description.as_deref(), Some("Add \"as\""));
    }

    #[test]
    fn keystrokes_on_one_field_coalesce() {
        let mut d = CommandDispatcher::new();
        let mut draft = Draft::new();
        let id = add(&mut d, &mut draft, "as");
        let t0 = Instant::now();
        for (i, value) in ["@", "@a", "@a["].iter().enumerate() {
            let cmd = EditCommand::UpdateField {
                instance: id,
                field: "target".into(),
                value: (*value).into(),
            };
            d.execute_at(&mut draft, &cmd, t0 + Duration::from_millis(100 * i as u64))
                .unwrap();
        }
        d.undo(&mut draft).unwrap();
        assert!(draft.chain.get(id).unwrap().config.is_empty());
    }

    #[test]
    fn edits_outside_the_window_do_not_coalesce() {
        let mut d = CommandDispatcher::new();
        let mut draft = Draft::new();
        let id = add(&mut d, &mut draft, "as");
        let t0 = Instant::now();
        let edit = |v: &str| EditCommand::UpdateField {
            instance: id,
            field: "target".into(),
            value: v.into(),
        };
        d.execute_at(&mut draft, &edit("@a"), t0).unwrap();
        d.execute_at(&mut draft, &edit("@p"), t0 + Duration::from_secs(2)).unwrap();
        d.undo(&mut draft).unwrap();
        assert_eq!(draft.chain.get(id).unwrap().config["target"], "@a");
    }

    #[test]
    fn other_edits_end_a_coalescing_run() {
        let mut d = CommandDispatcher::new();
        let mut draft = Draft::new();
        let first = add(&mut d, &mut draft, "as");
        let t0 = Instant::now();
        let target = |v: &str| EditCommand::UpdateField {
            instance: first,
            field: "target".into(),
            value: v.into(),
        };
        d.execute_at(&mut draft, &target("@a"), t0).unwrap();
        d.execute_at(
            &mut draft,
            &EditCommand::AddStep { step: ChainStep::new("at") },
            t0 + Duration::from_millis(100),
        )
        .unwrap();
        d.execute_at(&mut draft, &target("@p"), t0 + Duration::from_millis(200))
            .unwrap();
        assert_eq!(render_draft(&draft), "execute as @p at @s run say Hello!");

        assert_eq!(d.undo(&mut draft).unwrap(), "Edit target");
        assert_eq!(render_draft(&draft), "execute as @a at @s run say Hello!");
        assert_eq!(d.undo(&mut draft).unwrap(), "Add \"at\"");
        assert_eq!(render_draft(&draft), "execute as @a run say Hello!");
    }

    #[test]
    fn new_edit_clears_redo() {
        let mut d = CommandDispatcher::new();
        let mut draft = Draft::new();
        add(&mut d, &mut draft, "as");
        d.undo(&mut draft).unwrap();
        assert!(d.undo_state().can_redo);
        add(&mut d, &mut draft, "at");
        assert!(!d.undo_state().can_redo);
    }

    #[test]
    fn undo_depth_is_bounded() {
        let mut d = CommandDispatcher::with_max_undo_levels(3);
        let mut draft = Draft::new();
        for _ in 0..5 {
            add(&mut d, &mut draft, "as");
        }
        for _ in 0..3 {
            d.undo(&mut draft).unwrap();
        }
        assert!(d.undo(&mut draft).is_err());
        assert_eq!(draft.chain.len(), 2);
    }

    #[test]
    fn preset_and_reset_are_undoable() {
        let mut d = CommandDispatcher::new();
        let mut draft = Draft::new();
        let preset = find_preset("Teleport above players").unwrap();
        d.execute(&mut draft, &EditCommand::ApplyPreset { preset }).unwrap();
        let loaded = render_draft(&draft);
        assert_eq!(loaded, "execute as @a at @s run tp @s ~ ~5 ~");

        d.execute(&mut draft, &EditCommand::Reset).unwrap();
        assert_eq!(render_draft(&draft), "execute run say Hello!");
        d.undo(&mut draft).unwrap();
        assert_eq!(render_draft(&draft), loaded);
    }
}
