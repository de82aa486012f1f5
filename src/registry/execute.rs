use std::sync::Arc;

use crate::error::AppError;
use crate::state::AppState;

use super::{Command, CommandOutput};

/// Execute a Command against the application state.
/// This is the single dispatch point for every surface (CLI, HTTP).
pub fn execute(state: &Arc<AppState>, cmd: Command) -> Result<CommandOutput, AppError> {
    let name = cmd.info().name;
    tracing::debug!(command = name, "execute");
    let result = cmd.dispatch(state);
    if let Err(err) = &result {
        tracing::warn!(command = name, error = %err, "command failed");
    }
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing, clippy::panic)]
mod tests {
    use super::*;
    use crate::model::{ChainStep, InstanceId, MoveDirection};
    use crate::registry::params::{
        InstanceParams, MoveStepParams, PresetNameParams, RenderParams, SetRunCommandParams,
        UpdateFieldParams,
    };
    use crate::registry::CommandResult;
    use crate::settings::AppSettings;

    fn state() -> Arc<AppState> {
        Arc::new(AppState::new(AppSettings::default(), std::env::temp_dir()))
    }

    fn run(state: &Arc<AppState>, cmd: Command) -> CommandResult {
        execute(state, cmd).unwrap().result
    }

    fn rendered(state: &Arc<AppState>) -> String {
        match run(state, Command::RenderDraft) {
            CommandResult::RenderDraft(r) => r.command,
            other => panic!("unexpected result {other:?}"),
        }
    }

    fn add(state: &Arc<AppState>, step: ChainStep) -> InstanceId {
        match run(state, Command::AddStep(step)) {
            CommandResult::AddStep(id) => id,
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn render_is_stateless() {
        let state = state();
        let out = execute(
            &state,
            Command::Render(RenderParams {
                chain: vec![ChainStep::new("as").with("target", "@a")],
                run_command: "say hi".into(),
            }),
        )
        .unwrap();
        match out.result {
            CommandResult::Render(r) => {
                assert_eq!(r.command, "execute as @a run say hi");
                assert_eq!(r.lines, vec!["execute as @a", "run say hi"]);
            }
            other => panic!("unexpected result {other:?}"),
        }
        assert_eq!(rendered(&state), "execute run say Hello!");
        assert!(!state.dispatcher.lock().undo_state().can_undo);
    }

    #[test]
    fn session_edits_flow_through_render_draft() {
        let state = state();
        let a = add(&state, ChainStep::new("as"));
        let b = add(&state, ChainStep::new("at"));
        run(
            &state,
            Command::UpdateField(UpdateFieldParams {
                instance: a,
                field: "target".into(),
                value: "@e[type=cow]".into(),
            }),
        );
        run(
            &state,
            Command::SetRunCommand(SetRunCommandParams {
                run_command: "kill @s".into(),
            }),
        );
        assert_eq!(rendered(&state), "execute as @e[type=cow] at @s run kill @s");

        match run(
            &state,
            Command::MoveStep(MoveStepParams {
                instance: b,
                direction: MoveDirection::Up,
            }),
        ) {
            CommandResult::MoveStep(moved) => assert!(moved),
            other => panic!("unexpected result {other:?}"),
        }
        assert_eq!(rendered(&state), "execute at @s as @e[type=cow] run kill @s");

        run(&state, Command::RemoveStep(InstanceParams { instance: b }));
        assert_eq!(rendered(&state), "execute as @e[type=cow] run kill @s");
    }

    #[test]
    fn undo_and_redo_through_commands() {
        let state = state();
        run(
            &state,
            Command::ApplyPreset(PresetNameParams {
                name: "teleport above players".into(),
            }),
        );
        let loaded = rendered(&state);
        run(&state, Command::ResetChain);
        assert_eq!(rendered(&state), "execute run say Hello!");
        run(&state, Command::Undo);
        assert_eq!(rendered(&state), loaded);
        run(&state, Command::Redo);
        assert_eq!(rendered(&state), "execute run say Hello!");
    }

    #[test]
    fn unknown_instance_and_preset_are_not_found() {
        let state = state();
        let err = execute(&state, Command::RemoveStep(InstanceParams { instance: InstanceId(7) }))
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
        let err = execute(
            &state,
            Command::ApplyPreset(PresetNameParams { name: "nope".into() }),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[test]
    fn result_is_tagged_by_command() {
        let state = state();
        let out = execute(&state, Command::GetUndoState).unwrap();
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["result"]["command"], "GetUndoState");
        assert_eq!(json["result"]["data"]["can_undo"], false);
    }

    #[test]
    fn move_messages_name_the_direction() {
        let state = state();
        let a = add(&state, ChainStep::new("as"));
        let b = add(&state, ChainStep::new("at"));
        let mv = |instance, direction| {
            execute(&state, Command::MoveStep(MoveStepParams { instance, direction }))
                .unwrap()
                .message
        };
        assert_eq!(
            mv(a, MoveDirection::Up),
            format!("Step {a} is already at the top of the chain.")
        );
        assert_eq!(
            mv(b, MoveDirection::Down),
            format!("Step {b} is already at the bottom of the chain.")
        );
        assert_eq!(mv(a, MoveDirection::Down), format!("Moved step {a} down."));
    }
}
