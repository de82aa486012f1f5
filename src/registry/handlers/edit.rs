#![allow(clippy::needless_pass_by_value)]

use std::sync::Arc;

use crate::dispatcher::{EditCommand, EditOutcome};
use crate::error::AppError;
use crate::model::{find_preset, ChainStep, MoveDirection};
use crate::registry::params::{
    ClearFieldParams, InstanceParams, MoveStepParams, PresetNameParams, SetRunCommandParams,
    UpdateFieldParams,
};
use crate::registry::{CommandOutput, CommandResult};
use crate::state::AppState;

fn apply(state: &Arc<AppState>, cmd: &EditCommand) -> Result<EditOutcome, AppError> {
    state.with_history(|draft, dispatcher| dispatcher.execute(draft, cmd))
}

pub fn add_step(state: &Arc<AppState>, step: ChainStep) -> Result<CommandOutput, AppError> {
    if crate::model::find_definition(&step.subcommand_id).is_none() {
        // Kept in the chain; the serializer skips it.
        tracing::warn!(subcommand = %step.subcommand_id, "adding unknown subcommand");
    }
    let subcommand_id = step.subcommand_id.clone();
    match apply(state, &EditCommand::AddStep { step })? {
        EditOutcome::Added(id) => Ok(CommandOutput::new(
            format!("Added \"{subcommand_id}\" as step {id}."),
            CommandResult::AddStep(id),
        )),
        other => Err(AppError::ApiError {
            message: format!("unexpected edit outcome {other:?}"),
        }),
    }
}

pub fn remove_step(state: &Arc<AppState>, p: InstanceParams) -> Result<CommandOutput, AppError> {
    apply(state, &EditCommand::RemoveStep { instance: p.instance })?;
    Ok(CommandOutput::new(
        format!("Removed step {}.", p.instance),
        CommandResult::RemoveStep,
    ))
}

pub fn move_step(state: &Arc<AppState>, p: MoveStepParams) -> Result<CommandOutput, AppError> {
    let cmd = EditCommand::MoveStep {
        instance: p.instance,
        direction: p.direction,
    };
    let moved = matches!(apply(state, &cmd)?, EditOutcome::Moved(true));
    let (dir, end) = match p.direction {
        MoveDirection::Up => ("up", "top"),
        MoveDirection::Down => ("down", "bottom"),
    };
    let message = if moved {
        format!("Moved step {} {dir}.", p.instance)
    } else {
        format!("Step {} is already at the {end} of the chain.", p.instance)
    };
    Ok(CommandOutput::new(message, CommandResult::MoveStep(moved)))
}

pub fn update_field(
    state: &Arc<AppState>,
    p: UpdateFieldParams,
) -> Result<CommandOutput, AppError> {
    let message = format!("Set {} of step {} to \"{}\".", p.field, p.instance, p.value);
    apply(
        state,
        &EditCommand::UpdateField {
            instance: p.instance,
            field: p.field,
            value: p.value,
        },
    )?;
    Ok(CommandOutput::new(message, CommandResult::UpdateField))
}

pub fn clear_field(state: &Arc<AppState>, p: ClearFieldParams) -> Result<CommandOutput, AppError> {
    let message = format!("Cleared {} of step {}.", p.field, p.instance);
    apply(
        state,
        &EditCommand::ClearField {
            instance: p.instance,
            field: p.field,
        },
    )?;
    Ok(CommandOutput::new(message, CommandResult::ClearField))
}

pub fn set_run_command(
    state: &Arc<AppState>,
    p: SetRunCommandParams,
) -> Result<CommandOutput, AppError> {
    let message = if p.run_command.trim().is_empty() {
        "Cleared run command.".to_string()
    } else {
        format!("Run command set to \"{}\".", p.run_command.trim())
    };
    apply(
        state,
        &EditCommand::SetRunCommand {
            run_command: p.run_command,
        },
    )?;
    Ok(CommandOutput::new(message, CommandResult::SetRunCommand))
}

pub fn apply_preset(state: &Arc<AppState>, p: PresetNameParams) -> Result<CommandOutput, AppError> {
    let preset = find_preset(&p.name).ok_or_else(|| AppError::NotFound {
        what: format!("Preset \"{}\"", p.name),
    })?;
    let message = format!("Loaded preset \"{}\".", preset.name);
    apply(state, &EditCommand::ApplyPreset { preset })?;
    Ok(CommandOutput::new(message, CommandResult::ApplyPreset))
}

pub fn reset_chain(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    apply(state, &EditCommand::Reset)?;
    Ok(CommandOutput::new("Chain reset.", CommandResult::ResetChain))
}
