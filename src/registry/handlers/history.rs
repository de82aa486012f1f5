use std::sync::Arc;

use crate::error::AppError;
use crate::registry::{CommandOutput, CommandResult};
use crate::state::AppState;

pub fn undo(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let desc = state.with_history(|draft, dispatcher| dispatcher.undo(draft))?;
    Ok(CommandOutput::new(format!("Undone: {desc}"), CommandResult::Undo))
}

pub fn redo(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let desc = state.with_history(|draft, dispatcher| dispatcher.redo(draft))?;
    Ok(CommandOutput::new(format!("Redone: {desc}"), CommandResult::Redo))
}

pub fn get_undo_state(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let undo_state = state.dispatcher.lock().undo_state();
    let message = format!(
        "Undo: {}, Redo: {}",
        undo_state.undo_description.as_deref().unwrap_or("(none)"),
        undo_state.redo_description.as_deref().unwrap_or("(none)"),
    );
    Ok(CommandOutput::new(message, CommandResult::GetUndoState(undo_state)))
}
