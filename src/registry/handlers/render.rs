#![allow(clippy::needless_pass_by_value)]

use std::sync::Arc;

use crate::error::AppError;
use crate::registry::params::RenderParams;
use crate::registry::{CommandOutput, CommandResult};
use crate::serializer::{render_command, RenderedCommand};
use crate::state::AppState;

pub fn render(_state: &Arc<AppState>, p: RenderParams) -> Result<CommandOutput, AppError> {
    let rendered = RenderedCommand::new(render_command(&p.chain, &p.run_command));
    tracing::trace!(steps = p.chain.len(), "rendered stateless chain");
    Ok(CommandOutput::new(
        rendered.command.clone(),
        CommandResult::Render(rendered),
    ))
}

pub fn render_draft(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let rendered = state.with_draft(RenderedCommand::from_draft);
    Ok(CommandOutput::new(
        rendered.command.clone(),
        CommandResult::RenderDraft(rendered),
    ))
}

pub fn get_draft(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let draft = state.with_draft(Clone::clone);
    let mut lines: Vec<String> = draft
        .chain
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{i}: {} {} {:?}", s.id, s.subcommand_id, s.config))
        .collect();
    if lines.is_empty() {
        lines.push("(empty chain)".to_string());
    }
    lines.push(format!("run: {}", draft.run_command));
    Ok(CommandOutput::new(
        lines.join("\n"),
        CommandResult::GetDraft(Box::new(draft)),
    ))
}
