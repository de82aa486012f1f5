use std::path::PathBuf;

use parking_lot::Mutex;

use crate::dispatcher::CommandDispatcher;
use crate::model::Draft;
use crate::settings::AppSettings;

// ── Application State ──────────────────────────────────────────────

/// One chain-building session, shared by the HTTP API and the CLI.
///
/// Rendering arbitrary input never touches this; only edits to the session
/// draft do.
pub struct AppState {
    pub draft: Mutex<Draft>,
    pub dispatcher: Mutex<CommandDispatcher>,
    pub settings: AppSettings,
    pub app_config_dir: PathBuf,
}

impl AppState {
    pub fn new(settings: AppSettings, app_config_dir: PathBuf) -> Self {
        Self {
            draft: Mutex::new(Draft::new()),
            dispatcher: Mutex::new(CommandDispatcher::with_max_undo_levels(
                settings.max_undo_levels,
            )),
            settings,
            app_config_dir,
        }
    }

    /// Start the session from an existing draft (e.g. a file the CLI loaded).
    pub fn with_initial_draft(self, draft: Draft) -> Self {
        *self.draft.lock() = draft;
        self
    }

    /// Read-only access to the draft. Locks the mutex for the duration of `f`.
    pub fn with_draft<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Draft) -> R,
    {
        let guard = self.draft.lock();
        f(&guard)
    }

    /// Access to the draft and its history together. Locks both for the
    /// duration of `f`, always draft first.
    pub fn with_history<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Draft, &mut CommandDispatcher) -> R,
    {
        let mut draft = self.draft.lock();
        let mut dispatcher = self.dispatcher.lock();
        f(&mut draft, &mut dispatcher)
    }
}
