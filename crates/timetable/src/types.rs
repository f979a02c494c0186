use std::sync::{Mutex, MutexGuard};

use crate::config::AppConfig;
use crate::timetable::{TimetableError, Workspace};

/// State shared by every request handler.
pub struct AppState {
    /// The student's session. One request mutates it at a time.
    workspace: Mutex<Workspace>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(workspace: Workspace, config: AppConfig) -> Self {
        Self {
            workspace: Mutex::new(workspace),
            config,
        }
    }

    /// Locks the workspace for the duration of one operation.
    pub fn workspace(&self) -> Result<MutexGuard<'_, Workspace>, TimetableError> {
        self.workspace.lock().map_err(|_| TimetableError::Store {
            message: "workspace mutex poisoned".to_string(),
        })
    }
}
