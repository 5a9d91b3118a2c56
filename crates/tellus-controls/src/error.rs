use thiserror::Error;

use crate::ControlPath;

/// Errors from building or querying control panels.
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("failed to parse control document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("control document '{title}' must have a JSON object at its root")]
    RootNotObject { title: String },

    #[error("no control at '{0}'")]
    Missing(ControlPath),

    #[error("control at '{path}' is {found}, expected {expected}")]
    WrongKind {
        path: ControlPath,
        expected: &'static str,
        found: &'static str,
    },

    #[error("a panel titled '{0}' already exists")]
    DuplicatePanel(String),

    #[error("invalid colour '{0}', expected #rrggbb")]
    InvalidColor(String),
}
