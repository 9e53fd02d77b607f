use thiserror::Error;
use uuid::Uuid;

use crate::models::PresenceStatus;

#[derive(Error, Debug)]
pub enum TutorConnectError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("IPC error: {0}")]
    Ipc(String),

    #[error("Marketplace error: {0}")]
    Marketplace(#[from] MarketplaceError),
}

/// Rejections raised by marketplace actions. None of them change state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketplaceError {
    #[error("Tutor {0} not found")]
    TutorNotFound(String),

    #[error("Tutor {tutor_id} is {status}, not online")]
    TutorUnavailable {
        tutor_id: String,
        status: PresenceStatus,
    },

    #[error("Session {0} is already active")]
    SessionAlreadyActive(Uuid),

    #[error("No active session")]
    NoActiveSession,

    #[error("Message is empty")]
    EmptyMessage,
}

impl MarketplaceError {
    /// Stable machine-readable name, used as the IPC `code` field.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TutorNotFound(_) => "tutor_not_found",
            Self::TutorUnavailable { .. } => "tutor_unavailable",
            Self::SessionAlreadyActive(_) => "session_already_active",
            Self::NoActiveSession => "no_active_session",
            Self::EmptyMessage => "empty_message",
        }
    }
}
