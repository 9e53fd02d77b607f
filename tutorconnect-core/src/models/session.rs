use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Message, Tutor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectKind {
    #[default]
    Chat,
    Video,
}

/// Copy of the tutor fields a session needs, taken at connect time so later
/// presence flips on the live record don't leak into billing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutorSnapshot {
    pub tutor_id: String,
    pub name: String,
    pub avatar: Option<String>,
    pub rate_per_minute: f64,
}

impl From<&Tutor> for TutorSnapshot {
    fn from(tutor: &Tutor) -> Self {
        Self {
            tutor_id: tutor.id.clone(),
            name: tutor.name.clone(),
            avatar: tutor.avatar.clone(),
            rate_per_minute: tutor.rate_per_minute,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub tutor: TutorSnapshot,
    pub kind: ConnectKind,
    pub is_active: bool,
    pub started_at: DateTime<Utc>,
    pub messages: Vec<Message>,
}

impl Session {
    pub fn start(tutor: &Tutor, kind: ConnectKind, started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tutor: TutorSnapshot::from(tutor),
            kind,
            is_active: true,
            started_at,
            messages: Vec::new(),
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }
}

/// Record of an ended session kept for the history view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub tutor_id: String,
    pub tutor_name: String,
    pub kind: ConnectKind,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub elapsed_seconds: u64,
    pub accrued_cost: f64,
    pub message_count: usize,
}
