use std::fmt;

use serde::{Deserialize, Serialize};

/// Presence of a tutor as shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceStatus {
    Online,
    Busy,
    Offline,
}

impl PresenceStatus {
    /// Next status in the `online → busy → offline → online` cycle.
    pub fn next(self) -> Self {
        match self {
            Self::Online => Self::Busy,
            Self::Busy => Self::Offline,
            Self::Offline => Self::Online,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Busy => "busy",
            Self::Offline => "offline",
        }
    }

    /// Human label for the status indicator.
    pub fn label(self) -> &'static str {
        match self {
            Self::Online => "Online",
            Self::Busy => "Busy",
            Self::Offline => "Offline",
        }
    }
}

impl fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tutor {
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
    pub subjects: Vec<String>,
    pub rating: f32,
    pub rate_per_minute: f64,
    pub status: PresenceStatus,
    pub total_students: u32,
}

impl Tutor {
    pub fn is_available(&self) -> bool {
        self.status == PresenceStatus::Online
    }

    /// Case-insensitive substring match against the name or any subject tag.
    /// An empty query matches every tutor.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self
                .subjects
                .iter()
                .any(|s| s.to_lowercase().contains(&needle))
    }

    pub fn teaches(&self, subject: &str) -> bool {
        self.subjects.iter().any(|s| s == subject)
    }

    /// Avatar fallback: first letter of every word in the name.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .collect()
    }

    /// Badges shown on the card plus the count hidden behind "+N more".
    pub fn subject_badges(&self, shown: usize) -> (&[String], usize) {
        let visible = shown.min(self.subjects.len());
        (&self.subjects[..visible], self.subjects.len() - visible)
    }

    /// Label of the primary connect button.
    pub fn action_label(&self) -> &'static str {
        match self.status {
            PresenceStatus::Online => "Start Chat",
            PresenceStatus::Busy => "Busy",
            PresenceStatus::Offline => "Offline",
        }
    }
}
