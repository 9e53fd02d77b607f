use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Student,
    Teacher,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender: Sender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(sender: Sender, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            content: content.into(),
            timestamp,
        }
    }

    pub fn student(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self::new(Sender::Student, content, timestamp)
    }

    pub fn teacher(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self::new(Sender::Teacher, content, timestamp)
    }
}
