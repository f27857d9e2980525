use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A task as the session knows it: the server record plus a calendar date
/// assigned on the client side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: u64,

    pub title: String,

    #[serde(default)]
    pub completed: bool,

    pub date: NaiveDate,
}

impl Task {
    pub fn from_remote(remote: RemoteTask, date: NaiveDate) -> Self {
        Self {
            id: remote.id,
            title: remote.title,
            completed: remote.completed,
            date,
        }
    }

    pub fn date_label(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// One list row, e.g. `Buy milk (Date: 2024-01-01)`.
    pub fn display_line(&self) -> String {
        format!("{} (Date: {})", self.title, self.date_label())
    }
}

/// Record shape served by the task collection endpoint. Extra fields such as
/// `userId` are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteTask {
    pub id: u64,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub completed: bool,
}

/// Create request body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub completed: bool,
}

impl NewTask {
    pub fn pending(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            completed: false,
        }
    }
}
