use std::fmt;

use crate::{verdict_for, HomeworkRecord, UnknownStatus};

/// Rendered text ready to be handed to the messenger.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotificationMessage(String);

impl NotificationMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NotificationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn render(record: &HomeworkRecord) -> NotificationMessage {
    format_change(&record.name, record.status.verdict())
}

/// Render from an unvalidated name and status code.
pub fn render_parts(name: &str, code: &str) -> Result<NotificationMessage, UnknownStatus> {
    let verdict = verdict_for(code)?;
    Ok(format_change(name, verdict))
}

/// Text sent when a whole cycle fails.
pub fn failure_message(error: &dyn fmt::Display) -> NotificationMessage {
    NotificationMessage(format!("Program malfunction: {error}"))
}

fn format_change(name: &str, verdict: &str) -> NotificationMessage {
    NotificationMessage(format!("Changed status of review \"{name}\". {verdict}"))
}
