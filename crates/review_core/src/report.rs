use crate::NotificationMessage;

/// How often a failing cycle is reported to the chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureReportPolicy {
    /// Every failed cycle sends its message.
    EveryCycle,
    /// A failure message is sent once; identical repeats stay quiet until a cycle succeeds.
    #[default]
    OncePerOutage,
}

/// Tracks which failure has already reached the chat.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FailureReporter {
    policy: FailureReportPolicy,
    last_reported: Option<NotificationMessage>,
}

impl FailureReporter {
    pub fn new(policy: FailureReportPolicy) -> Self {
        Self {
            policy,
            last_reported: None,
        }
    }

    pub fn policy(&self) -> FailureReportPolicy {
        self.policy
    }

    pub fn should_report(&self, message: &NotificationMessage) -> bool {
        match self.policy {
            FailureReportPolicy::EveryCycle => true,
            FailureReportPolicy::OncePerOutage => self.last_reported.as_ref() != Some(message),
        }
    }

    /// Record a failure message that was actually delivered.
    pub fn mark_reported(&mut self, message: NotificationMessage) {
        self.last_reported = Some(message);
    }

    /// A cycle succeeded; the next failure is news again.
    pub fn recovered(&mut self) {
        self.last_reported = None;
    }
}
