//! Review core: pure status catalog, response validation and message rendering.
mod credentials;
mod cursor;
mod render;
mod report;
mod status;
mod validate;

pub use credentials::{ConfigError, Credentials, CHAT_ID_VAR, MESSENGER_TOKEN_VAR, API_TOKEN_VAR};
pub use cursor::PollCursor;
pub use render::{failure_message, render, render_parts, NotificationMessage};
pub use report::{FailureReportPolicy, FailureReporter};
pub use status::{verdict_for, ReviewStatus, UnknownStatus};
pub use validate::{current_date, extract_records, HomeworkRecord, RecordDefect, ValidationError};
