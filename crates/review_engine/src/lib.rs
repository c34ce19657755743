//! Review engine: status API fetching, chat delivery and the poll loop.
mod fetch;
mod notify;
mod poll;
mod types;

pub use fetch::{FetchSettings, ReqwestStatusSource, StatusSource, DEFAULT_ENDPOINT};
pub use notify::{Messenger, MessengerSettings, Notifier, TelegramMessenger, TELEGRAM_API_BASE};
pub use poll::{PollLoop, PollSettings, RETRY_INTERVAL};
pub use types::{CycleError, CycleReport, Delivery, DeliveryError, FailureKind, FetchError};
