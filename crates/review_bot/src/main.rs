mod config;
mod logging;

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use review_core::PollCursor;
use review_engine::{
    FetchSettings, MessengerSettings, Notifier, PollLoop, PollSettings, ReqwestStatusSource,
    TelegramMessenger,
};
use tokio_util::sync::CancellationToken;
use watch_logging::{watch_critical, watch_info, watch_warn};

use logging::LogDestination;

fn main() -> anyhow::Result<()> {
    logging::initialize(LogDestination::Both, &logging::default_log_path());

    let credentials = match config::credentials_from_env() {
        Ok(credentials) => credentials,
        Err(err) => {
            watch_critical!("{}; the bot is not started", err);
            return Err(err.into());
        }
    };

    let source = ReqwestStatusSource::new(FetchSettings::default(), credentials.api_token())
        .context("building status API client")?;
    let messenger = TelegramMessenger::new(MessengerSettings::default(), credentials.messenger_token())
        .context("building messenger client")?;
    let notifier = Notifier::new(Arc::new(messenger), credentials.chat_id());
    let cursor = PollCursor::starting_at(Utc::now().timestamp());
    let poll = PollLoop::new(Arc::new(source), notifier, cursor, PollSettings::default());

    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    runtime.block_on(async move {
        let shutdown = CancellationToken::new();
        let signal_token = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    watch_info!("Interrupt received");
                    signal_token.cancel();
                }
                Err(err) => watch_warn!("Could not listen for interrupt: {}", err),
            }
        });
        poll.run(shutdown).await;
    });

    Ok(())
}
