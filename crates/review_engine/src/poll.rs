use std::sync::Arc;
use std::time::Duration;

use review_core::{
    current_date, extract_records, failure_message, render, FailureReportPolicy, FailureReporter,
    PollCursor,
};
use tokio_util::sync::CancellationToken;
use watch_logging::{watch_debug, watch_error, watch_info};

use crate::fetch::StatusSource;
use crate::notify::Notifier;
use crate::{CycleError, CycleReport, Delivery};

pub const RETRY_INTERVAL: Duration = Duration::from_secs(600);

#[derive(Debug, Clone)]
pub struct PollSettings {
    pub retry_interval: Duration,
    pub failure_reports: FailureReportPolicy,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            retry_interval: RETRY_INTERVAL,
            failure_reports: FailureReportPolicy::default(),
        }
    }
}

/// Drives fetch, validate, render and notify once per interval.
pub struct PollLoop {
    source: Arc<dyn StatusSource>,
    notifier: Notifier,
    cursor: PollCursor,
    retry_interval: Duration,
    reporter: FailureReporter,
    cycles: u64,
}

impl PollLoop {
    pub fn new(
        source: Arc<dyn StatusSource>,
        notifier: Notifier,
        cursor: PollCursor,
        settings: PollSettings,
    ) -> Self {
        Self {
            source,
            notifier,
            cursor,
            retry_interval: settings.retry_interval,
            reporter: FailureReporter::new(settings.failure_reports),
            cycles: 0,
        }
    }

    pub fn cursor(&self) -> PollCursor {
        self.cursor
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// One fetch/validate/notify pass. The cursor moves only when every step succeeds.
    pub async fn run_cycle(&mut self) -> Result<CycleReport, CycleError> {
        self.cycles += 1;
        watch_logging::set_cycle(self.cycles);

        let response = self.source.fetch(self.cursor).await?;
        let records = extract_records(&response)?;

        let mut delivered = 0;
        for record in &records {
            let message = render(record);
            if self.notifier.notify(&message).await == Delivery::Delivered {
                delivered += 1;
            }
        }

        let reported = current_date(&response);
        let cursor_advanced = self.cursor.advance(reported);
        if reported.is_none() {
            watch_debug!("response carried no current_date; cursor stays at {}", self.cursor.value());
        }

        Ok(CycleReport {
            records: records.len(),
            delivered,
            cursor: self.cursor,
            cursor_advanced,
        })
    }

    /// Log the cycle outcome and forward a failure to the chat when the policy allows.
    pub async fn settle(&mut self, outcome: Result<CycleReport, CycleError>) -> Option<Delivery> {
        match outcome {
            Ok(report) => {
                self.reporter.recovered();
                watch_info!(
                    "Cycle done: {} record(s), {} delivered, cursor {}. Waiting for the next check.",
                    report.records,
                    report.delivered,
                    report.cursor.value()
                );
                None
            }
            Err(err) => {
                let message = failure_message(&err);
                watch_error!("{}", message);
                if !self.reporter.should_report(&message) {
                    watch_debug!("failure already reported, not sending again");
                    return None;
                }
                let delivery = self.notifier.notify(&message).await;
                if delivery == Delivery::Delivered {
                    self.reporter.mark_reported(message);
                }
                Some(delivery)
            }
        }
    }

    /// Run cycles until `shutdown` is cancelled, sleeping the retry interval after each one.
    pub async fn run(mut self, shutdown: CancellationToken) {
        watch_info!(
            "Polling every {:?} starting from {}",
            self.retry_interval,
            self.cursor.value()
        );
        loop {
            let outcome = self.run_cycle().await;
            self.settle(outcome).await;

            tokio::select! {
                _ = shutdown.cancelled() => {
                    watch_info!("Shutdown requested, stopping after {} cycle(s)", self.cycles);
                    break;
                }
                _ = tokio::time::sleep(self.retry_interval) => {}
            }
        }
    }
}
