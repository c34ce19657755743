use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use pretty_assertions::assert_eq;
use review_core::{FailureReportPolicy, PollCursor, ValidationError};
use review_engine::{
    CycleError, Delivery, DeliveryError, FailureKind, FetchError, FetchSettings, Messenger,
    Notifier, PollLoop, PollSettings, ReqwestStatusSource, StatusSource,
};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const START: i64 = 1_700_000_000;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(watch_logging::initialize_for_tests);
}

/// Replays canned responses; the last one repeats once the script runs out.
#[derive(Default)]
struct ScriptedSource {
    script: Mutex<VecDeque<Result<Value, FetchError>>>,
    cursors: Mutex<Vec<i64>>,
}

impl ScriptedSource {
    fn new(script: Vec<Result<Value, FetchError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            cursors: Mutex::new(Vec::new()),
        })
    }

    fn cursors(&self) -> Vec<i64> {
        self.cursors.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl StatusSource for ScriptedSource {
    async fn fetch(&self, cursor: PollCursor) -> Result<Value, FetchError> {
        self.cursors.lock().unwrap().push(cursor.value());
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().unwrap()
        }
    }
}

#[derive(Default)]
struct RecordingMessenger {
    sent: Mutex<Vec<String>>,
    failing: bool,
}

impl RecordingMessenger {
    fn working() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            failing: true,
            ..Self::default()
        })
    }

    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Messenger for RecordingMessenger {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), DeliveryError> {
        assert_eq!(chat_id, "-1001");
        self.sent.lock().unwrap().push(text.to_string());
        if self.failing {
            Err(DeliveryError::Transport("simulated send failure".to_string()))
        } else {
            Ok(())
        }
    }
}

fn poll_loop(
    source: Arc<dyn StatusSource>,
    messenger: Arc<RecordingMessenger>,
    failure_reports: FailureReportPolicy,
) -> PollLoop {
    PollLoop::new(
        source,
        Notifier::new(messenger, "-1001"),
        PollCursor::starting_at(START),
        PollSettings {
            failure_reports,
            ..PollSettings::default()
        },
    )
}

fn unavailable() -> FetchError {
    FetchError {
        kind: FailureKind::HttpStatus(503),
        url: "https://status.example/api".to_string(),
        message: "endpoint unavailable, API response code 503".to_string(),
    }
}

#[tokio::test]
async fn status_change_is_rendered_and_cursor_advances() {
    init_logging();
    let source = ScriptedSource::new(vec![Ok(json!({
        "homeworks": [{"homework_name": "hw1", "status": "approved"}],
        "current_date": 1700000100
    }))]);
    let messenger = RecordingMessenger::working();
    let mut poll = poll_loop(source.clone(), messenger.clone(), FailureReportPolicy::OncePerOutage);

    let report = poll.run_cycle().await.expect("cycle ok");
    assert_eq!(report.records, 1);
    assert_eq!(report.delivered, 1);
    assert!(report.cursor_advanced);
    assert_eq!(poll.cursor().value(), 1_700_000_100);
    assert_eq!(source.cursors(), vec![START]);
    assert_eq!(
        messenger.sent(),
        vec!["Changed status of review \"hw1\". Работа проверена: ревьюеру всё понравилось. Ура!"]
    );

    assert_eq!(poll.settle(Ok(report)).await, None);
}

#[tokio::test]
async fn every_record_is_notified_in_order() {
    init_logging();
    let source = ScriptedSource::new(vec![Ok(json!({
        "homeworks": [
            {"homework_name": "hw2", "status": "reviewing"},
            {"homework_name": "hw1", "status": "rejected"}
        ]
    }))]);
    let messenger = RecordingMessenger::working();
    let mut poll = poll_loop(source, messenger.clone(), FailureReportPolicy::OncePerOutage);

    let report = poll.run_cycle().await.unwrap();
    assert_eq!(report.records, 2);
    assert!(!report.cursor_advanced);
    assert_eq!(poll.cursor().value(), START);
    assert_eq!(
        messenger.sent(),
        vec![
            "Changed status of review \"hw2\". Работа взята на проверку ревьюером.",
            "Changed status of review \"hw1\". Работа проверена: у ревьюера есть замечания.",
        ]
    );
}

#[tokio::test]
async fn empty_result_fails_cycle_and_reports_once() {
    init_logging();
    let source = ScriptedSource::new(vec![Ok(json!({"homeworks": [], "current_date": 1700000100}))]);
    let messenger = RecordingMessenger::working();
    let mut poll = poll_loop(source, messenger.clone(), FailureReportPolicy::OncePerOutage);

    let outcome = poll.run_cycle().await;
    assert_eq!(
        outcome,
        Err(CycleError::Validation(ValidationError::EmptyResult))
    );
    assert_eq!(poll.cursor().value(), START);

    assert_eq!(poll.settle(outcome).await, Some(Delivery::Delivered));
    assert_eq!(
        messenger.sent(),
        vec!["Program malfunction: homeworks list is empty"]
    );
}

#[tokio::test]
async fn http_503_fails_cycle_with_status_code() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let settings = FetchSettings {
        endpoint: format!("{}/api/user_api/homework_statuses/", server.uri()),
        ..FetchSettings::default()
    };
    let source = Arc::new(ReqwestStatusSource::new(settings, "api-token").unwrap());
    let messenger = RecordingMessenger::working();
    let mut poll = poll_loop(source, messenger.clone(), FailureReportPolicy::OncePerOutage);

    match poll.run_cycle().await {
        Err(CycleError::Fetch(err)) => {
            assert_eq!(err.kind, FailureKind::HttpStatus(503));
            assert!(err.url.starts_with(&server.uri()));
        }
        other => panic!("expected http status failure, got {other:?}"),
    }
    assert_eq!(poll.cursor().value(), START);
}

#[tokio::test]
async fn failed_send_does_not_fail_the_cycle() {
    init_logging();
    let source = ScriptedSource::new(vec![Ok(json!({
        "homeworks": [{"homework_name": "hw1", "status": "approved"}],
        "current_date": 1700000100
    }))]);
    let messenger = RecordingMessenger::failing();
    let mut poll = poll_loop(source, messenger.clone(), FailureReportPolicy::OncePerOutage);

    let report = poll.run_cycle().await.expect("send failure is swallowed");
    assert_eq!(report.delivered, 0);
    assert_eq!(messenger.sent().len(), 1);
    assert_eq!(poll.cursor().value(), 1_700_000_100);
    assert_eq!(poll.settle(Ok(report)).await, None);
}

#[tokio::test]
async fn repeated_failure_is_reported_once_until_recovery() {
    init_logging();
    let source = ScriptedSource::new(vec![
        Err(unavailable()),
        Err(unavailable()),
        Ok(json!({"homeworks": [{"homework_name": "hw1", "status": "reviewing"}]})),
        Err(unavailable()),
    ]);
    let messenger = RecordingMessenger::working();
    let mut poll = poll_loop(source, messenger.clone(), FailureReportPolicy::OncePerOutage);

    let mut deliveries = Vec::new();
    for _ in 0..4 {
        let outcome = poll.run_cycle().await;
        deliveries.push(poll.settle(outcome).await);
    }

    assert_eq!(
        deliveries,
        vec![Some(Delivery::Delivered), None, None, Some(Delivery::Delivered)]
    );
    let failure = "Program malfunction: http status 503 from https://status.example/api: \
                   endpoint unavailable, API response code 503";
    assert_eq!(
        messenger.sent(),
        vec![
            failure.to_string(),
            "Changed status of review \"hw1\". Работа взята на проверку ревьюером.".to_string(),
            failure.to_string(),
        ]
    );
}

#[tokio::test]
async fn undelivered_failure_is_retried_next_cycle() {
    init_logging();
    let source = ScriptedSource::new(vec![Err(unavailable())]);
    let messenger = RecordingMessenger::failing();
    let mut poll = poll_loop(source, messenger.clone(), FailureReportPolicy::OncePerOutage);

    for _ in 0..2 {
        let outcome = poll.run_cycle().await;
        assert_eq!(poll.settle(outcome).await, Some(Delivery::Failed));
    }
    assert_eq!(messenger.sent().len(), 2);
}

#[tokio::test]
async fn every_cycle_policy_reports_each_failure() {
    init_logging();
    let source = ScriptedSource::new(vec![Err(unavailable())]);
    let messenger = RecordingMessenger::working();
    let mut poll = poll_loop(source, messenger.clone(), FailureReportPolicy::EveryCycle);

    for _ in 0..3 {
        let outcome = poll.run_cycle().await;
        assert_eq!(poll.settle(outcome).await, Some(Delivery::Delivered));
    }
    assert_eq!(messenger.sent().len(), 3);
    assert_eq!(poll.cycles(), 3);
}

#[tokio::test(start_paused = true)]
async fn run_sleeps_between_cycles_until_cancelled() {
    init_logging();
    let source = ScriptedSource::new(vec![
        Err(unavailable()),
        Ok(json!({
            "homeworks": [{"homework_name": "hw1", "status": "approved"}],
            "current_date": 1700000100
        })),
        Ok(json!({"homeworks": [{"homework_name": "hw1", "status": "approved"}]})),
    ]);
    let messenger = RecordingMessenger::working();
    let poll = poll_loop(source.clone(), messenger.clone(), FailureReportPolicy::OncePerOutage);

    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(poll.run(shutdown.clone()));

    // Cycles start at 0s, 600s and 1200s.
    tokio::time::sleep(Duration::from_secs(1250)).await;
    shutdown.cancel();
    handle.await.unwrap();

    assert_eq!(source.cursors(), vec![START, START, 1_700_000_100]);
    assert_eq!(messenger.sent().len(), 3);
}
