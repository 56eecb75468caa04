use std::sync::{Arc, Mutex};
use std::time::Duration;

use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;
use shared::{validate_options, VoteOption};

use crate::build_rocket;
use crate::config::AppConfig;
use crate::processor::VoteProcessor;
use crate::routes::AppState;
use crate::store::{CounterStore, MemoryStore};
use crate::telemetry::{NoopTelemetry, TelemetrySink};

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Retrieved(String, u64),
    Reset(String, u64),
}

#[derive(Default)]
struct RecordingTelemetry {
    events: Mutex<Vec<Event>>,
}

impl RecordingTelemetry {
    fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    fn resets(&self) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| matches!(e, Event::Reset(..)))
            .collect()
    }
}

impl TelemetrySink for RecordingTelemetry {
    fn counter_retrieved(&self, option: &VoteOption, count: u64) {
        self.events.lock().unwrap().push(Event::Retrieved(option.label().to_string(), count));
    }

    fn counter_reset(&self, option: &VoteOption, count: u64) {
        self.events.lock().unwrap().push(Event::Reset(option.label().to_string(), count));
    }
}

fn config() -> AppConfig {
    AppConfig {
        options: validate_options("Cats", "Dogs").unwrap(),
        title: "Azure Voting App".into(),
        show_host: false,
        redis_url: "memory://".into(),
        store_timeout: Duration::from_millis(500),
    }
}

struct Harness {
    client: Client,
    store: Arc<MemoryStore>,
    telemetry: Arc<RecordingTelemetry>,
}

async fn harness(cats: u64, dogs: u64) -> Harness {
    let store = Arc::new(MemoryStore::with_counts([("Cats", cats), ("Dogs", dogs)]));
    let telemetry = Arc::new(RecordingTelemetry::default());
    let state = AppState::new(config(), store.clone(), telemetry.clone());
    let client = Client::tracked(build_rocket(state)).await.expect("valid rocket instance");
    Harness { client, store, telemetry }
}

async fn post_vote(client: &Client, body: &str) -> (Status, String) {
    let response = client
        .post("/")
        .header(ContentType::Form)
        .body(body.to_string())
        .dispatch()
        .await;
    let status = response.status();
    (status, response.into_string().await.unwrap_or_default())
}

#[tokio::test]
async fn get_renders_current_counts_without_side_effects() {
    let h = harness(3, 5).await;

    let response = h.client.get("/").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.content_type(), Some(ContentType::HTML));
    let body = response.into_string().await.unwrap();
    assert!(body.contains("<title>Azure Voting App</title>"));
    assert!(body.contains("Cats - 3 | Dogs - 5"));

    assert_eq!(h.store.get("Cats").await.unwrap(), 3);
    assert_eq!(h.store.get("Dogs").await.unwrap(), 5);
    assert_eq!(
        h.telemetry.events(),
        vec![Event::Retrieved("Cats".into(), 3), Event::Retrieved("Dogs".into(), 5)]
    );
}

#[tokio::test]
async fn vote_increments_selected_option() {
    let h = harness(3, 5).await;

    let (status, body) = post_vote(&h.client, "vote=Cats").await;
    assert_eq!(status, Status::Ok);
    assert!(body.contains("Cats - 4 | Dogs - 5"));
    assert_eq!(h.store.get("Cats").await.unwrap(), 4);
    assert!(h.telemetry.events().is_empty());
}

#[tokio::test]
async fn reset_zeroes_both_counters_and_records_events() {
    let h = harness(7, 2).await;

    let (status, body) = post_vote(&h.client, "vote=reset").await;
    assert_eq!(status, Status::Ok);
    assert!(body.contains("Cats - 0 | Dogs - 0"));
    assert_eq!(h.store.get("Cats").await.unwrap(), 0);
    assert_eq!(h.store.get("Dogs").await.unwrap(), 0);
    assert_eq!(
        h.telemetry.resets(),
        vec![Event::Reset("Cats".into(), 0), Event::Reset("Dogs".into(), 0)]
    );
}

#[tokio::test]
async fn unknown_vote_is_rejected_without_touching_store() {
    let h = harness(1, 1).await;

    let (status, _) = post_vote(&h.client, "vote=Birds").await;
    assert_eq!(status, Status::BadRequest);
    assert!(!h.store.contains_key("Birds"));
    assert_eq!(h.store.len(), 2);

    let (status, _) = post_vote(&h.client, "other=Cats").await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(h.store.get("Cats").await.unwrap(), 1);
}

#[tokio::test]
async fn post_without_form_body_is_bad_request() {
    let h = harness(2, 2).await;

    let response = h.client.post("/").dispatch().await;
    assert_eq!(response.status(), Status::BadRequest);

    let response = h
        .client
        .post("/")
        .header(ContentType::JSON)
        .body(r#"{"vote":"Cats"}"#)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    assert_eq!(h.store.get("Cats").await.unwrap(), 2);
    assert_eq!(h.store.len(), 2);
}

#[tokio::test]
async fn store_outage_is_a_server_error() {
    let h = harness(1, 1).await;
    h.store.set_offline(true);

    let response = h.client.get("/").dispatch().await;
    assert_eq!(response.status(), Status::ServiceUnavailable);

    let (status, _) = post_vote(&h.client, "vote=Dogs").await;
    assert_eq!(status, Status::ServiceUnavailable);
    assert!(h.telemetry.events().is_empty());
}

#[tokio::test]
async fn corrupt_counter_is_a_server_error() {
    let h = harness(1, 1).await;
    h.store.insert_raw("Dogs", "many");

    let response = h.client.get("/").dispatch().await;
    assert_eq!(response.status(), Status::InternalServerError);
}

#[tokio::test]
async fn concurrent_votes_both_land() {
    let h = harness(10, 0).await;

    let (a, b) = tokio::join!(post_vote(&h.client, "vote=Dogs"), post_vote(&h.client, "vote=Dogs"));
    assert_eq!(a.0, Status::Ok);
    assert_eq!(b.0, Status::Ok);
    assert_eq!(h.store.get("Dogs").await.unwrap(), 2);
    assert_eq!(h.store.get("Cats").await.unwrap(), 10);
}

#[tokio::test]
async fn unknown_route_uses_catcher() {
    let h = harness(0, 0).await;
    let response = h.client.get("/results").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
}

#[tokio::test]
async fn initialize_only_creates_missing_counters() {
    let store = MemoryStore::with_counts([("Cats", 9)]);
    let options = config().options;

    VoteProcessor::initialize(&store, &options).await.unwrap();
    assert_eq!(store.get("Cats").await.unwrap(), 9);
    assert_eq!(store.get("Dogs").await.unwrap(), 0);

    store.increment("Dogs", 3).await.unwrap();
    VoteProcessor::initialize(&store, &options).await.unwrap();
    assert_eq!(store.get("Dogs").await.unwrap(), 3);
}

#[tokio::test]
async fn noop_telemetry_serves_pages() {
    let store = Arc::new(MemoryStore::new());
    VoteProcessor::initialize(store.as_ref(), &config().options).await.unwrap();
    let state = AppState::new(config(), store, Arc::new(NoopTelemetry));
    let client = Client::tracked(build_rocket(state)).await.unwrap();

    let (status, body) = post_vote(&client, "vote=Dogs").await;
    assert_eq!(status, Status::Ok);
    assert!(body.contains("Cats - 0 | Dogs - 1"));
}
