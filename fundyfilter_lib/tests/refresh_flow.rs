//! End-to-end refresh cycles against a mocked provider.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use fundyfilter_lib::merolagani_api::Client;
use fundyfilter_lib::{reconcile, Cache, CacheStore, FundyError, Refresher};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

static COUNTER: AtomicU32 = AtomicU32::new(0);

fn temp_store(tag: &str) -> CacheStore {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let path = std::env::temp_dir().join(format!(
        "fundyfilter-refresh-{}-{}-{}.csv",
        tag,
        std::process::id(),
        n
    ));
    CacheStore::new(path)
}

fn cleanup(store: &CacheStore) {
    let _ = std::fs::remove_file(store.path());
}

fn load_fixture() -> String {
    std::fs::read_to_string("tests/fixtures/company_detail.html").unwrap()
}

async fn serve_detail(server: &MockServer, symbol: &str, body: String) {
    Mock::given(method("GET"))
        .and(path("/CompanyDetail.aspx"))
        .and(query_param("symbol", symbol))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

// Wednesday before market close: rows scraped today are fresh.
fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 4, 19)
        .unwrap()
        .and_hms_opt(11, 0, 0)
        .unwrap()
}

fn symbols(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn first_refresh_builds_and_persists_the_cache() {
    let server = MockServer::start().await;
    serve_detail(&server, "NBL", load_fixture()).await;

    let client = Client::with_base_url(&server.uri()).unwrap();
    let store = temp_store("first");
    let refresher = Refresher::new(&client, &store).with_delay(Duration::ZERO);

    let mut seen = Vec::new();
    let outcome = refresher
        .process(&symbols(&["NBL"]), now(), |p| {
            seen.push((p.done, p.total, p.symbol.to_string()));
        })
        .await
        .unwrap();

    assert_eq!(outcome.fetched, vec!["NBL"]);
    assert!(outcome.skipped.is_empty());
    assert_eq!(outcome.cache.len(), 1);
    assert_eq!(seen, vec![(1, 1, "NBL".to_string())]);

    let record = outcome.cache.get("NBL").unwrap();
    assert_eq!(record.sector, "Commercial Banks");
    assert_eq!(record.avg_dvnd_rate, 15.0);
    assert_eq!(record.avg_dvnd_prob, 100.0);
    assert_eq!(record.avg_bonus_rate, 6.0);
    assert_eq!(record.scrape_date, now().date());

    // The merged cache went to disk and survives a reload.
    let reloaded = store.load().unwrap().unwrap();
    assert_eq!(reloaded.get("NBL").unwrap(), record);

    cleanup(&store);
}

#[tokio::test]
async fn refresh_is_idempotent_within_a_session() {
    let server = MockServer::start().await;
    serve_detail(&server, "NBL", load_fixture()).await;

    let client = Client::with_base_url(&server.uri()).unwrap();
    let store = temp_store("idempotent");
    let refresher = Refresher::new(&client, &store).with_delay(Duration::ZERO);

    refresher
        .process(&symbols(&["NBL"]), now(), |_| {})
        .await
        .unwrap();

    // Immediately after a successful refresh nothing is outdated.
    let outcome = reconcile(store.load().unwrap(), &symbols(&["NBL"]), now());
    assert!(outcome.is_up_to_date());

    cleanup(&store);
}

#[tokio::test]
async fn broken_symbols_are_skipped_not_fatal() {
    let server = MockServer::start().await;
    serve_detail(&server, "NBL", load_fixture()).await;
    serve_detail(
        &server,
        "BAD",
        "<html><body>No company found.</body></html>".to_string(),
    )
    .await;
    serve_detail(&server, "ADBL", load_fixture()).await;

    let client = Client::with_base_url(&server.uri()).unwrap();
    let store = temp_store("skip");
    let refresher = Refresher::new(&client, &store).with_delay(Duration::ZERO);

    let outcome = refresher
        .process(&symbols(&["NBL", "BAD", "ADBL"]), now(), |_| {})
        .await
        .unwrap();

    assert_eq!(outcome.fetched, vec!["NBL", "ADBL"]);
    assert_eq!(outcome.skipped, vec!["BAD"]);
    assert_eq!(outcome.cache.len(), 2);
    assert!(!outcome.cache.contains("BAD"));

    cleanup(&store);
}

#[tokio::test]
async fn up_to_date_cache_fetches_nothing() {
    // No detail mock is mounted; any fetch would fail the test.
    let server = MockServer::start().await;
    serve_detail(&server, "NBL", load_fixture()).await;

    let client = Client::with_base_url(&server.uri()).unwrap();
    let store = temp_store("uptodate");
    let refresher = Refresher::new(&client, &store).with_delay(Duration::ZERO);

    refresher
        .process(&symbols(&["NBL"]), now(), |_| {})
        .await
        .unwrap();

    // Second run: covered by the fresh row just written.
    let client_without_mocks = Client::with_base_url("http://127.0.0.1:9").unwrap();
    let refresher = Refresher::new(&client_without_mocks, &store).with_delay(Duration::ZERO);
    let outcome = refresher
        .process(&symbols(&["NBL"]), now(), |_| {})
        .await
        .unwrap();
    assert!(outcome.fetched.is_empty());
    assert_eq!(outcome.cache.len(), 1);

    cleanup(&store);
}

#[tokio::test]
async fn connectivity_failure_surfaces() {
    // Port 9 (discard) refuses connections; the batch aborts.
    let client = Client::with_base_url("http://127.0.0.1:9").unwrap();
    let store = temp_store("unreachable");
    let refresher = Refresher::new(&client, &store).with_delay(Duration::ZERO);

    let err = refresher
        .process(&symbols(&["NBL"]), now(), |_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, FundyError::Provider(_)));

    cleanup(&store);
}

#[tokio::test]
async fn stale_unrequested_rows_survive_a_refresh() {
    let server = MockServer::start().await;
    serve_detail(&server, "NBL", load_fixture()).await;

    let store = temp_store("mirror");
    // Seed a cache holding a long-stale row nobody will request.
    let mut seeded = Cache::new();
    let old = fundyfilter_lib::CompanyRecord {
        symbol: "HIDCL".to_string(),
        sector: "Hydro Power".to_string(),
        market_price: "200".to_string(),
        book_value: "100".to_string(),
        pbv: "2".to_string(),
        eps: "10 (FY:079-080)".to_string(),
        pe_ratio: "20".to_string(),
        year_yield: "5%".to_string(),
        avg_dvnd_rate: 0.0,
        avg_dvnd_prob: 0.0,
        avg_bonus_rate: 0.0,
        avg_bonus_prob: 0.0,
        scrape_date: NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
    };
    seeded.insert(old);
    store.save(&seeded).unwrap();

    let client = Client::with_base_url(&server.uri()).unwrap();
    let refresher = Refresher::new(&client, &store).with_delay(Duration::ZERO);
    let outcome = refresher
        .process(&symbols(&["NBL"]), now(), |_| {})
        .await
        .unwrap();

    assert_eq!(outcome.cache.len(), 2);
    assert_eq!(
        outcome.cache.get("HIDCL").unwrap().scrape_date,
        NaiveDate::from_ymd_opt(2023, 3, 1).unwrap()
    );

    cleanup(&store);
}
