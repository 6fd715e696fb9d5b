//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the upstream API and exercise
//! pagination, deduplication, checkpointing and failure isolation end-to-end.

use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tracklist_harvest::config::{
    ApiConfig, Config, CrawlerConfig, InputConfig, OutputConfig, UserAgentConfig,
};
use tracklist_harvest::crawler::{
    build_http_client, run_crawl, CrawlDriver, EpisodeFetcher, RateLimiter, ShowOutcome,
    ShowPipeline,
};
use tracklist_harvest::storage::{tracklist_path, CheckpointStore, JsonCheckpointStore};
use tracklist_harvest::{CrawlTotals, HarvestError, Show, Track};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, dir: &Path) -> Config {
    Config {
        api: ApiConfig {
            base_url: base_url.to_string(),
            guest_path_prefix: "/guests/".to_string(),
        },
        crawler: CrawlerConfig {
            requests_per_second: 1000,
            burst: Some(1000),
            page_size: 12,
            page_delay_ms: 0, // No courtesy delay in tests
        },
        user_agent: UserAgentConfig::default(),
        input: InputConfig {
            catalog_path: dir.join("catalog.json").display().to_string(),
        },
        output: OutputConfig {
            root: dir.join("output").display().to_string(),
            checkpoint_path: dir.join("output").join("checkpoint.json").display().to_string(),
        },
    }
}

fn write_catalog(config: &Config, catalog: Value) {
    std::fs::write(&config.input.catalog_path, catalog.to_string()).unwrap();
}

fn episode(name: &str, tracklist_href: &str) -> Value {
    json!({
        "name": name,
        "links": [
            {"rel": "self", "href": format!("{}/self", tracklist_href)},
            {"rel": "tracklist", "href": tracklist_href}
        ]
    })
}

fn tracks(pairs: &[(&str, &str)]) -> Value {
    let results: Vec<Value> = pairs
        .iter()
        .map(|(artist, title)| json!({"artist": artist, "title": title, "uid": "ignored"}))
        .collect();
    json!({ "results": results })
}

/// Mounts a show with one page of `episodes` followed by an empty page
async fn mount_show(server: &MockServer, show_path: &str, episodes: Vec<Value>) {
    let count = episodes.len();
    Mock::given(method("GET"))
        .and(path(format!("{}/episodes", show_path)))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": episodes })))
        .mount(server)
        .await;

    if count > 0 {
        Mock::given(method("GET"))
            .and(path(format!("{}/episodes", show_path)))
            .and(query_param("offset", "12"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .mount(server)
            .await;
    }
}

async fn mount_tracklist(server: &MockServer, tracklist_path: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(tracklist_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn read_output(path: &Path) -> Vec<Track> {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn read_checkpoint(config: &Config) -> BTreeMap<String, bool> {
    serde_json::from_str(&std::fs::read_to_string(&config.output.checkpoint_path).unwrap())
        .unwrap()
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap().len()
}

#[tokio::test]
async fn test_pagination_terminates_on_empty_page() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    let page = |start: usize| -> Value {
        let episodes: Vec<Value> = (start..start + 12)
            .map(|i| episode(&format!("ep{}", i), &format!("{}/tracklists/{}", base_url, i)))
            .collect();
        json!({ "results": episodes })
    };

    for (offset, body) in [("0", page(0)), ("12", page(12)), ("24", json!({"results": []}))] {
        Mock::given(method("GET"))
            .and(path("/shows/foo/episodes"))
            .and(query_param("offset", offset))
            .and(query_param("limit", "12"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, dir.path());
    let fetcher = EpisodeFetcher::new(
        build_http_client(&config.user_agent).unwrap(),
        Arc::new(RateLimiter::from_config(&config.crawler)),
        base_url.clone(),
        &config.crawler,
    );

    let episodes = fetcher.fetch_all_episodes("/shows/foo", false).await.unwrap();

    assert_eq!(episodes.len(), 24);
    assert_eq!(episodes[0].name.as_deref(), Some("ep0"));
    assert_eq!(episodes[23].name.as_deref(), Some("ep23"));
    assert_eq!(request_count(&server).await, 3);
}

#[tokio::test]
async fn test_guest_show_skips_pagination() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, dir.path());
    let fetcher = EpisodeFetcher::new(
        build_http_client(&config.user_agent).unwrap(),
        Arc::new(RateLimiter::from_config(&config.crawler)),
        base_url.clone(),
        &config.crawler,
    );

    let episodes = fetcher.fetch_all_episodes("/guests/bar", true).await.unwrap();

    assert_eq!(episodes.len(), 1);
    assert_eq!(
        episodes[0].tracklist_href(),
        Some(format!("{}/guests/bar/tracklist", base_url).as_str())
    );
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_end_to_end_single_show() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_show(
        &server,
        "/shows/foo",
        vec![episode("ep1", &format!("{}/tracklists/ep1", base_url))],
    )
    .await;
    mount_tracklist(&server, "/tracklists/ep1", tracks(&[("A", "T"), ("A", "T")])).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, dir.path());
    write_catalog(
        &config,
        json!({"results": [{"mixtape_alias": "poolside", "credits": [{"name": "foo", "path": "/shows/foo"}]}]}),
    );

    let summary = run_crawl(&config, false).await.expect("crawl failed");

    let output = tracklist_path(Path::new(&config.output.root), "poolside", "foo");
    assert_eq!(read_output(&output), vec![Track::new("A", "T")]);

    let checkpoint = read_checkpoint(&config);
    assert_eq!(checkpoint.len(), 1);
    assert_eq!(checkpoint.get("foo"), Some(&true));

    assert_eq!(summary.totals.tracks_written, 1);
    assert_eq!(summary.totals.shows_processed, 1);
    assert!(summary.is_complete());
    assert!(summary.failed_shows.is_empty());
}

#[tokio::test]
async fn test_tracks_deduplicated_across_episodes_with_exact_match() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_show(
        &server,
        "/shows/foo",
        vec![
            episode("ep1", &format!("{}/tracklists/ep1", base_url)),
            episode("ep2", &format!("{}/tracklists/ep2", base_url)),
        ],
    )
    .await;
    mount_tracklist(&server, "/tracklists/ep1", tracks(&[("A", "T"), ("B", "U")])).await;
    mount_tracklist(&server, "/tracklists/ep2", tracks(&[("A", "T"), ("A ", "T")])).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, dir.path());
    write_catalog(
        &config,
        json!({"results": [{"mixtape_alias": "mix", "credits": [{"name": "Foo Show", "path": "/shows/foo"}]}]}),
    );

    let summary = run_crawl(&config, false).await.unwrap();

    let output = Path::new(&config.output.root)
        .join("mix")
        .join("foo_show_tracklist.json");
    let written = read_output(&output);
    assert_eq!(written.len(), 3);
    assert!(written.contains(&Track::new("A", "T")));
    assert!(written.contains(&Track::new("A ", "T")));
    assert!(written.contains(&Track::new("B", "U")));
    assert_eq!(summary.totals.tracks_written, 3);
}

#[tokio::test]
async fn test_checkpointed_show_is_skipped() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, dir.path());
    write_catalog(
        &config,
        json!({"results": [{"mixtape_alias": "mix", "credits": [{"name": "X", "path": "/shows/x"}]}]}),
    );

    let output = tracklist_path(Path::new(&config.output.root), "mix", "X");
    std::fs::create_dir_all(output.parent().unwrap()).unwrap();
    let original = r#"[{"artist":"Old","title":"Track"}]"#;
    std::fs::write(&output, original).unwrap();
    std::fs::write(&config.output.checkpoint_path, r#"{"X": true}"#).unwrap();

    let summary = run_crawl(&config, false).await.unwrap();

    assert_eq!(request_count(&server).await, 0);
    assert_eq!(std::fs::read_to_string(&output).unwrap(), original);
    assert_eq!(summary.totals.shows_skipped, 1);
    assert_eq!(summary.totals.tracks_written, 0);
    assert!(summary.is_complete());
}

#[tokio::test]
async fn test_failure_isolated_to_one_show() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_show(
        &server,
        "/shows/one",
        vec![episode("ep1", &format!("{}/tracklists/one", base_url))],
    )
    .await;
    mount_tracklist(&server, "/tracklists/one", tracks(&[("A", "T")])).await;

    Mock::given(method("GET"))
        .and(path("/shows/two/episodes"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    mount_show(
        &server,
        "/shows/three",
        vec![episode("ep1", &format!("{}/tracklists/three", base_url))],
    )
    .await;
    mount_tracklist(&server, "/tracklists/three", tracks(&[("C", "V"), ("D", "W")])).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, dir.path());
    write_catalog(
        &config,
        json!({"results": [{"mixtape_alias": "mix", "credits": [
            {"name": "one", "path": "/shows/one"},
            {"name": "two", "path": "/shows/two"},
            {"name": "three", "path": "/shows/three"}
        ]}]}),
    );

    let summary = run_crawl(&config, false).await.unwrap();

    let checkpoint = read_checkpoint(&config);
    assert_eq!(checkpoint.get("one"), Some(&true));
    assert_eq!(checkpoint.get("two"), None);
    assert_eq!(checkpoint.get("three"), Some(&true));

    let root = Path::new(&config.output.root);
    assert!(!tracklist_path(root, "mix", "two").exists());
    assert_eq!(read_output(&tracklist_path(root, "mix", "three")).len(), 2);

    assert_eq!(summary.totals.shows_processed, 2);
    assert_eq!(summary.totals.shows_failed, 1);
    assert_eq!(summary.totals.tracks_written, 3);
    assert_eq!(summary.failed_shows, vec!["two".to_string()]);
    assert!(summary.is_complete());
}

#[tokio::test]
async fn test_rerun_is_idempotent_and_merges_existing_output() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_show(
        &server,
        "/shows/foo",
        vec![episode("ep1", &format!("{}/tracklists/ep1", base_url))],
    )
    .await;
    mount_tracklist(&server, "/tracklists/ep1", tracks(&[("Z", "1"), ("A", "2")])).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, dir.path());
    write_catalog(
        &config,
        json!({"results": [{"mixtape_alias": "mix", "credits": [{"name": "foo", "path": "/shows/foo"}]}]}),
    );
    let output = tracklist_path(Path::new(&config.output.root), "mix", "foo");

    run_crawl(&config, true).await.unwrap();
    let first = std::fs::read_to_string(&output).unwrap();

    run_crawl(&config, true).await.unwrap();
    let second = std::fs::read_to_string(&output).unwrap();
    assert_eq!(first, second);

    // A track only present in an earlier output survives the next merge
    std::fs::write(&output, r#"[{"artist":"Earlier","title":"Run"}]"#).unwrap();
    let summary = run_crawl(&config, true).await.unwrap();

    let merged = read_output(&output);
    assert_eq!(merged.len(), 3);
    assert!(merged.contains(&Track::new("Earlier", "Run")));
    assert_eq!(summary.totals.tracks_written, 3);
}

#[tokio::test]
async fn test_guest_show_end_to_end() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_tracklist(&server, "/guests/bar/tracklist", tracks(&[("G", "1")])).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, dir.path());
    write_catalog(
        &config,
        json!({"results": [{"mixtape_alias": "mix", "credits": [{"name": "bar", "path": "/guests/bar"}]}]}),
    );

    let summary = run_crawl(&config, false).await.unwrap();

    assert_eq!(request_count(&server).await, 1);
    let output = tracklist_path(Path::new(&config.output.root), "mix", "bar");
    assert_eq!(read_output(&output), vec![Track::new("G", "1")]);
    assert_eq!(summary.totals.tracks_written, 1);
}

#[tokio::test]
async fn test_malformed_tracklist_fails_show() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_show(
        &server,
        "/shows/foo",
        vec![episode("ep1", &format!("{}/tracklists/ep1", base_url))],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/tracklists/ep1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, dir.path());
    let pipeline = ShowPipeline::new(
        &config,
        build_http_client(&config.user_agent).unwrap(),
        Arc::new(RateLimiter::from_config(&config.crawler)),
    );
    let mut checkpoint = JsonCheckpointStore::load(Path::new(&config.output.checkpoint_path));
    let mut totals = CrawlTotals::new();
    let show = Show {
        name: "foo".to_string(),
        path: "/shows/foo".to_string(),
    };

    let outcome = pipeline
        .process_show("mix", &show, &mut checkpoint, &mut totals)
        .await;

    match outcome {
        ShowOutcome::Failed { reason } => assert!(reason.contains("/tracklists/ep1")),
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(!checkpoint.is_done("foo"));
    assert!(!Path::new(&config.output.checkpoint_path).exists());
    assert_eq!(totals.shows_failed, 1);
}

#[tokio::test]
async fn test_output_write_failure_leaves_checkpoint_untouched() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_show(
        &server,
        "/shows/foo",
        vec![episode("ep1", &format!("{}/tracklists/ep1", base_url))],
    )
    .await;
    mount_tracklist(&server, "/tracklists/ep1", tracks(&[("A", "T")])).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, dir.path());

    // A directory where the output file should go makes the write fail
    let output = tracklist_path(Path::new(&config.output.root), "mix", "foo");
    std::fs::create_dir_all(&output).unwrap();

    let pipeline = ShowPipeline::new(
        &config,
        build_http_client(&config.user_agent).unwrap(),
        Arc::new(RateLimiter::from_config(&config.crawler)),
    );
    let mut checkpoint = JsonCheckpointStore::load(Path::new(&config.output.checkpoint_path));
    let mut totals = CrawlTotals::new();
    let show = Show {
        name: "foo".to_string(),
        path: "/shows/foo".to_string(),
    };

    let outcome = pipeline
        .process_show("mix", &show, &mut checkpoint, &mut totals)
        .await;

    match outcome {
        ShowOutcome::Failed { reason } => {
            assert!(reason.contains("foo_tracklist.json"), "reason: {}", reason)
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(!checkpoint.is_done("foo"));
    assert!(!Path::new(&config.output.checkpoint_path).exists());
    assert_eq!(totals.shows_failed, 1);
    assert_eq!(totals.tracks_written, 0);
}

#[tokio::test]
async fn test_episode_with_null_name_completes() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_show(
        &server,
        "/shows/foo",
        vec![
            json!({
                "name": null,
                "links": [{"rel": "tracklist", "href": format!("{}/tracklists/ep1", base_url)}]
            }),
            json!({"name": "ep2", "links": null}),
        ],
    )
    .await;
    mount_tracklist(&server, "/tracklists/ep1", tracks(&[("A", "T"), ("B", "U")])).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, dir.path());
    write_catalog(
        &config,
        json!({"results": [{"mixtape_alias": "mix", "credits": [{"name": "foo", "path": "/shows/foo"}]}]}),
    );

    let summary = run_crawl(&config, false).await.unwrap();

    assert_eq!(summary.totals.shows_processed, 1);
    assert!(summary.failed_shows.is_empty());
    let output = read_output(&tracklist_path(Path::new(&config.output.root), "mix", "foo"));
    assert_eq!(output.len(), 2);
    assert_eq!(read_checkpoint(&config).get("foo"), Some(&true));
}

#[tokio::test]
async fn test_episode_without_tracklist_link_is_skipped() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_show(
        &server,
        "/shows/foo",
        vec![
            json!({"name": "no-links", "links": []}),
            episode("ep2", &format!("{}/tracklists/ep2", base_url)),
        ],
    )
    .await;
    mount_tracklist(&server, "/tracklists/ep2", tracks(&[("A", "T")])).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, dir.path());
    let driver = CrawlDriver::new(&config).unwrap();
    let catalog = serde_json::from_value(json!({"results": [{"mixtape_alias": "mix", "credits": [
        {"name": "foo", "path": "/shows/foo"}
    ]}]}))
    .unwrap();
    let mut checkpoint = JsonCheckpointStore::load(Path::new(&config.output.checkpoint_path));

    let summary = driver.run(&catalog, &mut checkpoint).await;

    assert_eq!(summary.totals.shows_processed, 1);
    assert_eq!(summary.totals.tracks_written, 1);
    assert!(checkpoint.is_done("foo"));
}

#[tokio::test]
async fn test_malformed_catalog_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config("http://127.0.0.1:1", dir.path());
    std::fs::write(&config.input.catalog_path, "{\"results\": 42}").unwrap();

    let result = run_crawl(&config, false).await;
    assert!(matches!(result, Err(HarvestError::Catalog(_))));
}
