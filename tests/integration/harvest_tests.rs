//! Integration tests for the harvester
//!
//! These tests use wiremock to serve a format index, event pages and
//! decklist exports, and run the full harvest end-to-end into a temporary
//! data directory.

use decklist_harvest::config::{Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig};
use decklist_harvest::crawler::Harvester;
use decklist_harvest::{EventStage, HarvestError};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INDEX_PAGE: &str = r#"
<html><body>
<table>
    <tr><td class="S12">Event</td><td class="S12">Level</td><td class="S12">Date</td></tr>
    <tr class="hover_tr">
        <td><a href="event?e=100&f=EDH">Commander Cup</a></td>
        <td><img src="/graph/star.png"><img src="/graph/star.png"></td>
        <td><a href="/search?country=FR">France</a> <a href="/search?city=Lyon">Lyon</a></td>
        <td class="S12">14/09/24</td>
    </tr>
    <tr class="separator"><td colspan="4"><a href="event?e=999&f=EDH">Promoted</a></td></tr>
    <tr class="hover_tr">
        <td><a href="event?e=200&f=EDH">Duel Night</a></td>
        <td><img src="/graph/star.png"></td>
        <td><a href="/search?city=Paris">Paris</a></td>
        <td class="S12">07/09/24</td>
    </tr>
    <tr class="hover_tr"><td class="S12">06/09/24</td><td>Postponed</td></tr>
    <tr><td><a href="format?f=EDH&meta=210">Older meta</a></td></tr>
</table>
</body></html>
"#;

const CUP_PAGE: &str = r#"
<html><body>
    <div class="chosen_tr">
        <div class="S14">1</div>
        <div class="S14"><a href="?e=100&d=5001&f=EDH">Atraxa Superfriends</a></div>
        <div class="G11">Alice</div>
    </div>
    <div class="hover_tr">
        <div class="S14">2</div>
        <div class="S14"><a href="?e=100&d=5002&f=EDH">Najeela Tempo</a></div>
        <div class="G11">Bob</div>
    </div>
    <div class="hover_tr">
        <div class="S14">Other events</div>
        <div class="S14">See all</div>
    </div>
</body></html>
"#;

const DUEL_PAGE: &str = r#"
<html><body>
    <div class="chosen_tr">
        <div class="S14">1</div>
        <div class="S14"><a href="?e=200&d=6001&f=EDH">Kenrith Control</a></div>
        <div class="G11">Carol</div>
    </div>
</body></html>
"#;

const ATRAXA_DECK: &str =
    "1 Sol Ring\r\n1 Arcane Signet\r\n\r\nSideboard\r\n1 Atraxa, Praetors' Voice\r\n";
const NAJEELA_DECK: &str =
    "x Mountain\r\n1 Command Tower\r\nSideboard\r\n1 Najeela, the Blade-Blossom\r\n";
const KENRITH_DECK: &str = "1 Counterspell\r\nForest\r\nSideboard\r\n1 Kenrith, the Returned King";

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, data_dir: &Path) -> Config {
    Config {
        site: SiteConfig {
            base_url: format!("{}/", base_url),
            format: "EDH".to_string(),
            meta: "209".to_string(),
            allowed_domains: vec!["127.0.0.1".to_string()],
            event_prefix: "event".to_string(),
            decklist_path: "mtgo".to_string(),
        },
        crawler: CrawlerConfig {
            request_delay: 10, // Very short for testing
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestHarvester".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            data_dir: data_dir.to_string_lossy().into_owned(),
            format_code: "edh".to_string(),
            season: "2024".to_string(),
        },
    }
}

async fn mount_html(server: &MockServer, route: &str, key: &str, value: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(query_param(key, value))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_deck(server: &MockServer, deck_id: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path("/mtgo"))
        .and(query_param("d", deck_id))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/plain"),
        )
        .mount(server)
        .await;
}

/// Mounts the index and both event pages
async fn mount_pages(server: &MockServer) {
    mount_html(server, "/format", "meta", "209", INDEX_PAGE).await;
    mount_html(server, "/event", "e", "100", CUP_PAGE).await;
    mount_html(server, "/event", "e", "200", DUEL_PAGE).await;
}

fn season_dir(data_dir: &TempDir) -> PathBuf {
    data_dir.path().join("edh").join("2024")
}

fn read_json(path: &Path) -> Value {
    let bytes = std::fs::read(path).expect("Failed to read document");
    serde_json::from_slice(&bytes).expect("Document is not valid JSON")
}

#[tokio::test]
async fn test_full_harvest() {
    let mock_server = MockServer::start().await;
    mount_pages(&mock_server).await;
    mount_deck(&mock_server, "5001", ATRAXA_DECK).await;
    mount_deck(&mock_server, "5002", NAJEELA_DECK).await;
    mount_deck(&mock_server, "6001", KENRITH_DECK).await;

    let data_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), data_dir.path());

    let mut harvester = Harvester::new(config).expect("Failed to create harvester");
    let summary = harvester.run().await.expect("Harvest failed");

    assert_eq!(summary.events_discovered, 2);
    assert_eq!(summary.events_persisted, 2);
    assert_eq!(summary.results_collected, 3);
    assert_eq!(summary.results_discarded, 1);
    assert_eq!(summary.decks_attached, 3);
    assert_eq!(summary.cards_parsed, 8);
    // "x Mountain" and "Forest"
    assert_eq!(summary.warnings, 2);

    assert_eq!(harvester.registry().ids(), vec!["100", "200"]);
    assert!(harvester
        .registry()
        .iter()
        .all(|event| event.stage == EventStage::Persisted));

    let cup_path = season_dir(&data_dir).join("14-09-24-100").join("index.json");
    let cup = read_json(&cup_path);
    assert_eq!(
        cup,
        json!({
            "id": "100",
            "format": "EDH",
            "is_online": false,
            "title": "Commander Cup",
            "location": "Lyon",
            "level": 2,
            "date": "14/09/24",
            "results": [
                {
                    "id": "5001",
                    "title": "Atraxa Superfriends",
                    "player": "Alice",
                    "rank": "1",
                    "deck": {
                        "commanders": ["Atraxa, Praetors' Voice"],
                        "list": [
                            {"quantity": 1, "name": "Sol Ring", "is_commander": false},
                            {"quantity": 1, "name": "Arcane Signet", "is_commander": false},
                            {"quantity": 1, "name": "Atraxa, Praetors' Voice", "is_commander": true}
                        ]
                    }
                },
                {
                    "id": "5002",
                    "title": "Najeela Tempo",
                    "player": "Bob",
                    "rank": "2",
                    "deck": {
                        "commanders": ["Najeela, the Blade-Blossom"],
                        "list": [
                            {"quantity": 0, "name": "Mountain", "is_commander": false},
                            {"quantity": 1, "name": "Command Tower", "is_commander": false},
                            {"quantity": 1, "name": "Najeela, the Blade-Blossom", "is_commander": true}
                        ]
                    }
                }
            ]
        })
    );

    let duel_path = season_dir(&data_dir).join("07-09-24-200").join("index.json");
    let duel = read_json(&duel_path);
    assert_eq!(duel["location"], "Paris");
    assert_eq!(duel["level"], 1);
    assert_eq!(
        duel["results"][0]["deck"]["commanders"],
        json!(["Kenrith, the Returned King"])
    );
    assert_eq!(duel["results"][0]["deck"]["list"].as_array().unwrap().len(), 2);

    let manifest_path = season_dir(&data_dir).join("index.json");
    assert_eq!(summary.manifest_path.as_deref(), Some(manifest_path.as_path()));
    assert_eq!(
        read_json(&manifest_path),
        json!({
            "id": "209",
            "events": [
                cup_path.to_string_lossy(),
                duel_path.to_string_lossy(),
            ]
        })
    );
}

#[tokio::test]
async fn test_failed_decklist_aborts_without_manifest() {
    let mock_server = MockServer::start().await;
    mount_pages(&mock_server).await;
    mount_deck(&mock_server, "5001", ATRAXA_DECK).await;
    mount_deck(&mock_server, "5002", NAJEELA_DECK).await;
    // No mock for 6001: the server answers 404

    let data_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), data_dir.path());

    let mut harvester = Harvester::new(config).expect("Failed to create harvester");
    let err = harvester.run().await.unwrap_err();

    assert!(matches!(err, HarvestError::Status { status: 404, .. }));

    // The first event was already written and stays on disk
    assert!(season_dir(&data_dir)
        .join("14-09-24-100")
        .join("index.json")
        .exists());
    assert!(!season_dir(&data_dir).join("07-09-24-200").exists());
    assert!(!season_dir(&data_dir).join("index.json").exists());

    let duel = harvester.registry().get("200").unwrap();
    assert_eq!(duel.stage, EventStage::ResultsCollected);
    assert!(duel.results[0].deck.is_none());
}

#[tokio::test]
async fn test_failed_index_writes_nothing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/format"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let data_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), data_dir.path());

    let mut harvester = Harvester::new(config).expect("Failed to create harvester");
    let err = harvester.run().await.unwrap_err();

    assert!(matches!(err, HarvestError::Status { status: 500, .. }));
    assert!(harvester.registry().is_empty());
    assert!(!data_dir.path().join("edh").exists());
}

#[tokio::test]
async fn test_disallowed_domain_is_never_requested() {
    let mock_server = MockServer::start().await;
    mount_pages(&mock_server).await;

    let data_dir = TempDir::new().unwrap();
    let mut config = create_test_config(&mock_server.uri(), data_dir.path());
    config.site.allowed_domains = vec!["www.mtgtop8.com".to_string()];

    let mut harvester = Harvester::new(config).expect("Failed to create harvester");
    let err = harvester.run().await.unwrap_err();

    assert!(matches!(err, HarvestError::DisallowedDomain { .. }));
    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_redirect_off_allowed_hosts_aborts() {
    let mock_server = MockServer::start().await;
    mount_html(&mock_server, "/format", "meta", "209", INDEX_PAGE).await;
    Mock::given(method("GET"))
        .and(path("/event"))
        .and(query_param("e", "100"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", "http://elsewhere.invalid/event"),
        )
        .mount(&mock_server)
        .await;

    let data_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), data_dir.path());

    let mut harvester = Harvester::new(config).expect("Failed to create harvester");
    let err = harvester.run().await.unwrap_err();

    match err {
        HarvestError::DisallowedDomain { url } => {
            assert_eq!(url, "http://elsewhere.invalid/event")
        }
        other => panic!("Expected DisallowedDomain, got {:?}", other),
    }
    assert!(!data_dir.path().join("edh").exists());
    assert_eq!(
        harvester.registry().get("100").unwrap().stage,
        EventStage::Discovered
    );
}

#[tokio::test]
async fn test_index_without_events_writes_empty_manifest() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        "/format",
        "meta",
        "209",
        r#"<table><tr class="hover_tr"><td class="S12">01/01/24</td></tr></table>"#,
    )
    .await;

    let data_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), data_dir.path());

    let mut harvester = Harvester::new(config).expect("Failed to create harvester");
    let summary = harvester.run().await.expect("Harvest failed");

    assert_eq!(summary.events_discovered, 0);
    assert_eq!(
        read_json(&season_dir(&data_dir).join("index.json")),
        json!({"id": "209", "events": []})
    );
}
