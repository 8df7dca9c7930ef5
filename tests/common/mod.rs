//! Local stand-in for the offering and groups APIs.

#![allow(dead_code)]

use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use kambi_snapshot::Config;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const OFFERING: &str = "testoff";

async fn offering_groups(Path(offering): Path<String>) -> Response {
    if offering != OFFERING {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!({
        "group": {
            "id": 1,
            "groups": [
                {"name": "Football", "termKey": "football"},
                {"name": "Specials"},
                {"name": "Darts", "termKey": "darts"}
            ]
        }
    }))
    .into_response()
}

async fn groups_query(Json(payload): Json<Value>) -> Response {
    let sport = payload["variables"]["sport"].as_str().unwrap_or_default();
    match sport {
        "football" => Json(json!({
            "data": {
                "groups": {
                    "groups": [
                        {
                            "name": "England",
                            "level": 2,
                            "path": "football/england",
                            "groups": [
                                {"name": "Premier League", "level": 3, "path": "football/england/premier_league"}
                            ]
                        },
                        {"name": "Champions League", "level": 3, "path": "football/champions_league"}
                    ],
                    "topLeagues": []
                }
            }
        }))
        .into_response(),
        _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

pub fn event(id: i64, state: &str, home: &str, away: &str, odds: [u32; 3]) -> Value {
    json!({
        "event": {
            "id": id,
            "state": state,
            "homeName": home,
            "awayName": away,
            "start": "2026-10-20T18:00:00Z",
            "group": "Test League"
        },
        "betOffers": [
            {
                "betOfferType": {"id": 2},
                "outcomes": [
                    {"type": "OT_ONE", "odds": odds[0]},
                    {"type": "OT_CROSS", "odds": odds[1]},
                    {"type": "OT_TWO", "odds": odds[2]}
                ]
            }
        ]
    })
}

static IN_FLIGHT: AtomicUsize = AtomicUsize::new(0);
static PEAK_IN_FLIGHT: AtomicUsize = AtomicUsize::new(0);

/// Highest number of `slow/<n>` requests the server handled at once
pub fn peak_in_flight() -> usize {
    PEAK_IN_FLIGHT.load(Ordering::SeqCst)
}

/// `slow/<n>` lists hold the request open briefly and return event `n`
async fn slow_list(n: i64) -> Response {
    let now = IN_FLIGHT.fetch_add(1, Ordering::SeqCst) + 1;
    PEAK_IN_FLIGHT.fetch_max(now, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(50)).await;
    IN_FLIGHT.fetch_sub(1, Ordering::SeqCst);

    Json(json!({
        "events": [event(n, "NOT_STARTED", "Slow", "Lane", [1500, 3000, 5000])]
    }))
    .into_response()
}

async fn list_view(Path((_offering, rest)): Path<(String, String)>) -> Response {
    let rest = rest.trim_start_matches('/');
    if let Some(n) = rest
        .strip_prefix("slow/")
        .and_then(|r| r.strip_suffix("/all/all/matches.json"))
        .and_then(|n| n.parse::<i64>().ok())
    {
        return slow_list(n).await;
    }

    match rest {
        "football/england/premier_league/all/matches.json" => Json(json!({
            "events": [
                event(101, "NOT_STARTED", "Arsenal (1)", "Chelsea", [1950, 3400, 4100]),
                event(102, "STARTED", "Everton", "Fulham", [2000, 3000, 3500])
            ]
        }))
        .into_response(),
        "football/champions_league/all/all/matches.json" => Json(json!({
            "events": [
                event(201, "NOT_STARTED", "Real Madrid", "Bayern (3)", [2100, 3500, 3200])
            ]
        }))
        .into_response(),
        "broken/all/all/matches.json" => {
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        "garbage/all/all/matches.json" => "not json".into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Serve the fake API on an ephemeral port and return its origin
pub async fn spawn_server() -> String {
    let app = Router::new()
        .route("/offering/v2018/:offering/group.json", get(offering_groups))
        .route("/offering/v2018/:offering/listView/*rest", get(list_view))
        .route("/graphql", post(groups_query));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

pub fn test_config(origin: &str, output_dir: &std::path::Path) -> Config {
    let mut config = Config::new(OFFERING);
    config.base_url = format!("{}/offering/v2018", origin);
    config.graphql_url = format!("{}/graphql", origin);
    config.concurrency = 4;
    config.output_dir = output_dir.to_string_lossy().into_owned();
    config
}

pub fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("kambi_snapshot_{}_{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
