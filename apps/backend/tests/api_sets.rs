//! Library endpoint tests: creation, listing, export/import, starring.

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::{create_set, spawn_default};

#[tokio::test]
async fn health_check_responds() {
    let ctx = spawn_default();
    let response = ctx.server.get("/health").await;
    response.assert_status_ok();
    response.assert_text("OK");
}

#[tokio::test]
async fn created_sets_appear_in_the_listing() {
    let ctx = spawn_default();
    create_set(&ctx.server, "Biology", 3).await;
    create_set(&ctx.server, "Astronomy", 2).await;

    let sets: Value = ctx.server.get("/api/sets").await.json();
    let topics: Vec<&str> = sets
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["topic"].as_str().unwrap())
        .collect();
    // BTreeMap-backed library lists alphabetically.
    assert_eq!(topics, vec!["Astronomy", "Biology"]);
    assert_eq!(sets[1]["card_count"], 3);
    assert_eq!(sets[1]["starred_count"], 0);
}

#[tokio::test]
async fn blank_cards_are_dropped_before_validation() {
    let ctx = spawn_default();
    let response = ctx
        .server
        .post("/api/sets")
        .json(&json!({
            "topic": "Sparse",
            "cards": [
                { "term": "keep-1", "definition": "d" },
                { "term": "   ", "definition": "dropped" },
                { "term": "dropped", "definition": "" },
                { "term": "keep-2", "definition": "d" },
            ],
        }))
        .await;
    response.assert_status_ok();

    let set: Value = ctx.server.get("/api/sets/Sparse").await.json();
    assert_eq!(set["cards"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn a_set_needs_a_topic_and_two_usable_cards() {
    let ctx = spawn_default();

    let response = ctx
        .server
        .post("/api/sets")
        .json(&json!({
            "topic": "Thin",
            "cards": [
                { "term": "only", "definition": "d" },
                { "term": " ", "definition": "blank, so dropped" },
            ],
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = ctx
        .server
        .post("/api/sets")
        .json(&json!({
            "topic": "   ",
            "cards": [
                { "term": "a", "definition": "d" },
                { "term": "b", "definition": "d" },
            ],
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_topics_conflict() {
    let ctx = spawn_default();
    create_set(&ctx.server, "Biology", 2).await;

    let response = ctx
        .server
        .post("/api/sets")
        .json(&json!({
            "topic": "Biology",
            "cards": [
                { "term": "a", "definition": "d" },
                { "term": "b", "definition": "d" },
            ],
        }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"], "duplicate_topic");
}

#[tokio::test]
async fn unknown_set_is_not_found() {
    let ctx = spawn_default();
    let response = ctx.server.get("/api/sets/Nope").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn export_then_import_round_trips_with_stars() {
    let ctx = spawn_default();
    create_set(&ctx.server, "Biology", 2).await;

    // Star one card so the flag has to survive the round trip.
    let set: Value = ctx.server.get("/api/sets/Biology").await.json();
    let card_id = set["cards"][0]["id"].as_str().unwrap();
    ctx.server
        .post(&format!("/api/sets/Biology/cards/{card_id}/star"))
        .await
        .assert_status_ok();

    let export: Value = ctx.server.get("/api/sets/Biology/export").await.json();
    assert_eq!(export["filename"], "biology.json");

    // Import into a fresh server.
    let other = spawn_default();
    let report: Value = other
        .server
        .post("/api/sets/import")
        .json(&json!({
            "files": [{ "name": "biology.json", "content": export["content"] }],
        }))
        .await
        .json();
    assert_eq!(report["imported"], json!(["Biology"]));

    let imported: Value = other.server.get("/api/sets/Biology").await.json();
    assert_eq!(imported["cards"][0]["is_starred"], true);
    assert_eq!(imported["cards"][1]["is_starred"], false);
}

#[tokio::test]
async fn bad_import_files_are_skipped_without_aborting_the_batch() {
    let ctx = spawn_default();
    create_set(&ctx.server, "Existing", 2).await;
    let export: Value = ctx.server.get("/api/sets/Existing/export").await.json();

    let report: Value = ctx
        .server
        .post("/api/sets/import")
        .json(&json!({
            "files": [
                { "name": "garbage.json", "content": "{not json" },
                { "name": "duplicate.json", "content": export["content"] },
                {
                    "name": "fresh.json",
                    "content": serde_json::to_string(&json!({
                        "topic": "Fresh",
                        "cards": [
                            { "id": "x", "term": "a", "definition": "d" },
                            { "id": "y", "term": "b", "definition": "d" },
                        ],
                    }))
                    .unwrap(),
                },
            ],
        }))
        .await
        .json();

    assert_eq!(report["imported"], json!(["Fresh"]));
    let skipped = report["skipped"].as_array().unwrap();
    assert_eq!(skipped.len(), 2);
    assert_eq!(skipped[0]["name"], "garbage.json");
    assert_eq!(skipped[1]["name"], "duplicate.json");
}

#[tokio::test]
async fn star_toggle_flips_both_ways() {
    let ctx = spawn_default();
    create_set(&ctx.server, "Biology", 2).await;
    let set: Value = ctx.server.get("/api/sets/Biology").await.json();
    let card_id = set["cards"][0]["id"].as_str().unwrap();
    let url = format!("/api/sets/Biology/cards/{card_id}/star");

    let on: Value = ctx.server.post(&url).await.json();
    assert_eq!(on["is_starred"], true);
    let off: Value = ctx.server.post(&url).await.json();
    assert_eq!(off["is_starred"], false);

    let response = ctx.server.post("/api/sets/Biology/cards/unknown/star").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn generate_cards_uses_the_injected_capability() {
    let ctx = spawn_default();
    let body: Value = ctx
        .server
        .post("/api/generate/cards")
        .json(&json!({ "notes": "mitosis and osmosis notes" }))
        .await
        .json();
    assert_eq!(body["cards"][0]["term"], "Mitosis");
    assert_eq!(body["cards"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn generate_cards_rejects_empty_notes() {
    let ctx = spawn_default();
    let response = ctx
        .server
        .post("/api/generate/cards")
        .json(&json!({ "notes": "   " }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn generation_failures_surface_as_bad_gateway() {
    let ctx = common::spawn(std::sync::Arc::new(common::FailingGenerator));
    let response = ctx
        .server
        .post("/api/generate/cards")
        .json(&json!({ "notes": "some notes" }))
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["error"], "generation_error");
}
