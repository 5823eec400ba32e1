//! Holds lifecycle integration tests.
//!
//! These tests drive the service through the full life of a hold against the
//! in-memory gateway: asked → confirmed, plus the paths that must leave the
//! sheet untouched.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use holds_core::{
    testing::{fixtures, MockSheetGateway},
    service::UpdateOutcome,
    ArtistDirectory, HoldStatus, HoldsError, HoldsService, PriorityTag,
};

/// Test helper wiring the service to a mock gateway.
struct TestHarness {
    service: HoldsService,
    gateway: Arc<MockSheetGateway>,
}

impl TestHarness {
    fn new() -> Self {
        let gateway = Arc::new(MockSheetGateway::new());
        let service = HoldsService::new(Arc::new(fixtures::directory()), gateway.clone());
        Self { service, gateway }
    }

    async fn wf_rows(&self) -> Vec<holds_core::SheetRow> {
        self.gateway.rows(fixtures::WF_SHEET, fixtures::WF_TAB).await
    }
}

fn dates(values: &[&str]) -> Vec<String> {
    values.iter().map(|d| d.to_string()).collect()
}

fn hold_data(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("hold_data must be an object")
}

#[tokio::test]
async fn test_log_then_confirm_one_date() {
    let harness = TestHarness::new();

    // Log two dates on an empty sheet
    let logged = harness
        .service
        .log_holds(
            "weakened-friends",
            "The Sinclair",
            &dates(&["2026-04-30", "2026-05-01"]),
        )
        .await
        .expect("log_holds should succeed");

    let ranks: Vec<(String, u32, PriorityTag)> = logged
        .logged
        .iter()
        .map(|l| (l.date.to_string(), l.priority_rank, l.priority))
        .collect();
    assert_eq!(
        ranks,
        vec![
            ("2026-04-30".to_string(), 1, PriorityTag::First),
            ("2026-05-01".to_string(), 2, PriorityTag::Second),
        ]
    );

    let rows = harness.wf_rows().await;
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.hold.status == HoldStatus::AskedHold));
    assert!(rows.iter().all(|r| r.hold.hold_number.is_none()));

    // Confirm only the first date
    let updated = harness
        .service
        .update_holds_status(
            "weakened-friends",
            "The Sinclair",
            &hold_data(json!({"2026-04-30": 3})),
        )
        .await
        .expect("update should succeed");

    assert_eq!(updated.applied, 1);
    assert_eq!(updated.total, 1);

    let rows = harness.wf_rows().await;
    assert_eq!(rows[0].hold.status, HoldStatus::HoldConfirmed);
    assert_eq!(rows[0].hold.hold_number, Some(3));
    assert_eq!(rows[1].hold.status, HoldStatus::AskedHold);
    assert_eq!(rows[1].hold.hold_number, None);
    assert_eq!(rows[1].hold.priority_rank, 2);
}

#[tokio::test]
async fn test_update_never_logged_date_creates_nothing() {
    let harness = TestHarness::new();

    harness
        .service
        .log_holds("weakened-friends", "The Sinclair", &dates(&["2026-04-30"]))
        .await
        .unwrap();

    let updated = harness
        .service
        .update_holds_status(
            "weakened-friends",
            "The Sinclair",
            &hold_data(json!({"2026-07-04": 1})),
        )
        .await
        .unwrap();

    assert_eq!(updated.applied, 0);
    assert_eq!(updated.updates[0].outcome, UpdateOutcome::NotFound);
    assert_eq!(harness.wf_rows().await.len(), 1);
}

#[tokio::test]
async fn test_mixed_batch_applies_matches_only() {
    let harness = TestHarness::new();

    harness
        .service
        .log_holds(
            "weakened-friends",
            "The Sinclair",
            &dates(&["2026-04-30", "2026-05-01"]),
        )
        .await
        .unwrap();

    let updated = harness
        .service
        .update_holds_status(
            "weakened-friends",
            "The Sinclair",
            &hold_data(json!({"2026-04-30": 3, "2026-05-01": 4, "2026-05-02": 5})),
        )
        .await
        .unwrap();

    assert_eq!(updated.applied, 2);
    assert_eq!(updated.total, 3);
    let not_found: Vec<String> = updated
        .updates
        .iter()
        .filter(|u| u.outcome == UpdateOutcome::NotFound)
        .map(|u| u.date.to_string())
        .collect();
    assert_eq!(not_found, vec!["2026-05-02"]);
    assert_eq!(harness.wf_rows().await.len(), 2);
}

#[tokio::test]
async fn test_relogging_continues_ranks_and_skips_present() {
    let harness = TestHarness::new();

    harness
        .service
        .log_holds(
            "weakened-friends",
            "The Sinclair",
            &dates(&["2026-04-30", "2026-05-01", "2026-05-02"]),
        )
        .await
        .unwrap();

    let second = harness
        .service
        .log_holds(
            "weakened-friends",
            "The Sinclair",
            &dates(&["2026-05-01", "2026-06-12"]),
        )
        .await
        .unwrap();

    assert_eq!(second.skipped.len(), 1);
    assert_eq!(second.logged.len(), 1);
    assert_eq!(second.logged[0].priority_rank, 4);
    assert_eq!(second.logged[0].priority, PriorityTag::FourthPlus);
    assert_eq!(harness.wf_rows().await.len(), 4);

    // Another venue starts its own ranking
    let other = harness
        .service
        .log_holds("weakened-friends", "Brooklyn Bowl", &dates(&["2026-05-01"]))
        .await
        .unwrap();
    assert_eq!(other.logged[0].priority_rank, 1);
}

#[tokio::test]
async fn test_artists_use_separate_sheets() {
    let harness = TestHarness::new();

    harness
        .service
        .log_holds("ballroom-thieves", "The Sinclair", &dates(&["2026-04-30"]))
        .await
        .unwrap();

    assert!(harness.wf_rows().await.is_empty());
    let sheet = harness
        .service
        .read_holds_sheet("ballroom-thieves")
        .await
        .unwrap();
    assert_eq!(sheet.rows.len(), 1);
    assert_eq!(sheet.tab_name, fixtures::TBT_TAB);
}

#[tokio::test]
async fn test_unknown_artist_fails_before_gateway() {
    let harness = TestHarness::new();

    let result = harness
        .service
        .log_holds("unknown-band", "The Sinclair", &dates(&["2026-04-30"]))
        .await;

    assert!(matches!(result, Err(HoldsError::UnknownArtist(key)) if key == "unknown-band"));
    assert_eq!(harness.gateway.calls().await.total(), 0);
}

#[tokio::test]
async fn test_override_directory_routes_to_new_sheet() {
    let gateway = Arc::new(MockSheetGateway::new());
    let directory = ArtistDirectory::new(Some(
        r#"{"new-artist": {"sheet_id": "new-sheet", "tab_name": "Holds"}}"#,
    ))
    .expect("overrides should parse");
    let service = HoldsService::new(Arc::new(directory), gateway.clone());

    service
        .log_holds("new-artist", "The Sinclair", &dates(&["2026-04-30"]))
        .await
        .unwrap();

    assert_eq!(gateway.rows("new-sheet", "Holds").await.len(), 1);
    // Built-in artists are still known
    assert!(service.directory().resolve("weakened-friends").is_ok());
}
