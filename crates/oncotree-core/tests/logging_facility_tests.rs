#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::*;
use oncotree_core::errors::ReconcileError;
use oncotree_core::logging_facility::test_capture::init_test_capture;
use oncotree_core::{log_op_end, log_op_error, log_op_start};
use oncotree_core::{prepare, run, AlwaysAccept, NoopSink, StaticCodeMapping};
use oncotree_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_COMPONENT, FIELD_DURATION_MS, FIELD_ERR_CODE,
    FIELD_ERR_KIND, FIELD_NODE_COUNT, FIELD_RUN_ID, FIELD_SNAPSHOT_PATH,
};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    capture.assert_event_exists(op_name, EVENT_START);
    let events = capture.events_for_op(op_name);
    assert!(events[0]
        .field(FIELD_COMPONENT)
        .is_some_and(|c| c.contains("logging_facility_tests")));
}

#[test]
fn test_log_op_end_macro_records_duration() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1, "Should have exactly one end event");
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END));
    assert_eq!(events[0].field(FIELD_DURATION_MS), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = ReconcileError::RevocationIsPrecursor {
        revoked_id: "ONC1".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let events = capture.events_for_op(op_name);
    let error_event = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("Should have captured an end_error event");
    assert_eq!(error_event.field(FIELD_ERR_CODE), Some("ERR_LINEAGE_VIOLATION"));
    assert_eq!(error_event.field(FIELD_ERR_KIND), Some("LineageViolation"));
    assert_eq!(error_event.level, tracing::Level::ERROR);
}

#[test]
fn test_every_stage_logs_start_and_end() {
    let capture = init_test_capture();
    let fixture = Fixture::new();
    let mut modified = base_tree();
    edit(&mut modified, "ONC000004", |n| n.oncotree_code = "IDC2".to_string());

    run(
        &fixture.request(&base_tree(), &modified),
        &StaticCodeMapping::default(),
        &AlwaysAccept,
        &NoopSink,
    )
    .unwrap();

    for op in [
        "load_snapshot",
        "validate_snapshot",
        "fetch_code_mapping",
        "reconcile",
        "validate_lineage",
        "run_pipeline",
    ] {
        capture.assert_event_exists(op, EVENT_START);
        capture.assert_event_exists(op, EVENT_END);
    }

    let run_ends = capture.count_events(|e| {
        e.op.as_deref() == Some("run_pipeline")
            && e.event.as_deref() == Some(EVENT_END)
            && e.field(FIELD_RUN_ID).is_some()
    });
    assert!(run_ends >= 1);
}

#[test]
fn test_failed_validation_logs_end_error() {
    let capture = init_test_capture();
    let fixture = Fixture::new();
    let mut original = base_tree();
    edit(&mut original, "ONC000003", |n| n.preferred_label = "Lungs".to_string());

    let err = prepare(
        &fixture.request(&original, &base_tree()),
        &StaticCodeMapping::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ReconcileError::SnapshotInvalid { .. }));

    let errors = capture.count_events(|e| {
        e.op.as_deref() == Some("validate_snapshot")
            && e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.field(FIELD_ERR_CODE) == Some("ERR_SNAPSHOT_INVALID")
    });
    assert!(errors >= 1);
}

#[test]
fn test_snapshot_stages_record_path_and_node_count() {
    let capture = init_test_capture();
    let fixture = Fixture::new();
    let request = fixture.request(&base_tree(), &base_tree());
    let original_path = request.original_path.display().to_string();

    prepare(&request, &StaticCodeMapping::default()).unwrap();

    for op in ["load_snapshot", "validate_snapshot"] {
        let starts = capture.count_events(|e| {
            e.op.as_deref() == Some(op)
                && e.event.as_deref() == Some(EVENT_START)
                && e.field(FIELD_SNAPSHOT_PATH) == Some(original_path.as_str())
        });
        assert!(starts >= 1, "{} start should carry the snapshot path", op);
    }

    let loaded = capture.count_events(|e| {
        e.op.as_deref() == Some("load_snapshot")
            && e.event.as_deref() == Some(EVENT_END)
            && e.field(FIELD_NODE_COUNT) == Some("4")
    });
    assert!(loaded >= 2);
}
