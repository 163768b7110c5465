#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::*;
use oncotree_core::errors::ExErrorKind;
use oncotree_core::report::model::ReportIdentity;
use oncotree_core::{
    prepare, run, AcceptedSink, AlwaysAccept, AlwaysDecline, ChangeReport, NoopSink, Outcome,
    Snapshot, StaticCodeMapping, TaxonomyNode,
};
use proptest::prelude::*;
use std::cell::RefCell;

/// Remembers the ids of every snapshot handed to it
#[derive(Default)]
struct RecordingSink {
    accepted: RefCell<Vec<Vec<String>>>,
}

impl AcceptedSink for RecordingSink {
    fn accept(&self, modified: &Snapshot, _: &ChangeReport) -> oncotree_core::Result<()> {
        let ids = modified
            .working_nodes()
            .map(|n| n.internal_id.clone())
            .collect();
        self.accepted.borrow_mut().push(ids);
        Ok(())
    }
}

fn curated_pair() -> (Vec<TaxonomyNode>, Vec<TaxonomyNode>) {
    let original = base_tree();
    let mut modified = base_tree();
    edit(&mut modified, "ONC000004", |n| n.oncotree_code = "IDC2".to_string());
    modified.retain(|n| n.internal_id != "ONC000003");
    let mut nsclc = new_node("ONC000010", "NSCLC", "Non-Small Cell", "TISSUE");
    nsclc.precursors = "ONC000003".to_string();
    modified.push(nsclc);
    modified.push(new_node("ONC000011", "ILC", "Invasive Lobular Carcinoma", "BREAST"));
    (original, modified)
}

#[test]
fn test_accepted_run_hands_modified_snapshot_to_sink() {
    let fixture = Fixture::new();
    let (original, modified) = curated_pair();
    let sink = RecordingSink::default();

    let outcome = run(
        &fixture.request(&original, &modified),
        &StaticCodeMapping::default(),
        &AlwaysAccept,
        &sink,
    )
    .unwrap();

    assert!(outcome.is_accepted());
    assert_eq!(outcome.report().added.len(), 2);
    let accepted = sink.accepted.borrow();
    assert_eq!(accepted.len(), 1);
    assert!(accepted[0].contains(&"ONC000011".to_string()));
    assert!(!accepted[0].contains(&"ONC000003".to_string()));
}

#[test]
fn test_declined_run_never_reaches_sink() {
    let fixture = Fixture::new();
    let (original, modified) = curated_pair();
    let sink = RecordingSink::default();

    let outcome = run(
        &fixture.request(&original, &modified),
        &StaticCodeMapping::default(),
        &AlwaysDecline,
        &sink,
    )
    .unwrap();

    assert!(matches!(outcome, Outcome::Declined(_)));
    assert_eq!(outcome.report().removed[0].internal_id, "ONC000003");
    assert!(sink.accepted.borrow().is_empty());
}

#[test]
fn test_fatal_stage_surfaces_as_canonical_error() {
    let fixture = Fixture::new();
    let mut request = fixture.request(&base_tree(), &base_tree());
    request.original_path = fixture.dir.path().join("missing.csv");

    let err = run(
        &request,
        &StaticCodeMapping::default(),
        &AlwaysAccept,
        &NoopSink,
    )
    .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Io);
    assert_eq!(err.op(), Some("load_snapshot"));
    assert!(err.snapshot().unwrap().ends_with("missing.csv"));
}

#[test]
fn test_lineage_violation_maps_to_lineage_kind() {
    let fixture = Fixture::new();
    let mut modified = base_tree();
    edit(&mut modified, "ONC000002", |n| n.precursors = "ONC000003".to_string());

    let err = run(
        &fixture.request(&base_tree(), &modified),
        &StaticCodeMapping::default(),
        &AlwaysAccept,
        &NoopSink,
    )
    .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::LineageViolation);
    assert_eq!(err.code(), "ERR_LINEAGE_VIOLATION");
    assert_eq!(err.entity_id(), Some("ONC000003"));
}

#[test]
fn test_unchanged_pair_produces_empty_report() {
    let fixture = Fixture::new();
    let result = prepare(
        &fixture.request(&base_tree(), &base_tree()),
        &StaticCodeMapping::default(),
    )
    .unwrap();
    assert!(result.report.is_unchanged());
    assert_eq!(result.report.report_schema_version, 1);
    assert_eq!(result.report.identity.original_digest.len(), 64);
}

fn without_identity(mut report: ChangeReport) -> ChangeReport {
    report.identity = ReportIdentity {
        original_path: String::new(),
        original_digest: String::new(),
        modified_path: String::new(),
        modified_digest: String::new(),
    };
    report
}

fn curated_original() -> Vec<TaxonomyNode> {
    curated_pair().0
}

fn curated_modified() -> Vec<TaxonomyNode> {
    curated_pair().1
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_report_independent_of_row_order(
        original in Just(curated_original()).prop_shuffle(),
        modified in Just(curated_modified()).prop_shuffle(),
    ) {
        let fixture = Fixture::new();
        let (sorted_original, sorted_modified) = curated_pair();
        let baseline = prepare(
            &fixture.request(&sorted_original, &sorted_modified),
            &StaticCodeMapping::default(),
        )
        .unwrap();

        let shuffled_fixture = Fixture::new();
        let request = shuffled_fixture.request(&original, &modified);
        let first = prepare(&request, &StaticCodeMapping::default()).unwrap();
        let second = prepare(&request, &StaticCodeMapping::default()).unwrap();

        prop_assert_eq!(&first.changes, &second.changes);
        prop_assert_eq!(&first.report, &second.report);
        prop_assert_eq!(&first.changes, &baseline.changes);
        prop_assert_eq!(without_identity(first.report), without_identity(baseline.report));
    }
}
