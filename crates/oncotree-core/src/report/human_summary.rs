//! Human-readable summary renderer for change reports.

use super::model::ChangeReport;

/// Render the text shown to a curator before confirmation.
///
/// Section order is fixed and every section is printed, with `None` when it
/// has no entries.
pub fn render_human_summary(report: &ChangeReport) -> String {
    let mut out = String::new();

    out.push_str("## OncoTree Change Report\n\n");
    out.push_str(&format!(
        "| | File | SHA-256 |\n\
         |---|---|---|\n\
         | Original | `{}` | `{}` |\n\
         | Modified | `{}` | `{}` |\n",
        report.identity.original_path,
        short(&report.identity.original_digest),
        report.identity.modified_path,
        short(&report.identity.modified_digest),
    ));

    section(
        &mut out,
        "Excluded nodes (status is not published)",
        report
            .excluded
            .iter()
            .map(|e| format!("{} in {} file, status '{}'", e.node, e.snapshot, e.status)),
    );

    section(
        &mut out,
        "Removed internal ids",
        report.removed.iter().map(|n| n.to_string()),
    );
    if !report.removed.is_empty() {
        out.push_str("\n****** All removed OncoTree nodes must be manually deleted from Graphite\n");
    }

    section(
        &mut out,
        "New internal ids",
        report.added.iter().map(|a| match &a.parent {
            Some(parent) => format!("{} has parent {}", a.node, parent),
            None => a.node.to_string(),
        }),
    );

    section(
        &mut out,
        "Precursors",
        report
            .precursors
            .iter()
            .map(|p| format!("'{}' ('{}') -> '{}'", p.source_id, p.source_code, p.successor)),
    );

    section(
        &mut out,
        "Revocations",
        report
            .revocations
            .iter()
            .map(|r| format!("'{}' ('{}') -> '{}'", r.source_id, r.source_code, r.successor)),
    );

    out.push_str("\n### Internal ids that changed when no other data has changed\n\n");
    out.push_str("_Are these really new concepts that cover different sets of cancer cases?_\n\n");
    lines(
        &mut out,
        report
            .identity_candidates
            .iter()
            .map(|c| format!("'{}' -> '{}'", c.removed, c.added)),
    );

    out.push_str("\n### Oncotree code/label changes with no internal id change\n\n");
    out.push_str(
        "_This is allowed as long as the new code/label covers the exact same set of cancer cases._\n\n",
    );
    lines(
        &mut out,
        report
            .code_changes
            .iter()
            .map(|c| format!("'{}' -> '{}'", c.original, c.modified)),
    );

    section(
        &mut out,
        "Parent changes",
        report.parent_changes.iter().map(|c| {
            format!(
                "child: '{}' parent: '{}' -> child: '{}' parent: '{}'",
                c.original, c.original_parent_code, c.modified, c.modified_parent_code
            )
        }),
    );

    out
}

fn section(out: &mut String, title: &str, entries: impl Iterator<Item = String>) {
    out.push_str(&format!("\n### {}\n\n", title));
    lines(out, entries);
}

fn lines(out: &mut String, entries: impl Iterator<Item = String>) {
    let mut any = false;
    for entry in entries {
        out.push_str(&format!("- {}\n", entry));
        any = true;
    }
    if !any {
        out.push_str("None\n");
    }
}

fn short(digest: &str) -> &str {
    let end = digest.len().min(12);
    &digest[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SnapshotSchema;
    use crate::report::model::*;

    fn summary(id: &str, code: &str) -> NodeSummary {
        NodeSummary {
            internal_id: id.to_string(),
            oncotree_code: code.to_string(),
            label: format!("{} label", code),
        }
    }

    fn empty() -> ChangeReport {
        ChangeReport {
            report_schema_version: 1,
            identity: ReportIdentity {
                original_path: "original.csv".to_string(),
                original_digest: "a".repeat(64),
                modified_path: "modified.csv".to_string(),
                modified_digest: "b".repeat(64),
            },
            excluded: Vec::new(),
            removed: Vec::new(),
            added: Vec::new(),
            identity_candidates: Vec::new(),
            precursors: Vec::new(),
            revocations: Vec::new(),
            code_changes: Vec::new(),
            parent_changes: Vec::new(),
        }
    }

    #[test]
    fn test_empty_report_prints_none_for_every_section() {
        let s = render_human_summary(&empty());
        assert_eq!(s.matches("None\n").count(), 8);
        assert!(!s.contains("manually deleted"));
        assert!(s.contains(&format!("`{}`", "a".repeat(12))));
    }

    #[test]
    fn test_removed_nodes_carry_manual_delete_reminder() {
        let mut report = empty();
        report.removed.push(summary("ONC5", "OLD"));
        let s = render_human_summary(&report);
        assert!(s.contains("- ONC5: OLD label (OLD)"));
        assert!(s.contains("must be manually deleted from Graphite"));
    }

    #[test]
    fn test_sections_render_in_fixed_order() {
        let mut report = empty();
        report.excluded.push(ExcludedNode {
            snapshot: SnapshotSchema::Modified,
            node: summary("ONC7", "DRAFT"),
            status: "Draft".to_string(),
        });
        report.added.push(AddedNode {
            node: summary("ONC9", "NEW"),
            parent: Some(summary("ONC1", "TISSUE")),
        });
        report.code_changes.push(CodeChangeEntry {
            original: summary("ONC3", "B1"),
            modified: summary("ONC3", "B2"),
        });
        let s = render_human_summary(&report);

        let excluded = s.find("in modified file, status 'Draft'").unwrap();
        let added = s.find("ONC9: NEW label (NEW) has parent ONC1: TISSUE label (TISSUE)").unwrap();
        let code = s.find("'ONC3: B1 label (B1)' -> 'ONC3: B2 label (B2)'").unwrap();
        assert!(excluded < added && added < code);
    }
}
