use compliance_core::{Document, EntityId, Feature, Link, RecordSnapshot, RiskIndicator, UseCase};

/// A snapshot with `per_kind` records of each kind. Every record links to
/// two records of the next kind, wrapping around, so the graph is dense
/// enough to exercise handle computation.
pub fn synthetic_snapshot(per_kind: usize) -> RecordSnapshot {
    let id = |prefix: &str, i: usize| EntityId(format!("{prefix}{i}"));
    let mut snapshot = RecordSnapshot::default();

    for i in 0..per_kind {
        snapshot.documents.push(Document {
            id: id("d", i),
            name: format!("Regulation {i}"),
            ..Default::default()
        });
        snapshot.use_cases.push(UseCase {
            id: id("u", i),
            name: format!("Use case {i}"),
            ..Default::default()
        });
        snapshot.risk_indicators.push(RiskIndicator {
            id: id("r", i),
            name: format!("Risk {i}"),
            ..Default::default()
        });
        snapshot.features.push(Feature {
            id: id("f", i),
            name: format!("Feature {i}"),
            ..Default::default()
        });
    }

    if per_kind == 0 {
        return snapshot;
    }
    for i in 0..per_kind {
        for step in [0, 1] {
            let j = (i + step) % per_kind;
            snapshot
                .document_use_case_links
                .push(Link::new(format!("d{i}"), format!("u{j}")));
            snapshot
                .use_case_risk_links
                .push(Link::new(format!("u{i}"), format!("r{j}")));
            snapshot
                .risk_feature_links
                .push(Link::new(format!("r{i}"), format!("f{j}")));
        }
    }
    snapshot
}
