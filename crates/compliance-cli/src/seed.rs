use compliance_core::{
    Document, EntityId, Feature, Link, RecordSnapshot, RiskIndicator, Severity, UseCase,
};

fn document(id: &str, name: &str, document_type: &str, jurisdiction: &str) -> Document {
    Document {
        id: EntityId::new(id),
        name: name.to_string(),
        document_type: Some(document_type.to_string()),
        jurisdiction: Some(jurisdiction.to_string()),
        ..Default::default()
    }
}

fn use_case(id: &str, name: &str, status: &str) -> UseCase {
    UseCase {
        id: EntityId::new(id),
        name: name.to_string(),
        status: Some(status.to_string()),
        ..Default::default()
    }
}

fn risk(id: &str, name: &str, severity: Severity) -> RiskIndicator {
    RiskIndicator {
        id: EntityId::new(id),
        name: name.to_string(),
        severity,
        ..Default::default()
    }
}

fn feature(id: &str, name: &str) -> Feature {
    Feature {
        id: EntityId::new(id),
        name: name.to_string(),
        status: Some("planned".to_string()),
        ..Default::default()
    }
}

/// A small but fully connected demo data set.
pub fn demo_snapshot() -> RecordSnapshot {
    RecordSnapshot {
        documents: vec![
            document("gdpr", "GDPR", "regulation", "EU"),
            document("ai-act", "EU AI Act", "regulation", "EU"),
            document("dora", "DORA", "regulation", "EU"),
        ],
        use_cases: vec![
            use_case("credit-scoring", "Credit scoring", "active"),
            use_case("fraud-detection", "Fraud detection", "pilot"),
        ],
        risk_indicators: vec![
            risk("bias", "Discriminatory bias", Severity::High),
            risk("drift", "Model drift", Severity::Medium),
            risk("outage", "Third-party outage", Severity::Critical),
        ],
        features: vec![
            feature("fairness-audit", "Fairness audit"),
            feature("monitoring", "Drift monitoring"),
            feature("failover", "Provider failover"),
        ],
        document_use_case_links: vec![
            Link::new("gdpr", "credit-scoring"),
            Link::new("ai-act", "credit-scoring"),
            Link::new("dora", "fraud-detection"),
        ],
        use_case_risk_links: vec![
            Link::new("credit-scoring", "bias"),
            Link::new("credit-scoring", "drift"),
            Link::new("fraud-detection", "drift"),
            Link::new("fraud-detection", "outage"),
        ],
        risk_feature_links: vec![
            Link::new("bias", "fairness-audit"),
            Link::new("drift", "monitoring"),
            Link::new("outage", "failover"),
        ],
    }
}
