use crate::{Document, Feature, Link, LinkKind, RiskIndicator, UseCase};
use serde::{Deserialize, Serialize};

/// Everything fetched from the record store for one graph build, in fetch order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    pub documents: Vec<Document>,
    pub use_cases: Vec<UseCase>,
    pub risk_indicators: Vec<RiskIndicator>,
    pub features: Vec<Feature>,
    pub document_use_case_links: Vec<Link>,
    pub use_case_risk_links: Vec<Link>,
    pub risk_feature_links: Vec<Link>,
}

impl RecordSnapshot {
    pub fn links(&self, kind: LinkKind) -> &[Link] {
        match kind {
            LinkKind::DocumentUseCase => &self.document_use_case_links,
            LinkKind::UseCaseRisk => &self.use_case_risk_links,
            LinkKind::RiskFeature => &self.risk_feature_links,
        }
    }

    pub fn links_mut(&mut self, kind: LinkKind) -> &mut Vec<Link> {
        match kind {
            LinkKind::DocumentUseCase => &mut self.document_use_case_links,
            LinkKind::UseCaseRisk => &mut self.use_case_risk_links,
            LinkKind::RiskFeature => &mut self.risk_feature_links,
        }
    }

    pub fn entity_count(&self) -> usize {
        self.documents.len() + self.use_cases.len() + self.risk_indicators.len() + self.features.len()
    }

    pub fn link_count(&self) -> usize {
        LinkKind::ALL.iter().map(|kind| self.links(*kind).len()).sum()
    }
}

/// Totals over the full, unfiltered graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub entity_count: usize,
    pub connection_count: usize,
}
