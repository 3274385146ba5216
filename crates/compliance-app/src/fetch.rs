use crate::LoadError;
use compliance_core::{Link, LinkKind, RecordSnapshot};
use compliance_storage::{RecordStore, StorageError};
use rayon::prelude::*;

fn link_query(kind: LinkKind) -> &'static str {
    match kind {
        LinkKind::DocumentUseCase => "list_document_use_case_links",
        LinkKind::UseCaseRisk => "list_use_case_risk_links",
        LinkKind::RiskFeature => "list_risk_feature_links",
    }
}

fn checked<T>(query: &'static str, result: Result<T, StorageError>) -> Result<T, LoadError> {
    result.map_err(|source| LoadError { query, source })
}

/// Run the seven list queries in parallel and wait for all of them.
///
/// Any failure fails the whole snapshot. When several queries fail, the one
/// reported is the first in query order, not the first to finish.
pub fn fetch_snapshot(store: &dyn RecordStore) -> Result<RecordSnapshot, LoadError> {
    let (((documents, use_cases), (risk_indicators, features)), links) = rayon::join(
        || {
            rayon::join(
                || rayon::join(|| store.list_documents(), || store.list_use_cases()),
                || rayon::join(|| store.list_risk_indicators(), || store.list_features()),
            )
        },
        || {
            LinkKind::ALL
                .par_iter()
                .map(|kind| (*kind, store.list_links(*kind)))
                .collect::<Vec<(LinkKind, Result<Vec<Link>, StorageError>)>>()
        },
    );

    let mut snapshot = RecordSnapshot {
        documents: checked("list_documents", documents)?,
        use_cases: checked("list_use_cases", use_cases)?,
        risk_indicators: checked("list_risk_indicators", risk_indicators)?,
        features: checked("list_features", features)?,
        ..Default::default()
    };
    for (kind, result) in links {
        *snapshot.links_mut(kind) = checked(link_query(kind), result)?;
    }

    tracing::debug!(
        "Fetched {} records and {} links",
        snapshot.entity_count(),
        snapshot.link_count()
    );
    Ok(snapshot)
}
