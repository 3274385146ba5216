use super::*;

fn document(id: &str, name: &str) -> Document {
    Document {
        id: EntityId::new(id),
        name: name.to_string(),
        ..Default::default()
    }
}

fn use_case(id: &str, name: &str) -> UseCase {
    UseCase {
        id: EntityId::new(id),
        name: name.to_string(),
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
        ..Default::default()
    }
}

fn sample_snapshot() -> RecordSnapshot {
    RecordSnapshot {
        documents: vec![document("d1", "GDPR"), document("d2", "AI Act")],
        use_cases: vec![use_case("u1", "Credit scoring")],
        risk_indicators: vec![risk("r1", "Bias", Severity::High)],
        features: vec![feature("f1", "Fairness audit")],
        document_use_case_links: vec![Link::new("d1", "u1"), Link::new("d2", "u1")],
        use_case_risk_links: vec![Link::new("u1", "r1")],
        risk_feature_links: vec![Link::new("r1", "f1")],
    }
}

#[test]
fn test_snapshot_round_trip_preserves_insertion_order() -> Result<(), StorageError> {
    let storage = Storage::new_in_memory()?;
    let snapshot = sample_snapshot();
    storage.insert_snapshot(&snapshot)?;

    let loaded = storage.load_snapshot()?;
    assert_eq!(loaded, snapshot);
    Ok(())
}

#[test]
fn test_insert_existing_id_is_ignored() -> Result<(), StorageError> {
    let storage = Storage::new_in_memory()?;
    storage.insert_entity(&Entity::Document(document("d1", "GDPR")))?;
    storage.insert_entity(&Entity::Document(document("d1", "Renamed")))?;

    let documents = storage.list_documents()?;
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].name, "GDPR");
    Ok(())
}

#[test]
fn test_delete_entity_cascades_to_links() -> Result<(), StorageError> {
    let storage = Storage::new_in_memory()?;
    storage.insert_snapshot(&sample_snapshot())?;

    assert!(storage.delete_entity(EntityKind::UseCase, &EntityId::new("u1"))?);
    assert!(!storage.delete_entity(EntityKind::UseCase, &EntityId::new("u1"))?);

    assert!(storage.list_document_use_case_links()?.is_empty());
    assert!(storage.list_use_case_risk_links()?.is_empty());
    assert_eq!(storage.list_risk_feature_links()?.len(), 1);
    assert_eq!(storage.entity_count(EntityKind::Document)?, 2);
    Ok(())
}

#[test]
fn test_delete_link() -> Result<(), StorageError> {
    let storage = Storage::new_in_memory()?;
    storage.insert_snapshot(&sample_snapshot())?;

    let link = Link::new("d1", "u1");
    assert!(storage.delete_link(LinkKind::DocumentUseCase, &link)?);
    assert!(!storage.delete_link(LinkKind::DocumentUseCase, &link)?);
    assert_eq!(
        storage.list_links(LinkKind::DocumentUseCase)?,
        vec![Link::new("d2", "u1")]
    );
    Ok(())
}

#[test]
fn test_link_to_missing_entity_is_rejected() -> Result<(), StorageError> {
    let storage = Storage::new_in_memory()?;
    storage.insert_entity(&Entity::UseCase(use_case("u1", "Credit scoring")))?;

    let result = storage.insert_link(LinkKind::UseCaseRisk, &Link::new("u1", "missing"));
    assert!(matches!(result, Err(StorageError::Sqlite(_))));
    Ok(())
}

#[test]
fn test_severity_survives_storage() -> Result<(), StorageError> {
    let storage = Storage::new_in_memory()?;
    storage.insert_entity(&Entity::RiskIndicator(risk("r1", "Drift", Severity::Critical)))?;

    let risks = storage.list_risk_indicators()?;
    assert_eq!(risks[0].severity, Severity::Critical);
    Ok(())
}

#[test]
fn test_clear_empties_every_table() -> Result<(), StorageError> {
    let storage = Storage::new_in_memory()?;
    storage.insert_snapshot(&sample_snapshot())?;
    storage.clear()?;

    let loaded = storage.load_snapshot()?;
    assert_eq!(loaded.entity_count(), 0);
    assert_eq!(loaded.link_count(), 0);
    Ok(())
}

#[test]
fn test_open_on_disk_reapplies_schema() -> Result<(), StorageError> {
    let dir = tempfile::tempdir().map_err(|e| StorageError::Other(e.to_string()))?;
    let path = dir.path().join("compliance.db");

    {
        let storage = Storage::open(&path)?;
        storage.insert_snapshot(&sample_snapshot())?;
    }

    let reopened = Storage::open(&path)?;
    assert_eq!(reopened.load_snapshot()?, sample_snapshot());
    Ok(())
}
