use super::*;

pub(super) fn document_from_row(row: &Row) -> rusqlite::Result<Document> {
    Ok(Document {
        id: EntityId(row.get(0)?),
        name: row.get(1)?,
        document_type: row.get(2)?,
        jurisdiction: row.get(3)?,
        url: row.get(4)?,
        description: row.get(5)?,
    })
}

pub(super) fn use_case_from_row(row: &Row) -> rusqlite::Result<UseCase> {
    Ok(UseCase {
        id: EntityId(row.get(0)?),
        name: row.get(1)?,
        description: row.get(2)?,
        status: row.get(3)?,
    })
}

pub(super) fn risk_indicator_from_row(row: &Row) -> Result<RiskIndicator, StorageError> {
    let severity: String = row.get(3)?;
    Ok(RiskIndicator {
        id: EntityId(row.get(0)?),
        name: row.get(1)?,
        description: row.get(2)?,
        severity: severity.parse()?,
    })
}

pub(super) fn feature_from_row(row: &Row) -> rusqlite::Result<Feature> {
    Ok(Feature {
        id: EntityId(row.get(0)?),
        name: row.get(1)?,
        description: row.get(2)?,
        status: row.get(3)?,
    })
}

pub(super) fn link_from_row(row: &Row) -> rusqlite::Result<Link> {
    Ok(Link {
        from_id: EntityId(row.get(0)?),
        to_id: EntityId(row.get(1)?),
    })
}

pub(super) fn severity_db_value(severity: Severity) -> &'static str {
    severity.as_str()
}
