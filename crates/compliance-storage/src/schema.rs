use super::*;

const TABLE_STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS document (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        document_type TEXT,
        jurisdiction TEXT,
        url TEXT,
        description TEXT
    )",
    "CREATE TABLE IF NOT EXISTS use_case (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        status TEXT
    )",
    "CREATE TABLE IF NOT EXISTS risk_indicator (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT
    )",
    "CREATE TABLE IF NOT EXISTS feature (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        status TEXT
    )",
    "CREATE TABLE IF NOT EXISTS document_use_case (
        document_id TEXT NOT NULL,
        use_case_id TEXT NOT NULL,
        PRIMARY KEY(document_id, use_case_id),
        FOREIGN KEY(document_id) REFERENCES document(id) ON DELETE CASCADE,
        FOREIGN KEY(use_case_id) REFERENCES use_case(id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS use_case_risk (
        use_case_id TEXT NOT NULL,
        risk_id TEXT NOT NULL,
        PRIMARY KEY(use_case_id, risk_id),
        FOREIGN KEY(use_case_id) REFERENCES use_case(id) ON DELETE CASCADE,
        FOREIGN KEY(risk_id) REFERENCES risk_indicator(id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS risk_feature (
        risk_id TEXT NOT NULL,
        feature_id TEXT NOT NULL,
        PRIMARY KEY(risk_id, feature_id),
        FOREIGN KEY(risk_id) REFERENCES risk_indicator(id) ON DELETE CASCADE,
        FOREIGN KEY(feature_id) REFERENCES feature(id) ON DELETE CASCADE
    )",
];

const INDEX_STATEMENTS: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_document_use_case_target ON document_use_case(use_case_id)",
    "CREATE INDEX IF NOT EXISTS idx_use_case_risk_target ON use_case_risk(risk_id)",
    "CREATE INDEX IF NOT EXISTS idx_risk_feature_target ON risk_feature(feature_id)",
];

pub(super) fn entity_table(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Document => "document",
        EntityKind::UseCase => "use_case",
        EntityKind::RiskIndicator => "risk_indicator",
        EntityKind::Feature => "feature",
    }
}

/// Column names holding the `from` and `to` ids of a link table.
pub(super) fn link_columns(kind: LinkKind) -> (&'static str, &'static str) {
    match kind {
        LinkKind::DocumentUseCase => ("document_id", "use_case_id"),
        LinkKind::UseCaseRisk => ("use_case_id", "risk_id"),
        LinkKind::RiskFeature => ("risk_id", "feature_id"),
    }
}

pub(super) fn create_tables(conn: &Connection) -> Result<(), StorageError> {
    for statement in TABLE_STATEMENTS {
        conn.execute(statement, [])?;
    }
    Ok(())
}

pub(super) fn create_indexes(conn: &Connection) -> Result<(), StorageError> {
    for statement in INDEX_STATEMENTS {
        conn.execute(statement, [])?;
    }
    Ok(())
}

fn schema_version(conn: &Connection) -> Result<u32, StorageError> {
    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(version.max(0) as u32)
}

fn set_schema_version(conn: &Connection, version: u32) -> Result<(), StorageError> {
    conn.pragma_update(None, "user_version", version.to_string())?;
    Ok(())
}

pub(super) fn apply_schema_migrations(conn: &Connection) -> Result<(), StorageError> {
    let stored_version = schema_version(conn)?;

    if stored_version > SCHEMA_VERSION {
        return Err(StorageError::Other(format!(
            "Unsupported database schema version: {stored_version} (max supported: {SCHEMA_VERSION})"
        )));
    }

    if stored_version < 2 {
        migrate_v2_risk_severity(conn)?;
        set_schema_version(conn, 2)?;
        tracing::debug!("Migrated record store schema from v{stored_version} to v2");
    }

    if stored_version < SCHEMA_VERSION {
        set_schema_version(conn, SCHEMA_VERSION)?;
    }
    Ok(())
}

pub(super) fn migrate_v2_risk_severity(conn: &Connection) -> Result<(), StorageError> {
    try_add_column(
        conn,
        "risk_indicator",
        "severity TEXT NOT NULL DEFAULT 'medium'",
    )
}

pub(super) fn try_add_column(
    conn: &Connection,
    table: &str,
    column_sql: &str,
) -> Result<(), StorageError> {
    let column_name = column_sql
        .split_whitespace()
        .next()
        .ok_or_else(|| StorageError::Other("missing column name in migration".to_string()))?;
    let pragma = format!("PRAGMA table_info({table})");
    let mut stmt = conn.prepare(&pragma)?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let existing_name: String = row.get(1)?;
        if existing_name == column_name {
            return Ok(());
        }
    }

    let sql = format!("ALTER TABLE {table} ADD COLUMN {column_sql}");
    conn.execute(&sql, [])?;
    Ok(())
}
