use compliance_core::{
    Document, Entity, EntityId, EntityKind, Feature, Link, LinkKind, RecordSnapshot,
    RiskIndicator, Severity, SeverityParseError, UseCase,
};
use parking_lot::Mutex;
use rusqlite::{Connection, Row, params};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

mod row_mapping;
mod schema;

const SCHEMA_VERSION: u32 = 2;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Invalid stored value: {0}")]
    InvalidValue(#[from] SeverityParseError),
    #[error("Other error: {0}")]
    Other(String),
}

/// The record store the graph view reads from.
///
/// Every query is a plain "select all rows"; callers must not assume any
/// referential integrity between the entity lists and the link lists.
pub trait RecordStore: Send + Sync {
    fn list_documents(&self) -> Result<Vec<Document>, StorageError>;
    fn list_use_cases(&self) -> Result<Vec<UseCase>, StorageError>;
    fn list_risk_indicators(&self) -> Result<Vec<RiskIndicator>, StorageError>;
    fn list_features(&self) -> Result<Vec<Feature>, StorageError>;
    fn list_links(&self, kind: LinkKind) -> Result<Vec<Link>, StorageError>;

    fn insert_entity(&self, entity: &Entity) -> Result<(), StorageError>;
    /// Returns whether a row was removed.
    fn delete_entity(&self, kind: EntityKind, id: &EntityId) -> Result<bool, StorageError>;
    fn insert_link(&self, kind: LinkKind, link: &Link) -> Result<(), StorageError>;
    fn delete_link(&self, kind: LinkKind, link: &Link) -> Result<bool, StorageError>;

    fn list_document_use_case_links(&self) -> Result<Vec<Link>, StorageError> {
        self.list_links(LinkKind::DocumentUseCase)
    }

    fn list_use_case_risk_links(&self) -> Result<Vec<Link>, StorageError> {
        self.list_links(LinkKind::UseCaseRisk)
    }

    fn list_risk_feature_links(&self) -> Result<Vec<Link>, StorageError> {
        self.list_links(LinkKind::RiskFeature)
    }
}

/// SQLite-backed record store.
pub struct Storage {
    conn: Mutex<Connection>,
}

impl Storage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        let _ = conn.busy_timeout(Duration::from_millis(2_500));
        let _ = conn.pragma_update(None, "foreign_keys", "ON");
        let _ = conn.pragma_update(None, "journal_mode", "WAL");
        let _ = conn.pragma_update(None, "synchronous", "NORMAL");
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.init()?;
        Ok(storage)
    }

    pub fn new_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let _ = conn.pragma_update(None, "foreign_keys", "ON");
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.init()?;
        Ok(storage)
    }

    fn init(&self) -> Result<(), StorageError> {
        let conn = self.conn.lock();
        schema::create_tables(&conn)?;
        schema::create_indexes(&conn)?;
        schema::apply_schema_migrations(&conn)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        let conn = self.conn.lock();
        let tx = conn.unchecked_transaction()?;
        for kind in LinkKind::ALL {
            tx.execute(&format!("DELETE FROM {}", kind.table_name()), [])?;
        }
        for kind in EntityKind::ALL {
            tx.execute(&format!("DELETE FROM {}", schema::entity_table(kind)), [])?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Insert a batch of records and links in one transaction.
    ///
    /// Entities go in before links so the link foreign keys resolve.
    pub fn insert_snapshot(&self, snapshot: &RecordSnapshot) -> Result<(), StorageError> {
        let conn = self.conn.lock();
        let tx = conn.unchecked_transaction()?;
        for document in &snapshot.documents {
            Self::insert_entity_with(&tx, &Entity::Document(document.clone()))?;
        }
        for use_case in &snapshot.use_cases {
            Self::insert_entity_with(&tx, &Entity::UseCase(use_case.clone()))?;
        }
        for risk in &snapshot.risk_indicators {
            Self::insert_entity_with(&tx, &Entity::RiskIndicator(risk.clone()))?;
        }
        for feature in &snapshot.features {
            Self::insert_entity_with(&tx, &Entity::Feature(feature.clone()))?;
        }
        for kind in LinkKind::ALL {
            for link in snapshot.links(kind) {
                Self::insert_link_with(&tx, kind, link)?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Read every table sequentially.
    pub fn load_snapshot(&self) -> Result<RecordSnapshot, StorageError> {
        Ok(RecordSnapshot {
            documents: self.list_documents()?,
            use_cases: self.list_use_cases()?,
            risk_indicators: self.list_risk_indicators()?,
            features: self.list_features()?,
            document_use_case_links: self.list_links(LinkKind::DocumentUseCase)?,
            use_case_risk_links: self.list_links(LinkKind::UseCaseRisk)?,
            risk_feature_links: self.list_links(LinkKind::RiskFeature)?,
        })
    }

    pub fn entity_count(&self, kind: EntityKind) -> Result<i64, StorageError> {
        let conn = self.conn.lock();
        let sql = format!("SELECT count(*) FROM {}", schema::entity_table(kind));
        let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count)
    }

    fn insert_entity_with(conn: &Connection, entity: &Entity) -> Result<(), StorageError> {
        match entity {
            Entity::Document(d) => conn.execute(
                "INSERT INTO document (id, name, document_type, jurisdiction, url, description)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6) ON CONFLICT(id) DO NOTHING",
                params![
                    d.id.0,
                    d.name,
                    d.document_type,
                    d.jurisdiction,
                    d.url,
                    d.description
                ],
            )?,
            Entity::UseCase(u) => conn.execute(
                "INSERT INTO use_case (id, name, description, status)
                 VALUES (?1, ?2, ?3, ?4) ON CONFLICT(id) DO NOTHING",
                params![u.id.0, u.name, u.description, u.status],
            )?,
            Entity::RiskIndicator(r) => conn.execute(
                "INSERT INTO risk_indicator (id, name, description, severity)
                 VALUES (?1, ?2, ?3, ?4) ON CONFLICT(id) DO NOTHING",
                params![
                    r.id.0,
                    r.name,
                    r.description,
                    row_mapping::severity_db_value(r.severity)
                ],
            )?,
            Entity::Feature(f) => conn.execute(
                "INSERT INTO feature (id, name, description, status)
                 VALUES (?1, ?2, ?3, ?4) ON CONFLICT(id) DO NOTHING",
                params![f.id.0, f.name, f.description, f.status],
            )?,
        };
        Ok(())
    }

    fn insert_link_with(conn: &Connection, kind: LinkKind, link: &Link) -> Result<(), StorageError> {
        let (from_col, to_col) = schema::link_columns(kind);
        let sql = format!(
            "INSERT OR IGNORE INTO {} ({from_col}, {to_col}) VALUES (?1, ?2)",
            kind.table_name()
        );
        conn.execute(&sql, params![link.from_id.0, link.to_id.0])?;
        Ok(())
    }

    fn query_rows<T, F>(&self, sql: &str, map: F) -> Result<Vec<T>, StorageError>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map([], map)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

impl RecordStore for Storage {
    fn list_documents(&self) -> Result<Vec<Document>, StorageError> {
        self.query_rows(
            "SELECT id, name, document_type, jurisdiction, url, description
             FROM document ORDER BY rowid",
            row_mapping::document_from_row,
        )
    }

    fn list_use_cases(&self) -> Result<Vec<UseCase>, StorageError> {
        self.query_rows(
            "SELECT id, name, description, status FROM use_case ORDER BY rowid",
            row_mapping::use_case_from_row,
        )
    }

    fn list_risk_indicators(&self) -> Result<Vec<RiskIndicator>, StorageError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, name, description, severity FROM risk_indicator ORDER BY rowid",
        )?;
        let mut rows = stmt.query([])?;
        let mut risks = Vec::new();
        while let Some(row) = rows.next()? {
            risks.push(row_mapping::risk_indicator_from_row(row)?);
        }
        Ok(risks)
    }

    fn list_features(&self) -> Result<Vec<Feature>, StorageError> {
        self.query_rows(
            "SELECT id, name, description, status FROM feature ORDER BY rowid",
            row_mapping::feature_from_row,
        )
    }

    fn list_links(&self, kind: LinkKind) -> Result<Vec<Link>, StorageError> {
        let (from_col, to_col) = schema::link_columns(kind);
        let sql = format!(
            "SELECT {from_col}, {to_col} FROM {} ORDER BY rowid",
            kind.table_name()
        );
        self.query_rows(&sql, row_mapping::link_from_row)
    }

    fn insert_entity(&self, entity: &Entity) -> Result<(), StorageError> {
        let conn = self.conn.lock();
        Self::insert_entity_with(&conn, entity)
    }

    fn delete_entity(&self, kind: EntityKind, id: &EntityId) -> Result<bool, StorageError> {
        let conn = self.conn.lock();
        let sql = format!("DELETE FROM {} WHERE id = ?1", schema::entity_table(kind));
        let removed = conn.execute(&sql, params![id.0])?;
        Ok(removed > 0)
    }

    fn insert_link(&self, kind: LinkKind, link: &Link) -> Result<(), StorageError> {
        let conn = self.conn.lock();
        Self::insert_link_with(&conn, kind, link)
    }

    fn delete_link(&self, kind: LinkKind, link: &Link) -> Result<bool, StorageError> {
        let conn = self.conn.lock();
        let (from_col, to_col) = schema::link_columns(kind);
        let sql = format!(
            "DELETE FROM {} WHERE {from_col} = ?1 AND {to_col} = ?2",
            kind.table_name()
        );
        let removed = conn.execute(&sql, params![link.from_id.0, link.to_id.0])?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests;
