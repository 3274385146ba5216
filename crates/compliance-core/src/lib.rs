use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod entity;
pub mod error;
pub mod snapshot;

pub use entity::{Document, Entity, Feature, RiskIndicator, Severity, UseCase};
pub use error::{EntityKindParseError, LinkKindParseError, SeverityParseError};
pub use snapshot::{GraphStats, RecordSnapshot};

/// Identifier of a stored record, as handed out by the record store.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh identifier for a record that has not been stored yet.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Blank ids come from half-written rows and never make it into a graph.
    pub fn is_valid(&self) -> bool {
        !self.0.trim().is_empty()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Graph node identifier, derived from the entity kind and the record id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn for_entity(kind: EntityKind, id: &EntityId) -> Self {
        Self(format!("{}-{}", kind.node_prefix(), id.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

impl EdgeId {
    /// Edge ids depend only on their endpoints so re-deriving a graph is idempotent.
    ///
    /// Node ids contain dashes, so the source is length-prefixed to keep the
    /// split point unambiguous: `doc-a-uc -> uc-b` and `doc-a -> uc-uc-b` stay
    /// distinct.
    pub fn between(source: &NodeId, target: &NodeId) -> Self {
        Self(format!("e-{}-{}-{}", source.0.len(), source.0, target.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The four managed record types, in dependency-chain order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Document,
    UseCase,
    RiskIndicator,
    Feature,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Document,
        EntityKind::UseCase,
        EntityKind::RiskIndicator,
        EntityKind::Feature,
    ];

    /// 1-based ring number, innermost first.
    pub fn ring_index(self) -> usize {
        match self {
            EntityKind::Document => 1,
            EntityKind::UseCase => 2,
            EntityKind::RiskIndicator => 3,
            EntityKind::Feature => 4,
        }
    }

    pub fn node_prefix(self) -> &'static str {
        match self {
            EntityKind::Document => "doc",
            EntityKind::UseCase => "uc",
            EntityKind::RiskIndicator => "risk",
            EntityKind::Feature => "feature",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Document => "document",
            EntityKind::UseCase => "use-case",
            EntityKind::RiskIndicator => "risk",
            EntityKind::Feature => "feature",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = EntityKindParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "document" | "documents" | "doc" => Ok(EntityKind::Document),
            "use-case" | "use_case" | "usecase" | "use-cases" | "uc" => Ok(EntityKind::UseCase),
            "risk" | "risks" | "risk-indicator" | "risk_indicator" => {
                Ok(EntityKind::RiskIndicator)
            }
            "feature" | "features" => Ok(EntityKind::Feature),
            _ => Err(EntityKindParseError::Unknown(value.to_string())),
        }
    }
}

/// The three typed associations between adjacent kinds of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkKind {
    DocumentUseCase,
    UseCaseRisk,
    RiskFeature,
}

impl LinkKind {
    pub const ALL: [LinkKind; 3] = [
        LinkKind::DocumentUseCase,
        LinkKind::UseCaseRisk,
        LinkKind::RiskFeature,
    ];

    /// Kinds of the `from` and `to` side of a link row.
    pub fn endpoints(self) -> (EntityKind, EntityKind) {
        match self {
            LinkKind::DocumentUseCase => (EntityKind::Document, EntityKind::UseCase),
            LinkKind::UseCaseRisk => (EntityKind::UseCase, EntityKind::RiskIndicator),
            LinkKind::RiskFeature => (EntityKind::RiskIndicator, EntityKind::Feature),
        }
    }

    pub fn table_name(self) -> &'static str {
        match self {
            LinkKind::DocumentUseCase => "document_use_case",
            LinkKind::UseCaseRisk => "use_case_risk",
            LinkKind::RiskFeature => "risk_feature",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LinkKind::DocumentUseCase => "document-use-case",
            LinkKind::UseCaseRisk => "use-case-risk",
            LinkKind::RiskFeature => "risk-feature",
        }
    }

    /// Link kind joining two entity kinds, in either order.
    pub fn connecting(a: EntityKind, b: EntityKind) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| {
            let (from, to) = kind.endpoints();
            (from == a && to == b) || (from == b && to == a)
        })
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkKind {
    type Err = LinkKindParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "document-use-case" => Ok(LinkKind::DocumentUseCase),
            "use-case-risk" => Ok(LinkKind::UseCaseRisk),
            "risk-feature" => Ok(LinkKind::RiskFeature),
            _ => Err(LinkKindParseError::Unknown(value.to_string())),
        }
    }
}

/// One row of a link table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub from_id: EntityId,
    pub to_id: EntityId,
}

impl Link {
    pub fn new(from_id: impl Into<String>, to_id: impl Into<String>) -> Self {
        Self {
            from_id: EntityId(from_id.into()),
            to_id: EntityId(to_id.into()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.from_id.is_valid() && self.to_id.is_valid()
    }
}
