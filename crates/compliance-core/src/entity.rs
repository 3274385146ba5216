//! Typed record payloads carried through graph nodes.

use crate::error::SeverityParseError;
use crate::{EntityId, EntityKind, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A regulatory document (regulation, standard, guideline).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: EntityId,
    pub name: String,
    pub document_type: Option<String>,
    pub jurisdiction: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCase {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = SeverityParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            _ => Err(SeverityParseError::Invalid(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskIndicator {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub severity: Severity,
}

/// A product capability that mitigates one or more risks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
}

/// Any one record, tagged by its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Entity {
    Document(Document),
    UseCase(UseCase),
    RiskIndicator(RiskIndicator),
    Feature(Feature),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Document(_) => EntityKind::Document,
            Entity::UseCase(_) => EntityKind::UseCase,
            Entity::RiskIndicator(_) => EntityKind::RiskIndicator,
            Entity::Feature(_) => EntityKind::Feature,
        }
    }

    pub fn id(&self) -> &EntityId {
        match self {
            Entity::Document(d) => &d.id,
            Entity::UseCase(u) => &u.id,
            Entity::RiskIndicator(r) => &r.id,
            Entity::Feature(f) => &f.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entity::Document(d) => &d.name,
            Entity::UseCase(u) => &u.name,
            Entity::RiskIndicator(r) => &r.name,
            Entity::Feature(f) => &f.name,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Entity::Document(d) => d.description.as_deref(),
            Entity::UseCase(u) => u.description.as_deref(),
            Entity::RiskIndicator(r) => r.description.as_deref(),
            Entity::Feature(f) => f.description.as_deref(),
        }
    }

    pub fn node_id(&self) -> NodeId {
        NodeId::for_entity(self.kind(), self.id())
    }
}

impl From<Document> for Entity {
    fn from(value: Document) -> Self {
        Entity::Document(value)
    }
}

impl From<UseCase> for Entity {
    fn from(value: UseCase) -> Self {
        Entity::UseCase(value)
    }
}

impl From<RiskIndicator> for Entity {
    fn from(value: RiskIndicator) -> Self {
        Entity::RiskIndicator(value)
    }
}

impl From<Feature> for Entity {
    fn from(value: Feature) -> Self {
        Entity::Feature(value)
    }
}
