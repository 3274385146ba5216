use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntityKindParseError {
    #[error("Unknown entity kind: {0}")]
    Unknown(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkKindParseError {
    #[error("Unknown link kind: {0}")]
    Unknown(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeverityParseError {
    #[error("Invalid severity value: {0}")]
    Invalid(String),
}
