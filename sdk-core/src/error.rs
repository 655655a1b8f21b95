//! Adpolicy error types

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdPolicyError {
    #[error("invalid password input: {0}")]
    InvalidPassword(&'static str),

    #[error("hash primitive failure: {0}")]
    HashPrimitive(&'static str),

    #[error("directory source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("malformed attribute {attribute}: [{value}]")]
    MalformedAttribute { attribute: String, value: String },

    #[error("password settings fail referential integrity")]
    InvalidSettings,
}

pub type Result<T> = std::result::Result<T, AdPolicyError>;
