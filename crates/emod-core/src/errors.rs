//! Structured error types shared across the EMOD toolkit crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`EmodError`] variant: a stable
/// machine readable code, a human readable message, and whatever context the
/// failing builder had at hand (parameter names, received values).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,
    /// Optional remediation hint surfaced after the context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Records one context entry; later entries with the same key win.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Renders as `message [code] {key=value, ...}; hint`.
impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.message, self.code)?;
        if !self.context.is_empty() {
            f.write_str(" {")?;
            let mut sep = "";
            for (key, value) in &self.context {
                write!(f, "{sep}{key}={value}")?;
                sep = ", ";
            }
            f.write_str("}")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, "; {hint}")?;
        }
        Ok(())
    }
}

/// Canonical error type for the EMOD configuration toolkit.
///
/// Builder functions take many optional parameters, so every variant keeps
/// the offending parameter name and value in its [`ErrorInfo`] context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum EmodError {
    /// Assignment of an undeclared field or use of a class absent from the
    /// loaded schema.
    #[error("schema error: {0}")]
    Schema(ErrorInfo),
    /// An enumerated or bounded parameter outside its declared value set.
    #[error("argument error: {0}")]
    Argument(ErrorInfo),
    /// Campaign document assembly errors.
    #[error("campaign error: {0}")]
    Campaign(ErrorInfo),
    /// Demographics document assembly errors.
    #[error("demographics error: {0}")]
    Demographics(ErrorInfo),
    /// Sweep expansion and run materialization errors.
    #[error("sweep error: {0}")]
    Sweep(ErrorInfo),
    /// File and serialization errors.
    #[error("io error: {0}")]
    Io(ErrorInfo),
}

impl EmodError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            EmodError::Schema(info)
            | EmodError::Argument(info)
            | EmodError::Campaign(info)
            | EmodError::Demographics(info)
            | EmodError::Sweep(info)
            | EmodError::Io(info) => info,
        }
    }

    /// Shorthand for the payload's stable code.
    pub fn code(&self) -> &str {
        &self.info().code
    }
}
