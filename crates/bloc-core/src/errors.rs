//! Error families raised by the generator, the counter and the experiment
//! layer.
//!
//! Each family wraps an [`ErrorInfo`]: a stable code for tests and reports,
//! a message, and key/value context added as the error travels outward.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Code, message and context carried by every [`VoteError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable kebab-case code such as `cohesion-row-sum`.
    pub code: String,
    /// What went wrong.
    pub message: String,
    /// Offending identifiers and values, keyed by role (`bloc`, `slate`, `sum`).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// How to fix it, when there is an obvious fix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Payload without context or hint.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Records `key=value`; a repeated key keeps the latest value.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Attaches a remediation hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.message, self.code)?;
        let mut pairs = self.context.iter();
        if let Some((key, value)) = pairs.next() {
            write!(f, " ({key}={value}")?;
            for (key, value) in pairs {
                write!(f, ", {key}={value}")?;
            }
            f.write_str(")")?;
        }
        match &self.hint {
            Some(hint) => write!(f, "; hint: {hint}"),
            None => Ok(()),
        }
    }
}

/// Every failure the simulator reports.
///
/// Raised where the broken invariant is first observed; nothing downstream
/// recovers from one silently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum VoteError {
    /// A preference interval has a negative, non-finite or all-zero weight.
    #[error("invalid weight: {0}")]
    InvalidWeight(ErrorInfo),
    /// Bloc shares or a cohesion row are negative or do not sum to one.
    #[error("invalid proportion: {0}")]
    InvalidProportion(ErrorInfo),
    /// The seat count cannot be filled from the candidate field.
    #[error("insufficient candidates: {0}")]
    InsufficientCandidates(ErrorInfo),
    /// Every ballot exhausted while seats remained to be filled.
    #[error("tabulation deadlock: {0}")]
    TabulationDeadlock(ErrorInfo),
    /// Structural mismatch between slates, blocs, intervals or ballots.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Serialization, schema and filesystem errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl VoteError {
    /// The payload, whatever the family.
    pub fn info(&self) -> &ErrorInfo {
        let (_, info) = self.parts();
        info
    }

    /// Adds `key=value` to the payload while propagating.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.info_mut().context.insert(key.into(), value.into());
        self
    }

    /// Kebab-case family label used in sweep reports and logs.
    pub fn family(&self) -> &'static str {
        let (family, _) = self.parts();
        family
    }

    fn parts(&self) -> (&'static str, &ErrorInfo) {
        match self {
            Self::InvalidWeight(info) => ("invalid-weight", info),
            Self::InvalidProportion(info) => ("invalid-proportion", info),
            Self::InsufficientCandidates(info) => ("insufficient-candidates", info),
            Self::TabulationDeadlock(info) => ("tabulation-deadlock", info),
            Self::Config(info) => ("config", info),
            Self::Serde(info) => ("serde", info),
        }
    }

    fn info_mut(&mut self) -> &mut ErrorInfo {
        match self {
            Self::InvalidWeight(info)
            | Self::InvalidProportion(info)
            | Self::InsufficientCandidates(info)
            | Self::TabulationDeadlock(info)
            | Self::Config(info)
            | Self::Serde(info) => info,
        }
    }
}
