//! Error types for the Lattica modeling toolkit.
//!
//! One enum per failure domain: [`CoreError`] for setup and runtime
//! failures raised by the core itself, [`RuleError`] for failures
//! raised inside user-supplied rules and wrapped by the engine.

use crate::id::Position;
use std::error::Error;
use std::fmt;

/// Errors raised by the core subsystems.
///
/// Setup errors (`InvalidConfig`, `GridTooSmall`, `Unsupported`) surface
/// from constructors and are fatal for the run. Runtime errors surface
/// from manager or engine operations; callers may catch and continue.
#[derive(Clone, Debug, PartialEq)]
pub enum CoreError {
    /// Missing or malformed configuration at setup.
    InvalidConfig {
        /// The configuration key (or component) at fault.
        key: String,
        /// What went wrong.
        reason: String,
    },
    /// Periodic grid shape below the minimum for the requested
    /// neighborhood distance (`min_i shape[i] >= 2*distance + 1`).
    GridTooSmall {
        /// The grid shape that was too small.
        shape: Vec<usize>,
        /// The requested neighborhood distance.
        distance: u32,
        /// The minimum per-axis cell count required.
        required: usize,
    },
    /// Chosen neighborhood unsupported for the grid's dimensionality
    /// or tessellation.
    Unsupported {
        /// The unsupported combination.
        what: String,
        /// Why it is unsupported.
        reason: String,
    },
    /// Attempted to place an agent outside a non-periodic space.
    OutOfSpace {
        /// The offending position.
        pos: Position,
        /// The space extent.
        extent: Position,
    },
    /// A void rule supplied to a synchronous update pass.
    InvalidRule {
        /// Why the rule was rejected.
        reason: String,
    },
    /// Zipped rule application with container size disagreement, or a
    /// bulk loader column of the wrong length.
    LengthMismatch {
        /// Expected number of elements.
        expected: usize,
        /// Actual number of elements.
        got: usize,
    },
    /// A bulk state loader saw a value outside the mapper's domain.
    InvalidValue {
        /// The offending value, rendered for the message.
        value: String,
        /// Description of the accepted domain.
        domain: String,
    },
    /// A named selection or configuration mode is not known.
    UnknownMode {
        /// The unrecognized mode name.
        mode: String,
        /// The known mode names.
        known: &'static [&'static str],
    },
    /// A user rule failed; the pass was aborted.
    RuleFailed(RuleError),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { key, reason } => {
                write!(f, "invalid configuration for '{key}': {reason}")
            }
            Self::GridTooSmall {
                shape,
                distance,
                required,
            } => write!(
                f,
                "grid shape {shape:?} too small for neighborhood distance {distance}: \
                 every axis needs at least {required} cells"
            ),
            Self::Unsupported { what, reason } => {
                write!(f, "unsupported: {what} ({reason})")
            }
            Self::OutOfSpace { pos, extent } => write!(
                f,
                "position {pos:?} lies outside the non-periodic space with extent {extent:?}"
            ),
            Self::InvalidRule { reason } => write!(f, "invalid rule: {reason}"),
            Self::LengthMismatch { expected, got } => {
                write!(f, "length mismatch: expected {expected}, got {got}")
            }
            Self::InvalidValue { value, domain } => {
                write!(f, "value '{value}' outside the accepted domain: {domain}")
            }
            Self::UnknownMode { mode, known } => {
                write!(f, "unknown mode '{mode}'; known modes: {known:?}")
            }
            Self::RuleFailed(reason) => write!(f, "rule failed: {reason}"),
        }
    }
}

impl Error for CoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::RuleFailed(reason) => Some(reason),
            _ => None,
        }
    }
}

impl From<RuleError> for CoreError {
    fn from(e: RuleError) -> Self {
        Self::RuleFailed(e)
    }
}

/// An error raised inside a user-supplied rule.
///
/// Rules return `Result<_, RuleError>`; the engine aborts the current
/// pass on the first error and wraps it in [`CoreError::RuleFailed`].
/// In a synchronous pass the staged buffer is discarded (no state
/// change); in an asynchronous pass updates already committed persist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleError {
    /// Human-readable description of the failure.
    pub reason: String,
}

impl RuleError {
    /// Create a rule error from any displayable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl Error for RuleError {}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn display_names_the_offending_key() {
        let e = CoreError::InvalidConfig {
            key: "space.extent".into(),
            reason: "components must be positive".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("space.extent"));
        assert!(msg.contains("positive"));
    }

    #[test]
    fn display_reports_coordinates() {
        let e = CoreError::OutOfSpace {
            pos: smallvec![3.0, -1.0],
            extent: smallvec![2.0, 2.0],
        };
        let msg = e.to_string();
        assert!(msg.contains("3.0"));
        assert!(msg.contains("-1.0"));
    }

    #[test]
    fn rule_error_chains_as_source() {
        let e = CoreError::RuleFailed(RuleError::new("division by zero"));
        let source = std::error::Error::source(&e).expect("source");
        assert_eq!(source.to_string(), "division by zero");
    }
}
