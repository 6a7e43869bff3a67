//! Smart code normalization and validation
//!
//! A smart code is the hierarchical classification tag attached to every
//! record in the platform: `HERA.<INDUSTRY>.<MODULE>...<KIND>.v<N>`, 6-10
//! dot-separated segments, uppercase except for the trailing lowercase
//! version marker. Malformed codes must never reach storage, so every write
//! passes through [`normalize`] and [`validate`] before persistence.
//!
//! Both functions are pure: malformed input is an expected case and comes
//! back as a structured error, never a panic.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Minimum total segment count, `HERA` and the version marker included.
pub const MIN_SEGMENTS: usize = 6;
/// Maximum total segment count.
pub const MAX_SEGMENTS: usize = 10;

/// Validation failures for a smart code, ordered by the check that tripped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SmartCodeError {
    #[error("smart code is empty")]
    Empty,

    #[error("smart code must have {MIN_SEGMENTS}-{MAX_SEGMENTS} segments, found {found}")]
    SegmentCount { found: usize },

    #[error("smart code version marker must be a lowercase 'v' followed by digits")]
    UppercaseVersion,

    #[error("smart code does not match the HERA.<SEGMENTS>.v<N> pattern")]
    PatternMismatch,
}

/// Result type alias for smart code checks
pub type SmartCodeResult<T> = Result<T, SmartCodeError>;

fn code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^HERA\.[A-Z0-9_]{3,15}(?:\.[A-Z0-9_]{2,30}){3,8}\.v[0-9]+$")
            .expect("smart code pattern is a valid regex")
    })
}

fn uppercase_version_suffix() -> &'static Regex {
    static SUFFIX: OnceLock<Regex> = OnceLock::new();
    SUFFIX.get_or_init(|| {
        Regex::new(r"\.V([0-9]+)$").expect("version suffix pattern is a valid regex")
    })
}

/// Rewrite a trailing uppercase version marker (`.V1`) to the canonical
/// lowercase form (`.v1`). All other casing is left untouched; earlier
/// segments are required to be uppercase already and are the validator's
/// business, not the normalizer's.
pub fn normalize(code: &str) -> String {
    match uppercase_version_suffix().captures(code) {
        Some(caps) => {
            let digits = &caps[1];
            format!("{}.v{}", &code[..caps.get(0).map_or(0, |m| m.start())], digits)
        }
        None => code.to_string(),
    }
}

/// Validate a smart code against the canonical grammar.
///
/// Checks run in order: empty, segment count, version-marker casing, full
/// pattern. The error names the first rule that failed so callers can render
/// an actionable message without re-deriving the reason.
pub fn validate(code: &str) -> SmartCodeResult<()> {
    if code.is_empty() {
        return Err(SmartCodeError::Empty);
    }

    let segments = code.split('.').count();
    if !(MIN_SEGMENTS..=MAX_SEGMENTS).contains(&segments) {
        return Err(SmartCodeError::SegmentCount { found: segments });
    }

    if uppercase_version_suffix().is_match(code) {
        return Err(SmartCodeError::UppercaseVersion);
    }

    if !code_pattern().is_match(code) {
        return Err(SmartCodeError::PatternMismatch);
    }

    Ok(())
}

/// True when the code denotes a general-ledger-affecting transaction class.
pub fn is_gl_code(code: &str) -> bool {
    code.contains(".GL.")
}

/// Segment-by-segment builder for smart codes.
///
/// Builders feed hardcoded constant tables (a seed catalog, a test fixture),
/// so an invalid assembled code is a programming error: [`build`](Self::build)
/// validates and panics on failure. Dynamic callers assembling codes from
/// runtime input should use [`try_build`](Self::try_build) instead.
#[derive(Debug, Clone)]
pub struct SmartCodeBuilder {
    segments: Vec<String>,
    version: u32,
}

impl SmartCodeBuilder {
    /// Start a builder with the industry segment (e.g. `SALON`).
    pub fn new(industry: &str) -> Self {
        Self {
            segments: vec![industry.to_string()],
            version: 1,
        }
    }

    /// Append one classification segment.
    pub fn segment(mut self, segment: &str) -> Self {
        self.segments.push(segment.to_string());
        self
    }

    /// Set the version number (defaults to 1).
    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Assemble and validate the code, returning the structured error on
    /// failure.
    pub fn try_build(self) -> SmartCodeResult<String> {
        let code = format!("HERA.{}.v{}", self.segments.join("."), self.version);
        validate(&code)?;
        Ok(code)
    }

    /// Assemble and validate the code, panicking if the result is invalid.
    pub fn build(self) -> String {
        match self.try_build() {
            Ok(code) => code,
            Err(err) => panic!("smart code builder produced an invalid code: {err}"),
        }
    }
}
