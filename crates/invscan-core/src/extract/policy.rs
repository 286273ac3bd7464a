//! Line policies deciding what counts as a product number.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::InvscanError;
use crate::models::config::{ExtractionConfig, PolicyKind};

/// Default regex for [`PatternPolicy`]: upper-case alphanumeric groups joined by hyphens.
pub const DEFAULT_PATTERN: &str = r"\b[A-Z0-9]+(?:-[A-Z0-9]+)+\b";

lazy_static! {
    static ref DEFAULT_PATTERN_RE: Regex = Regex::new(DEFAULT_PATTERN).unwrap();
}

/// Decides whether a trimmed OCR line holds a product number.
pub trait ProductNumberPolicy {
    /// The product number found in `line`, if any.
    fn accept(&self, line: &str) -> Option<String>;
}

/// Accepts a whole line containing a hyphen and at least one digit.
///
/// Numbers printed without a hyphen are missed; dates and phone numbers with
/// a hyphen are accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct HyphenDigitPolicy;

impl ProductNumberPolicy for HyphenDigitPolicy {
    fn accept(&self, line: &str) -> Option<String> {
        if line.contains('-') && line.chars().any(|c| c.is_ascii_digit()) {
            Some(line.to_string())
        } else {
            None
        }
    }
}

/// Accepts the first regex match in a line that contains a digit.
#[derive(Debug, Clone)]
pub struct PatternPolicy {
    pattern: Regex,
}

impl PatternPolicy {
    /// Compile a custom pattern.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }
}

impl Default for PatternPolicy {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN_RE.clone(),
        }
    }
}

impl ProductNumberPolicy for PatternPolicy {
    fn accept(&self, line: &str) -> Option<String> {
        self.pattern
            .find_iter(line)
            .map(|m| m.as_str())
            .find(|token| token.chars().any(|c| c.is_ascii_digit()))
            .map(str::to_string)
    }
}

/// Build the policy selected in configuration.
pub fn policy_from_config(
    config: &ExtractionConfig,
) -> Result<Box<dyn ProductNumberPolicy>, InvscanError> {
    match config.policy {
        PolicyKind::HyphenDigit => Ok(Box::new(HyphenDigitPolicy)),
        PolicyKind::Pattern => {
            let policy = PatternPolicy::new(&config.pattern).map_err(|e| {
                InvscanError::Config(format!("invalid extraction.pattern: {}", e))
            })?;
            Ok(Box::new(policy))
        }
    }
}
