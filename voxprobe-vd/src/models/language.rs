//! Closed set of languages accepted by the detection endpoints
//!
//! Names are matched exactly (case-sensitive), as clients send them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages the service accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupportedLanguage {
    Tamil,
    English,
    Hindi,
    Malayalam,
    Telugu,
}

impl SupportedLanguage {
    pub const ALL: [SupportedLanguage; 5] = [
        SupportedLanguage::Tamil,
        SupportedLanguage::English,
        SupportedLanguage::Hindi,
        SupportedLanguage::Malayalam,
        SupportedLanguage::Telugu,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SupportedLanguage::Tamil => "Tamil",
            SupportedLanguage::English => "English",
            SupportedLanguage::Hindi => "Hindi",
            SupportedLanguage::Malayalam => "Malayalam",
            SupportedLanguage::Telugu => "Telugu",
        }
    }

    /// Comma-separated list used in rejection messages
    pub fn choices() -> String {
        Self::ALL
            .iter()
            .map(|l| l.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejection for a language outside the supported set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported language. Choose from: {}", SupportedLanguage::choices())]
pub struct UnsupportedLanguage(pub String);

impl FromStr for SupportedLanguage {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| UnsupportedLanguage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_supported_language() {
        for lang in SupportedLanguage::ALL {
            assert_eq!(lang.as_str().parse::<SupportedLanguage>(), Ok(lang));
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("english".parse::<SupportedLanguage>().is_err());
        assert!("TAMIL".parse::<SupportedLanguage>().is_err());
    }

    #[test]
    fn test_unsupported_language_message_lists_choices() {
        let err = "French".parse::<SupportedLanguage>().unwrap_err();
        assert_eq!(err.0, "French");
        assert_eq!(
            err.to_string(),
            "Unsupported language. Choose from: Tamil, English, Hindi, Malayalam, Telugu"
        );
    }
}
