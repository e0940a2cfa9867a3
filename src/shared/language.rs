use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Supported language codes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Language {
    #[default]
    #[serde(rename = "en_GB")]
    English,
    #[serde(rename = "zh_CN")]
    Chinese,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Chinese];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "en_GB",
            Language::Chinese => "zh_CN",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported language code '{0}'")]
pub struct UnsupportedLanguage(pub String);

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|language| language.as_str() == s)
            .ok_or_else(|| UnsupportedLanguage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_supported_codes() {
        assert_eq!("en_GB".parse::<Language>(), Ok(Language::English));
        assert_eq!("zh_CN".parse::<Language>(), Ok(Language::Chinese));
    }

    #[test]
    fn test_parse_rejects_unknown_code() {
        let err = "fr_FR".parse::<Language>().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported language code 'fr_FR'");
        // codes are case sensitive
        assert!("en_gb".parse::<Language>().is_err());
    }

    #[test]
    fn test_default_is_english() {
        assert_eq!(Language::default(), Language::English);
    }

    #[test]
    fn test_serde_uses_language_code() {
        assert_eq!(
            serde_json::to_string(&Language::Chinese).unwrap(),
            "\"zh_CN\""
        );
        let parsed: Language = serde_json::from_str("\"en_GB\"").unwrap();
        assert_eq!(parsed, Language::English);
    }
}
