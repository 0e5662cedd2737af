// ABOUTME: Supported output languages for model prompts and localized fallback text
// ABOUTME: Fixed locale table mapping short codes to display language names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Output language of analysis results
///
/// Unknown codes resolve to English; region suffixes (`fa-IR`, `en_US`) are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Locale {
    /// Persian
    Fa,
    /// English
    #[default]
    En,
    /// Arabic
    Ar,
    /// Turkish
    Tr,
    /// German
    De,
    /// French
    Fr,
    /// Spanish
    Es,
}

impl Locale {
    /// Every supported locale, in table order
    pub const ALL: [Self; 7] = [
        Self::Fa,
        Self::En,
        Self::Ar,
        Self::Tr,
        Self::De,
        Self::Fr,
        Self::Es,
    ];

    /// Resolve a locale tag, defaulting to English for anything unknown
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        let primary = code
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match primary.as_str() {
            "fa" => Self::Fa,
            "ar" => Self::Ar,
            "tr" => Self::Tr,
            "de" => Self::De,
            "fr" => Self::Fr,
            "es" => Self::Es,
            _ => Self::En,
        }
    }

    /// Short ISO 639-1 code
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Fa => "fa",
            Self::En => "en",
            Self::Ar => "ar",
            Self::Tr => "tr",
            Self::De => "de",
            Self::Fr => "fr",
            Self::Es => "es",
        }
    }

    /// Language name used inside prompts ("respond in ...")
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Fa => "Persian (fa-IR)",
            Self::En => "English",
            Self::Ar => "Arabic",
            Self::Tr => "Turkish",
            Self::De => "German",
            Self::Fr => "French",
            Self::Es => "Spanish",
        }
    }

    /// Whether text in this locale is written right-to-left
    #[must_use]
    pub const fn is_rtl(&self) -> bool {
        matches!(self, Self::Fa | Self::Ar)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Locale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Self::from_code(&code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_known_and_regional() {
        assert_eq!(Locale::from_code("fa"), Locale::Fa);
        assert_eq!(Locale::from_code("fa-IR"), Locale::Fa);
        assert_eq!(Locale::from_code("DE_at"), Locale::De);
        assert_eq!(Locale::from_code(" es "), Locale::Es);
    }

    #[test]
    fn test_unknown_defaults_to_english() {
        assert_eq!(Locale::from_code("jp"), Locale::En);
        assert_eq!(Locale::from_code(""), Locale::En);
        assert_eq!(Locale::from_code("xx").display_name(), "English");
    }

    #[test]
    fn test_codes_round_trip_through_table() {
        for locale in Locale::ALL {
            assert_eq!(Locale::from_code(locale.code()), locale);
        }
    }
}
