//! Supported locales and fixed-shape localized strings.
//!
//! Display names for zones, categories and products are stored in the three
//! storefront languages. [`LocalizedText`] has exactly those three fields and
//! refuses to exist with one of them blank, so rendering code never has to
//! look up a translation by a dynamic key.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A storefront language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Fr,
    En,
    Es,
}

impl Locale {
    /// Every supported locale, default first.
    pub const ALL: [Self; 3] = [Self::Fr, Self::En, Self::Es];

    /// The lowercase language tag.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Fr => "fr",
            Self::En => "en",
            Self::Es => "es",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fr" => Ok(Self::Fr),
            "en" => Ok(Self::En),
            "es" => Ok(Self::Es),
            _ => Err(format!("unsupported locale: {s}")),
        }
    }
}

/// Errors that can occur when building a [`LocalizedText`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LocalizedTextError {
    /// A translation is missing or blank.
    #[error("missing {0} translation")]
    Missing(Locale),
    /// A translation exceeds the maximum length.
    #[error("{locale} translation must be at most {max} characters")]
    TooLong {
        /// Offending locale.
        locale: Locale,
        /// Maximum allowed length.
        max: usize,
    },
}

#[derive(Deserialize)]
struct RawLocalizedText {
    fr: String,
    en: String,
    es: String,
}

/// A display string in every storefront locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawLocalizedText")]
pub struct LocalizedText {
    fr: String,
    en: String,
    es: String,
}

impl LocalizedText {
    /// Maximum length of a single translation, in characters.
    pub const MAX_LENGTH: usize = 200;

    /// Build a localized string, trimming each translation.
    ///
    /// # Errors
    ///
    /// Returns an error if a translation is blank or longer than
    /// [`Self::MAX_LENGTH`] characters.
    pub fn new(
        fr: impl Into<String>,
        en: impl Into<String>,
        es: impl Into<String>,
    ) -> Result<Self, LocalizedTextError> {
        Ok(Self {
            fr: checked(Locale::Fr, fr.into())?,
            en: checked(Locale::En, en.into())?,
            es: checked(Locale::Es, es.into())?,
        })
    }

    /// The translation for `locale`.
    #[must_use]
    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::Fr => &self.fr,
            Locale::En => &self.en,
            Locale::Es => &self.es,
        }
    }
}

impl TryFrom<RawLocalizedText> for LocalizedText {
    type Error = LocalizedTextError;

    fn try_from(raw: RawLocalizedText) -> Result<Self, Self::Error> {
        Self::new(raw.fr, raw.en, raw.es)
    }
}

fn checked(locale: Locale, value: String) -> Result<String, LocalizedTextError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LocalizedTextError::Missing(locale));
    }
    if trimmed.chars().count() > LocalizedText::MAX_LENGTH {
        return Err(LocalizedTextError::TooLong {
            locale,
            max: LocalizedText::MAX_LENGTH,
        });
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_get_each_locale() {
        let text = LocalizedText::new("Livraison", "Delivery", "Entrega").unwrap();
        assert_eq!(text.get(Locale::Fr), "Livraison");
        assert_eq!(text.get(Locale::En), "Delivery");
        assert_eq!(text.get(Locale::Es), "Entrega");
    }

    #[test]
    fn test_blank_translation_rejected() {
        assert_eq!(
            LocalizedText::new("Livraison", "  ", "Entrega"),
            Err(LocalizedTextError::Missing(Locale::En))
        );
    }

    #[test]
    fn test_too_long_rejected() {
        let long = "x".repeat(LocalizedText::MAX_LENGTH + 1);
        assert!(matches!(
            LocalizedText::new(long, "a", "b"),
            Err(LocalizedTextError::TooLong {
                locale: Locale::Fr,
                ..
            })
        ));
    }

    #[test]
    fn test_deserialize_validates() {
        let missing_es = r#"{"fr": "Dakar", "en": "Dakar", "es": ""}"#;
        assert!(serde_json::from_str::<LocalizedText>(missing_es).is_err());

        let ok = r#"{"fr": " Dakar ", "en": "Dakar", "es": "Dakar"}"#;
        let text: LocalizedText = serde_json::from_str(ok).unwrap();
        assert_eq!(text.get(Locale::Fr), "Dakar");
    }

    #[test]
    fn test_locale_from_str() {
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::En);
        assert!("de".parse::<Locale>().is_err());
    }
}
