//! Storefront locales and bilingual text resolution.
//!
//! The storefront renders in French (the maison's house language) and
//! English. Catalog and journal rows carry both languages side by side;
//! [`LocalizedText`] picks the right one at render time.

use serde::{Deserialize, Serialize};

/// A storefront display locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// French (default).
    #[default]
    Fr,
    /// English.
    En,
}

impl Locale {
    /// Two-letter language tag ("fr" / "en").
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fr => "fr",
            Self::En => "en",
        }
    }

    /// Parse a locale tag. Accepts full tags like "fr-FR" or "en-GB".
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        let primary = tag.split(['-', '_']).next().unwrap_or(tag);
        match primary.to_ascii_lowercase().as_str() {
            "fr" => Some(Self::Fr),
            "en" => Some(Self::En),
            _ => None,
        }
    }

    /// Pick the best locale from an `Accept-Language` header value.
    ///
    /// Walks the comma-separated tags in order and returns the first one the
    /// storefront supports; quality weights are ignored since browsers order
    /// tags by preference anyway.
    #[must_use]
    pub fn from_accept_language(header: &str) -> Option<Self> {
        header
            .split(',')
            .filter_map(|part| part.split(';').next())
            .map(str::trim)
            .find_map(Self::parse)
    }

    /// The other supported locale (used for the language switcher).
    #[must_use]
    pub const fn other(&self) -> Self {
        match self {
            Self::Fr => Self::En,
            Self::En => Self::Fr,
        }
    }
}

impl core::fmt::Display for Locale {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pair of French/English strings resolved by [`Locale`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub fr: String,
    pub en: String,
}

impl LocalizedText {
    /// Create a localized text pair.
    #[must_use]
    pub const fn new(fr: String, en: String) -> Self {
        Self { fr, en }
    }

    /// Resolve the text for a locale, falling back to the other language
    /// when the requested one is empty (editors sometimes publish French
    /// copy before the translation lands).
    #[must_use]
    pub fn resolve(&self, locale: Locale) -> &str {
        let (wanted, fallback) = match locale {
            Locale::Fr => (&self.fr, &self.en),
            Locale::En => (&self.en, &self.fr),
        };
        if wanted.is_empty() { fallback } else { wanted }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_primary_tags() {
        assert_eq!(Locale::parse("fr"), Some(Locale::Fr));
        assert_eq!(Locale::parse("en"), Some(Locale::En));
        assert_eq!(Locale::parse("de"), None);
    }

    #[test]
    fn test_parse_full_tags() {
        assert_eq!(Locale::parse("fr-FR"), Some(Locale::Fr));
        assert_eq!(Locale::parse("en_GB"), Some(Locale::En));
        assert_eq!(Locale::parse("EN-US"), Some(Locale::En));
    }

    #[test]
    fn test_accept_language_picks_first_supported() {
        assert_eq!(
            Locale::from_accept_language("de-DE,de;q=0.9,en;q=0.8"),
            Some(Locale::En)
        );
        assert_eq!(
            Locale::from_accept_language("fr-CA, en;q=0.5"),
            Some(Locale::Fr)
        );
        assert_eq!(Locale::from_accept_language("ja,zh;q=0.9"), None);
    }

    #[test]
    fn test_resolve_falls_back_when_empty() {
        let text = LocalizedText::new("Robe du soir".to_owned(), String::new());
        assert_eq!(text.resolve(Locale::Fr), "Robe du soir");
        assert_eq!(text.resolve(Locale::En), "Robe du soir");

        let both = LocalizedText::new("Manteau".to_owned(), "Coat".to_owned());
        assert_eq!(both.resolve(Locale::En), "Coat");
    }

    #[test]
    fn test_other_flips() {
        assert_eq!(Locale::Fr.other(), Locale::En);
        assert_eq!(Locale::En.other(), Locale::Fr);
    }
}
