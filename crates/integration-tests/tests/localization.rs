//! Locale resolution as the request pipeline exercises it.

use verlaine_core::{Email, Locale, LocalizedText};

#[test]
fn test_region_tags_resolve_to_base_language() {
    assert_eq!(Locale::parse("fr-FR"), Some(Locale::Fr));
    assert_eq!(Locale::parse("en_GB"), Some(Locale::En));
    assert_eq!(Locale::parse("de"), None);
}

#[test]
fn test_accept_language_picks_first_supported() {
    assert_eq!(
        Locale::from_accept_language("de-DE,de;q=0.9,en;q=0.6"),
        Some(Locale::En)
    );
    assert_eq!(
        Locale::from_accept_language("fr-CA,fr;q=0.9,en;q=0.8"),
        Some(Locale::Fr)
    );
    assert_eq!(Locale::from_accept_language("ja,zh;q=0.9"), None);
}

#[test]
fn test_localized_text_falls_back_across_languages() {
    let text = LocalizedText::new("Manteau".into(), String::new());

    assert_eq!(text.resolve(Locale::Fr), "Manteau");
    // Missing English copy falls back to French rather than rendering blank
    assert_eq!(text.resolve(Locale::En), "Manteau");
}

#[test]
fn test_identification_email_is_normalized() {
    let email = Email::parse("Camille.Moreau@Example.FR").expect("valid email");
    assert_eq!(email.as_str(), "camille.moreau@example.fr");
    assert_eq!(email.domain(), "example.fr");
}
