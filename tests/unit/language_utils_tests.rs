/*!
 * Tests for language utility functions
 */

use stjcheck::language_utils::{
    LanguageCodeType, get_language_name, language_codes_match, language_identity, part1_equivalent,
    preferred_code, validate_language_code,
};

/// Test validation of language codes
#[test]
fn test_validate_language_code_withValidCodes_shouldReturnCorrectType() {
    // ISO 639-1 tests
    assert!(matches!(validate_language_code("en").unwrap(), LanguageCodeType::Part1));
    assert!(matches!(validate_language_code("fr").unwrap(), LanguageCodeType::Part1));
    assert!(matches!(validate_language_code("de").unwrap(), LanguageCodeType::Part1));

    // ISO 639-3 tests
    assert!(matches!(validate_language_code("eng").unwrap(), LanguageCodeType::Part3));
    assert!(matches!(validate_language_code("fra").unwrap(), LanguageCodeType::Part3));
    assert!(matches!(validate_language_code("yue").unwrap(), LanguageCodeType::Part3));

    // Surrounding whitespace is ignored
    assert!(matches!(validate_language_code(" en ").unwrap(), LanguageCodeType::Part1));
}

#[test]
fn test_validate_language_code_withInvalidCodes_shouldFail() {
    assert!(validate_language_code("xx").is_err());
    assert!(validate_language_code("123").is_err());
    assert!(validate_language_code("e").is_err());
    assert!(validate_language_code("english").is_err());
    assert!(validate_language_code("").is_err());
}

#[test]
fn test_validate_language_code_withUppercase_shouldFail() {
    assert!(validate_language_code("EN").is_err());
    assert!(validate_language_code("ENG").is_err());
}

#[test]
fn test_part1_equivalent_withThreeLetterCodes_shouldMapWhenAvailable() {
    assert_eq!(part1_equivalent("eng"), Some("en"));
    assert_eq!(part1_equivalent("fra"), Some("fr"));
    assert_eq!(part1_equivalent("yue"), None);
    assert_eq!(part1_equivalent("en"), None);
}

#[test]
fn test_preferred_code_shouldPreferTwoLetterCodes() {
    assert_eq!(preferred_code("eng").unwrap(), "en");
    assert_eq!(preferred_code("en").unwrap(), "en");
    assert_eq!(preferred_code("yue").unwrap(), "yue");
    assert!(preferred_code("xyz").is_err());
}

/// Test language code matching
#[test]
fn test_language_codes_match_withEquivalentCodes_shouldMatch() {
    assert!(language_codes_match("en", "eng"));
    assert!(language_codes_match("fr", "fra"));
    assert!(language_codes_match("de", "de"));

    assert!(!language_codes_match("en", "fr"));
    assert!(!language_codes_match("en", "xyz"));
    assert!(!language_codes_match("xyz", "xyz"));
}

#[test]
fn test_language_identity_withBothForms_shouldResolveSameLanguage() {
    let short = language_identity("es").unwrap();
    let long = language_identity("spa").unwrap();
    assert_eq!(short, long);
    assert!(language_identity("zz").is_none());
}

/// Test getting language names
#[test]
fn test_get_language_name_withValidCodes_shouldReturnName() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("eng").unwrap(), "English");
    assert_eq!(get_language_name("fr").unwrap(), "French");
    assert!(get_language_name("xyz").is_err());
}
