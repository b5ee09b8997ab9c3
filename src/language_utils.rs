use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// Codes in STJ documents are case-sensitive: only lowercase ISO 639-1
/// (2-letter) and ISO 639-3 (3-letter) codes are recognised. Surrounding
/// whitespace is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-3 (3-letter) code
    Part3,
}

/// Resolve a code to its language, if it is a known 2- or 3-letter code
pub fn language_identity(code: &str) -> Option<Language> {
    let code = code.trim();
    if !code.chars().all(|c| c.is_ascii_lowercase()) {
        return None;
    }
    match code.len() {
        2 => Language::from_639_1(code),
        3 => Language::from_639_3(code),
        _ => None,
    }
}

/// Validate if a language code is a valid ISO 639-1 or ISO 639-3 code
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType> {
    match language_identity(code) {
        Some(_) if code.trim().len() == 2 => Ok(LanguageCodeType::Part1),
        Some(_) => Ok(LanguageCodeType::Part3),
        None => Err(anyhow!("Invalid language code: {}", code)),
    }
}

/// The ISO 639-1 equivalent of a 3-letter code, if the language has one
pub fn part1_equivalent(code: &str) -> Option<&'static str> {
    if code.trim().len() != 3 {
        return None;
    }
    language_identity(code).and_then(|lang| lang.to_639_1())
}

/// The code STJ prefers for a language: ISO 639-1 when one exists,
/// otherwise ISO 639-3
pub fn preferred_code(code: &str) -> Result<String> {
    let lang = language_identity(code)
        .ok_or_else(|| anyhow!("Cannot normalize invalid language code: {}", code))?;

    Ok(lang
        .to_639_1()
        .map(str::to_string)
        .unwrap_or_else(|| lang.to_639_3().to_string()))
}

/// Check if two language codes match (represent the same language)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (language_identity(code1), language_identity(code2)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let lang = language_identity(code)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", code))?;

    Ok(lang.to_name().to_string())
}
