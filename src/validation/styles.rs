/*!
 * Style definition validation.
 *
 * Text properties:
 * - `color`, `background`: `#RRGGBB`
 * - `bold`, `italic`, `underline`: booleans
 * - `size`: positive percentage such as `"120%"`
 * - `opacity`: percentage from `"0%"` to `"100%"`
 *
 * Display properties:
 * - `align`: `left`, `center` or `right`
 * - `vertical`: `top`, `middle` or `bottom`
 * - `position`: object with `x` and `y` percentages
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::document::{Document, FieldSlot};

use super::issue::Issue;
use super::service::ValidationPhase;

pub const TEXT_PROPERTIES: &[&str] = &["color", "background", "bold", "italic", "underline", "size", "opacity"];
pub const DISPLAY_PROPERTIES: &[&str] = &["align", "vertical", "position"];
pub const ALIGN_VALUES: &[&str] = &["left", "center", "right"];
pub const VERTICAL_VALUES: &[&str] = &["top", "middle", "bottom"];

static COLOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid color regex"));

static PERCENT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)%$").expect("Invalid percentage regex"));

/// Numeric part of a `"N%"` string
pub fn parse_percentage(value: &str) -> Option<u64> {
    PERCENT_REGEX
        .captures(value)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse::<u64>().ok())
}

fn error(message: String, location: &str) -> Issue {
    Issue::error(message).at(location).spec_ref("#styles")
}

/// Validate a style's `text` object
pub fn validate_text_properties(text: &Map<String, Value>, location: &str) -> Vec<Issue> {
    let mut issues = Vec::new();
    if text.is_empty() {
        issues.push(error("Style text properties must not be empty".to_string(), location));
        return issues;
    }

    for (key, value) in text {
        let property_location = format!("{}.{}", location, key);
        match key.as_str() {
            "color" | "background" => {
                if !value.as_str().is_some_and(|v| COLOR_REGEX.is_match(v)) {
                    issues.push(error(
                        format!("Invalid {} value {}. Must be in #RRGGBB format.", key, value),
                        &property_location,
                    ));
                }
            }
            "bold" | "italic" | "underline" => {
                if !value.is_boolean() {
                    issues.push(error(format!("{} must be a boolean, got {}", key, value), &property_location));
                }
            }
            "size" => match value.as_str().and_then(parse_percentage) {
                Some(size) if size > 0 => {}
                Some(_) => issues.push(error("size must be greater than 0%".to_string(), &property_location)),
                None => issues.push(error(
                    format!("Invalid size value {}. Must be a percentage such as '120%'.", value),
                    &property_location,
                )),
            },
            "opacity" => match value.as_str().and_then(parse_percentage) {
                Some(opacity) if opacity <= 100 => {}
                Some(_) => issues.push(error(
                    "opacity must be between 0% and 100%".to_string(),
                    &property_location,
                )),
                None => issues.push(error(
                    format!("Invalid opacity value {}. Must be a percentage such as '80%'.", value),
                    &property_location,
                )),
            },
            other => issues.push(error(
                format!(
                    "Invalid text property '{}'. Allowed properties are: {}",
                    other,
                    TEXT_PROPERTIES.join(", ")
                ),
                &property_location,
            )),
        }
    }

    issues
}

/// Validate a style's `display` object
pub fn validate_display_properties(display: &Map<String, Value>, location: &str) -> Vec<Issue> {
    let mut issues = Vec::new();
    if display.is_empty() {
        issues.push(error("Style display properties must not be empty".to_string(), location));
        return issues;
    }

    for (key, value) in display {
        let property_location = format!("{}.{}", location, key);
        match key.as_str() {
            "align" => check_choice(value, ALIGN_VALUES, "align", &property_location, &mut issues),
            "vertical" => check_choice(value, VERTICAL_VALUES, "vertical", &property_location, &mut issues),
            "position" => {
                let Some(position) = value.as_object() else {
                    issues.push(error(
                        format!("position must be an object with 'x' and 'y', got {}", value),
                        &property_location,
                    ));
                    continue;
                };
                for axis in ["x", "y"] {
                    let axis_location = format!("{}.{}", property_location, axis);
                    match position.get(axis) {
                        None => issues.push(error(format!("position.{} is required", axis), &axis_location)),
                        Some(v) => match v.as_str().and_then(parse_percentage) {
                            Some(p) if p <= 100 => {}
                            _ => issues.push(error(
                                format!("position.{} must be a percentage from 0% to 100%, got {}", axis, v),
                                &axis_location,
                            )),
                        },
                    }
                }
            }
            other => issues.push(error(
                format!(
                    "Invalid display property '{}'. Allowed properties are: {}",
                    other,
                    DISPLAY_PROPERTIES.join(", ")
                ),
                &property_location,
            )),
        }
    }

    issues
}

fn check_choice(value: &Value, allowed: &[&str], name: &str, location: &str, issues: &mut Vec<Issue>) {
    if !value.as_str().is_some_and(|v| allowed.contains(&v)) {
        issues.push(error(
            format!("Invalid {} value {}. Must be one of: {}", name, value, allowed.join(", ")),
            location,
        ));
    }
}

/// Checks declared style definitions
#[derive(Debug, Default, Clone, Copy)]
pub struct StyleValidator;

impl StyleValidator {
    pub fn new() -> Self {
        Self
    }
}

impl ValidationPhase for StyleValidator {
    fn name(&self) -> &'static str {
        "styles"
    }

    fn validate(&self, document: &Document) -> Vec<Issue> {
        let mut issues = Vec::new();
        let Some(transcript) = document.transcript() else {
            return issues;
        };

        for (idx, style) in transcript.styles() {
            let location = format!("transcript.styles[{}]", idx);
            if let Some(text) = style.text.value() {
                issues.extend(validate_text_properties(text, &format!("{}.text", location)));
            }
            if let Some(display) = style.display.value() {
                issues.extend(validate_display_properties(display, &format!("{}.display", location)));
            }
        }
        issues
    }
}
