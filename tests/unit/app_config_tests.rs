/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use std::str::FromStr;

use stjcheck::app_config::{Config, LogLevel, OutputFormat};
use stjcheck::errors::ConfigError;
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert!(config.validation.metadata_validation);
    assert!(config.validation.style_validation);
    assert!(config.validation.language_validation);
    assert!(config.validation.word_timing_validation);
    assert!(config.validation.extension_validation);
    assert!(config.validation.word_timecode_validation);
    assert!(config.validation.text_consistency_check);
    assert!(!config.validation.strict);
    assert_eq!(config.validation.base_uri, None);

    assert!(config.repair.merge_compatible);
    assert_eq!(config.repair.small_overlap_threshold, 0.5);

    assert_eq!(config.output, OutputFormat::Text);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.repair.small_overlap_threshold = -1.0;
    assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { .. })));
    config.repair.small_overlap_threshold = f64::NAN;
    assert!(config.validate().is_err());
    config.repair.small_overlap_threshold = 0.25;
    assert!(config.validate().is_ok());

    config.validation.base_uri = Some("not a uri".to_string());
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("validation.base_uri"));

    config.validation.base_uri = Some("https://example.com/media/".to_string());
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_fromFile_withPartialSettings_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "stjcheck.json",
        r#"{"validation": {"style_validation": false, "strict": true}, "output": "json"}"#,
    )?;

    let config = Config::from_file(&path)?;
    assert!(!config.validation.style_validation);
    assert!(config.validation.strict);
    assert!(config.validation.metadata_validation);
    assert_eq!(config.output, OutputFormat::Json);
    assert_eq!(config.log_level, LogLevel::Info);
    Ok(())
}

#[test]
fn test_config_fromFile_withMalformedJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "stjcheck.json", "{ not json")?;

    let err = Config::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
    Ok(())
}

#[test]
fn test_config_fromFile_withInvalidThreshold_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "stjcheck.json",
        r#"{"repair": {"small_overlap_threshold": -2.0}}"#,
    )?;

    assert!(Config::from_file(&path).is_err());
    Ok(())
}

#[test]
fn test_config_loadOrDefault_withMissingFile_shouldReturnDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = Config::load_or_default(temp_dir.path().join("absent.json"))?;
    assert_eq!(config, Config::default());
    Ok(())
}

#[test]
fn test_outputFormat_fromStr_shouldParseCaseInsensitively() {
    assert_eq!(OutputFormat::from_str("TEXT").unwrap(), OutputFormat::Text);
    assert_eq!(OutputFormat::from_str("json").unwrap(), OutputFormat::Json);
    assert!(OutputFormat::from_str("xml").is_err());
    assert_eq!(OutputFormat::Json.to_string(), "json");
}

#[test]
fn test_logLevel_toLevelFilter_shouldMapEachLevel() {
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Debug.to_level_filter(), log::LevelFilter::Debug);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
