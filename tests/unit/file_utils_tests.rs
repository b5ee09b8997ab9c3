/*!
 * Tests for file utilities
 */

use anyhow::Result;

use stjcheck::file_utils::FileManager;
use crate::common;

#[test]
fn test_find_files_withNestedDirectories_shouldReturnSortedMatches() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "b.json", "{}")?;
    common::create_test_file(root, "nested/a.JSON", "{}")?;
    common::create_test_file(root, "notes.txt", "skip me")?;

    let files = FileManager::find_files(root, ".json")?;

    assert_eq!(files, vec![root.join("b.json"), root.join("nested/a.JSON")]);
    Ok(())
}

#[test]
fn test_collect_inputs_withSingleFile_shouldReturnItRegardlessOfExtension() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "talk.stj", common::VALID_STJ)?;

    assert_eq!(FileManager::collect_inputs(&path)?, vec![path]);
    Ok(())
}

#[test]
fn test_collect_inputs_withMissingPath_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let err = FileManager::collect_inputs(temp_dir.path().join("nowhere")).unwrap_err();
    assert!(err.to_string().contains("Input path does not exist"));
    Ok(())
}

#[test]
fn test_ensure_writable_withExistingFile_shouldRequireForce() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "out.json", "{}")?;

    assert!(FileManager::ensure_writable(&path, false).is_err());
    assert!(FileManager::ensure_writable(&path, true).is_ok());
    Ok(())
}

#[test]
fn test_ensure_writable_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("deep/er/out.json");

    FileManager::ensure_writable(&path, false)?;

    assert!(temp_dir.path().join("deep/er").is_dir());
    assert!(!path.exists());
    Ok(())
}
