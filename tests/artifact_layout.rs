// tests/artifact_layout.rs

use std::error::Error;
use std::path::Path;

use docdag::artifacts::{write_robots_disallow, write_version_script};
use docdag::fs::{FileSystem, MockFileSystem};
use docdag::version::VersionEntry;
use docdag_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn sample_entries() -> Vec<VersionEntry> {
    vec![
        VersionEntry::Bare("2.0.0".to_string()),
        VersionEntry::Aliased("1.14.1".to_string(), "0.34.1".to_string()),
        VersionEntry::Bare("1.14.0".to_string()),
    ]
}

#[test]
fn version_script_bytes_are_exact() -> TestResult {
    init_tracing();

    let fs = MockFileSystem::new();
    let path = Path::new("generated/scripts/doc-versions.js");
    write_version_script(&fs, path, &sample_entries())?;

    assert_eq!(
        fs.read_to_string(path)?,
        r#"docVersions && docVersions(["2.0.0",["1.14.1","0.34.1"],"1.14.0"])"#
    );
    Ok(())
}

#[test]
fn version_script_with_no_versions_calls_with_empty_array() -> TestResult {
    init_tracing();

    let fs = MockFileSystem::new();
    let path = Path::new("generated/scripts/doc-versions.js");
    write_version_script(&fs, path, &[])?;

    assert_eq!(fs.read_to_string(path)?, "docVersions && docVersions([])");
    Ok(())
}

#[test]
fn robots_disallow_omits_newest_and_uses_aliases() -> TestResult {
    init_tracing();

    let fs = MockFileSystem::new();
    let path = Path::new("generated/robots_disallow");
    write_robots_disallow(&fs, path, &sample_entries())?;

    assert_eq!(
        fs.read_to_string(path)?,
        "\nDisallow: /docs/0.34.1/\nDisallow: /docs/1.14.0/\n\n"
    );
    Ok(())
}

#[test]
fn robots_disallow_with_single_version_has_no_lines() -> TestResult {
    init_tracing();

    let fs = MockFileSystem::new();
    let path = Path::new("generated/robots_disallow");
    write_robots_disallow(&fs, path, &[VersionEntry::Bare("2.0.0".to_string())])?;

    // The newest version stays crawlable, so the fragment is only the
    // surrounding blank lines.
    assert_eq!(fs.read_to_string(path)?, "\n\n\n");
    Ok(())
}

#[test]
fn robots_disallow_with_no_versions_has_no_lines() -> TestResult {
    init_tracing();

    let fs = MockFileSystem::new();
    let path = Path::new("generated/robots_disallow");
    write_robots_disallow(&fs, path, &[])?;

    assert_eq!(fs.read_to_string(path)?, "\n\n\n");
    Ok(())
}

#[test]
fn rewriting_artifacts_replaces_previous_content() -> TestResult {
    init_tracing();

    let fs = MockFileSystem::new();
    let path = Path::new("generated/scripts/doc-versions.js");

    write_version_script(&fs, path, &sample_entries())?;
    write_version_script(&fs, path, &[VersionEntry::Bare("3.0.0".to_string())])?;

    assert_eq!(
        fs.read_to_string(path)?,
        r#"docVersions && docVersions(["3.0.0"])"#
    );
    Ok(())
}
