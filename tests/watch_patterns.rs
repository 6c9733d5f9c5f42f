// tests/watch_patterns.rs

use std::error::Error;
use std::time::Duration;

use docdag::errors::DocdagError;
use docdag::watch::build_watch_profiles;
use docdag_test_utils::builders::ConfigFileBuilder;
use docdag_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn profiles_match_included_paths_and_honour_excludes() -> TestResult {
    init_tracing();

    let cfg = ConfigFileBuilder::new()
        .with_watch_group(
            "styles",
            &["sass/**/*.scss"],
            &["sass/vendor/**"],
            &["compile-styles"],
        )
        .build();

    let profiles = build_watch_profiles(&cfg)?;
    assert_eq!(profiles.len(), 1);

    let profile = &profiles[0];
    assert_eq!(profile.group(), "styles");
    assert_eq!(profile.tasks(), vec!["compile-styles"]);
    assert!(profile.matches("sass/main.scss"));
    assert!(profile.matches("sass/pages/docs.scss"));
    assert!(!profile.matches("sass/vendor/normalize.scss"));
    assert!(!profile.matches("js/app.js"));
    assert!(!profile.matches("sass/main.css"));
    Ok(())
}

#[test]
fn groups_come_out_in_name_order() -> TestResult {
    init_tracing();

    let cfg = ConfigFileBuilder::new()
        .with_watch_group("styles", &["sass/**"], &[], &["compile-styles"])
        .with_watch_group("assets", &["static/**"], &[], &["copy-assets"])
        .build();

    let profiles = build_watch_profiles(&cfg)?;
    let names: Vec<&str> = profiles.iter().map(|p| p.group()).collect();
    assert_eq!(names, vec!["assets", "styles"]);
    Ok(())
}

#[test]
fn config_without_watch_groups_builds_no_profiles() -> TestResult {
    init_tracing();

    let cfg = ConfigFileBuilder::new().build();
    let profiles = build_watch_profiles(&cfg)?;
    assert!(profiles.is_empty());
    Ok(())
}

#[test]
fn debounce_defaults_and_overrides_are_kept() -> TestResult {
    init_tracing();

    let mut cfg = ConfigFileBuilder::new()
        .with_watch_group("styles", &["sass/**"], &[], &["compile-styles"])
        .with_watch_group("assets", &["static/**"], &[], &["copy-assets"])
        .build();
    cfg.watch.get_mut("styles").ok_or("group missing")?.debounce_ms = 100;

    let profiles = build_watch_profiles(&cfg)?;
    let styles = profiles
        .iter()
        .find(|p| p.group() == "styles")
        .ok_or("styles profile missing")?;
    let assets = profiles
        .iter()
        .find(|p| p.group() == "assets")
        .ok_or("assets profile missing")?;

    assert_eq!(styles.debounce(), Duration::from_millis(100));
    assert_eq!(assets.debounce(), Duration::from_millis(250));
    Ok(())
}

#[test]
fn unwatchable_task_is_a_config_error() {
    init_tracing();

    let cfg = ConfigFileBuilder::new()
        .with_watch_group("styles", &["sass/**"], &[], &["fetch-source"])
        .build();

    match build_watch_profiles(&cfg) {
        Err(DocdagError::ConfigError(msg)) => {
            assert!(msg.contains("[watch.styles]"), "{}", msg);
            assert!(msg.contains("fetch-source"), "{}", msg);
            assert!(msg.contains("compile-styles"), "{}", msg);
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn invalid_glob_pattern_is_reported() {
    init_tracing();

    let cfg = ConfigFileBuilder::new()
        .with_watch_group("styles", &["sass/[oops"], &[], &["compile-styles"])
        .build();

    match build_watch_profiles(&cfg) {
        Err(DocdagError::Other(err)) => {
            assert!(format!("{:#}", err).contains("styles"), "{:#}", err);
        }
        Err(e) => panic!("Expected a pattern error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}
