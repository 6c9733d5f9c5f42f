// tests/host_remotes.rs

use std::error::Error;

use docdag::errors::DocdagError;
use docdag::host::GitHubHost;
use docdag_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn github_clone_urls_are_accepted() -> TestResult {
    init_tracing();

    for url in [
        "git@github.com:acme/widgets.git",
        "git@github.com:acme/widgets",
        "https://github.com/acme/widgets.git",
        "https://github.com/acme/widgets",
        "https://github.com/acme/widgets/",
        "http://github.com/acme/widgets.git",
    ] {
        GitHubHost::new(url, "src/source", None)
            .map_err(|e| format!("rejected {}: {}", url, e))?;
    }
    Ok(())
}

#[test]
fn non_github_and_malformed_urls_are_rejected() {
    init_tracing();

    for url in [
        "https://gitlab.com/acme/widgets.git",
        "https://github.com/acme",
        "https://github.com/acme/widgets/extra",
        "git@github.com:/",
        "acme/widgets",
        "",
    ] {
        match GitHubHost::new(url, "src/source", None) {
            Err(DocdagError::ConfigError(msg)) => {
                assert!(msg.contains("owner/repo"), "{}", msg);
            }
            Err(e) => panic!("Expected ConfigError for {:?}, got: {:?}", url, e),
            Ok(_) => panic!("Expected {:?} to be rejected", url),
        }
    }
}

#[test]
fn token_is_optional() -> TestResult {
    init_tracing();

    GitHubHost::new(
        "https://github.com/acme/widgets.git",
        "src/source",
        Some("ghp_example".to_string()),
    )?;
    GitHubHost::new("https://github.com/acme/widgets.git", "src/source", None)?;
    Ok(())
}
