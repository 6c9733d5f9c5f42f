// tests/version_resolution.rs

use std::collections::BTreeMap;
use std::error::Error;

use proptest::prelude::*;
use semver::Version;

use docdag::version::{VersionEntry, VersionResolver};
use docdag_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn resolver(floor: &str, aliases: &[(&str, &str)]) -> VersionResolver {
    let aliases: BTreeMap<String, String> = aliases
        .iter()
        .map(|(v, a)| (v.to_string(), a.to_string()))
        .collect();
    VersionResolver::new(Version::parse(floor).unwrap(), aliases)
}

fn branches(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn branch_list_resolves_to_filtered_aliased_newest_first() -> TestResult {
    init_tracing();

    let resolver = resolver("1.14.0", &[("1.14.1", "0.34.1")]);
    let entries = resolver.resolve(&branches(&[
        "master",
        "draft-filters",
        "2.0.0",
        "1.14.1",
        "1.13.0",
        "v1.2.3",
        "1.14.0",
    ]));

    assert_eq!(
        entries,
        vec![
            VersionEntry::Bare("2.0.0".to_string()),
            VersionEntry::Aliased("1.14.1".to_string(), "0.34.1".to_string()),
            VersionEntry::Bare("1.14.0".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn reference_branch_set_resolves_as_published() -> TestResult {
    init_tracing();

    let resolver = resolver("1.14.0", &[("1.14.1", "0.34.1")]);
    let entries = resolver.resolve(&branches(&[
        "1.14.0", "1.14.1", "draft-x", "2.0.0", "0.9.0",
    ]));

    assert_eq!(
        entries,
        vec![
            VersionEntry::Bare("2.0.0".to_string()),
            VersionEntry::Aliased("1.14.1".to_string(), "0.34.1".to_string()),
            VersionEntry::Bare("1.14.0".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn names_without_plain_version_shape_are_dropped() -> TestResult {
    init_tracing();

    let resolver = resolver("0.0.0", &[]);
    let entries = resolver.resolve(&branches(&[
        "1.2",
        "v1.2.3",
        "1.2.3-beta",
        "1.2.3.4",
        "feature/docs",
        "",
        "1.2.3 ",
    ]));

    assert!(entries.is_empty(), "got {:?}", entries);
    Ok(())
}

#[test]
fn draft_branches_are_dropped_even_with_version_shape() -> TestResult {
    init_tracing();

    // The prefix check is what excludes drafts; a name like
    // "draft-1.2.3" already fails the shape check, so the interesting
    // case is that nothing resurrects drafts later in the chain.
    let resolver = resolver("0.0.0", &[]);
    let entries = resolver.resolve(&branches(&["draft-2.0.0", "draft-filters", "1.0.0"]));

    assert_eq!(entries, vec![VersionEntry::Bare("1.0.0".to_string())]);
    Ok(())
}

#[test]
fn floor_is_inclusive() -> TestResult {
    init_tracing();

    let resolver = resolver("1.14.0", &[]);
    let entries = resolver.resolve(&branches(&["1.13.9", "1.14.0", "1.14.1"]));

    assert_eq!(
        entries,
        vec![
            VersionEntry::Bare("1.14.1".to_string()),
            VersionEntry::Bare("1.14.0".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn ordering_is_numeric_not_lexicographic() -> TestResult {
    init_tracing();

    let resolver = resolver("0.0.0", &[]);
    let entries = resolver.resolve(&branches(&["1.15.2", "10.0.0", "1.14.0", "2.0.0"]));

    let versions: Vec<&str> = entries.iter().map(VersionEntry::version).collect();
    assert_eq!(versions, vec!["10.0.0", "2.0.0", "1.15.2", "1.14.0"]);
    Ok(())
}

#[test]
fn input_order_does_not_matter() -> TestResult {
    init_tracing();

    let resolver = resolver("1.0.0", &[("1.2.0", "0.2.0")]);
    let forward = resolver.resolve(&branches(&["1.1.0", "1.2.0", "1.3.0"]));
    let reverse = resolver.resolve(&branches(&["1.3.0", "1.2.0", "1.1.0"]));

    assert_eq!(forward, reverse);
    Ok(())
}

#[test]
fn alias_applies_only_to_exact_version() -> TestResult {
    init_tracing();

    let resolver = resolver("1.0.0", &[("1.14.0", "0.34.0")]);
    let entries = resolver.resolve(&branches(&["1.14.0", "1.14.1"]));

    assert_eq!(
        entries,
        vec![
            VersionEntry::Bare("1.14.1".to_string()),
            VersionEntry::Aliased("1.14.0".to_string(), "0.34.0".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn display_label_prefers_alias() -> TestResult {
    init_tracing();

    let bare = VersionEntry::Bare("2.0.0".to_string());
    let aliased = VersionEntry::Aliased("1.14.1".to_string(), "0.34.1".to_string());

    assert_eq!(bare.display_label(), "2.0.0");
    assert_eq!(bare.version(), "2.0.0");
    assert_eq!(aliased.display_label(), "0.34.1");
    assert_eq!(aliased.version(), "1.14.1");
    Ok(())
}

fn parse_triple(v: &str) -> (u64, u64, u64) {
    let mut parts = v.split('.').map(|p| p.parse::<u64>().unwrap());
    (
        parts.next().unwrap(),
        parts.next().unwrap(),
        parts.next().unwrap(),
    )
}

// Arbitrary mix of plausible version numbers and junk branch names.
fn branch_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u64..20, 0u64..20, 0u64..20).prop_map(|(a, b, c)| format!("{}.{}.{}", a, b, c)),
        (0u64..20, 0u64..20, 0u64..20).prop_map(|(a, b, c)| format!("v{}.{}.{}", a, b, c)),
        (0u64..20, 0u64..20).prop_map(|(a, b)| format!("{}.{}", a, b)),
        "[a-z]{1,8}(-[a-z]{1,8})?",
        (0u64..20, 0u64..20, 0u64..20).prop_map(|(a, b, c)| format!("draft-{}.{}.{}", a, b, c)),
    ]
}

proptest! {
    #[test]
    fn resolved_entries_are_shaped_floored_and_sorted(
        names in proptest::collection::vec(branch_name_strategy(), 0..40),
        floor in (0u64..10, 0u64..10, 0u64..10),
    ) {
        let floor_str = format!("{}.{}.{}", floor.0, floor.1, floor.2);
        let resolver = VersionResolver::new(
            Version::parse(&floor_str).unwrap(),
            BTreeMap::new(),
        );

        let entries = resolver.resolve(&names);

        let mut previous: Option<(u64, u64, u64)> = None;
        for entry in &entries {
            let version = entry.version();
            prop_assert!(
                version.split('.').count() == 3
                    && version.split('.').all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit())),
                "unexpected shape in output: {:?}",
                version
            );
            prop_assert!(!version.starts_with("draft-"));

            let triple = parse_triple(version);
            prop_assert!(triple >= floor, "{} is below the floor {}", version, floor_str);
            if let Some(prev) = previous {
                prop_assert!(prev >= triple, "output not newest-first: {:?}", entries);
            }
            previous = Some(triple);
        }

        // Every surviving input must appear in the output exactly as often
        // as it occurred.
        let expected = names
            .iter()
            .filter(|n| {
                n.split('.').count() == 3
                    && n.split('.').all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
                    && parse_triple(n) >= floor
            })
            .count();
        prop_assert_eq!(entries.len(), expected);
    }
}
