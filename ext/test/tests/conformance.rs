//! Conformance tests that run the YAML fixtures against navgate
//!
//! Run with: cargo test -p navgate-test --test conformance

use navgate_test::{MenuFixture, PolicyFixture};
use std::fs;
use std::path::{Path, PathBuf};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Every `.yaml` / `.yml` file in `dir`, sorted for stable output.
fn yaml_files(dir: &Path) -> Vec<PathBuf> {
    assert!(
        dir.exists(),
        "fixtures directory does not exist: {}",
        dir.display()
    );

    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| entry.expect("dir entry").path())
        .filter(|path| {
            path.extension()
                .map_or(false, |e| e == "yaml" || e == "yml")
        })
        .collect();
    files.sort();
    assert!(!files.is_empty(), "no fixtures in {}", dir.display());
    files
}

#[test]
fn test_maintenance_policy() {
    for path in yaml_files(&fixtures_dir().join("maintenance")) {
        println!("Running fixture: {}", path.display());
        let yaml = fs::read_to_string(&path).expect("read yaml");
        let fixtures = PolicyFixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
            panic!("Failed to parse {}: {}", path.display(), e);
        });

        for fixture in fixtures {
            println!("  Running: {}", fixture.name);
            fixture.run_and_assert();
        }
    }
}

#[test]
fn test_menu_access() {
    for path in yaml_files(&fixtures_dir().join("menu")) {
        println!("Running fixture: {}", path.display());
        let yaml = fs::read_to_string(&path).expect("read yaml");
        let fixtures = MenuFixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
            panic!("Failed to parse {}: {}", path.display(), e);
        });

        for fixture in fixtures {
            println!("  Running: {}", fixture.name);
            fixture.run_and_assert();
        }
    }
}

#[test]
fn fixtures_cover_every_outcome() {
    use navgate_test::Outcome;

    let mut seen = Vec::new();
    for path in yaml_files(&fixtures_dir().join("maintenance")) {
        let yaml = fs::read_to_string(&path).expect("read yaml");
        for fixture in PolicyFixture::from_yaml_multi(&yaml).expect("parse") {
            seen.extend(fixture.cases.iter().map(|c| c.expect));
        }
    }
    for outcome in [Outcome::Pass, Outcome::GlobalMaintenance, Outcome::RuleMatch] {
        assert!(seen.contains(&outcome), "no fixture expects {outcome:?}");
    }
}
