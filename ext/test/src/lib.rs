//! navgate-test: YAML conformance fixtures
//!
//! Two fixture shapes, one per rule set:
//!
//! - [`PolicyFixture`]: a raw maintenance config payload plus path cases,
//!   run through [`MaintenanceConfig::from_value`] and both evaluators
//! - [`MenuFixture`]: a raw menu forest plus path cases, run through
//!   [`MenuAccessIndex::build`]
//!
//! Payloads stay as [`serde_json::Value`] so the production decoding path
//! (camelCase keys, null handling, unknown enum values) is what gets tested.
//!
//! ```
//! use navgate_test::PolicyFixture;
//!
//! let fixture = PolicyFixture::from_yaml(r#"
//! name: root coming soon
//! config:
//!   rules:
//!     - { id: r1, enabled: true, matchType: EXACT, path: "/", type: COMING_SOON }
//! cases:
//!   - { path: "/", expect: RULE_MATCH, rule: r1 }
//!   - { path: "/about", expect: PASS }
//! "#).unwrap();
//!
//! fixture.run_and_assert();
//! ```

use navgate::{
    Decision, IndexMode, MaintenanceConfig, MaintenancePolicy, MenuAccessIndex, UserMenuNode,
};
use serde::Deserialize;

/// Expected kind of a maintenance decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Pass,
    GlobalMaintenance,
    RuleMatch,
}

/// A maintenance policy fixture.
#[derive(Debug, Deserialize)]
pub struct PolicyFixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub config: serde_json::Value,
    #[serde(default)]
    pub cases: Vec<PolicyCase>,
}

/// One path evaluated against a [`PolicyFixture`].
#[derive(Debug, Deserialize)]
pub struct PolicyCase {
    pub path: String,
    pub expect: Outcome,
    /// Winning rule id; required for [`Outcome::RuleMatch`].
    #[serde(default)]
    pub rule: Option<String>,
}

/// A menu access fixture.
#[derive(Debug, Deserialize)]
pub struct MenuFixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub menu: serde_json::Value,
    /// Index `useTf = 'N'` entries too.
    #[serde(default)]
    pub include_unusable: bool,
    #[serde(default)]
    pub cases: Vec<MenuCase>,
}

/// One path checked against a [`MenuFixture`].
#[derive(Debug, Deserialize)]
pub struct MenuCase {
    pub path: String,
    pub allowed: bool,
    /// Id of the first covering menu entry, when checked.
    #[serde(default)]
    pub menu: Option<String>,
}

fn from_yaml_multi<T: for<'de> Deserialize<'de>>(yaml: &str) -> Result<Vec<T>, serde_yaml::Error> {
    let mut fixtures = Vec::new();
    for doc in serde_yaml::Deserializer::from_str(yaml) {
        fixtures.push(T::deserialize(doc)?);
    }
    Ok(fixtures)
}

impl PolicyFixture {
    /// Parse a single fixture from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators.
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        from_yaml_multi(yaml)
    }

    /// Decode the embedded config payload.
    ///
    /// # Panics
    ///
    /// If the payload is rejected by the config decoder.
    #[must_use]
    pub fn load_config(&self) -> MaintenanceConfig {
        MaintenanceConfig::from_value(self.config.clone())
            .unwrap_or_else(|err| panic!("fixture '{}': {err}", self.name))
    }

    /// Run every case against the compiled policy, the uncompiled evaluator
    /// and the trace, and assert they agree with the expectation.
    ///
    /// # Panics
    ///
    /// On the first mismatching case.
    pub fn run_and_assert(&self) {
        let config = self.load_config();
        let policy = MaintenancePolicy::new(config.clone());

        for case in &self.cases {
            let compiled = policy.evaluate(&case.path);
            let uncompiled = navgate::evaluate(&case.path, &config);
            assert_eq!(
                compiled, uncompiled,
                "fixture '{}' path '{}': compiled and uncompiled evaluation disagree",
                self.name, case.path
            );

            let (outcome, rule) = match &compiled {
                Decision::Pass => (Outcome::Pass, None),
                Decision::GlobalMaintenance => (Outcome::GlobalMaintenance, None),
                Decision::RuleMatch { rule } => (Outcome::RuleMatch, Some(rule.id.clone())),
            };
            assert_eq!(
                outcome, case.expect,
                "fixture '{}' path '{}'",
                self.name, case.path
            );
            if case.expect == Outcome::RuleMatch {
                assert_eq!(
                    rule, case.rule,
                    "fixture '{}' path '{}': wrong winning rule",
                    self.name, case.path
                );
            }

            let trace = policy.evaluate_with_trace(&case.path);
            assert_eq!(
                trace.decision, compiled,
                "fixture '{}' path '{}': trace disagrees",
                self.name, case.path
            );
        }
    }
}

impl MenuFixture {
    /// Parse a single fixture from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators.
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        from_yaml_multi(yaml)
    }

    /// Decode the menu and build the index.
    ///
    /// # Panics
    ///
    /// If the menu payload does not decode.
    #[must_use]
    pub fn build_index(&self) -> MenuAccessIndex {
        let forest: Vec<UserMenuNode> = serde_json::from_value(self.menu.clone())
            .unwrap_or_else(|err| panic!("fixture '{}': {err}", self.name));
        let mode = if self.include_unusable {
            IndexMode::All
        } else {
            IndexMode::UsableOnly
        };
        MenuAccessIndex::build(&forest, mode)
    }

    /// Run every case and assert access matches.
    ///
    /// # Panics
    ///
    /// On the first mismatching case.
    pub fn run_and_assert(&self) {
        let index = self.build_index();
        for case in &self.cases {
            assert_eq!(
                index.has_access(&case.path),
                case.allowed,
                "fixture '{}' path '{}'",
                self.name,
                case.path
            );
            if let Some(expected) = &case.menu {
                assert_eq!(
                    index.covering_menu(&case.path),
                    Some(expected.as_str()),
                    "fixture '{}' path '{}': wrong covering menu",
                    self.name,
                    case.path
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multi_document_file() {
        let yaml = r#"
name: first
config: {}
cases:
  - { path: "/", expect: PASS }
---
name: second
config: { enabled: true }
cases:
  - { path: "/x", expect: GLOBAL_MAINTENANCE }
"#;
        let fixtures = PolicyFixture::from_yaml_multi(yaml).unwrap();
        assert_eq!(fixtures.len(), 2);
        assert_eq!(fixtures[1].cases[0].expect, Outcome::GlobalMaintenance);
        for fixture in &fixtures {
            fixture.run_and_assert();
        }
    }

    #[test]
    #[should_panic(expected = "fixture 'wrong'")]
    fn mismatch_panics_with_fixture_name() {
        let fixture = PolicyFixture::from_yaml(
            r#"
name: wrong
config: { enabled: true }
cases:
  - { path: "/x", expect: PASS }
"#,
        )
        .unwrap();
        fixture.run_and_assert();
    }

    #[test]
    fn menu_fixture_numeric_ids() {
        let fixture = MenuFixture::from_yaml(
            r#"
name: numeric ids
menu:
  - { id: 7, url: /notice, useTf: "Y" }
cases:
  - { path: /notice/1, allowed: true, menu: "7" }
  - { path: /notices, allowed: false }
"#,
        )
        .unwrap();
        fixture.run_and_assert();
    }
}
