//! Evaluate benchmarks: the per-navigation hot path.
//!
//! Measures: compiled policy vs. uncompiled config evaluation, rule-set width,
//! menu index lookups, and trace overhead.

use navgate::prelude::*;
use navgate::{evaluate, MaintenanceConfig as Config};

fn main() {
    divan::main();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Fixtures
// ═══════════════════════════════════════════════════════════════════════════════

fn mixed_rules(n: usize) -> Vec<MaintenanceRule> {
    (0..n)
        .map(|i| {
            let (match_type, path) = match i % 3 {
                0 => (MatchType::Exact, format!("/page/{i}")),
                1 => (MatchType::Prefix, format!("/section{i}")),
                _ => (MatchType::Regex, format!(r"^/event/{i}/\d+$")),
            };
            MaintenanceRule::new(format!("r{i}"), match_type, path).with_priority((i % 7) as i32)
        })
        .collect()
}

fn menu_tree(width: usize, depth: usize) -> Vec<UserMenuNode> {
    fn node(prefix: &str, width: usize, depth: usize) -> UserMenuNode {
        let mut n = UserMenuNode::new(prefix.to_string(), format!("{prefix}/list"));
        if depth > 0 {
            for i in 0..width {
                n = n.with_child(node(&format!("{prefix}/c{i}"), width, depth - 1));
            }
        }
        n
    }
    (0..width).map(|i| node(&format!("/m{i}"), width, depth)).collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Maintenance
// ═══════════════════════════════════════════════════════════════════════════════

#[divan::bench(args = [1, 10, 100])]
fn policy_miss(bencher: divan::Bencher, n: usize) {
    let policy = MaintenancePolicy::new(Config::default().with_rules(mixed_rules(n)));
    bencher.bench_local(|| policy.evaluate("/nowhere/at/all"));
}

#[divan::bench(args = [1, 10, 100])]
fn config_miss_uncompiled(bencher: divan::Bencher, n: usize) {
    let config = Config::default().with_rules(mixed_rules(n));
    bencher.bench_local(|| evaluate("/nowhere/at/all", &config));
}

#[divan::bench]
fn policy_regex_hit(bencher: divan::Bencher) {
    let policy = MaintenancePolicy::new(Config::default().with_rules(mixed_rules(100)));
    bencher.bench_local(|| policy.evaluate("/event/98/123"));
}

#[divan::bench]
fn policy_admin_bypass(bencher: divan::Bencher) {
    let policy = MaintenancePolicy::new(Config::default().with_rules(mixed_rules(100)));
    bencher.bench_local(|| policy.evaluate("/admin/board/list"));
}

#[divan::bench]
fn policy_trace(bencher: divan::Bencher) {
    let policy = MaintenancePolicy::new(Config::default().with_rules(mixed_rules(100)));
    bencher.bench_local(|| policy.evaluate_with_trace("/event/98/123"));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Menu access
// ═══════════════════════════════════════════════════════════════════════════════

#[divan::bench(args = [2, 4, 6])]
fn menu_deep_hit(bencher: divan::Bencher, width: usize) {
    let index = MenuAccessIndex::build(&menu_tree(width, 3), IndexMode::UsableOnly);
    let last = width - 1;
    let path = format!("/m{last}/c{last}/c{last}/c{last}/detail/9");
    bencher.bench_local(|| index.has_access(&path));
}

#[divan::bench(args = [2, 4, 6])]
fn menu_miss(bencher: divan::Bencher, width: usize) {
    let index = MenuAccessIndex::build(&menu_tree(width, 3), IndexMode::UsableOnly);
    bencher.bench_local(|| index.has_access("/not/registered"));
}
