//! Embeds a human-readable version string for `pr-export --version`.
//!
//! The string is `<crate version> (<git version>) <rustc version>`, where the
//! git version is `git describe --tags --always --dirty` when a tag is
//! reachable, and otherwise a pseudo-version
//! `v<crate version>-<YYYYmmddHHMMSS>-<12-char sha>[+dirty]`. Clean trees use
//! the commit timestamp so rebuilding the same commit yields the same string;
//! dirty trees and trees without git use the build time.

use std::{env, process::Command};

use chrono::{DateTime, Utc};

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

fn main() {
    for path in ["src", "build.rs", "Cargo.toml", "Cargo.lock"] {
        println!("cargo:rerun-if-changed={path}");
    }

    println!("cargo:rustc-env=BUILD_INFO_HUMAN={}", build_info());
}

fn run(program: &str, args: &[&str]) -> Option<String> {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// `None` outside a git checkout.
fn worktree_dirty() -> Option<bool> {
    run("git", &["status", "--porcelain"]).map(|status| {
        // `cargo install --git` drops .cargo-ok into the checkout.
        status.lines().any(|line| line.get(3..) != Some(".cargo-ok"))
    })
}

fn pseudo_version() -> String {
    let sha = run("git", &["rev-parse", "--short=12", "HEAD"]).unwrap_or_else(|| "unknown".into());
    let dirty = worktree_dirty();

    let stamp = match dirty {
        Some(false) => run("git", &["log", "-1", "--format=%ct"])
            .and_then(|secs| secs.parse::<i64>().ok())
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        _ => None,
    }
    .unwrap_or_else(Utc::now)
    .format(TIMESTAMP_FORMAT);

    let suffix = if dirty == Some(true) { "+dirty" } else { "" };
    format!("v{}-{stamp}-{sha}{suffix}", env!("CARGO_PKG_VERSION"))
}

fn git_version() -> String {
    match run("git", &["describe", "--tags", "--always", "--dirty"]) {
        Some(desc) if desc.contains('v') || desc.contains("-g") => desc,
        _ => pseudo_version(),
    }
}

fn build_info() -> String {
    let mut parts = vec![
        env!("CARGO_PKG_VERSION").to_string(),
        format!("({})", git_version()),
    ];
    parts.extend(run("rustc", &["--version"]).or_else(|| {
        env::var("RUSTC")
            .ok()
            .and_then(|rustc| run(&rustc, &["--version"]))
    }));
    parts.join(" ")
}
