//! Embeds the version reported by `cuba --version`.
//!
//! `CUBA_VERSION` is the crate version, followed by the git revision when the
//! workspace is a git checkout, e.g. `0.1.0 (a1b2c3d-dirty)`.

use std::path::{Path, PathBuf};
use std::process::Command;

fn main() {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let crate_version = env!("CARGO_PKG_VERSION");

    if let Some(git_dir) = find_git_dir(&manifest_dir) {
        println!("cargo:rerun-if-changed={}", git_dir.join("HEAD").display());
        println!("cargo:rerun-if-changed={}", git_dir.join("index").display());
    }

    let version = match revision(&manifest_dir) {
        Some(rev) => format!("{crate_version} ({rev})"),
        None => crate_version.to_string(),
    };
    println!("cargo:rustc-env=CUBA_VERSION={version}");
}

/// Nearest `.git` directory at or above `start`.
fn find_git_dir(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(".git"))
        .find(|candidate| candidate.exists())
}

fn revision(dir: &Path) -> Option<String> {
    let output = Command::new("git")
        .current_dir(dir)
        .args(["describe", "--always", "--dirty", "--abbrev=7"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }

    let rev = String::from_utf8(output.stdout).ok()?;
    let rev = rev.trim();
    (!rev.is_empty()).then(|| rev.to_string())
}
