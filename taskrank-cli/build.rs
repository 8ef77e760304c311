//! Stamps the binary with the commit it was built from, for `--version`.

use std::path::Path;
use std::process::Command;

const SHA_VAR: &str = "TASKRANK_BUILD_SHA";

fn git(repo: &Path, args: &[&str]) -> Option<String> {
    let out = Command::new("git").arg("-C").arg(repo).args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&out.stdout).trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn main() {
    println!("cargo:rerun-if-env-changed={SHA_VAR}");
    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rerun-if-changed=../.git/index");

    // Source tarballs have no .git; packagers can pass the sha in instead.
    let sha = std::env::var(SHA_VAR).ok().filter(|s| !s.is_empty()).or_else(|| {
        let repo = Path::new(env!("CARGO_MANIFEST_DIR")).join("..");
        let sha = git(&repo, &["rev-parse", "--short", "HEAD"])?;
        let dirty = git(&repo, &["status", "--porcelain", "--untracked-files=no"]).is_some();
        Some(if dirty { format!("{sha}-dirty") } else { sha })
    });

    println!(
        "cargo:rustc-env={SHA_VAR}={}",
        sha.as_deref().unwrap_or("unknown")
    );
}
