use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

const HASH_VAR: &str = "SNAPSCRIBE_GIT_HASH";

fn main() {
    // Packagers building from a tarball can pin the hash themselves
    println!("cargo:rerun-if-env-changed={HASH_VAR}");
    let hash = env::var(HASH_VAR)
        .ok()
        .filter(|pinned| !pinned.trim().is_empty())
        .or_else(describe_head)
        .unwrap_or_else(|| "unknown".into());

    println!("cargo:rustc-env={HASH_VAR}={hash}");

    if let Some(git_dir) = git_dir() {
        for watched in ["HEAD", "index", "refs", "packed-refs"] {
            let path = git_dir.join(watched);
            if path.exists() {
                println!("cargo:rerun-if-changed={}", path.display());
            }
        }
    }
}

/// Short commit hash, suffixed with `-dirty` when the worktree has edits.
fn describe_head() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--always", "--dirty", "--abbrev=8", "--exclude=*"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let described = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!described.is_empty()).then_some(described)
}

/// The repository's git directory, following `gitdir:` indirection used by
/// worktrees and submodules.
fn git_dir() -> Option<PathBuf> {
    if let Some(from_env) = env::var_os("GIT_DIR") {
        return Some(PathBuf::from(from_env));
    }

    let dot_git = PathBuf::from(".git");
    if dot_git.is_dir() {
        return Some(dot_git);
    }

    let pointer = fs::read_to_string(&dot_git).ok()?;
    let target = PathBuf::from(pointer.strip_prefix("gitdir:")?.trim());
    Some(if target.is_relative() {
        PathBuf::from(".").join(target)
    } else {
        target
    })
}
