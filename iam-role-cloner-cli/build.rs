use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Rebuild when HEAD moves, either to another branch or to a new commit on it.
fn watch_git_head() {
    let Some(git_dir) = command_output("git", &["rev-parse", "--git-dir"]).map(PathBuf::from)
    else {
        return;
    };
    let head = git_dir.join("HEAD");
    let Ok(contents) = fs::read_to_string(&head) else {
        return;
    };
    println!("cargo:rerun-if-changed={}", head.display());

    if let Some(reference) = contents.trim().strip_prefix("ref: ") {
        let ref_path = git_dir.join(reference);
        if ref_path.exists() {
            println!("cargo:rerun-if-changed={}", ref_path.display());
        } else {
            // Ref has been packed
            println!("cargo:rerun-if-changed={}", git_dir.join("packed-refs").display());
        }
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=IAM_ROLE_CLONER_BUILD_DATE");
    watch_git_head();

    let git_commit =
        command_output("git", &["rev-parse", "--short", "HEAD"]).unwrap_or_else(|| "dev".into());

    let build_date = env::var("IAM_ROLE_CLONER_BUILD_DATE").unwrap_or_else(|_| "unknown".into());

    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".into());
    let rustc_version =
        command_output(&rustc, &["--version"]).unwrap_or_else(|| "unknown".into());

    println!("cargo:rustc-env=IAM_ROLE_CLONER_GIT_COMMIT={git_commit}");
    println!("cargo:rustc-env=IAM_ROLE_CLONER_BUILD_DATE={build_date}");
    println!("cargo:rustc-env=IAM_ROLE_CLONER_RUSTC_VERSION={rustc_version}");
}
