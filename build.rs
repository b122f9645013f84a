use std::env;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");

    let commit = git(&["describe", "--always", "--dirty"]).unwrap_or_else(|| "unknown".into());
    let built = env::var("SOURCE_DATE_EPOCH").unwrap_or_else(|_| unix_now().to_string());

    println!("cargo:rustc-env=ROLES_GIT_SHA={commit}");
    println!("cargo:rustc-env=ROLES_BUILD_TS={built}");
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}
