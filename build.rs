use std::env;
use std::process::Command;

const UNKNOWN: &str = "unknown";

fn main() {
    for path in ["build.rs", ".git/HEAD", ".git/refs"] {
        println!("cargo:rerun-if-changed={path}");
    }

    let hash = capture("git", &["rev-parse", "--short", "HEAD"]);
    let status = Command::new("git")
        .args(["status", "--porcelain"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| {
            if output.stdout.iter().all(u8::is_ascii_whitespace) {
                "clean"
            } else {
                "dirty"
            }
        })
        .unwrap_or(UNKNOWN);
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);

    emit("HASH", &hash.unwrap_or_else(|| UNKNOWN.into()));
    emit("STATUS", status);
    emit("TIMESTAMP", &timestamp);
    emit("TARGET", &env::var("TARGET").unwrap_or_else(|_| UNKNOWN.into()));
    emit("PROFILE", &env::var("PROFILE").unwrap_or_else(|_| UNKNOWN.into()));
    emit(
        "RUSTC",
        &capture("rustc", &["--version"]).unwrap_or_else(|| UNKNOWN.into()),
    );
}

fn emit(name: &str, value: &str) {
    println!("cargo:rustc-env=EXOTRACK_BUILD_{name}={value}");
}

/// Trimmed stdout of a successful command, if any.
fn capture(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
