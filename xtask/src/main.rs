//! Development automation tasks for the `ScanBridge` workspace.
//!
//! Run with: `cargo xtask <command>`
//!
//! This is a CLI tool for developers, so `println!` and `eprintln!` are
//! intentionally used for user-facing output rather than structured logging.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::env;
use std::process::{Command, ExitCode};

use anyhow::{bail, Context};

fn main() -> ExitCode {
    let task = env::args().nth(1);

    let result = match task.as_deref() {
        Some("ci") => run_ci(),
        Some("fmt") => run_fmt(),
        Some("clippy") => run_clippy(),
        Some("check-bin") => check_binary(),
        Some("test") => run_test(),
        Some("deny") => run_deny(),
        Some("audit") => run_audit(),
        Some("help") | None => {
            print_help();
            Ok(())
        }
        Some(unknown) => {
            eprintln!("Unknown task: {unknown}");
            eprintln!();
            print_help();
            Err(anyhow::anyhow!("Unknown task"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Task failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn print_help() {
    println!("ScanBridge Development Tasks");
    println!();
    println!("USAGE:");
    println!("    cargo xtask <TASK>");
    println!();
    println!("TASKS:");
    println!("    ci         Run all CI checks (fmt, clippy, check-bin, test, deny, audit)");
    println!("    fmt        Check Rust code formatting");
    println!("    clippy     Run Clippy lints");
    println!("    check-bin  Verify the scanbridge binary compiles");
    println!("    test       Run all tests");
    println!("    deny       Check dependencies with cargo-deny");
    println!("    audit      Audit dependencies for security vulnerabilities");
    println!("    help       Show this help message");
}

/// Run all CI checks in sequence
fn run_ci() -> anyhow::Result<()> {
    type Step = (&'static str, fn() -> anyhow::Result<()>);
    const STEPS: [Step; 6] = [
        ("Checking Rust format", run_fmt),
        ("Running Clippy", run_clippy),
        ("Verifying the scanbridge binary", check_binary),
        ("Running tests", run_test),
        ("Checking dependencies", run_deny),
        ("Auditing dependencies", run_audit),
    ];

    println!("==> Running CI checks...\n");

    for (index, (title, step)) in STEPS.iter().enumerate() {
        println!("==> Step {}/{}: {title}...", index + 1, STEPS.len());
        step()?;
        println!();
    }

    println!("✓ All CI checks passed!");
    Ok(())
}

/// Run `cargo <args>` and fail with `message` on a non-zero exit.
fn cargo(args: &[&str], message: &str) -> anyhow::Result<()> {
    let status = Command::new("cargo")
        .args(args)
        .status()
        .with_context(|| format!("Failed to run cargo {}", args.join(" ")))?;

    if !status.success() {
        bail!("{message}");
    }

    Ok(())
}

/// Fail early when an optional cargo subcommand is missing.
fn ensure_installed(subcommand: &str) -> anyhow::Result<()> {
    let check_installed = Command::new("cargo").args([subcommand, "--version"]).output();

    if check_installed.is_err() || !check_installed.as_ref().is_ok_and(|o| o.status.success()) {
        eprintln!("cargo-{subcommand} is not installed.");
        eprintln!("Install it with: cargo install cargo-{subcommand}");
        bail!("cargo-{subcommand} not found");
    }

    Ok(())
}

/// Check Rust code formatting
fn run_fmt() -> anyhow::Result<()> {
    cargo(&["fmt", "--all", "--", "--check"], "Format check failed. Run 'cargo fmt --all' to fix.")
}

/// Run Clippy lints
fn run_clippy() -> anyhow::Result<()> {
    cargo(
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
        "Clippy run failed. See output above.",
    )
}

/// Verify the binary crate compiles
fn check_binary() -> anyhow::Result<()> {
    println!("Checking scanbridge-app compiles...");
    cargo(&["check", "-p", "scanbridge-app", "--bin", "scanbridge"], "scanbridge-app check failed")?;
    println!("✓ scanbridge-app compiles successfully");
    Ok(())
}

/// Run all workspace tests
fn run_test() -> anyhow::Result<()> {
    cargo(&["test", "--workspace"], "Tests failed")
}

/// Check dependencies with cargo-deny
fn run_deny() -> anyhow::Result<()> {
    ensure_installed("deny")?;
    cargo(&["deny", "check"], "cargo-deny found issues")
}

/// Audit dependencies for security vulnerabilities
fn run_audit() -> anyhow::Result<()> {
    ensure_installed("audit")?;
    cargo(&["audit"], "cargo-audit found vulnerabilities")
}
