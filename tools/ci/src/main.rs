//! Runs the workspace checks locally, the same way CI runs them.
//!
//! Results may differ from CI runs when the local toolchain is not the latest stable.

use std::process;

use hashbrown::HashSet;
use itertools::Itertools;
use xshell::{cmd, Shell};

/// The checks that can be run in CI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Check {
    Format,
    Clippy,
    Test,
    DocTest,
    DocCheck,
    BenchCheck,
}

impl Check {
    /// Every check, in the order they run.
    const ALL: [Check; 6] = [
        Check::Format,
        Check::Clippy,
        Check::Test,
        Check::DocTest,
        Check::DocCheck,
        Check::BenchCheck,
    ];

    /// Returns the argument that corresponds to this check.
    fn argument(&self) -> &'static str {
        match self {
            Check::Format => "format",
            Check::Clippy => "clippy",
            Check::Test => "test",
            Check::DocTest => "doctest",
            Check::DocCheck => "doccheck",
            Check::BenchCheck => "benchcheck",
        }
    }

    /// Returns the [`Check`] that corresponds to the given argument.
    fn from_argument(argument: &str) -> Option<Check> {
        Check::ALL
            .into_iter()
            .find(|check| check.argument() == argument)
    }
}

/// Controls how clippy is run.
const CLIPPY_FLAGS: [&str; 3] = [
    "-Aclippy::type_complexity",
    "-Wclippy::doc_markdown",
    "-Dwarnings",
];

/// Parses the requested checks, or `None` if any argument is unknown.
fn parse_checks<'a>(args: impl IntoIterator<Item = &'a str>) -> Option<HashSet<Check>> {
    let requested: Vec<&str> = args.into_iter().collect();
    if requested.is_empty() {
        return Some(Check::ALL.into_iter().collect());
    }

    requested.into_iter().map(Check::from_argument).collect()
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(what_to_run) = parse_checks(args.iter().map(String::as_str)) else {
        println!(
            "Invalid arguments: {}.\nEnter any of: {}.",
            args.join(" "),
            Check::ALL.iter().map(Check::argument).join(", "),
        );
        process::exit(1);
    };

    let sh = Shell::new().unwrap();

    if what_to_run.contains(&Check::Format) {
        cmd!(sh, "cargo fmt --all -- --check")
            .run()
            .expect("Please run 'cargo fmt --all' to format your code.");
    }

    if what_to_run.contains(&Check::Clippy) {
        cmd!(sh, "cargo clippy --workspace --all-targets -- {CLIPPY_FLAGS...}")
            .run()
            .expect("Please fix clippy errors in output above.");
    }

    if what_to_run.contains(&Check::Test) {
        // Doc tests run separately
        cmd!(sh, "cargo test --workspace --lib --bins --tests")
            .run()
            .expect("Please fix failing tests in output above.");
    }

    if what_to_run.contains(&Check::DocTest) {
        cmd!(sh, "cargo test --workspace --doc")
            .run()
            .expect("Please fix failing doc-tests in output above.");
    }

    if what_to_run.contains(&Check::DocCheck) {
        // Building docs must not emit warnings
        cmd!(sh, "cargo doc --workspace --no-deps --document-private-items")
            .env("RUSTDOCFLAGS", "-D warnings")
            .run()
            .expect("Please fix doc warnings in output above.");
    }

    if what_to_run.contains(&Check::BenchCheck) {
        cmd!(sh, "cargo bench --package hexboard_lib --no-run")
            .run()
            .expect("Please fix benchmark compile errors in output above.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_from_argument_reverses() {
        for check in Check::ALL {
            assert_eq!(Check::from_argument(check.argument()), Some(check));
        }
        assert_eq!(Check::from_argument("invalid"), None);
    }

    #[test]
    fn no_arguments_runs_everything() {
        assert_eq!(parse_checks([]).unwrap().len(), Check::ALL.len());
    }

    #[test]
    fn several_checks_can_be_requested() {
        let checks = parse_checks(["format", "test"]).unwrap();

        assert_eq!(checks.len(), 2);
        assert!(checks.contains(&Check::Format) && checks.contains(&Check::Test));
        assert!(parse_checks(["format", "nope"]).is_none());
    }
}
