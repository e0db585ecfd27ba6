// src/core/version_extractor.rs

use crate::{
    errors::SwankyError,
    system::executor::CommandRunner,
};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RUST_PATTERN: Regex = Regex::new(r"rustc (\S+)").expect("valid regex");
    static ref CARGO_PATTERN: Regex = Regex::new(r"cargo (\S+)").expect("valid regex");
    static ref CARGO_NIGHTLY_PATTERN: Regex =
        Regex::new(r"cargo (\S+-nightly)").expect("valid regex");
    static ref CARGO_DYLINT_PATTERN: Regex =
        Regex::new(r"cargo-dylint (\S+)").expect("valid regex");
    static ref CARGO_CONTRACT_PATTERN: Regex =
        Regex::new(r"cargo-contract(?:-contract)? (\d+\.\d+\.\d+(?:-rc[.\d]*)?)")
            .expect("valid regex");

    /// Every tool the `check` command looks for, in the order it looks for them.
    pub static ref TOOL_SPECS: Vec<ToolSpec> = vec![
        ToolSpec {
            key: "rust",
            label: "Rust",
            command: "rustc --version",
            pattern: &RUST_PATTERN,
            mandatory: true,
        },
        ToolSpec {
            key: "cargo",
            label: "cargo",
            command: "cargo -V",
            pattern: &CARGO_PATTERN,
            mandatory: true,
        },
        ToolSpec {
            key: "cargoNightly",
            label: "cargo nightly",
            command: "cargo +nightly -V",
            pattern: &CARGO_NIGHTLY_PATTERN,
            mandatory: false,
        },
        ToolSpec {
            key: "cargoDylint",
            label: "cargo dylint",
            command: "cargo dylint -V",
            pattern: &CARGO_DYLINT_PATTERN,
            mandatory: false,
        },
        ToolSpec {
            key: "cargoContract",
            label: "cargo-contract",
            command: "cargo contract -V",
            pattern: &CARGO_CONTRACT_PATTERN,
            mandatory: true,
        },
    ];
}

/// How to detect one tool, and whether its absence is fatal.
#[derive(Debug)]
pub struct ToolSpec {
    /// Key used in reports and in the `env` section of the project config.
    pub key: &'static str,
    pub label: &'static str,
    pub command: &'static str,
    pub pattern: &'static Regex,
    pub mandatory: bool,
}

impl ToolSpec {
    pub fn detect(&self, runner: &dyn CommandRunner) -> Result<Option<String>, SwankyError> {
        extract_version(runner, self.command, self.pattern)
    }
}

/// Runs `command` and pulls a version out of its stdout with the first capture group of
/// `pattern`.
///
/// A tool that cannot be spawned or exits non-zero is simply not installed: `Ok(None)`.
/// A tool that runs but prints something the pattern does not recognize is an error.
pub fn extract_version(
    runner: &dyn CommandRunner,
    command: &str,
    pattern: &Regex,
) -> Result<Option<String>, SwankyError> {
    let stdout = match runner.capture(command) {
        Ok(stdout) => stdout,
        Err(e) if e.is_absence() => {
            log::debug!("'{}' is not available: {}", command, e);
            return Ok(None);
        }
        Err(e) => {
            return Err(
                SwankyError::process(format!("Could not run '{}'.", command)).with_source(e),
            );
        }
    };

    pattern
        .captures(&stdout)
        .and_then(|caps| caps.get(1))
        .map(|m| Some(m.as_str().trim().to_string()))
        .ok_or_else(|| {
            SwankyError::process(format!(
                "'{}' is installed but its output format is unrecognized: '{}'",
                command,
                stdout.trim()
            ))
        })
}

pub fn rust_version(runner: &dyn CommandRunner) -> Result<Option<String>, SwankyError> {
    extract_version(runner, "rustc --version", &RUST_PATTERN)
}

pub fn cargo_version(runner: &dyn CommandRunner) -> Result<Option<String>, SwankyError> {
    extract_version(runner, "cargo -V", &CARGO_PATTERN)
}

pub fn cargo_nightly_version(runner: &dyn CommandRunner) -> Result<Option<String>, SwankyError> {
    extract_version(runner, "cargo +nightly -V", &CARGO_NIGHTLY_PATTERN)
}

pub fn cargo_dylint_version(runner: &dyn CommandRunner) -> Result<Option<String>, SwankyError> {
    extract_version(runner, "cargo dylint -V", &CARGO_DYLINT_PATTERN)
}

pub fn cargo_contract_version(runner: &dyn CommandRunner) -> Result<Option<String>, SwankyError> {
    extract_version(runner, "cargo contract -V", &CARGO_CONTRACT_PATTERN)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::system::executor::ExecutionError;
    use std::collections::HashMap;

    /// A runner answering from a table; unknown commands behave like missing binaries.
    #[derive(Debug, Default)]
    pub(crate) struct FakeRunner {
        pub(crate) outputs: HashMap<String, String>,
    }

    impl FakeRunner {
        pub(crate) fn with(mut self, command: &str, stdout: &str) -> Self {
            self.outputs.insert(command.to_string(), stdout.to_string());
            self
        }

        /// Output of a healthy toolchain with the given cargo-contract version.
        pub(crate) fn full_toolchain(cargo_contract: &str) -> Self {
            Self::default()
                .with("rustc --version", "rustc 1.76.0 (07dca489a 2024-02-04)\n")
                .with("cargo -V", "cargo 1.76.0 (c84b36747 2024-01-18)\n")
                .with(
                    "cargo +nightly -V",
                    "cargo 1.78.0-nightly (7b7af3077 2024-02-17)\n",
                )
                .with("cargo dylint -V", "cargo-dylint 2.6.1\n")
                .with(
                    "cargo contract -V",
                    &format!("cargo-contract-contract {}-unknown-x86_64-unknown-linux-gnu\n", cargo_contract),
                )
        }
    }

    impl CommandRunner for FakeRunner {
        fn capture(&self, command_line: &str) -> Result<String, ExecutionError> {
            self.outputs
                .get(command_line)
                .cloned()
                .ok_or_else(|| ExecutionError::NonZeroExitStatus(command_line.to_string()))
        }
    }

    #[test]
    fn test_concrete_extractors_parse_real_output() {
        let runner = FakeRunner::full_toolchain("3.2.0");
        assert_eq!(rust_version(&runner).unwrap().as_deref(), Some("1.76.0"));
        assert_eq!(cargo_version(&runner).unwrap().as_deref(), Some("1.76.0"));
        assert_eq!(
            cargo_nightly_version(&runner).unwrap().as_deref(),
            Some("1.78.0-nightly")
        );
        assert_eq!(cargo_dylint_version(&runner).unwrap().as_deref(), Some("2.6.1"));
        assert_eq!(cargo_contract_version(&runner).unwrap().as_deref(), Some("3.2.0"));
    }

    #[test]
    fn test_cargo_contract_release_candidate() {
        let runner = FakeRunner::default().with(
            "cargo contract -V",
            "cargo-contract-contract 4.0.0-rc.1-unknown-aarch64-apple-darwin",
        );
        assert_eq!(
            cargo_contract_version(&runner).unwrap().as_deref(),
            Some("4.0.0-rc.1")
        );
    }

    #[test]
    fn test_stable_cargo_does_not_count_as_nightly() {
        let runner = FakeRunner::default().with("cargo +nightly -V", "cargo 1.76.0 (c84b36747 2024-01-18)");
        let err = cargo_nightly_version(&runner).unwrap_err();
        assert!(matches!(err, SwankyError::Process { .. }));
    }

    #[test]
    fn test_absent_tool_is_none() {
        let runner = FakeRunner::default();
        for spec in TOOL_SPECS.iter() {
            assert_eq!(spec.detect(&runner).unwrap(), None, "{}", spec.key);
        }
    }

    #[test]
    fn test_unrecognized_output_is_process_error() {
        let runner = FakeRunner::default().with("rustc --version", "something else entirely");
        let err = rust_version(&runner).unwrap_err();
        assert!(matches!(err, SwankyError::Process { .. }));
        assert!(err.to_string().contains("unrecognized"));
    }

    #[test]
    fn test_only_core_tools_are_mandatory() {
        let mandatory: Vec<&str> = TOOL_SPECS
            .iter()
            .filter(|spec| spec.mandatory)
            .map(|spec| spec.key)
            .collect();
        assert_eq!(mandatory, vec!["rust", "cargo", "cargoContract"]);
    }
}
