// src/core/checker.rs

//! The `check` pipeline: host, toolchain, node and contract dependencies, evaluated
//! against each other. Every step runs even when an earlier one failed, so one pass
//! reports every problem at once.

use crate::{
    constants::{CONTRACTS_DIR, CONTRACT_MANIFEST_FILENAME},
    core::{
        compatibility::{self, CompatibilityEntry},
        manifest,
        task_pipeline::{Step, StepReport, TaskPipeline},
        version_extractor::{ToolSpec, TOOL_SPECS},
    },
    models::{CompatibilityReport, HostInfo, SwankyConfig},
    system::executor::CommandRunner,
};
use anyhow::{Result, anyhow, bail};
use std::collections::BTreeMap;
use std::path::Path;

/// What a check run looks at. The host and the table are injected so runs are reproducible.
#[derive(Debug, Clone)]
pub struct CheckInput<'a> {
    pub config: &'a SwankyConfig,
    /// Directory holding `contracts/`. Without it, contract dependencies are not read.
    pub project_root: Option<&'a Path>,
    pub host: HostInfo,
    pub table: &'a [CompatibilityEntry],
}

#[derive(Debug)]
pub struct CheckOutcome {
    pub report: CompatibilityReport,
    pub steps: Vec<StepReport>,
}

#[derive(Debug)]
struct CheckContext {
    host: HostInfo,
    tools: BTreeMap<String, Option<String>>,
    supported_ink: Option<String>,
    dependencies: BTreeMap<String, BTreeMap<String, String>>,
    mismatched: BTreeMap<String, String>,
    loose: bool,
    warnings: Vec<String>,
}

impl CheckContext {
    fn new(host: HostInfo) -> Self {
        Self {
            host,
            tools: BTreeMap::new(),
            supported_ink: None,
            dependencies: BTreeMap::new(),
            mismatched: BTreeMap::new(),
            loose: false,
            warnings: Vec::new(),
        }
    }

    fn installed(&self, key: &str) -> Option<&str> {
        self.tools.get(key).and_then(|v| v.as_deref())
    }

    /// Every (contract, dependency, declared version) triple found in the manifests.
    fn pairs(&self) -> Vec<(String, String, String)> {
        self.dependencies
            .iter()
            .flat_map(|(contract, deps)| {
                deps.iter()
                    .map(move |(dep, declared)| (contract.clone(), dep.clone(), declared.clone()))
            })
            .collect()
    }
}

/// Runs every check and folds the results into a report.
///
/// Failed steps become fatal entries. Missing optional tools become warnings.
pub fn run_check<'a>(
    input: CheckInput<'a>,
    runner: &'a dyn CommandRunner,
    render: bool,
) -> CheckOutcome {
    let CheckInput {
        config,
        project_root,
        host,
        table,
    } = input;

    let mut pipeline = TaskPipeline::new()
        .exit_on_error(false)
        .render(render)
        .step(Step::new(t!("check.step.os"), check_host));

    for spec in TOOL_SPECS.iter() {
        pipeline = pipeline.step(Step::new(
            format!(t!("check.step.tool"), tool = spec.label),
            move |ctx: &mut CheckContext| detect_tool(ctx, spec, runner),
        ));
    }

    let run = pipeline
        .step(
            Step::new(t!("check.step.node"), move |ctx: &mut CheckContext| {
                if config.node.supported_ink.trim().is_empty() {
                    ctx.warnings.push(t!("check.warning.node_without_ink").to_string());
                } else {
                    ctx.supported_ink = Some(config.node.supported_ink.clone());
                }
                Ok(())
            })
            .enabled(config.node.is_installed()),
        )
        .step(
            Step::new(t!("check.step.dependencies"), move |ctx: &mut CheckContext| {
                match project_root {
                    Some(root) => read_dependencies(ctx, config, root),
                    None => Ok(()),
                }
            })
            .enabled(project_root.is_some() && !config.contracts.is_empty()),
        )
        .step(
            Step::new(t!("check.step.node_compat"), check_against_node)
                .skip_if(|ctx| ctx.supported_ink.is_none() || ctx.dependencies.is_empty()),
        )
        .step(
            Step::new(t!("check.step.loose"), detect_loose_versions)
                .skip_if(|ctx| ctx.dependencies.is_empty()),
        )
        .step(
            Step::new(t!("check.step.compiler_compat"), move |ctx: &mut CheckContext| {
                check_against_compiler(ctx, table)
            })
            .skip_if(|ctx| ctx.installed("cargoContract").is_none()),
        )
        .run(CheckContext::new(host));

    let fatal: Vec<String> = run.failures().map(str::to_string).collect();

    let ctx = run.context;
    let missing_tools: Vec<String> = TOOL_SPECS
        .iter()
        .filter(|spec| matches!(ctx.tools.get(spec.key), Some(None)))
        .map(|spec| spec.key.to_string())
        .collect();

    let mut warnings = ctx.warnings;
    warnings.extend(
        TOOL_SPECS
            .iter()
            .filter(|spec| !spec.mandatory && missing_tools.iter().any(|k| k == spec.key))
            .map(|spec| format!(t!("check.warning.missing_tool"), tool = spec.label)),
    );

    log::info!(
        "Check finished: {} fatal, {} warnings, {} mismatches",
        fatal.len(),
        warnings.len(),
        ctx.mismatched.len()
    );

    CheckOutcome {
        report: CompatibilityReport {
            os: ctx.host,
            tools: ctx.tools,
            missing_tools,
            contract_dependency_versions: ctx.dependencies,
            mismatched_versions: ctx.mismatched,
            loose_version_detected: ctx.loose,
            fatal,
            warnings,
        },
        steps: run.steps,
    }
}

fn check_host(ctx: &mut CheckContext) -> Result<()> {
    if !ctx.host.is_supported() {
        bail!(format!(
            t!("check.fatal.unsupported_os"),
            platform = ctx.host.platform,
            architecture = ctx.host.architecture
        ));
    }
    Ok(())
}

/// An absent tool is recorded as `None`. For a mandatory tool that also fails the step.
fn detect_tool(ctx: &mut CheckContext, spec: &ToolSpec, runner: &dyn CommandRunner) -> Result<()> {
    let version = spec.detect(runner)?;
    let absent = version.is_none();
    ctx.tools.insert(spec.key.to_string(), version);

    if absent && spec.mandatory {
        bail!(format!(t!("check.fatal.missing_tool"), tool = spec.label));
    }
    Ok(())
}

/// Reads `contracts/<name>/Cargo.toml` for every configured contract. A missing manifest
/// is a warning; unreadable ones are collected and reported together.
fn read_dependencies(ctx: &mut CheckContext, config: &SwankyConfig, root: &Path) -> Result<()> {
    let mut errors = Vec::new();

    for name in config.contracts.keys() {
        let manifest_path = root
            .join(CONTRACTS_DIR)
            .join(name)
            .join(CONTRACT_MANIFEST_FILENAME);

        if !manifest_path.is_file() {
            ctx.warnings.push(format!(
                t!("check.warning.missing_manifest"),
                contract = name,
                path = manifest_path.display()
            ));
            continue;
        }

        match manifest::read_ink_dependencies(&manifest_path) {
            Ok(found) => {
                log::debug!("Contract '{}' declares {:?}", name, found);
                for dependency in &found.unversioned {
                    ctx.warnings.push(format!(
                        t!("check.warning.unversioned_dependency"),
                        dependency = dependency,
                        contract = name
                    ));
                }
                ctx.dependencies.insert(name.clone(), found.versions);
            }
            Err(e) => errors.push(e.to_string()),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(anyhow!(errors.join("; ")))
    }
}

fn check_against_node(ctx: &mut CheckContext) -> Result<()> {
    let Some(supported) = ctx.supported_ink.clone() else {
        return Ok(());
    };

    for (contract, dependency, declared) in ctx.pairs() {
        match compatibility::exceeds(&declared, &supported) {
            Some(true) => {
                ctx.mismatched.insert(
                    format!("{}-{}", contract, dependency),
                    format!(
                        t!("check.mismatch.node"),
                        dependency = dependency,
                        declared = declared,
                        contract = contract,
                        supported = supported
                    ),
                );
            }
            Some(false) => {}
            None => ctx.warnings.push(format!(
                t!("check.warning.unreadable_version"),
                version = declared,
                dependency = dependency,
                contract = contract
            )),
        }
    }
    Ok(())
}

fn detect_loose_versions(ctx: &mut CheckContext) -> Result<()> {
    let loose = ctx
        .dependencies
        .values()
        .flat_map(|deps| deps.values())
        .any(|declared| compatibility::is_loose_specifier(declared));

    if loose {
        ctx.loose = true;
        ctx.warnings.push(t!("check.warning.loose").to_string());
    }
    Ok(())
}

fn check_against_compiler(ctx: &mut CheckContext, table: &[CompatibilityEntry]) -> Result<()> {
    let Some(installed) = ctx.installed("cargoContract").map(str::to_string) else {
        return Ok(());
    };

    let Some(entry) = compatibility::select_entry(table, &installed)? else {
        bail!(format!(
            t!("check.fatal.unsupported_compiler"),
            version = installed
        ));
    };
    log::debug!(
        "cargo-contract {} accepts ink! {}",
        installed,
        entry.valid_ink_range
    );

    for (contract, dependency, declared) in ctx.pairs() {
        if compatibility::satisfies_range(&declared, entry.valid_ink_range)? == Some(false) {
            ctx.mismatched.insert(
                format!("{}-{}", contract, dependency),
                format!(
                    t!("check.mismatch.compiler"),
                    dependency = dependency,
                    declared = declared,
                    contract = contract,
                    range = entry.valid_ink_range,
                    compiler = installed
                ),
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compatibility::CARGO_CONTRACT_INK_DEPS;
    use crate::core::task_pipeline::StepOutcome;
    use crate::core::version_extractor::tests::FakeRunner;
    use crate::models::{ContractRecord, NodeInfo};
    use std::fs;
    use tempfile::TempDir;

    fn linux() -> HostInfo {
        HostInfo {
            platform: "linux".to_string(),
            architecture: "x64".to_string(),
        }
    }

    /// A project with a node supporting ink! 4.2.0 and one contract, `flipper`,
    /// declaring `ink = <ink_spec>`.
    fn project(ink_spec: &str) -> (TempDir, SwankyConfig) {
        let dir = TempDir::new().unwrap();
        let contract_dir = dir.path().join(CONTRACTS_DIR).join("flipper");
        fs::create_dir_all(&contract_dir).unwrap();
        fs::write(
            contract_dir.join(CONTRACT_MANIFEST_FILENAME),
            format!(
                "[package]\nname = \"flipper\"\nversion = \"0.1.0\"\n\n[dependencies]\nink = {{ version = \"{}\", default-features = false }}\n",
                ink_spec
            ),
        )
        .unwrap();

        let mut config = SwankyConfig {
            node: NodeInfo {
                local_path: "bin/swanky-node".to_string(),
                polkadot_pallet_versions: "polkadot-v0.9.39".to_string(),
                supported_ink: "4.2.0".to_string(),
                version: "1.6.0".to_string(),
            },
            ..SwankyConfig::default()
        };
        config
            .contracts
            .insert("flipper".to_string(), ContractRecord::new("flipper", "flipper"));
        (dir, config)
    }

    fn check(config: &SwankyConfig, root: Option<&Path>, runner: &FakeRunner) -> CheckOutcome {
        run_check(
            CheckInput {
                config,
                project_root: root,
                host: linux(),
                table: CARGO_CONTRACT_INK_DEPS,
            },
            runner,
            false,
        )
    }

    fn outcome_of<'a>(outcome: &'a CheckOutcome, title: &str) -> &'a StepOutcome {
        &outcome
            .steps
            .iter()
            .find(|s| s.title == title)
            .unwrap()
            .outcome
    }

    #[test]
    fn test_nothing_installed_is_fatal_for_mandatory_tools_only() {
        let config = SwankyConfig::default();
        let outcome = check(&config, None, &FakeRunner::default());
        let report = &outcome.report;

        for key in ["rust", "cargo", "cargoContract", "cargoNightly", "cargoDylint"] {
            assert!(report.missing_tools.iter().any(|k| k == key), "{}", key);
        }
        assert_eq!(report.fatal.len(), 3);
        assert!(!report.fatal.iter().any(|f| f.contains("dylint")));
        assert!(report.warnings.iter().any(|w| w.contains("dylint")));
        assert!(report.is_fatal());
        assert_eq!(report.tools.get("cargoDylint"), Some(&None));
        assert_eq!(
            outcome_of(&outcome, t!("check.step.compiler_compat")),
            &StepOutcome::Skipped
        );
    }

    #[test]
    fn test_pinned_dependency_within_node_support() {
        let (dir, config) = project("=4.2.0");
        let outcome = check(&config, Some(dir.path()), &FakeRunner::full_toolchain("3.2.0"));
        let report = &outcome.report;

        assert!(report.mismatched_versions.is_empty());
        assert!(!report.loose_version_detected);
        assert!(!report.is_fatal(), "{:?}", report.fatal);
        assert_eq!(report.contract_dependency_versions["flipper"]["ink"], "=4.2.0");
        assert!(report.missing_tools.is_empty());
    }

    #[test]
    fn test_caret_dependency_above_node_support() {
        let (dir, config) = project("^4.3.0");
        let outcome = check(&config, Some(dir.path()), &FakeRunner::full_toolchain("3.2.0"));
        let report = &outcome.report;

        assert_eq!(report.mismatched_versions.len(), 1);
        let message = &report.mismatched_versions["flipper-ink"];
        assert!(message.contains("flipper"));
        assert!(message.contains("^4.3.0"));
        assert!(report.loose_version_detected);
        assert!(!report.is_fatal());
    }

    #[test]
    fn test_unsupported_compiler_still_runs_node_pass() {
        let (dir, config) = project("^4.3.0");
        let outcome = check(&config, Some(dir.path()), &FakeRunner::full_toolchain("1.0.0"));
        let report = &outcome.report;

        assert_eq!(report.fatal.len(), 1);
        assert!(report.fatal[0].contains("1.0.0"));
        assert!(matches!(
            outcome_of(&outcome, t!("check.step.compiler_compat")),
            StepOutcome::Failed(_)
        ));
        assert_eq!(
            outcome_of(&outcome, t!("check.step.node_compat")),
            &StepOutcome::Succeeded
        );
        assert!(report.mismatched_versions.contains_key("flipper-ink"));
    }

    #[test]
    fn test_compiler_range_mismatch() {
        // cargo-contract 2.1.0 selects the "<4.2.0" row.
        let (dir, config) = project("=4.2.0");
        let outcome = check(&config, Some(dir.path()), &FakeRunner::full_toolchain("2.1.0"));
        let report = &outcome.report;

        assert!(report.mismatched_versions["flipper-ink"].contains("<4.2.0"));
        assert!(!report.is_fatal());
    }

    #[test]
    fn test_unsupported_host_does_not_stop_tool_checks() {
        let config = SwankyConfig::default();
        let outcome = run_check(
            CheckInput {
                config: &config,
                project_root: None,
                host: HostInfo {
                    platform: "win32".to_string(),
                    architecture: "x64".to_string(),
                },
                table: CARGO_CONTRACT_INK_DEPS,
            },
            &FakeRunner::full_toolchain("4.0.0"),
            false,
        );
        assert_eq!(outcome.report.fatal.len(), 1);
        assert!(outcome.report.fatal[0].contains("win32"));
        assert_eq!(
            outcome.report.tools.get("cargoContract"),
            Some(&Some("4.0.0".to_string()))
        );
    }

    #[test]
    fn test_unrecognized_tool_output_is_fatal_but_pipeline_continues() {
        let runner = FakeRunner::full_toolchain("3.2.0").with("rustc --version", "garbage");
        let config = SwankyConfig::default();
        let outcome = check(&config, None, &runner);

        assert_eq!(outcome.report.fatal.len(), 1);
        assert!(outcome.report.fatal[0].contains("rustc --version"));
        assert!(!outcome.report.tools.contains_key("rust"));
        assert_eq!(
            outcome.report.tools.get("cargo"),
            Some(&Some("1.76.0".to_string()))
        );
    }

    #[test]
    fn test_missing_manifest_is_a_warning_and_node_steps_skip() {
        let dir = TempDir::new().unwrap();
        let mut config = SwankyConfig::default();
        config
            .contracts
            .insert("ghost".to_string(), ContractRecord::new("ghost", "ghost"));

        let outcome = check(&config, Some(dir.path()), &FakeRunner::full_toolchain("3.2.0"));
        assert!(outcome.report.warnings.iter().any(|w| w.contains("ghost")));
        assert!(outcome.report.contract_dependency_versions.is_empty());
        assert_eq!(outcome_of(&outcome, t!("check.step.node")), &StepOutcome::Disabled);
        assert_eq!(
            outcome_of(&outcome, t!("check.step.node_compat")),
            &StepOutcome::Skipped
        );
        assert!(!outcome.report.is_fatal());
    }

    #[test]
    fn test_workspace_inherited_ink_is_reported() {
        let (dir, config) = project("=4.2.0");
        fs::write(
            dir.path()
                .join(CONTRACTS_DIR)
                .join("flipper")
                .join(CONTRACT_MANIFEST_FILENAME),
            "[package]\nname = \"flipper\"\n\n[dependencies]\nink = { workspace = true }\n",
        )
        .unwrap();

        let outcome = check(&config, Some(dir.path()), &FakeRunner::full_toolchain("3.2.0"));
        let report = &outcome.report;
        assert!(
            report
                .warnings
                .iter()
                .any(|w| w.contains("ink") && w.contains("flipper")),
            "{:?}",
            report.warnings
        );
        assert!(report.mismatched_versions.is_empty());
        assert!(!report.is_fatal());
    }

    #[test]
    fn test_malformed_manifest_fails_dependency_step() {
        let (dir, config) = project("=4.2.0");
        fs::write(
            dir.path()
                .join(CONTRACTS_DIR)
                .join("flipper")
                .join(CONTRACT_MANIFEST_FILENAME),
            "[dependencies\nink = ",
        )
        .unwrap();

        let outcome = check(&config, Some(dir.path()), &FakeRunner::full_toolchain("3.2.0"));
        assert!(matches!(
            outcome_of(&outcome, t!("check.step.dependencies")),
            StepOutcome::Failed(_)
        ));
        assert!(outcome.report.is_fatal());
    }
}
