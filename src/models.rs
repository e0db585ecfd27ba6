// src/models.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::constants::{
    DEFAULT_ACCOUNT, DEFAULT_ASTAR_NETWORK_URL, DEFAULT_NETWORK_URL, DEFAULT_SHIBUYA_NETWORK_URL,
    DEFAULT_SHIDEN_NETWORK_URL,
};

// --- LOCAL (PROJECT) CONFIGURATION ---

/// Metadata about the chain node binary installed for a project.
///
/// An empty `version` means no node is installed.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    #[serde(default)]
    pub local_path: String,
    #[serde(default)]
    pub polkadot_pallet_versions: String,
    /// Highest ink! version the node binary supports.
    #[serde(default, alias = "supportedInkVersion")]
    pub supported_ink: String,
    #[serde(default)]
    pub version: String,
}

impl NodeInfo {
    pub fn is_installed(&self) -> bool {
        !self.version.trim().is_empty()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    Debug,
    Release,
    Verifiable,
}

impl std::fmt::Display for BuildMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Debug => "Debug",
            Self::Release => "Release",
            Self::Verifiable => "Verifiable",
        };
        f.write_str(s)
    }
}

/// The result of a successful compilation. Only `is_verified` changes after creation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BuildRecord {
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub artifacts_path: String,
    pub build_mode: BuildMode,
    #[serde(default)]
    pub is_verified: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub timestamp: u64,
    pub network_url: String,
    pub deployer_alias: String,
    pub address: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContractRecord {
    pub name: String,
    pub module_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<BuildRecord>,
    #[serde(default)]
    pub deployments: Vec<DeploymentRecord>,
}

impl ContractRecord {
    pub fn new(name: &str, module_name: &str) -> Self {
        Self {
            name: name.to_string(),
            module_name: module_name.to_string(),
            build: None,
            deployments: Vec::new(),
        }
    }

    /// Deployments are only ever appended, so the newest one is the last.
    pub fn latest_deployment(&self) -> Option<&DeploymentRecord> {
        self.deployments.last()
    }
}

/// The per-project document (`swanky.config.json` in the project root).
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default)]
    pub node: NodeInfo,
    #[serde(default)]
    pub contracts: BTreeMap<String, ContractRecord>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

// --- SYSTEM (USER) CONFIGURATION ---

/// Output of the password-keyed encryption applied to non-dev mnemonics.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EncryptedBlob {
    pub iv: String,
    #[serde(alias = "cipherText")]
    pub data: String,
}

/// A mnemonic is stored in plaintext for dev accounts and encrypted otherwise.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Mnemonic {
    Plain(String),
    Encrypted(EncryptedBlob),
}

impl Mnemonic {
    pub fn is_plain(&self) -> bool {
        matches!(self, Self::Plain(_))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub alias: String,
    pub mnemonic: Mnemonic,
    #[serde(default)]
    pub is_dev: bool,
    pub address: String,
}

impl AccountRecord {
    /// A dev account keeps its mnemonic in plaintext; any other account keeps it encrypted.
    pub fn is_well_formed(&self) -> bool {
        match &self.mnemonic {
            Mnemonic::Plain(_) => self.is_dev,
            Mnemonic::Encrypted(blob) => {
                !self.is_dev && hex::decode(&blob.iv).is_ok() && hex::decode(&blob.data).is_ok()
            }
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NetworkInfo {
    pub url: String,
}

/// The per-user document (`<home>/swanky/swanky.config.json`).
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SystemConfig {
    #[serde(default)]
    pub default_account: Option<String>,
    #[serde(default)]
    pub accounts: Vec<AccountRecord>,
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkInfo>,
}

impl SystemConfig {
    /// The document written the first time a command persists user-level settings:
    /// the well-known dev accounts and the public networks.
    pub fn seeded() -> Self {
        let dev = |alias: &str, uri: &str, address: &str| AccountRecord {
            alias: alias.to_string(),
            mnemonic: Mnemonic::Plain(uri.to_string()),
            is_dev: true,
            address: address.to_string(),
        };

        let networks = [
            ("local", DEFAULT_NETWORK_URL),
            ("astar", DEFAULT_ASTAR_NETWORK_URL),
            ("shiden", DEFAULT_SHIDEN_NETWORK_URL),
            ("shibuya", DEFAULT_SHIBUYA_NETWORK_URL),
        ]
        .into_iter()
        .map(|(name, url)| {
            (
                name.to_string(),
                NetworkInfo {
                    url: url.to_string(),
                },
            )
        })
        .collect();

        Self {
            default_account: Some(DEFAULT_ACCOUNT.to_string()),
            accounts: vec![
                dev(
                    "alice",
                    "//Alice",
                    "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY",
                ),
                dev(
                    "bob",
                    "//Bob",
                    "5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty",
                ),
            ],
            networks,
        }
    }
}

// --- MERGED VIEW ---

/// The configuration a command works with: the project fields come from the local
/// document, the user fields from the system document. See `config_store::merge`.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SwankyConfig {
    pub node: NodeInfo,
    pub contracts: BTreeMap<String, ContractRecord>,
    pub env: BTreeMap<String, String>,
    pub default_account: Option<String>,
    pub accounts: Vec<AccountRecord>,
    pub networks: BTreeMap<String, NetworkInfo>,
}

impl SwankyConfig {
    /// The fields owned by the local layer.
    pub fn project_layer(&self) -> ProjectConfig {
        ProjectConfig {
            node: self.node.clone(),
            contracts: self.contracts.clone(),
            env: self.env.clone(),
        }
    }

    /// The fields owned by the global layer.
    pub fn system_layer(&self) -> SystemConfig {
        SystemConfig {
            default_account: self.default_account.clone(),
            accounts: self.accounts.clone(),
            networks: self.networks.clone(),
        }
    }

    pub fn account(&self, alias: &str) -> Option<&AccountRecord> {
        self.accounts.iter().find(|a| a.alias == alias)
    }
}

// --- COMPATIBILITY REPORT ---

/// Operating system and CPU architecture, named the way release artifacts name them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    pub platform: String,
    pub architecture: String,
}

impl HostInfo {
    pub const SUPPORTED_PLATFORMS: &'static [&'static str] = &["darwin", "linux"];
    pub const SUPPORTED_ARCHITECTURES: &'static [&'static str] = &["arm64", "x64"];

    /// Detects the host this binary runs on.
    pub fn current() -> Self {
        let platform = match std::env::consts::OS {
            "macos" => "darwin",
            "windows" => "win32",
            other => other,
        };
        let architecture = match std::env::consts::ARCH {
            "x86_64" => "x64",
            "aarch64" => "arm64",
            "x86" => "ia32",
            other => other,
        };
        Self {
            platform: platform.to_string(),
            architecture: architecture.to_string(),
        }
    }

    pub fn is_supported(&self) -> bool {
        Self::SUPPORTED_PLATFORMS.contains(&self.platform.as_str())
            && Self::SUPPORTED_ARCHITECTURES.contains(&self.architecture.as_str())
    }
}

/// Everything the `check` command found. Built fresh on every run.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityReport {
    pub os: HostInfo,
    /// Tool key to detected version; `None` when the tool is not installed.
    pub tools: BTreeMap<String, Option<String>>,
    pub missing_tools: Vec<String>,
    pub contract_dependency_versions: BTreeMap<String, BTreeMap<String, String>>,
    /// Keyed by `"{contract}-{dependency}"`.
    pub mismatched_versions: BTreeMap<String, String>,
    pub loose_version_detected: bool,
    pub fatal: Vec<String>,
    pub warnings: Vec<String>,
}

impl CompatibilityReport {
    pub fn is_fatal(&self) -> bool {
        !self.fatal.is_empty()
    }

    /// The document written by `check --print`: host info plus every version found.
    pub fn to_export_json(&self) -> serde_json::Value {
        serde_json::json!({
            "os": self.os,
            "versions": {
                "tools": self.tools,
                "missingTools": self.missing_tools,
                "contracts": self.contract_dependency_versions,
            },
            "mismatchedVersions": self.mismatched_versions,
            "looseVersionDetected": self.loose_version_detected,
            "fatal": self.fatal,
            "warnings": self.warnings,
        })
    }
}

/// Milliseconds since the Unix epoch, as stored in build and deployment records.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_config_reads_camel_case_and_aliases() {
        let json = r#"{
            "node": {
                "localPath": "/bin/swanky-node",
                "polkadotPalletVersions": "polkadot-v0.9.39",
                "supportedInkVersion": "4.2.0",
                "version": "1.6.0"
            },
            "contracts": {
                "flipper": {
                    "name": "flipper",
                    "moduleName": "flipper",
                    "build": {
                        "timestamp": 1700000000000,
                        "artifactsPath": "artifacts/flipper",
                        "buildMode": "Release",
                        "isVerified": false
                    },
                    "deployments": []
                }
            }
        }"#;
        let config: ProjectConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.node.supported_ink, "4.2.0");
        assert!(config.node.is_installed());
        assert!(config.env.is_empty());
        let build = config.contracts["flipper"].build.as_ref().unwrap();
        assert_eq!(build.build_mode, BuildMode::Release);
    }

    #[test]
    fn test_mnemonic_untagged_forms() {
        let json = r#"[
            {"alias": "alice", "mnemonic": "//Alice", "isDev": true, "address": "5Grw"},
            {"alias": "prod", "mnemonic": {"iv": "00ff", "cipherText": "abcd"}, "isDev": false, "address": "5Fhn"}
        ]"#;
        let accounts: Vec<AccountRecord> = serde_json::from_str(json).unwrap();
        assert!(accounts[0].mnemonic.is_plain());
        assert!(accounts[0].is_well_formed());
        match &accounts[1].mnemonic {
            Mnemonic::Encrypted(blob) => assert_eq!(blob.data, "abcd"),
            Mnemonic::Plain(_) => panic!("Expected an encrypted mnemonic"),
        }
        assert!(accounts[1].is_well_formed());
    }

    #[test]
    fn test_account_shape_rules() {
        let plain_but_not_dev = AccountRecord {
            alias: "x".to_string(),
            mnemonic: Mnemonic::Plain("word word".to_string()),
            is_dev: false,
            address: "5x".to_string(),
        };
        assert!(!plain_but_not_dev.is_well_formed());

        let bad_hex = AccountRecord {
            alias: "y".to_string(),
            mnemonic: Mnemonic::Encrypted(EncryptedBlob {
                iv: "not-hex".to_string(),
                data: "00".to_string(),
            }),
            is_dev: false,
            address: "5y".to_string(),
        };
        assert!(!bad_hex.is_well_formed());
    }

    #[test]
    fn test_seeded_system_config_is_consistent() {
        let seeded = SystemConfig::seeded();
        let default = seeded.default_account.as_deref().unwrap();
        assert!(seeded.accounts.iter().any(|a| a.alias == default));
        assert!(seeded.accounts.iter().all(AccountRecord::is_well_formed));
        assert_eq!(seeded.networks["local"].url, DEFAULT_NETWORK_URL);
    }

    #[test]
    fn test_latest_deployment_is_last_appended() {
        let mut contract = ContractRecord::new("flipper", "flipper");
        assert!(contract.latest_deployment().is_none());
        for (ts, address) in [(1, "5A"), (2, "5B")] {
            contract.deployments.push(DeploymentRecord {
                timestamp: ts,
                network_url: DEFAULT_NETWORK_URL.to_string(),
                deployer_alias: "alice".to_string(),
                address: address.to_string(),
            });
        }
        assert_eq!(contract.latest_deployment().unwrap().address, "5B");
    }

    #[test]
    fn test_host_support_matrix() {
        let host = |p: &str, a: &str| HostInfo {
            platform: p.to_string(),
            architecture: a.to_string(),
        };
        assert!(host("linux", "x64").is_supported());
        assert!(host("darwin", "arm64").is_supported());
        assert!(!host("win32", "x64").is_supported());
        assert!(!host("linux", "ia32").is_supported());
    }

    #[test]
    fn test_export_json_shape() {
        let report = CompatibilityReport {
            os: HostInfo {
                platform: "linux".to_string(),
                architecture: "x64".to_string(),
            },
            tools: BTreeMap::from([("rust".to_string(), Some("1.76.0".to_string()))]),
            missing_tools: vec!["cargoDylint".to_string()],
            contract_dependency_versions: BTreeMap::new(),
            mismatched_versions: BTreeMap::new(),
            loose_version_detected: false,
            fatal: Vec::new(),
            warnings: Vec::new(),
        };
        let json = report.to_export_json();
        assert_eq!(json["os"]["platform"], "linux");
        assert_eq!(json["versions"]["tools"]["rust"], "1.76.0");
        assert_eq!(json["versions"]["missingTools"][0], "cargoDylint");
        assert!(!report.is_fatal());
    }
}
