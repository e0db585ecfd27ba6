// src/core/config_builder.rs

use crate::models::{
    AccountRecord, BuildRecord, ContractRecord, DeploymentRecord, NetworkInfo, SwankyConfig,
};

/// Fields of `NodeInfo` to overwrite; `None` leaves the current value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeSettingsPatch {
    pub local_path: Option<String>,
    pub polkadot_pallet_versions: Option<String>,
    pub supported_ink: Option<String>,
    pub version: Option<String>,
}

/// Produces a changed copy of a configuration snapshot.
///
/// The builder owns its own clone: whatever happens to the result (including a failed
/// write), the snapshot it was created from is never modified. Mutators only check
/// shape; semantic validation (does the alias exist, is the URL reachable) belongs to
/// the caller. Input that does not fit is ignored and logged.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: SwankyConfig,
}

impl ConfigBuilder {
    pub fn new(config: &SwankyConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn set_default_account(mut self, alias: impl Into<String>) -> Self {
        self.config.default_account = Some(alias.into());
        self
    }

    /// Appends an account unless its alias is taken or its mnemonic does not match `is_dev`.
    pub fn add_account(mut self, account: AccountRecord) -> Self {
        if !account.is_well_formed() {
            log::debug!("Ignoring malformed account record '{}'.", account.alias);
        } else if self.config.account(&account.alias).is_some() {
            log::debug!("Ignoring duplicate account alias '{}'.", account.alias);
        } else {
            self.config.accounts.push(account);
        }
        self
    }

    pub fn update_network(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.config
            .networks
            .insert(name.into(), NetworkInfo { url: url.into() });
        self
    }

    pub fn update_node_settings(mut self, patch: NodeSettingsPatch) -> Self {
        let node = &mut self.config.node;
        if let Some(local_path) = patch.local_path {
            node.local_path = local_path;
        }
        if let Some(pallets) = patch.polkadot_pallet_versions {
            node.polkadot_pallet_versions = pallets;
        }
        if let Some(supported_ink) = patch.supported_ink {
            node.supported_ink = supported_ink;
        }
        if let Some(version) = patch.version {
            node.version = version;
        }
        self
    }

    /// Registers a contract. An existing record with the same name is kept as is.
    pub fn add_contract(mut self, contract: ContractRecord) -> Self {
        if self.config.contracts.contains_key(&contract.name) {
            log::debug!("Contract '{}' is already registered.", contract.name);
        } else {
            self.config
                .contracts
                .insert(contract.name.clone(), contract);
        }
        self
    }

    /// Replaces the contract's build record with the one from a fresh compilation.
    pub fn add_contract_build(mut self, contract_name: &str, build: BuildRecord) -> Self {
        match self.config.contracts.get_mut(contract_name) {
            Some(contract) => contract.build = Some(build),
            None => log::debug!("Ignoring build for unknown contract '{}'.", contract_name),
        }
        self
    }

    pub fn add_contract_deployment(
        mut self,
        contract_name: &str,
        deployment: DeploymentRecord,
    ) -> Self {
        match self.config.contracts.get_mut(contract_name) {
            Some(contract) => contract.deployments.push(deployment),
            None => log::debug!(
                "Ignoring deployment for unknown contract '{}'.",
                contract_name
            ),
        }
        self
    }

    /// Marks the current build as verified. A contract without a build is left alone.
    pub fn set_contract_verified(mut self, contract_name: &str) -> Self {
        match self
            .config
            .contracts
            .get_mut(contract_name)
            .and_then(|c| c.build.as_mut())
        {
            Some(build) => build.is_verified = true,
            None => log::debug!("No build to verify for contract '{}'.", contract_name),
        }
        self
    }

    pub fn update_env<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.config
            .env
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn build(self) -> SwankyConfig {
        self.config
    }
}
