use super::{metadata::ContractMetadata, CompilationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Compilation result as published by the compiler plugin:
/// the compiler standard json output plus the sources it was fed with.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CompilationResult {
    pub data: CompilerOutput,
    pub source: CompilationSource,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CompilerOutput {
    /// `file -> contract name -> contract`
    #[serde(default)]
    pub contracts: BTreeMap<String, BTreeMap<String, CompiledContract>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CompiledContract {
    #[serde(default)]
    pub abi: Value,
    /// Metadata json, serialized into a string by the compiler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub evm: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CompilationSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default)]
    pub sources: BTreeMap<String, SourceFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceFile {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardJsonInput {
    pub language: String,
    pub sources: BTreeMap<String, SourceFile>,
    pub settings: StandardJsonSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardJsonSettings {
    pub optimizer: OptimizerSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evm_version: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct OptimizerSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_runs")]
    pub runs: u64,
}

fn default_runs() -> u64 {
    200
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            runs: default_runs(),
        }
    }
}

/// Compiled contract found by name.
#[derive(Debug, Clone, Copy)]
pub struct ContractRef<'a> {
    pub file: &'a str,
    pub name: &'a str,
    pub contract: &'a CompiledContract,
}

impl<'a> ContractRef<'a> {
    /// Fully qualified name in the `<file>:<contract>` form explorers expect.
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.file, self.name)
    }

    pub fn abi(&self) -> Result<ethabi::Contract, CompilationError> {
        let abi = match &self.contract.abi {
            Value::Null => Value::Array(vec![]),
            abi => abi.clone(),
        };
        serde_json::from_value(abi).map_err(|source| CompilationError::InvalidAbi {
            contract: self.name.to_string(),
            source,
        })
    }

    pub fn metadata(&self) -> Result<ContractMetadata, CompilationError> {
        let metadata = self
            .contract
            .metadata
            .as_deref()
            .filter(|metadata| !metadata.is_empty())
            .ok_or_else(|| CompilationError::MissingMetadata(self.name.to_string()))?;
        serde_json::from_str(metadata).map_err(|source| CompilationError::InvalidMetadata {
            contract: self.name.to_string(),
            source,
        })
    }
}

impl CompilationResult {
    /// Names of every compiled contract, sorted and deduplicated.
    pub fn contract_names(&self) -> Vec<String> {
        self.data
            .contracts
            .values()
            .flat_map(|contracts| contracts.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn has_contract(&self, name: &str) -> bool {
        self.find_contract(name).is_some()
    }

    /// Looks a contract up by its name.
    ///
    /// When several files declare the same name, the one in the
    /// compilation target wins, otherwise the first file in order.
    pub fn find_contract(&self, name: &str) -> Option<ContractRef<'_>> {
        let mut found = self.data.contracts.iter().filter_map(|(file, contracts)| {
            contracts
                .get_key_value(name)
                .map(|(name, contract)| ContractRef {
                    file: file.as_str(),
                    name: name.as_str(),
                    contract,
                })
        });
        let first = found.next()?;
        let target = self.source.target.as_deref();
        if target == Some(first.file) {
            return Some(first);
        }
        Some(found.find(|c| Some(c.file) == target).unwrap_or(first))
    }

    fn contract(&self, name: &str) -> Result<ContractRef<'_>, CompilationError> {
        self.find_contract(name)
            .ok_or_else(|| CompilationError::ContractNotFound(name.to_string()))
    }

    pub fn metadata(&self, name: &str) -> Result<ContractMetadata, CompilationError> {
        self.contract(name)?.metadata()
    }

    /// Compiler version in the `v<version>` form, e.g. `v0.8.7+commit.e28d00a7`.
    pub fn compiler_version(&self, name: &str) -> Result<String, CompilationError> {
        let metadata = self.metadata(name)?;
        Ok(format!("v{}", metadata.compiler.version))
    }

    /// Standard json input reproducing the compilation of `name`.
    pub fn standard_json_input(&self, name: &str) -> Result<StandardJsonInput, CompilationError> {
        let metadata = self.metadata(name)?;
        Ok(StandardJsonInput {
            language: metadata.language,
            sources: self.source.sources.clone(),
            settings: StandardJsonSettings {
                optimizer: metadata.settings.optimizer,
                evm_version: metadata.settings.evm_version,
            },
        })
    }
}
