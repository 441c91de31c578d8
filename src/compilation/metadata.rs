use super::result::OptimizerSettings;
use serde::Deserialize;
use std::collections::BTreeMap;

/// The parts of the compiler metadata json an explorer needs to recompile
/// a contract.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContractMetadata {
    pub compiler: MetadataCompiler,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub settings: MetadataSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MetadataCompiler {
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataSettings {
    #[serde(default)]
    pub optimizer: OptimizerSettings,
    pub evm_version: Option<String>,
    #[serde(default)]
    pub compilation_target: BTreeMap<String, String>,
}

fn default_language() -> String {
    "Solidity".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::parse::test_deserialize_ok;

    #[test]
    fn parse_metadata() {
        test_deserialize_ok(vec![
            (
                r#"{
                    "compiler": { "version": "0.6.8+commit.0bbfe453" },
                    "language": "Solidity",
                    "output": { "abi": [] },
                    "settings": {
                        "compilationTarget": { "contracts/ExternalTestMultiple.sol": "ExternalTestMultiple" },
                        "evmVersion": "istanbul",
                        "libraries": {},
                        "metadata": { "bytecodeHash": "ipfs" },
                        "optimizer": { "enabled": true, "runs": 300 },
                        "remappings": []
                    },
                    "version": 1
                }"#,
                ContractMetadata {
                    compiler: MetadataCompiler {
                        version: "0.6.8+commit.0bbfe453".into(),
                    },
                    language: "Solidity".into(),
                    settings: MetadataSettings {
                        optimizer: OptimizerSettings {
                            enabled: true,
                            runs: 300,
                        },
                        evm_version: Some("istanbul".into()),
                        compilation_target: BTreeMap::from([(
                            "contracts/ExternalTestMultiple.sol".into(),
                            "ExternalTestMultiple".into(),
                        )]),
                    },
                },
            ),
            (
                r#"{ "compiler": { "version": "0.8.7+commit.e28d00a7" } }"#,
                ContractMetadata {
                    compiler: MetadataCompiler {
                        version: "0.8.7+commit.e28d00a7".into(),
                    },
                    language: "Solidity".into(),
                    settings: Default::default(),
                },
            ),
        ]);
    }
}
