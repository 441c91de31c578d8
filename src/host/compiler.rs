use super::bus::{call_typed, BusError, PluginClient};
use crate::{compilation::CompilationResult, constructor_args::ConstructorInput};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

pub const SOLIDITY_PLUGIN: &str = "solidity";
pub const ARTEFACTS_PLUGIN: &str = "compilerArtefacts";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContractArtefact {
    #[serde(default)]
    pub abi: Value,
}

#[derive(Debug, Default, Deserialize)]
struct ArtefactResponse {
    artefact: Option<ContractArtefact>,
}

impl ContractArtefact {
    /// Constructor parameters declared in the abi, empty when the contract
    /// has no constructor or the abi cannot be read.
    pub fn constructor_inputs(&self) -> Vec<ConstructorInput> {
        match serde_json::from_value::<ethabi::Contract>(self.abi.clone()) {
            Ok(abi) => abi
                .constructor
                .map(|constructor| {
                    constructor
                        .inputs
                        .iter()
                        .map(ConstructorInput::from)
                        .collect()
                })
                .unwrap_or_default(),
            Err(err) => {
                tracing::warn!(err = %err, "artefact abi cannot be parsed");
                vec![]
            }
        }
    }
}

/// Typed access to the compiler related plugins of the host.
#[derive(Clone)]
pub struct CompilerApi {
    client: Arc<dyn PluginClient>,
}

impl CompilerApi {
    pub fn new(client: Arc<dyn PluginClient>) -> Self {
        Self { client }
    }

    /// Latest compilation result, `None` if nothing was compiled yet.
    pub async fn compilation_result(&self) -> Result<Option<CompilationResult>, BusError> {
        call_typed(
            self.client.as_ref(),
            SOLIDITY_PLUGIN,
            "getCompilationResult",
            vec![],
        )
        .await
    }

    pub async fn artefact(
        &self,
        contract_name: &str,
    ) -> Result<Option<ContractArtefact>, BusError> {
        let response: Option<ArtefactResponse> = call_typed(
            self.client.as_ref(),
            ARTEFACTS_PLUGIN,
            "getArtefactsByContractName",
            vec![Value::String(contract_name.to_string())],
        )
        .await?;
        Ok(response.and_then(|response| response.artefact))
    }
}
