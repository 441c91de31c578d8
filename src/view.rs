use crate::{
    consts::UNSUPPORTED_NETWORK,
    constructor_args::{ConstructorArgument, ConstructorInput},
    host::{BusError, CompilerApi, NetworkWatcher, PluginClient},
    verification::{
        Field, FieldErrors, FormValues, ReceiptSink, VerificationFlow, VerificationResult,
        VerificationService,
    },
};
use std::{collections::BTreeSet, sync::Arc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Idle,
    Validating,
    Submitting,
    Verified,
}

const REQUIRED_FIELDS: [Field; 2] = [Field::ContractName, Field::ContractAddress];

/// State behind the verification form.
///
/// The network status subscription lives as long as the view does.
pub struct VerifyView<S> {
    flow: VerificationFlow<S>,
    compiler: CompilerApi,
    network: NetworkWatcher,
    contracts: Vec<String>,
    form: FormValues,
    constructor_inputs: Vec<ConstructorInput>,
    touched: BTreeSet<Field>,
    field_errors: FieldErrors,
    state: FormState,
    result: Option<VerificationResult>,
}

/// Puts an abandoned submission back to `Idle`.
struct SubmissionGuard<'a> {
    state: &'a mut FormState,
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        if *self.state == FormState::Submitting {
            *self.state = FormState::Idle;
        }
    }
}

impl<S: VerificationService> VerifyView<S> {
    pub fn new(client: Arc<dyn PluginClient>, service: S, receipts: Arc<dyn ReceiptSink>) -> Self {
        let compiler = CompilerApi::new(client.clone());
        Self {
            flow: VerificationFlow::new(compiler.clone(), service, receipts),
            compiler,
            network: NetworkWatcher::new(client),
            contracts: vec![],
            form: FormValues::default(),
            constructor_inputs: vec![],
            touched: BTreeSet::new(),
            field_errors: FieldErrors::default(),
            state: FormState::Idle,
            result: None,
        }
    }

    pub fn contracts(&self) -> &[String] {
        &self.contracts
    }

    pub fn form(&self) -> &FormValues {
        &self.form
    }

    pub fn constructor_inputs(&self) -> &[ConstructorInput] {
        &self.constructor_inputs
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// Result of the last submission.
    pub fn result(&self) -> Option<&VerificationResult> {
        self.result.as_ref()
    }

    pub fn network_name(&self) -> String {
        self.network.network_name()
    }

    pub fn flow(&self) -> &VerificationFlow<S> {
        &self.flow
    }

    /// Reloads the names of the compiled contracts.
    pub async fn refresh_contracts(&mut self) -> Result<&[String], BusError> {
        self.contracts = self
            .compiler
            .compilation_result()
            .await?
            .map(|compilation| compilation.contract_names())
            .unwrap_or_default();
        Ok(&self.contracts)
    }

    /// Selects a contract and replaces the constructor arguments with the
    /// ones its artefact declares.
    pub async fn select_contract(&mut self, name: &str) -> Result<(), BusError> {
        self.form.contract_name = name.to_string();
        self.touched.insert(Field::ContractName);

        self.constructor_inputs = match self.compiler.artefact(name).await? {
            Some(artefact) => artefact.constructor_inputs(),
            None => {
                tracing::warn!(contract_name = name, "no artefact found for contract");
                vec![]
            }
        };
        self.form.constructor_arguments = self
            .constructor_inputs
            .iter()
            .map(|input| ConstructorArgument::new(input, ""))
            .collect();
        self.validate();
        Ok(())
    }

    pub fn set_contract_address(&mut self, value: &str) {
        self.form.contract_address = value.to_string();
        self.touched.insert(Field::ContractAddress);
        self.validate();
    }

    /// Returns `false` when the contract has no constructor input at `index`.
    pub fn set_constructor_argument(&mut self, index: usize, value: &str) -> bool {
        match self.form.constructor_arguments.get_mut(index) {
            Some(argument) => {
                argument.value = value.to_string();
                self.state = FormState::Idle;
                true
            }
            None => false,
        }
    }

    pub fn set_proxy_contract(&mut self, is_proxy_contract: bool) {
        self.form.is_proxy_contract = is_proxy_contract;
        self.validate();
    }

    pub fn set_expected_implementation_address(&mut self, value: &str) {
        self.form.expected_implementation_address = Some(value.to_string());
        self.touched.insert(Field::ExpectedImplementationAddress);
        self.validate();
    }

    /// Recomputes the field errors; returns `true` when there are none.
    pub fn validate(&mut self) -> bool {
        self.state = FormState::Validating;
        self.field_errors = self.form.validate().err().unwrap_or_default();
        self.state = FormState::Idle;
        self.field_errors.is_empty()
    }

    /// A verified form stays locked until one of its fields is edited.
    pub fn can_submit(&self) -> bool {
        !self.contracts.is_empty()
            && REQUIRED_FIELDS
                .iter()
                .all(|field| self.touched.contains(field))
            && self.field_errors.is_empty()
            && self.state == FormState::Idle
            && self.network_name() != UNSUPPORTED_NETWORK
    }

    /// Validates and submits the form.
    ///
    /// Dropping the returned future before it completes leaves the form
    /// `Idle`; the request already sent is not cancelled.
    pub async fn submit(&mut self) -> VerificationResult {
        self.state = FormState::Validating;
        let request = match self.form.validate() {
            Ok(request) => request,
            Err(errors) => {
                let result = VerificationResult::failure(errors.to_string());
                self.field_errors = errors;
                self.state = FormState::Idle;
                self.result = Some(result.clone());
                return result;
            }
        };
        self.field_errors = FieldErrors::default();
        self.state = FormState::Submitting;

        let guard = SubmissionGuard {
            state: &mut self.state,
        };
        let outcome = self.flow.verify(&request).await;
        if let Err(err) = &outcome {
            tracing::warn!(contract_name = %request.contract_name, "verification failed: {err}");
        }
        *guard.state = if outcome.is_ok() {
            FormState::Verified
        } else {
            FormState::Idle
        };
        drop(guard);

        let result = VerificationResult::from(&outcome);
        self.result = Some(result.clone());
        result
    }
}
