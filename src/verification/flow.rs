use super::{
    receipt::{Receipt, ReceiptSink},
    request::{FormValues, VerificationRequest},
    service::{SourceSubmission, VerificationService},
    VerificationError,
};
use crate::{
    constructor_args::{constructor_params, encode_constructor_args},
    host::CompilerApi,
    types::ImplementationMismatch,
};
use chrono::Utc;
use ethers_core::types::Address;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationSuccess {
    pub receipt: Receipt,
    /// Present when the contract was verified as a proxy.
    pub proxy_receipt: Option<Receipt>,
    pub message: String,
}

pub(crate) fn address_hex(address: &Address) -> String {
    format!("{address:#x}")
}

/// Validates, encodes and submits contracts for verification.
pub struct VerificationFlow<S> {
    compiler: CompilerApi,
    service: S,
    receipts: Arc<dyn ReceiptSink>,
}

impl<S: VerificationService> VerificationFlow<S> {
    pub fn new(compiler: CompilerApi, service: S, receipts: Arc<dyn ReceiptSink>) -> Self {
        Self {
            compiler,
            service,
            receipts,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Validates the raw form and verifies it. Nothing is sent when a
    /// field is invalid.
    pub async fn submit(
        &self,
        form: &FormValues,
    ) -> Result<VerificationSuccess, VerificationError> {
        let request = form.validate().map_err(VerificationError::Validation)?;
        self.verify(&request).await
    }

    #[tracing::instrument(
        skip(self, request),
        fields(
            contract_name = %request.contract_name,
            contract_address = %address_hex(&request.contract_address),
        ),
        level = "debug"
    )]
    pub async fn verify(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerificationSuccess, VerificationError> {
        let compilation = self
            .compiler
            .compilation_result()
            .await?
            .ok_or(VerificationError::NoCompilationResult)?;
        let contract = compilation
            .find_contract(&request.contract_name)
            .ok_or_else(|| VerificationError::UnknownContract(request.contract_name.clone()))?;

        let params = constructor_params(&contract.abi()?);
        let constructor_arguments =
            encode_constructor_args(&params, &request.constructor_values())?;

        let submission = SourceSubmission {
            contract_name: &request.contract_name,
            contract_address: request.contract_address,
            constructor_arguments: &constructor_arguments,
            compilation: &compilation,
        };
        let ticket = self
            .service
            .verify_source(submission)
            .await
            .map_err(|err| VerificationError::Service(err.message))?;
        tracing::info!(
            guid = %ticket.guid,
            status = %ticket.status,
            "verification request accepted"
        );

        let receipt = Receipt {
            guid: ticket.guid.clone(),
            status: ticket.status,
            contract_name: request.contract_name.clone(),
            contract_address: request.contract_address,
            is_proxy_contract: false,
            message: None,
            timestamp: Utc::now(),
        };
        self.receipts.on_verified(receipt.clone());
        let mut message = format!(
            "Verification request submitted successfully. Use this receipt GUID {} to track the status of your submission",
            ticket.guid
        );

        if !request.is_proxy_contract {
            return Ok(VerificationSuccess {
                receipt,
                proxy_receipt: None,
                message,
            });
        }

        let resolution = self
            .service
            .verify_proxy(
                request.contract_address,
                request.expected_implementation_address,
            )
            .await
            .map_err(|err| VerificationError::Service(err.message))?;

        if let Some(expected) = request.expected_implementation_address {
            // without a resolved address there is nothing to compare
            let found = resolution
                .implementation
                .ok_or_else(|| VerificationError::Service(resolution.status.clone()))?;
            if let Some(mismatch) = ImplementationMismatch::check(expected, found) {
                tracing::warn!(%mismatch, "proxy implementation mismatch");
                return Err(VerificationError::ProxyImplementationMismatch(mismatch));
            }
        }

        let proxy_message = match resolution.implementation {
            Some(implementation) => format!(
                "Proxy implementation resolved at {}",
                address_hex(&implementation)
            ),
            None => format!("Proxy verification status: {}", resolution.status),
        };
        let proxy_receipt = Receipt {
            guid: resolution.guid,
            status: resolution.status,
            contract_name: request.contract_name.clone(),
            contract_address: request.contract_address,
            is_proxy_contract: true,
            message: Some(proxy_message.clone()),
            timestamp: Utc::now(),
        };
        self.receipts.on_verified(proxy_receipt.clone());
        message = format!("{message}. {proxy_message}");

        Ok(VerificationSuccess {
            receipt,
            proxy_receipt: Some(proxy_receipt),
            message,
        })
    }
}
