use super::{Error, EtherscanResponse, ReceiptStatus};
use crate::{
    compilation::CompilationError,
    consts::SOLIDITY_STANDARD_JSON_INPUT,
    settings::EtherscanSettings,
    verification::{
        ProxyResolution, Receipt, ServiceError, SourceSubmission, SubmissionTicket,
        VerificationService,
    },
};
use async_trait::async_trait;
use ethers_core::types::Address;
use futures::future;
use reqwest::{Response, StatusCode};
use std::{num::NonZeroUsize, str::FromStr, time::Duration};
use url::Url;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Etherscan compatible explorer api.
#[derive(Clone)]
pub struct Client {
    api_url: Url,
    api_key: String,
    reqwest_client: reqwest::Client,
    proxy_status_attempts: NonZeroUsize,
    proxy_status_interval: Duration,
}

impl Client {
    pub fn new(api_url: &str, api_key: impl Into<String>) -> Result<Self, Error> {
        let api_url = Url::from_str(api_url).map_err(|err| Error::InvalidArgument {
            arg: "api_url".to_string(),
            error: err.to_string(),
        })?;
        Self::build(api_url, api_key.into(), DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn from_settings(settings: &EtherscanSettings) -> Result<Self, Error> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::InvalidArgument {
                arg: "api_key".to_string(),
                error: "etherscan api key is not set".to_string(),
            })?;
        let api_url = settings
            .resolve_api_url()
            .map_err(|err| Error::InvalidArgument {
                arg: "api_url".to_string(),
                error: err.to_string(),
            })?;
        Ok(Self::build(api_url, api_key, settings.request_timeout)?
            .with_proxy_status_polling(
                settings.proxy_status_attempts,
                settings.proxy_status_interval,
            ))
    }

    fn build(api_url: Url, api_key: String, timeout: Duration) -> Result<Self, Error> {
        let reqwest_client = reqwest::Client::builder().timeout(timeout).build()?;
        let defaults = EtherscanSettings::default();
        Ok(Self {
            api_url,
            api_key,
            reqwest_client,
            proxy_status_attempts: defaults.proxy_status_attempts,
            proxy_status_interval: defaults.proxy_status_interval,
        })
    }

    pub fn with_proxy_status_polling(mut self, attempts: NonZeroUsize, interval: Duration) -> Self {
        self.proxy_status_attempts = attempts;
        self.proxy_status_interval = interval;
        self
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }
}

impl Client {
    /// Submits the sources of a contract; returns the receipt guid.
    #[tracing::instrument(skip_all, fields(contract_name = submission.contract_name), err)]
    pub async fn verify_source_code(
        &self,
        submission: SourceSubmission<'_>,
    ) -> Result<String, Error> {
        let compilation = submission.compilation;
        let contract = compilation
            .find_contract(submission.contract_name)
            .ok_or_else(|| CompilationError::ContractNotFound(submission.contract_name.into()))?;
        let compiler_version = compilation.compiler_version(submission.contract_name)?;
        let input = compilation.standard_json_input(submission.contract_name)?;
        let source_code = serde_json::to_string(&input).map_err(|err| Error::InvalidArgument {
            arg: "sourceCode".to_string(),
            error: err.to_string(),
        })?;

        let contract_address = format!("{:#x}", submission.contract_address);
        let contract_name = contract.qualified_name();
        let form = [
            ("apikey", self.api_key.as_str()),
            ("module", "contract"),
            ("action", "verifysourcecode"),
            ("contractaddress", contract_address.as_str()),
            ("sourceCode", source_code.as_str()),
            ("codeformat", SOLIDITY_STANDARD_JSON_INPUT),
            ("contractname", contract_name.as_str()),
            ("compilerversion", compiler_version.as_str()),
            // the api expects this exact spelling
            ("constructorArguements", submission.constructor_arguments),
        ];

        let response = self
            .reqwest_client
            .post(self.api_url.clone())
            .form(&form)
            .send()
            .await?;
        Self::process_etherscan_response(response)
            .await?
            .into_result()
    }

    pub async fn check_verify_status(&self, guid: &str) -> Result<ReceiptStatus, Error> {
        self.check_status("checkverifystatus", guid).await
    }

    /// Asks the explorer to resolve the implementation behind `proxy`;
    /// returns the receipt guid.
    #[tracing::instrument(skip(self), err)]
    pub async fn verify_proxy_contract(
        &self,
        proxy: Address,
        expected_implementation: Option<Address>,
    ) -> Result<String, Error> {
        let mut form = vec![("address", format!("{proxy:#x}"))];
        if let Some(expected) = expected_implementation {
            form.push(("expectedimplementation", format!("{expected:#x}")));
        }

        let response = self
            .reqwest_client
            .post(self.api_url.clone())
            .query(&[
                ("module", "contract"),
                ("action", "verifyproxycontract"),
                ("apikey", self.api_key.as_str()),
            ])
            .form(&form)
            .send()
            .await?;
        Self::process_etherscan_response(response)
            .await?
            .into_result()
    }

    pub async fn check_proxy_verification(&self, guid: &str) -> Result<ReceiptStatus, Error> {
        self.check_status("checkproxyverification", guid).await
    }

    pub async fn receipt_status(&self, guid: &str, is_proxy: bool) -> Result<ReceiptStatus, Error> {
        if is_proxy {
            self.check_proxy_verification(guid).await
        } else {
            self.check_verify_status(guid).await
        }
    }

    /// Looks up the status of every receipt concurrently, in order.
    pub async fn receipt_statuses(
        &self,
        receipts: &[Receipt],
    ) -> Vec<Result<ReceiptStatus, Error>> {
        future::join_all(
            receipts
                .iter()
                .map(|receipt| self.receipt_status(&receipt.guid, receipt.is_proxy_contract)),
        )
        .await
    }
}

impl Client {
    async fn check_status(&self, action: &str, guid: &str) -> Result<ReceiptStatus, Error> {
        let response = self
            .reqwest_client
            .get(self.api_url.clone())
            .query(&[
                ("module", "contract"),
                ("action", action),
                ("guid", guid),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?;
        let status = Self::process_etherscan_response(response)
            .await?
            .into_receipt_status();
        tracing::debug!(action, guid, %status, "receipt status");
        Ok(status)
    }

    async fn process_etherscan_response(response: Response) -> Result<EtherscanResponse, Error> {
        match response.status() {
            StatusCode::OK => Ok(response.json::<EtherscanResponse>().await?),
            status_code => Err(Error::UnexpectedStatusCode {
                status_code,
                msg: response.text().await?,
            }),
        }
    }
}

/// Last `0x`-prefixed address mentioned in `text`.
///
/// Proxy verification results name the proxy first and the implementation
/// last. Longer hex runs such as transaction hashes are not addresses.
pub fn last_address(text: &str) -> Option<Address> {
    text.match_indices("0x")
        .filter_map(|(index, _)| {
            let candidate = text.get(index + 2..index + 42)?;
            if !candidate.chars().all(|c| c.is_ascii_hexdigit()) {
                return None;
            }
            let continues = text[index + 42..]
                .chars()
                .next()
                .map_or(false, |c| c.is_ascii_hexdigit());
            if continues {
                return None;
            }
            Address::from_str(candidate).ok()
        })
        .last()
}

impl From<Error> for ServiceError {
    fn from(err: Error) -> Self {
        ServiceError::new(err.to_string())
    }
}

#[async_trait]
impl VerificationService for Client {
    async fn verify_source(
        &self,
        submission: SourceSubmission<'_>,
    ) -> Result<SubmissionTicket, ServiceError> {
        // freshly accepted requests are always queued; `receipt_status`
        // looks them up later
        let guid = self.verify_source_code(submission).await?;
        Ok(SubmissionTicket {
            guid,
            status: ReceiptStatus::Pending.to_string(),
        })
    }

    async fn verify_proxy(
        &self,
        proxy: Address,
        expected_implementation: Option<Address>,
    ) -> Result<ProxyResolution, ServiceError> {
        let guid = self
            .verify_proxy_contract(proxy, expected_implementation)
            .await?;

        let mut status = ReceiptStatus::Pending;
        for attempt in 1..=self.proxy_status_attempts.get() {
            status = self.check_proxy_verification(&guid).await?;
            if !status.is_pending() || attempt == self.proxy_status_attempts.get() {
                break;
            }
            tokio::time::sleep(self.proxy_status_interval).await;
        }

        match status {
            ReceiptStatus::Failed(message) => Err(ServiceError::new(message)),
            ReceiptStatus::Completed(result) => Ok(ProxyResolution {
                guid,
                implementation: last_address(&result),
                status: result,
            }),
            ReceiptStatus::Pending => {
                tracing::warn!(%guid, "proxy verification is still pending");
                Err(ServiceError::new(status.to_string()))
            }
        }
    }
}
