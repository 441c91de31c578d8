use crate::consts::KNOWN_ETHERSCAN_API_URLS;
use anyhow::anyhow;
use config::{Config, File};
use serde::{de::IgnoredAny, Deserialize};
use serde_with::{serde_as, DurationMilliSeconds, DurationSeconds};
use std::{collections::BTreeMap, num::NonZeroUsize, str::FromStr, time::Duration};
use url::Url;

pub const CONFIG_ENV_PREFIX: &str = "ETHERSCAN_VERIFICATION";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub etherscan: EtherscanSettings,
    pub tracing: TracingSettings,

    // Path of the config file itself arrives through the same environment
    // prefix and has to be accepted here.
    pub config: IgnoredAny,
}

#[serde_as]
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct EtherscanSettings {
    pub api_key: Option<String>,
    /// Takes precedence over any chain based resolution.
    pub api_url: Option<Url>,
    pub chain_id: u64,
    /// Chain id (as a string key) to api url overrides.
    pub chain_api_urls: BTreeMap<String, Url>,
    #[serde_as(as = "DurationSeconds<u64>")]
    pub request_timeout: Duration,
    /// How many times a pending proxy verification is looked up
    /// before its status is reported as is.
    pub proxy_status_attempts: NonZeroUsize,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub proxy_status_interval: Duration,
}

impl Default for EtherscanSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: None,
            chain_id: 1,
            chain_api_urls: BTreeMap::new(),
            request_timeout: Duration::from_secs(30),
            proxy_status_attempts: NonZeroUsize::new(5).expect("Is not zero"),
            proxy_status_interval: Duration::from_millis(3000),
        }
    }
}

impl EtherscanSettings {
    /// Resolves the api url for the configured chain.
    ///
    /// An explicit `api_url` wins, then per-chain overrides, then the
    /// endpoints known out of the box.
    pub fn resolve_api_url(&self) -> anyhow::Result<Url> {
        if let Some(url) = &self.api_url {
            return Ok(url.clone());
        }
        if let Some(url) = self.chain_api_urls.get(&self.chain_id.to_string()) {
            return Ok(url.clone());
        }
        let known = KNOWN_ETHERSCAN_API_URLS
            .iter()
            .find(|(chain_id, _)| *chain_id == self.chain_id)
            .map(|(_, url)| *url)
            .ok_or_else(|| anyhow!("no etherscan api url known for chain {}", self.chain_id))?;
        Ok(Url::from_str(known)?)
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TracingFormat {
    #[default]
    Default,
    Json,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TracingSettings {
    pub enabled: bool,
    pub format: TracingFormat,
}

impl Default for TracingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            format: Default::default(),
        }
    }
}

impl Settings {
    pub fn new() -> anyhow::Result<Self> {
        let config_path = std::env::var(format!("{CONFIG_ENV_PREFIX}__CONFIG"));

        let mut builder = Config::builder();
        if let Ok(config_path) = config_path {
            builder = builder.add_source(File::with_name(&config_path));
        };
        builder = builder.add_source(
            config::Environment::with_prefix(CONFIG_ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()?
            .try_deserialize()
            .map_err(|err| anyhow!(err))
    }
}
