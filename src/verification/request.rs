use crate::{
    consts::{INVALID_CONTRACT_ADDRESS, REQUIRED_FIELD},
    constructor_args::{ConstructorArgument, ConstructorInput},
};
use ethers_core::types::Address;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    ContractName,
    ContractAddress,
    ExpectedImplementationAddress,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::ContractName => "contractName",
            Field::ContractAddress => "contractAddress",
            Field::ExpectedImplementationAddress => "expectedImplAddress",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    Required,
    InvalidAddressFormat,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Required => f.write_str(REQUIRED_FIELD),
            FieldError::InvalidAddressFormat => f.write_str(INVALID_CONTRACT_ADDRESS),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, FieldError>);

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<FieldError> {
        self.0.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, FieldError)> + '_ {
        self.0.iter().map(|(field, error)| (*field, *error))
    }

    fn insert(&mut self, field: Field, error: FieldError) {
        self.0.insert(field, error);
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<_> = self
            .iter()
            .map(|(field, error)| format!("{field}: {error}"))
            .collect();
        f.write_str(&messages.join("; "))
    }
}

/// `0x` followed by exactly 40 hex characters.
pub fn parse_address(value: &str) -> Result<Address, FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::Required);
    }
    let body = value
        .strip_prefix("0x")
        .ok_or(FieldError::InvalidAddressFormat)?;
    if value.len() != 42 || !body.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(FieldError::InvalidAddressFormat);
    }
    Address::from_str(body).map_err(|_| FieldError::InvalidAddressFormat)
}

/// Raw values of the verification form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValues {
    pub contract_name: String,
    pub contract_address: String,
    /// One entry per constructor parameter, in declaration order.
    #[serde(default)]
    pub constructor_arguments: Vec<ConstructorArgument>,
    #[serde(default)]
    pub is_proxy_contract: bool,
    #[serde(default)]
    pub expected_implementation_address: Option<String>,
}

impl FormValues {
    pub fn new(contract_name: impl Into<String>, contract_address: impl Into<String>) -> Self {
        Self {
            contract_name: contract_name.into(),
            contract_address: contract_address.into(),
            ..Default::default()
        }
    }

    /// Fills the constructor arguments from the descriptors and the
    /// values entered for them; missing values are left empty.
    pub fn with_constructor_values<S: AsRef<str>>(
        mut self,
        inputs: &[ConstructorInput],
        values: &[S],
    ) -> Self {
        self.constructor_arguments = inputs
            .iter()
            .enumerate()
            .map(|(index, input)| {
                let value = values.get(index).map(|v| v.as_ref()).unwrap_or_default();
                ConstructorArgument::new(input, value)
            })
            .collect();
        self
    }

    pub fn proxy(mut self, expected_implementation_address: Option<&str>) -> Self {
        self.is_proxy_contract = true;
        self.expected_implementation_address = expected_implementation_address.map(String::from);
        self
    }

    /// Field level validation; does not need the compilation result.
    pub fn validate(&self) -> Result<VerificationRequest, FieldErrors> {
        let mut errors = FieldErrors::default();

        if self.contract_name.trim().is_empty() {
            errors.insert(Field::ContractName, FieldError::Required);
        }
        let contract_address = parse_address(&self.contract_address)
            .map_err(|err| errors.insert(Field::ContractAddress, err))
            .ok();

        let expected_implementation_address = match (
            self.is_proxy_contract,
            self.expected_implementation_address
                .as_deref()
                .filter(|value| !value.trim().is_empty()),
        ) {
            (true, Some(value)) => match parse_address(value) {
                Ok(address) => Some(address),
                Err(err) => {
                    errors.insert(Field::ExpectedImplementationAddress, err);
                    None
                }
            },
            _ => None,
        };

        match contract_address {
            Some(contract_address) if errors.is_empty() => Ok(VerificationRequest {
                contract_name: self.contract_name.clone(),
                contract_address,
                constructor_arguments: self.constructor_arguments.clone(),
                is_proxy_contract: self.is_proxy_contract,
                expected_implementation_address,
            }),
            _ => Err(errors),
        }
    }
}

/// Form values that passed field validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    pub contract_name: String,
    pub contract_address: Address,
    pub constructor_arguments: Vec<ConstructorArgument>,
    pub is_proxy_contract: bool,
    pub expected_implementation_address: Option<Address>,
}

impl VerificationRequest {
    pub fn constructor_values(&self) -> Vec<&str> {
        self.constructor_arguments
            .iter()
            .map(|argument| argument.value.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TOKEN_ADDRESS: &str = "0x11b79afc03baf25c631dd70169bb6a3160b2706e";

    #[test]
    fn address_format() {
        let address = parse_address(TOKEN_ADDRESS).unwrap();
        assert_eq!(TOKEN_ADDRESS, format!("{address:#x}"));
        parse_address("0x11B79AFC03BAF25C631DD70169BB6A3160B2706E").expect("upper case hex");

        for (value, expected) in [
            ("", FieldError::Required),
            ("   ", FieldError::Required),
            ("0x123", FieldError::InvalidAddressFormat),
            (
                "11b79afc03baf25c631dd70169bb6a3160b2706e00",
                FieldError::InvalidAddressFormat,
            ),
            (
                "0x11b79afc03baf25c631dd70169bb6a3160b2706",
                FieldError::InvalidAddressFormat,
            ),
            (
                "0x11b79afc03baf25c631dd70169bb6a3160b2706e0",
                FieldError::InvalidAddressFormat,
            ),
            (
                "0xzzb79afc03baf25c631dd70169bb6a3160b2706e",
                FieldError::InvalidAddressFormat,
            ),
        ] {
            assert_eq!(Err(expected), parse_address(value), "value: {value:?}");
        }
    }

    #[test]
    fn valid_form() {
        let inputs = vec![ConstructorInput::new("supply", "uint256")];
        let request = FormValues::new("Token", TOKEN_ADDRESS)
            .with_constructor_values(&inputs, &["100"])
            .validate()
            .unwrap();
        assert_eq!("Token", request.contract_name);
        assert_eq!(vec!["100"], request.constructor_values());
        assert!(!request.is_proxy_contract);
        assert_eq!(None, request.expected_implementation_address);
    }

    #[test]
    fn invalid_form_reports_every_field() {
        let errors = FormValues::new("", "0x123")
            .proxy(Some("0xabc"))
            .validate()
            .unwrap_err();
        assert_eq!(Some(FieldError::Required), errors.get(Field::ContractName));
        assert_eq!(
            Some(FieldError::InvalidAddressFormat),
            errors.get(Field::ContractAddress)
        );
        assert_eq!(
            Some(FieldError::InvalidAddressFormat),
            errors.get(Field::ExpectedImplementationAddress)
        );
        assert_eq!(
            "contractName: Required; contractAddress: Please enter a valid contract address; \
             expectedImplAddress: Please enter a valid contract address",
            errors.to_string()
        );
    }

    #[test]
    fn implementation_address_is_optional() {
        let request = FormValues::new("Proxy", TOKEN_ADDRESS)
            .proxy(Some(""))
            .validate()
            .unwrap();
        assert!(request.is_proxy_contract);
        assert_eq!(None, request.expected_implementation_address);

        // ignored unless the contract is a proxy
        let mut form = FormValues::new("Proxy", TOKEN_ADDRESS);
        form.expected_implementation_address = Some("garbage".into());
        assert_eq!(None, form.validate().unwrap().expected_implementation_address);
    }
}
