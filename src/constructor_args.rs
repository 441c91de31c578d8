use crate::types::ArgumentCountMismatch;
use ethabi::{
    token::{LenientTokenizer, Tokenizer},
    Param, ParamType, Token,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name and type of a constructor parameter, as shown next to its input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorInput {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ConstructorInput {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
        }
    }
}

impl From<&Param> for ConstructorInput {
    fn from(param: &Param) -> Self {
        Self::new(param.name.clone(), param.kind.to_string())
    }
}

/// A constructor parameter together with the value entered for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorArgument {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl ConstructorArgument {
    pub fn new(input: &ConstructorInput, value: impl Into<String>) -> Self {
        Self {
            name: input.name.clone(),
            kind: input.kind.clone(),
            value: value.into(),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConstructorArgsError {
    #[error("{0}")]
    CountMismatch(ArgumentCountMismatch),
    #[error("invalid value for constructor argument '{name}' of type {kind}: {error}")]
    InvalidValue {
        name: String,
        kind: String,
        error: String,
    },
    #[error("encoded constructor arguments are invalid: {0}")]
    InvalidEncoding(String),
}

pub fn constructor_params(abi: &ethabi::Contract) -> Vec<Param> {
    abi.constructor
        .as_ref()
        .map(|constructor| constructor.inputs.clone())
        .unwrap_or_default()
}

fn param_types(params: &[Param]) -> Vec<ParamType> {
    params.iter().map(|p| p.kind.clone()).collect()
}

fn tokenize(param: &Param, value: &str) -> Result<Token, ConstructorArgsError> {
    // strings are encoded exactly as entered
    let value = match param.kind {
        ParamType::String => value,
        ParamType::Address | ParamType::Bytes | ParamType::FixedBytes(_) => {
            let value = value.trim();
            value.strip_prefix("0x").unwrap_or(value)
        }
        _ => value.trim(),
    };
    LenientTokenizer::tokenize(&param.kind, value).map_err(|err| {
        ConstructorArgsError::InvalidValue {
            name: param.name.clone(),
            kind: param.kind.to_string(),
            error: err.to_string(),
        }
    })
}

/// ABI-encodes `values` against the constructor `params`, in order.
///
/// Returns the hex encoded blob without a `0x` prefix; no parameters
/// produce an empty string.
pub fn encode_constructor_args<S: AsRef<str>>(
    params: &[Param],
    values: &[S],
) -> Result<String, ConstructorArgsError> {
    if params.len() != values.len() {
        return Err(ConstructorArgsError::CountMismatch(ArgumentCountMismatch {
            expected: params.len(),
            found: values.len(),
        }));
    }
    let tokens = params
        .iter()
        .zip(values)
        .map(|(param, value)| tokenize(param, value.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(hex::encode(ethabi::encode(&tokens)))
}

/// Parses encoded arguments via constructor types.
///
/// Returns `Err` if bytes do not correspond to the constructor arguments representation.
pub fn decode_constructor_args(
    params: &[Param],
    encoded: &str,
) -> Result<Vec<Token>, ConstructorArgsError> {
    let encoded = encoded.strip_prefix("0x").unwrap_or(encoded);
    let bytes =
        hex::decode(encoded).map_err(|err| ConstructorArgsError::InvalidEncoding(err.to_string()))?;
    ethabi::decode(&param_types(params), &bytes)
        .map_err(|err| ConstructorArgsError::InvalidEncoding(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethabi::ethereum_types::{Address, U256};
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn params(inputs: &[(&str, &str)]) -> Vec<Param> {
        let inputs: Vec<_> = inputs
            .iter()
            .map(|(name, kind)| serde_json::json!({ "name": name, "type": kind }))
            .collect();
        let abi: ethabi::Contract =
            serde_json::from_value(serde_json::json!([{ "type": "constructor", "inputs": inputs }]))
                .unwrap();
        constructor_params(&abi)
    }

    #[test]
    fn no_params_encode_to_empty_blob() {
        let encoded = encode_constructor_args::<&str>(&[], &[]).unwrap();
        assert_eq!("", encoded);
    }

    #[test]
    fn encoded_args_decode_to_original_values() {
        let params = params(&[
            ("name_", "string"),
            ("supply", "uint256"),
            ("owner", "address"),
            ("paused", "bool"),
        ]);
        let values = [
            "Token",
            "1000000",
            "0x11b79afc03baf25c631dd70169bb6a3160b2706e",
            "true",
        ];

        let encoded = encode_constructor_args(&params, &values).unwrap();
        assert!(!encoded.starts_with("0x"));

        let tokens = decode_constructor_args(&params, &encoded).unwrap();
        assert_eq!(
            vec![
                Token::String("Token".into()),
                Token::Uint(U256::from(1_000_000u64)),
                Token::Address(
                    Address::from_str("11b79afc03baf25c631dd70169bb6a3160b2706e").unwrap()
                ),
                Token::Bool(true),
            ],
            tokens
        );
    }

    #[test]
    fn string_whitespace_is_kept() {
        let params = params(&[("label", "string"), ("supply", "uint256")]);
        let encoded = encode_constructor_args(&params, &["  padded  ", " 7 "]).unwrap();
        let tokens = decode_constructor_args(&params, &encoded).unwrap();
        assert_eq!(
            vec![Token::String("  padded  ".into()), Token::Uint(U256::from(7u64))],
            tokens
        );
    }

    #[test]
    fn single_uint_is_one_word() {
        let params = params(&[("supply", "uint256")]);
        let encoded = encode_constructor_args(&params, &["42"]).unwrap();
        assert_eq!(format!("{:0>64}", "2a"), encoded);
    }

    #[test]
    fn count_mismatch() {
        let params = params(&[("supply", "uint256")]);
        let err = encode_constructor_args::<&str>(&params, &[]).unwrap_err();
        assert_eq!(
            ConstructorArgsError::CountMismatch(ArgumentCountMismatch {
                expected: 1,
                found: 0
            }),
            err
        );
    }

    #[test]
    fn invalid_value() {
        let params = params(&[("supply", "uint256")]);
        let err = encode_constructor_args(&params, &["not a number"]).unwrap_err();
        assert!(
            matches!(
                err,
                ConstructorArgsError::InvalidValue { ref name, ref kind, .. }
                    if name == "supply" && kind == "uint256"
            ),
            "got {err:?}"
        );
    }

    #[test]
    fn random_uints_round_trip() {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        let params = params(&[("a", "uint256"), ("b", "uint64")]);
        for _ in 0..16 {
            let (a, b): (u128, u64) = (rng.gen(), rng.gen());
            let encoded =
                encode_constructor_args(&params, &[a.to_string(), b.to_string()]).unwrap();
            let tokens = decode_constructor_args(&params, &encoded).unwrap();
            assert_eq!(
                vec![Token::Uint(U256::from(a)), Token::Uint(U256::from(b))],
                tokens
            );
        }
    }

    #[test]
    fn malformed_blob_is_rejected() {
        let params = params(&[("supply", "uint256")]);
        decode_constructor_args(&params, "zz").expect_err("not hex");
        decode_constructor_args(&params, "00").expect_err("too short");
    }
}
