//! Payloads of the mismatch errors raised while preparing a verification.

use ethers_core::types::Address;
use thiserror::Error;

/// Number of constructor values entered differs from the abi inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("the constructor takes {expected} arguments, {found} were given")]
pub struct ArgumentCountMismatch {
    pub expected: usize,
    pub found: usize,
}

/// Implementation resolved for a proxy differs from the one the user expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("expected {expected:#x}, found {found:#x}")]
pub struct ImplementationMismatch {
    pub expected: Address,
    pub found: Address,
}

impl ImplementationMismatch {
    /// `None` when both name the same contract; hex case carries no meaning
    /// once the addresses are parsed.
    pub fn check(expected: Address, found: Address) -> Option<Self> {
        (expected != found).then_some(Self { expected, found })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn address(value: &str) -> Address {
        Address::from_str(value).unwrap()
    }

    #[test]
    fn display_argument_count_mismatch() {
        let mismatch = ArgumentCountMismatch {
            expected: 2,
            found: 3,
        };
        assert_eq!(
            "the constructor takes 2 arguments, 3 were given",
            mismatch.to_string()
        );
    }

    #[test]
    fn implementation_mismatch() {
        let expected = address("e45a5176bc0f2c1198e2451c4e4501d4ed9b65a6");
        let found = address("0000000000000000000000000000000000000001");

        assert_eq!(None, ImplementationMismatch::check(expected, expected));
        let mismatch = ImplementationMismatch::check(expected, found).unwrap();
        assert_eq!(
            "expected 0xe45a5176bc0f2c1198e2451c4e4501d4ed9b65a6, \
             found 0x0000000000000000000000000000000000000001",
            mismatch.to_string()
        );
    }
}
