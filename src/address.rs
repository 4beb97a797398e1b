//! 32-byte account addresses in their base58 text form.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::PatchError;

/// Width of an address in bytes.
pub const ADDRESS_LEN: usize = 32;

/// Address written into the USDC fixture when no override is given.
pub const DEFAULT_ADDRESS: &str = "BBWpMG3mXtGVMNVzGJSAVjkKqVixMXepWELv3fBL1RtU";

/// Raw 32-byte address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    /// Build an address from a byte slice that must be exactly 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PatchError> {
        let array: [u8; ADDRESS_LEN] = bytes
            .try_into()
            .map_err(|_| PatchError::AddressLength { len: bytes.len() })?;
        Ok(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl FromStr for Address {
    type Err = PatchError;

    /// Decode base58 (Bitcoin alphabet, no checksum).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|err| PatchError::Base58 {
                reason: err.to_string(),
            })?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
