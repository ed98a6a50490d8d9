// Harmony address conversion between bech32 (`one1...`) and hex (`0x...`) forms
use bech32::{FromBase32, ToBase32, Variant};
use ethereum_types::Address;
use sha3::{Digest, Keccak256};

use crate::error::ConnectorError;

/// Human readable part of Harmony bech32 addresses.
pub const HRP: &str = "one";

/// HarmonyAddressConverter handles conversion between Harmony ONE addresses (bech32)
/// and Ethereum-style hex addresses
pub struct HarmonyAddressConverter;

impl HarmonyAddressConverter {
    /// Convert a Harmony ONE address to its EIP-55 checksummed hex form.
    ///
    /// Hex input is accepted and returned checksummed.
    pub fn from_bech32(address: &str) -> Result<String, ConnectorError> {
        let address = if is_hex_address(address) {
            Self::parse_hex(address)?
        } else {
            Self::decode_bech32(address)?
        };

        Ok(to_checksum_address(&address))
    }

    /// Convert a hex address (with or without `0x`) to the Harmony ONE form.
    ///
    /// A valid ONE address is returned as is.
    pub fn to_bech32(address: &str) -> Result<String, ConnectorError> {
        if address.starts_with("one1") {
            Self::decode_bech32(address)?;
            return Ok(address.to_string());
        }

        let address = Self::parse_hex(address)?;
        bech32::encode(HRP, address.as_bytes().to_base32(), Variant::Bech32)
            .map_err(|e| ConnectorError::Address(format!("Failed to encode bech32 address: {}", e)))
    }

    fn decode_bech32(address: &str) -> Result<Address, ConnectorError> {
        let (hrp, data, variant) = bech32::decode(address)
            .map_err(|e| ConnectorError::Address(format!("Failed to decode bech32 address: {}", e)))?;

        if hrp != HRP {
            return Err(ConnectorError::Address(format!(
                "Invalid HRP: expected '{}', got '{}'", HRP, hrp
            )));
        }

        if variant != Variant::Bech32 {
            return Err(ConnectorError::Address(
                "Invalid bech32 variant: expected Bech32".to_string()
            ));
        }

        let bytes = Vec::<u8>::from_base32(&data)
            .map_err(|e| ConnectorError::Address(format!("Failed to decode base32 data: {}", e)))?;

        if bytes.len() != Address::len_bytes() {
            return Err(ConnectorError::Address(format!(
                "Invalid address length: expected 20 bytes, got {}", bytes.len()
            )));
        }

        Ok(Address::from_slice(&bytes))
    }

    fn parse_hex(address: &str) -> Result<Address, ConnectorError> {
        let hex_str = address
            .strip_prefix("0x")
            .or_else(|| address.strip_prefix("0X"))
            .unwrap_or(address);

        if hex_str.len() != 40 {
            return Err(ConnectorError::Address(format!(
                "Invalid hex address length: expected 40 characters, got {}", hex_str.len()
            )));
        }

        let bytes = hex::decode(hex_str)
            .map_err(|e| ConnectorError::Address(format!("Failed to decode hex address: {}", e)))?;

        Ok(Address::from_slice(&bytes))
    }
}

fn is_hex_address(address: &str) -> bool {
    address.starts_with("0x") || address.starts_with("0X")
}

/// EIP-55 mixed-case checksum encoding.
pub fn to_checksum_address(address: &Address) -> String {
    let lower = hex::encode(address.as_bytes());
    let hash = Keccak256::digest(lower.as_bytes());

    let mut checksummed = String::with_capacity(42);
    checksummed.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 { hash[i / 2] >> 4 } else { hash[i / 2] & 0x0f };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            checksummed.push(c.to_ascii_uppercase());
        } else {
            checksummed.push(c);
        }
    }
    checksummed
}
