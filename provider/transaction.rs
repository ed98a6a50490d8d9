// Harmony transaction shape and the numeric parsing the provider relies on
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConnectorError;

/// Fields the provider fills in when building a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxParams {
    pub from: String,
    pub to: String,
    pub data: String,
    pub gas_limit: u64,
    pub gas_price: String,
    pub shard_id: u32,
    pub to_shard_id: u32,
}

/// Transaction in the wallet's native format, addresses in bech32.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarmonyTransaction {
    pub from: String,
    pub to: String,
    pub data: String,
    pub gas_limit: u64,
    pub gas_price: String,
    #[serde(rename = "shardID")]
    pub shard_id: u32,
    #[serde(rename = "toShardID")]
    pub to_shard_id: u32,
    pub chain_id: u64,
}

impl HarmonyTransaction {
    pub fn new(params: TxParams, chain_id: u64) -> Self {
        Self {
            from: params.from,
            to: params.to,
            data: params.data,
            gas_limit: params.gas_limit,
            gas_price: params.gas_price,
            shard_id: params.shard_id,
            to_shard_id: params.to_shard_id,
            chain_id,
        }
    }
}

/// Integer prefix of `raw`, read the way browsers read numeric strings:
/// optional sign, `0x` selects hex, parsing stops at the first non-digit.
pub fn parse_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = match s.get(..2) {
        Some("0x") | Some("0X") => (16, &s[2..]),
        _ => (10, s),
    };

    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value = i64::from_str_radix(&digits[..end], radix).ok()?;
    Some(if negative { -value } else { value })
}

/// Gas limit from the `gas` field of an `eth_sendTransaction` request.
pub fn parse_gas(gas: Option<&Value>) -> Result<u64, ConnectorError> {
    let parsed = match gas {
        None | Some(Value::Null) => {
            return Err(ConnectorError::InvalidPayload("Transaction is missing 'gas'".to_string()));
        }
        Some(Value::String(raw)) => parse_int(raw),
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|f| f.trunc() as i64)),
        Some(other) => {
            return Err(ConnectorError::InvalidPayload(format!("Unsupported gas value: {}", other)));
        }
    };

    match parsed {
        Some(gas) if gas >= 0 => Ok(gas as u64),
        _ => Err(ConnectorError::InvalidPayload(format!(
            "Gas is not a non-negative integer: {}",
            gas.map(Value::to_string).unwrap_or_default()
        ))),
    }
}
