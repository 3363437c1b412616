//! Toncenter-style HTTP API client.
//!
//! Implements [`ChainClient`] over the v2 JSON API: account state via
//! `getAddressInformation`, get-methods via `runGetMethod`, and sends via
//! `sendBoc` wrapped in a signed wallet external message.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use minter_cell::{BagOfCells, Cell, MsgAddress};
use minter_staking::{StackValue, StateInit};

use crate::client::{AccountStatus, ChainClient};
use crate::error::{OpsError, OpsResult};
use crate::keys::WalletKeypair;
use crate::wallet::{Transfer, WalletV3R2};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Seconds an external message stays valid after signing.
const MESSAGE_TTL: u64 = 60;

/// A toncenter v2 endpoint, optionally with a signing wallet attached.
pub struct ToncenterClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    wallet: Option<WalletV3R2>,
}

#[derive(Deserialize)]
struct ApiEnvelope {
    ok: bool,
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<String>,
}

impl ToncenterClient {
    /// Read-only client.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> OpsResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key,
            wallet: None,
        })
    }

    /// Client with a wallet for signing sends.
    pub fn with_wallet(
        base_url: impl Into<String>,
        api_key: Option<String>,
        keypair: WalletKeypair,
    ) -> OpsResult<Self> {
        let mut client = Self::new(base_url, api_key)?;
        let wallet = WalletV3R2::new(keypair, 0)?;
        info!(address = %wallet.address(), "operator wallet connected");
        client.wallet = Some(wallet);
        Ok(client)
    }

    async fn get(&self, method: &str, query: &[(&str, String)]) -> OpsResult<Value> {
        let mut request = self
            .http
            .get(format!("{}/{method}", self.base_url))
            .query(query);
        if let Some(key) = &self.api_key {
            request = request.header("X-API-Key", key);
        }
        let envelope: ApiEnvelope = request.send().await?.json().await?;
        unwrap_envelope(method, envelope)
    }

    async fn post(&self, method: &str, body: Value) -> OpsResult<Value> {
        let mut request = self
            .http
            .post(format!("{}/{method}", self.base_url))
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("X-API-Key", key);
        }
        let envelope: ApiEnvelope = request.send().await?.json().await?;
        unwrap_envelope(method, envelope)
    }

    async fn wallet_seqno(&self, wallet: &WalletV3R2) -> OpsResult<u32> {
        let status = self.account_status(wallet.address()).await?;
        if !status.deployed {
            return Ok(0);
        }
        let stack = self.run_get_method(wallet.address(), "seqno", &[]).await?;
        match stack.first() {
            Some(StackValue::Int(seqno)) => Ok(*seqno as u32),
            _ => Err(OpsError::Rpc("seqno returned a non-integer".into())),
        }
    }
}

impl ChainClient for ToncenterClient {
    async fn account_status(&self, address: &MsgAddress) -> OpsResult<AccountStatus> {
        let result = self
            .get(
                "getAddressInformation",
                &[("address", address.to_raw())],
            )
            .await?;

        let deployed = result["state"].as_str() == Some("active");
        let balance = parse_decimal(&result["balance"])?;
        let last_lt = match parse_decimal(&result["last_transaction_id"]["lt"]) {
            Ok(0) | Err(_) => None,
            Ok(lt) => Some(lt as u64),
        };
        let code = match result["code"].as_str() {
            Some(text) if !text.is_empty() => Some(
                BagOfCells::deserialize_base64(text)?
                    .single_root()?
                    .clone(),
            ),
            _ => None,
        };

        debug!(%address, deployed, balance, ?last_lt, "fetched account status");
        Ok(AccountStatus {
            deployed,
            balance,
            last_lt,
            code,
        })
    }

    async fn run_get_method(
        &self,
        address: &MsgAddress,
        method: &str,
        params: &[StackValue],
    ) -> OpsResult<Vec<StackValue>> {
        let stack: Vec<Value> = params
            .iter()
            .map(encode_stack_entry)
            .collect::<OpsResult<_>>()?;
        let result = self
            .post(
                "runGetMethod",
                json!({
                    "address": address.to_raw(),
                    "method": method,
                    "stack": stack,
                }),
            )
            .await?;

        let exit_code = result["exit_code"].as_i64().unwrap_or(-1) as i32;
        if exit_code != 0 {
            return Err(OpsError::ExitCode {
                method: method.to_string(),
                exit_code,
            });
        }

        result["stack"]
            .as_array()
            .ok_or_else(|| OpsError::Rpc("runGetMethod returned no stack".into()))?
            .iter()
            .map(decode_stack_entry)
            .collect()
    }

    async fn send_internal(
        &self,
        to: &MsgAddress,
        value: u128,
        body: Option<Arc<Cell>>,
        state_init: Option<&StateInit>,
        mode: u8,
    ) -> OpsResult<()> {
        let wallet = self
            .wallet
            .as_ref()
            .ok_or_else(|| OpsError::InvalidKey("no wallet secret configured".into()))?;

        let seqno = self.wallet_seqno(wallet).await?;
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| OpsError::Rpc(e.to_string()))?
            .as_secs();
        let transfer = Transfer {
            to: to.clone(),
            value,
            body,
            state_init: state_init.cloned(),
            mode,
        };
        let boc = wallet.signed_external(&transfer, seqno, (now + MESSAGE_TTL) as u32)?;

        info!(%to, value, seqno, "submitting external message");
        self.post("sendBoc", json!({ "boc": STANDARD.encode(boc) }))
            .await?;
        Ok(())
    }

    fn sender_address(&self) -> Option<MsgAddress> {
        self.wallet.as_ref().map(|w| w.address().clone())
    }
}

fn unwrap_envelope(method: &str, envelope: ApiEnvelope) -> OpsResult<Value> {
    if !envelope.ok {
        let detail = envelope.error.unwrap_or_else(|| "unknown error".into());
        return Err(OpsError::Rpc(format!("{method}: {detail}")));
    }
    Ok(envelope.result)
}

/// Accepts JSON numbers and the API's decimal strings.
fn parse_decimal(value: &Value) -> OpsResult<u128> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(u128::from)
            .ok_or_else(|| OpsError::Rpc(format!("non-integral number {n}"))),
        Value::String(s) => s
            .parse()
            .map_err(|_| OpsError::Rpc(format!("unparseable number {s:?}"))),
        other => Err(OpsError::Rpc(format!("expected a number, got {other}"))),
    }
}

fn encode_stack_entry(value: &StackValue) -> OpsResult<Value> {
    Ok(match value {
        StackValue::Null => json!(["null", ""]),
        StackValue::Int(n) => json!(["num", format!("{n:#x}")]),
        StackValue::Cell(cell) => {
            let boc = BagOfCells::from_root_arc(cell.clone()).serialize_base64()?;
            json!(["tvm.Cell", boc])
        }
        StackValue::Slice(cell) => {
            let boc = BagOfCells::from_root_arc(cell.clone()).serialize_base64()?;
            json!(["tvm.Slice", boc])
        }
    })
}

/// Result entries come tagged; slices and cells both carry a base64 BoC,
/// either directly or under a `bytes` key.
fn decode_stack_entry(entry: &Value) -> OpsResult<StackValue> {
    let pair = entry
        .as_array()
        .filter(|a| a.len() == 2)
        .ok_or_else(|| OpsError::Rpc(format!("malformed stack entry {entry}")))?;
    let tag = pair[0].as_str().unwrap_or_default();
    let payload = &pair[1];

    match tag {
        "num" | "int" => {
            let text = payload
                .as_str()
                .ok_or_else(|| OpsError::Rpc(format!("malformed num entry {entry}")))?;
            Ok(StackValue::Int(parse_hex_int(text)?))
        }
        "cell" | "tvm.Cell" => Ok(StackValue::Cell(payload_cell(payload)?)),
        "slice" | "tvm.Slice" | "tvm.slice" => Ok(StackValue::Slice(payload_cell(payload)?)),
        "null" => Ok(StackValue::Null),
        other => Err(OpsError::Rpc(format!("unsupported stack tag {other:?}"))),
    }
}

fn payload_cell(payload: &Value) -> OpsResult<Arc<Cell>> {
    let text = payload
        .as_str()
        .or_else(|| payload["bytes"].as_str())
        .ok_or_else(|| OpsError::Rpc(format!("malformed cell entry {payload}")))?;
    Ok(BagOfCells::deserialize_base64(text)?.single_root()?.clone())
}

fn parse_hex_int(text: &str) -> OpsResult<i128> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let digits = rest.strip_prefix("0x").unwrap_or(rest);
    let magnitude = i128::from_str_radix(digits, 16)
        .map_err(|_| OpsError::Rpc(format!("unparseable integer {text:?}")))?;
    Ok(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_forms() {
        assert_eq!(parse_decimal(&json!("123")).unwrap(), 123);
        assert_eq!(parse_decimal(&json!(123)).unwrap(), 123);
        assert!(parse_decimal(&json!("abc")).is_err());
        assert!(parse_decimal(&json!(null)).is_err());
    }

    #[test]
    fn hex_int_forms() {
        assert_eq!(parse_hex_int("0x3b9aca00").unwrap(), 1_000_000_000);
        assert_eq!(parse_hex_int("-0x1").unwrap(), -1);
        assert_eq!(parse_hex_int("ff").unwrap(), 255);
        assert!(parse_hex_int("zz").is_err());
    }

    #[test]
    fn stack_entry_roundtrip() {
        let entry = decode_stack_entry(&json!(["num", "0x5"])).unwrap();
        assert!(matches!(entry, StackValue::Int(5)));

        let cell = {
            let mut b = minter_cell::CellBuilder::new();
            b.store_u32(7).unwrap();
            Arc::new(b.build().unwrap())
        };
        let boc = BagOfCells::from_root_arc(cell.clone()).serialize_base64().unwrap();
        let entry = decode_stack_entry(&json!(["cell", { "bytes": boc }])).unwrap();
        match entry {
            StackValue::Cell(restored) => assert_eq!(restored.hash(), cell.hash()),
            other => panic!("unexpected entry {other:?}"),
        }
    }

    #[test]
    fn encode_entries() {
        let encoded = encode_stack_entry(&StackValue::Int(16)).unwrap();
        assert_eq!(encoded, json!(["num", "0x10"]));
    }
}
