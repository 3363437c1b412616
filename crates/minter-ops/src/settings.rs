//! Environment-driven configuration.

use std::env;

use crate::error::{OpsError, OpsResult};

const DEFAULT_API_URL: &str = "https://testnet.toncenter.com/api/v2";
const DEFAULT_STATE: bool = false;
const DEFAULT_PRICE: u64 = 1_000_000_000;
const DEFAULT_CAP: u128 = 1_000_000_000;

/// Process configuration, loaded once at startup.
///
/// Values come from the environment (a `.env` file is honored when present);
/// deploy parameters fall back to the historical defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Toncenter-style API base URL.
    pub api_url: String,
    /// Optional API key, sent as `X-API-Key`.
    pub api_key: Option<String>,
    /// Hex-encoded operator wallet secret. Sends are disabled without it.
    pub wallet_secret: Option<String>,
    /// Admin address for deploys.
    pub admin: Option<String>,
    /// Jetton metadata URI for deploys.
    pub content_uri: Option<String>,
    /// Initial staking state for deploys.
    pub state: bool,
    /// Initial price for deploys, nanotons per jetton unit.
    pub price: u64,
    /// Reserve coins stored at deploy.
    pub cap: u128,
    /// Base64 BoC of the minter contract code.
    pub minter_code: Option<String>,
    /// Base64 BoC of the jetton wallet code.
    pub wallet_code: Option<String>,
}

impl Settings {
    /// Load settings from the environment.
    pub fn from_env() -> OpsResult<Self> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            api_url: var("TON_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_key: var("TON_API_KEY"),
            wallet_secret: var("WALLET_SECRET"),
            admin: var("JETTON_ADMIN"),
            content_uri: var("JETTON_CONTENT_URI"),
            state: match var("JETTON_STATE").as_deref() {
                None => DEFAULT_STATE,
                Some("0") => false,
                Some("1") => true,
                Some(other) => {
                    return Err(OpsError::Config(format!(
                        "JETTON_STATE must be 0 or 1, got {other}"
                    )));
                }
            },
            price: parse_var("JETTON_PRICE")?.unwrap_or(DEFAULT_PRICE),
            cap: parse_var("JETTON_CAP")?.unwrap_or(DEFAULT_CAP),
            minter_code: var("MINTER_CODE_BOC"),
            wallet_code: var("JETTON_WALLET_CODE_BOC"),
        })
    }

    /// The admin address, required for deploys.
    pub fn require_admin(&self) -> OpsResult<&str> {
        self.admin
            .as_deref()
            .ok_or_else(|| OpsError::Config("JETTON_ADMIN is not set".into()))
    }

    /// The content URI, required for deploys.
    pub fn require_content_uri(&self) -> OpsResult<&str> {
        self.content_uri
            .as_deref()
            .ok_or_else(|| OpsError::Config("JETTON_CONTENT_URI is not set".into()))
    }
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &str) -> OpsResult<Option<T>> {
    match var(name) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| OpsError::Config(format!("{name} is not a valid number: {raw}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var tests mutate process state; keep them in one test to avoid
    // interleaving with parallel test threads.
    #[test]
    fn defaults_and_overrides() {
        let keys = [
            "TON_API_URL",
            "TON_API_KEY",
            "WALLET_SECRET",
            "JETTON_ADMIN",
            "JETTON_CONTENT_URI",
            "JETTON_STATE",
            "JETTON_PRICE",
            "JETTON_CAP",
            "MINTER_CODE_BOC",
            "JETTON_WALLET_CODE_BOC",
        ];
        for key in keys {
            unsafe { env::remove_var(key) };
        }

        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert!(!settings.state);
        assert_eq!(settings.price, 1_000_000_000);
        assert_eq!(settings.cap, 1_000_000_000);
        assert!(settings.require_admin().is_err());

        unsafe {
            env::set_var("JETTON_STATE", "1");
            env::set_var("JETTON_PRICE", "2000000000");
            env::set_var("JETTON_ADMIN", "0:".to_string() + &"ab".repeat(32));
        }
        let settings = Settings::from_env().unwrap();
        assert!(settings.state);
        assert_eq!(settings.price, 2_000_000_000);
        assert!(settings.require_admin().is_ok());

        unsafe { env::set_var("JETTON_STATE", "yes") };
        assert!(Settings::from_env().is_err());

        for key in keys {
            unsafe { env::remove_var(key) };
        }
    }
}
