//! Interactive operator console for a deployed minter.
//!
//! `TON_API_URL`/`TON_API_KEY` select the endpoint; `WALLET_SECRET` connects
//! the operator wallet (without it the controller runs read-only under the
//! restrictive role policy); `MINTER_CODE_BOC` enables the code-version
//! check at contract selection.

use eyre::Result;
use tracing::warn;

use minter_cell::{BagOfCells, MsgAddress};
use minter_ops::actions::{AdminFallback, ControllerConfig, run};
use minter_ops::console::StdioConsole;
use minter_ops::keys::WalletKeypair;
use minter_ops::poll::PollPolicy;
use minter_ops::toncenter::ToncenterClient;
use minter_ops::{MinterSession, Settings, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();
    let settings = Settings::from_env()?;

    let client = match settings.wallet_secret.as_deref() {
        Some(secret) => ToncenterClient::with_wallet(
            settings.api_url.clone(),
            settings.api_key.clone(),
            WalletKeypair::from_hex(secret)?,
        )?,
        None => {
            warn!("WALLET_SECRET is not set; sends will fail");
            ToncenterClient::new(settings.api_url.clone(), settings.api_key.clone())?
        }
    };

    let reference_code_hash = match settings.minter_code.as_deref() {
        Some(text) => Some(BagOfCells::deserialize_base64(text)?.single_root()?.hash()),
        None => None,
    };
    let config = ControllerConfig {
        admin_fallback: AdminFallback::Restrict,
        reference_code_hash,
    };

    // The address is replaced by contract selection inside the controller.
    let mut session = MinterSession::new(client, MsgAddress::Null, PollPolicy::default());
    let mut console = StdioConsole;
    run(&mut console, &mut session, &config).await?;
    Ok(())
}
