//! Deploy the jetton minter-staking contract.
//!
//! All parameters come from the environment: `JETTON_ADMIN`,
//! `JETTON_CONTENT_URI`, `MINTER_CODE_BOC`, `JETTON_WALLET_CODE_BOC`, plus
//! the optional `JETTON_STATE`, `JETTON_PRICE`, and `JETTON_CAP` with
//! hardcoded fallbacks. `WALLET_SECRET` signs the deploy message.

use eyre::{WrapErr, eyre};
use tracing::info;

use minter_cell::{BagOfCells, MsgAddress};
use minter_ops::keys::WalletKeypair;
use minter_ops::poll::PollPolicy;
use minter_ops::toncenter::ToncenterClient;
use minter_ops::{MinterSession, Settings, telemetry};
use minter_staking::{JettonContent, JettonMinterStaking, MinterConfig};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    telemetry::init();
    let settings = Settings::from_env()?;

    let admin = MsgAddress::parse(settings.require_admin()?)
        .wrap_err("JETTON_ADMIN is not a valid address")?;
    let content = JettonContent::off_chain(settings.require_content_uri()?);
    let minter_code = BagOfCells::deserialize_base64(
        settings
            .minter_code
            .as_deref()
            .ok_or_else(|| eyre!("MINTER_CODE_BOC is not set"))?,
    )?
    .single_root()?
    .clone();
    let wallet_code = BagOfCells::deserialize_base64(
        settings
            .wallet_code
            .as_deref()
            .ok_or_else(|| eyre!("JETTON_WALLET_CODE_BOC is not set"))?,
    )?
    .single_root()?
    .clone();

    let mut config = MinterConfig::new(
        admin,
        content,
        wallet_code,
        settings.state,
        settings.price,
    );
    config.cap = settings.cap;

    let contract = JettonMinterStaking::from_config(0, minter_code, &config)?;
    info!(address = %contract.address, "computed contract address");

    let secret = settings
        .wallet_secret
        .as_deref()
        .ok_or_else(|| eyre!("WALLET_SECRET is not set"))?;
    let keypair = WalletKeypair::from_hex(secret)?;
    let client = ToncenterClient::with_wallet(
        settings.api_url.clone(),
        settings.api_key.clone(),
        keypair,
    )?;

    let session = MinterSession::new(client, contract.address.clone(), PollPolicy::default());

    let status = session.status().await?;
    if status.deployed {
        info!("contract is already deployed");
    } else {
        session.send_deploy(&contract).await?;
        info!("deploy message sent, waiting for the account to activate");
        let settled = session.wait_settlement(0).await?;
        if !settled {
            return Err(eyre!(
                "deploy not confirmed in time; check the contract state manually"
            ));
        }
    }

    let data = session.get_jetton_data().await?;
    println!("Contract:     {}", contract.address);
    println!("Total supply: {}", data.total_supply);
    println!("Mintable:     {}", data.mintable);
    println!("Admin:        {}", data.admin);
    println!("Content URI:  {}", data.content_uri()?);
    Ok(())
}
