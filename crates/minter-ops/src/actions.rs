//! Interactive controller flows.
//!
//! The controller walks one session: pick a contract, resolve the operator's
//! role, then loop over a menu of actions. Every mutating action follows the
//! same template: prompt, guard against no-op input, confirm, snapshot the
//! last-transaction logical time, send, poll for settlement, and verify the
//! new on-chain state.

use tracing::warn;

use minter_cell::MsgAddress;
use minter_staking::JettonContent;
use minter_staking::ops::{DEFAULT_FORWARD_TON, DEFAULT_TOTAL_TON};

use crate::amount::format_ton;
use crate::client::ChainClient;
use crate::console::{Console, choose, prompt_address, prompt_bit, prompt_ton, prompt_yes_no};
use crate::error::OpsResult;
use crate::session::MinterSession;

const POLL_TIMEOUT_MESSAGE: &str =
    "Failed to get indication of transaction completion from API!\nCheck result manually, or try again";
const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong!";

/// What to do when no operator wallet is connected.
///
/// `Assume` reproduces the historical behavior of granting the admin menu;
/// it exists for offline inspection and must not be used against a contract
/// whose admin menu matters. `Restrict` drops to the user menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminFallback {
    Assume,
    Restrict,
}

/// Controller configuration.
pub struct ControllerConfig {
    pub admin_fallback: AdminFallback,
    /// Reference minter code; a deployed contract with different code
    /// triggers a warning before the session continues.
    pub reference_code_hash: Option<[u8; 32]>,
}

#[derive(Clone, Copy)]
enum Action {
    Mint,
    ChangeAdmin,
    ChangeContent,
    ChangeState,
    ChangePrice,
    Withdraw,
    ChangeWithdrawAddress,
    ChangeWithdrawMinimum,
    Stake,
    Info,
    Quit,
}

const ADMIN_MENU: &[(&str, Action)] = &[
    ("Mint", Action::Mint),
    ("Change admin", Action::ChangeAdmin),
    ("Change content", Action::ChangeContent),
    ("Change state", Action::ChangeState),
    ("Change price", Action::ChangePrice),
    ("Withdrawal", Action::Withdraw),
    ("Change withdraw address", Action::ChangeWithdrawAddress),
    ("Change withdraw minimum", Action::ChangeWithdrawMinimum),
    ("Stake", Action::Stake),
    ("Info", Action::Info),
    ("Quit", Action::Quit),
];

const USER_MENU: &[(&str, Action)] = &[
    ("Stake", Action::Stake),
    ("Info", Action::Info),
    ("Quit", Action::Quit),
];

/// Decide whether the operator gets the admin menu.
pub fn is_admin(
    sender: Option<&MsgAddress>,
    admin: &MsgAddress,
    fallback: AdminFallback,
) -> bool {
    match sender {
        Some(sender) => sender == admin,
        None => fallback == AdminFallback::Assume,
    }
}

/// Run the interactive controller until the operator quits.
pub async fn run(
    console: &mut impl Console,
    session: &mut MinterSession<impl ChainClient>,
    config: &ControllerConfig,
) -> OpsResult<()> {
    select_contract(console, session, config).await?;

    let admin = session.get_jetton_data().await?.admin;
    let sender = session.client().sender_address();
    let admin_role = is_admin(sender.as_ref(), &admin, config.admin_fallback);
    if admin_role && sender.is_none() {
        warn!("no wallet connected; admin menu granted by fallback policy");
        console.write_line(
            "Warning: no wallet is connected, assuming admin role by policy",
        )?;
    }

    let menu = if admin_role { ADMIN_MENU } else { USER_MENU };
    let labels: Vec<&str> = menu.iter().map(|(label, _)| *label).collect();

    loop {
        let choice = choose(console, "Choose an action:", &labels)?;
        match menu[choice].1 {
            Action::Mint => mint(console, session).await?,
            Action::ChangeAdmin => change_admin(console, session).await?,
            Action::ChangeContent => change_content(console, session).await?,
            Action::ChangeState => change_state(console, session).await?,
            Action::ChangePrice => change_price(console, session).await?,
            Action::Withdraw => withdraw(console, session).await?,
            Action::ChangeWithdrawAddress => {
                change_withdraw_address(console, session).await?
            }
            Action::ChangeWithdrawMinimum => {
                change_withdraw_minimum(console, session).await?
            }
            Action::Stake => stake(console, session).await?,
            Action::Info => info(console, session).await?,
            Action::Quit => return Ok(()),
        }
    }
}

/// Prompt for a contract address until a deployed one is chosen, warning
/// when its code differs from the reference version.
async fn select_contract(
    console: &mut impl Console,
    session: &mut MinterSession<impl ChainClient>,
    config: &ControllerConfig,
) -> OpsResult<()> {
    loop {
        let address = prompt_address(console, "Contract address: ")?;
        session.set_address(address);

        let status = session.status().await?;
        if !status.deployed {
            console.write_line("This contract is not active!")?;
            continue;
        }

        if let (Some(expected), Some(code)) = (config.reference_code_hash, &status.code) {
            if code.hash() != expected {
                console.write_line("The contract code differs from the current version!")?;
                if !prompt_yes_no(console, "Use it anyway? (yes/no): ")? {
                    continue;
                }
            }
        }
        return Ok(());
    }
}

/// Shared tail of every mutating action: poll, then verify with `check`.
async fn report_outcome<F>(
    console: &mut impl Console,
    session: &MinterSession<impl ChainClient>,
    prev_lt: u64,
    success_message: &str,
    check: F,
) -> OpsResult<()>
where
    F: AsyncFnOnce() -> OpsResult<bool>,
{
    if !session.wait_settlement(prev_lt).await? {
        console.write_line(POLL_TIMEOUT_MESSAGE)?;
        return Ok(());
    }
    if check().await? {
        console.write_line(success_message)?;
    } else {
        console.write_line(GENERIC_FAILURE_MESSAGE)?;
    }
    Ok(())
}

async fn mint(
    console: &mut impl Console,
    session: &MinterSession<impl ChainClient>,
) -> OpsResult<()> {
    let before = session.get_jetton_data().await?;
    let destination = prompt_address(console, "Destination address: ")?;
    let amount = prompt_ton(console, "Jetton amount: ")?;

    if !prompt_yes_no(
        console,
        &format!("Mint {} jettons to {destination}? (yes/no): ", format_ton(amount)),
    )? {
        return Ok(());
    }

    let prev_lt = session.snapshot_lt().await?;
    session
        .send_mint(&destination, amount, DEFAULT_FORWARD_TON, DEFAULT_TOTAL_TON)
        .await?;

    let expected = before.total_supply + amount;
    report_outcome(console, session, prev_lt, "Mint successful!", async || {
        Ok(session.get_jetton_data().await?.total_supply == expected)
    })
    .await
}

async fn change_admin(
    console: &mut impl Console,
    session: &MinterSession<impl ChainClient>,
) -> OpsResult<()> {
    let current = session.get_jetton_data().await?.admin;
    let new_admin = loop {
        let candidate = prompt_address(console, "New admin address: ")?;
        if candidate == current {
            console.write_line("Address written in contract")?;
            continue;
        }
        break candidate;
    };

    if !prompt_yes_no(console, &format!("Change admin to {new_admin}? (yes/no): "))? {
        return Ok(());
    }

    let prev_lt = session.snapshot_lt().await?;
    session.send_change_admin(&new_admin).await?;

    report_outcome(
        console,
        session,
        prev_lt,
        "Admin changed successfully",
        async || Ok(session.get_jetton_data().await?.admin == new_admin),
    )
    .await
}

async fn change_content(
    console: &mut impl Console,
    session: &MinterSession<impl ChainClient>,
) -> OpsResult<()> {
    let current = session.get_jetton_data().await?.content_uri()?;
    let uri = loop {
        console.write("New content URI: ")?;
        let candidate = console.read_line()?;
        if candidate == current {
            console.write_line("URI written in contract")?;
            continue;
        }
        break candidate;
    };

    if !prompt_yes_no(console, &format!("Change content to {uri:?}? (yes/no): "))? {
        return Ok(());
    }

    let prev_lt = session.snapshot_lt().await?;
    let content = JettonContent::off_chain(uri.clone());
    session.send_change_content(&content).await?;

    report_outcome(
        console,
        session,
        prev_lt,
        "Content changed successfully",
        async || Ok(session.get_jetton_data().await?.content_uri()? == uri),
    )
    .await
}

async fn change_state(
    console: &mut impl Console,
    session: &MinterSession<impl ChainClient>,
) -> OpsResult<()> {
    let current = session.get_staking_data().await?.state;
    let state = loop {
        let candidate = prompt_bit(console, "New state (0 closed, 1 open): ")?;
        if candidate == current {
            console.write_line("State written in contract")?;
            continue;
        }
        break candidate;
    };

    if !prompt_yes_no(
        console,
        &format!("Set staking state to {}? (yes/no): ", state as u8),
    )? {
        return Ok(());
    }

    let prev_lt = session.snapshot_lt().await?;
    session.send_change_state(state).await?;

    report_outcome(
        console,
        session,
        prev_lt,
        "State changed successfully",
        async || Ok(session.get_staking_data().await?.state == state),
    )
    .await
}

async fn change_price(
    console: &mut impl Console,
    session: &MinterSession<impl ChainClient>,
) -> OpsResult<()> {
    let current = session.get_staking_data().await?.price;
    let price = loop {
        let candidate = prompt_ton(console, "New price: ")?;
        if candidate == current as u128 {
            console.write_line("Price written in contract")?;
            continue;
        }
        break candidate;
    };

    if !prompt_yes_no(
        console,
        &format!("Change price to {}? (yes/no): ", format_ton(price)),
    )? {
        return Ok(());
    }

    let prev_lt = session.snapshot_lt().await?;
    session.send_change_price(price).await?;

    report_outcome(
        console,
        session,
        prev_lt,
        "Price changed successfully",
        async || Ok(session.get_staking_data().await?.price as u128 == price),
    )
    .await
}

async fn withdraw(
    console: &mut impl Console,
    session: &MinterSession<impl ChainClient>,
) -> OpsResult<()> {
    let data = session.get_withdraw_data().await?;
    let status = session.status().await?;
    if status.balance < data.minimum {
        console.write_line(&format!(
            "Contract balance {} is below the withdraw minimum {}",
            format_ton(status.balance),
            format_ton(data.minimum)
        ))?;
        return Ok(());
    }

    if !prompt_yes_no(
        console,
        &format!("Withdraw to {}? (yes/no): ", data.address),
    )? {
        return Ok(());
    }

    let balance_before = status.balance;
    let prev_lt = session.snapshot_lt().await?;
    session.send_withdraw().await?;

    report_outcome(
        console,
        session,
        prev_lt,
        "Withdrawal completed",
        async || Ok(session.status().await?.balance < balance_before),
    )
    .await
}

async fn change_withdraw_address(
    console: &mut impl Console,
    session: &MinterSession<impl ChainClient>,
) -> OpsResult<()> {
    let current = session.get_withdraw_data().await?.address;
    let new_address = loop {
        let candidate = prompt_address(console, "New withdraw address: ")?;
        if candidate == current {
            console.write_line("Address written in contract")?;
            continue;
        }
        break candidate;
    };

    if !prompt_yes_no(
        console,
        &format!("Change withdraw address to {new_address}? (yes/no): "),
    )? {
        return Ok(());
    }

    let prev_lt = session.snapshot_lt().await?;
    session.send_change_withdraw_address(&new_address).await?;

    report_outcome(
        console,
        session,
        prev_lt,
        "Withdraw address changed successfully",
        async || Ok(session.get_withdraw_data().await?.address == new_address),
    )
    .await
}

async fn change_withdraw_minimum(
    console: &mut impl Console,
    session: &MinterSession<impl ChainClient>,
) -> OpsResult<()> {
    let current = session.get_withdraw_data().await?.minimum;
    let minimum = loop {
        let candidate = prompt_ton(console, "New withdraw minimum: ")?;
        if candidate == current {
            console.write_line("Minimum written in contract")?;
            continue;
        }
        break candidate;
    };

    if !prompt_yes_no(
        console,
        &format!("Change withdraw minimum to {}? (yes/no): ", format_ton(minimum)),
    )? {
        return Ok(());
    }

    let prev_lt = session.snapshot_lt().await?;
    session.send_change_withdraw_minimum(minimum).await?;

    report_outcome(
        console,
        session,
        prev_lt,
        "Withdraw minimum changed successfully",
        async || Ok(session.get_withdraw_data().await?.minimum == minimum),
    )
    .await
}

async fn stake(
    console: &mut impl Console,
    session: &MinterSession<impl ChainClient>,
) -> OpsResult<()> {
    let staking = session.get_staking_data().await?;
    if !staking.state {
        console.write_line("Staking is closed")?;
        return Ok(());
    }

    let before = session.get_jetton_data().await?.total_supply;
    let value = prompt_ton(console, "Stake amount: ")?;
    let expected = session.get_jetton_amount(value).await?;
    console.write_line(&format!(
        "You will receive {} jettons",
        format_ton(expected)
    ))?;

    if !prompt_yes_no(
        console,
        &format!("Stake {}? (yes/no): ", format_ton(value)),
    )? {
        return Ok(());
    }

    let prev_lt = session.snapshot_lt().await?;
    session.send_buy(value).await?;

    report_outcome(console, session, prev_lt, "Stake successful!", async || {
        Ok(session.get_jetton_data().await?.total_supply > before)
    })
    .await
}

async fn info(
    console: &mut impl Console,
    session: &MinterSession<impl ChainClient>,
) -> OpsResult<()> {
    let data = session.get_jetton_data().await?;
    console.write_line(&format!("Total supply: {}", format_ton(data.total_supply)))?;
    console.write_line(&format!("Mintable: {}", data.mintable))?;
    console.write_line(&format!("Admin: {}", data.admin))?;

    if prompt_yes_no(console, "Show content? (yes/no): ")? {
        console.write_line(&format!("Content URI: {}", data.content_uri()?))?;
    }
    if prompt_yes_no(console, "Show staking data? (yes/no): ")? {
        let staking = session.get_staking_data().await?;
        console.write_line(&format!("State: {}", if staking.state { "open" } else { "closed" }))?;
        console.write_line(&format!("Price: {}", format_ton(staking.price as u128)))?;
    }
    if prompt_yes_no(console, "Show withdraw data? (yes/no): ")? {
        let withdraw = session.get_withdraw_data().await?;
        console.write_line(&format!("Withdraw minimum: {}", format_ton(withdraw.minimum)))?;
        console.write_line(&format!("Withdraw address: {}", withdraw.address))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_resolution() {
        let admin = MsgAddress::internal(0, [1; 32]);
        let other = MsgAddress::internal(0, [2; 32]);

        assert!(is_admin(Some(&admin), &admin, AdminFallback::Restrict));
        assert!(!is_admin(Some(&other), &admin, AdminFallback::Restrict));
        assert!(is_admin(None, &admin, AdminFallback::Assume));
        assert!(!is_admin(None, &admin, AdminFallback::Restrict));
    }
}
