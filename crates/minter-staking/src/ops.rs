//! Operation codes, attached-value constants, and send modes.
//!
//! Every number the codec and the operator tooling share lives here.
//! Attached values are in nanotons.

/// Mint new jettons to a destination wallet. Admin only.
pub const OP_MINT: u32 = 0x4fda1e51;

/// TEP-89 ownership discovery request.
pub const OP_PROVIDE_WALLET_ADDRESS: u32 = 0x2c76b973;

/// Transfer the admin role to another address. Admin only.
pub const OP_CHANGE_ADMIN: u32 = 0x4840664f;

/// Point withdrawals at a different address. Admin only.
pub const OP_CHANGE_WITHDRAW_ADDRESS: u32 = 0x4f9d828b;

/// Replace the jetton content cell. Admin only.
pub const OP_CHANGE_CONTENT: u32 = 0x11067aba;

/// Open or close staking. Admin only.
pub const OP_CHANGE_STATE: u32 = 0x58ca5361;

/// Sweep accumulated TON to the withdraw address. Admin only.
pub const OP_WITHDRAW: u32 = 0x46ed2e94;

/// Stake TON for jettons at the current price.
pub const OP_BUY: u32 = 0xc89a3ee4;

/// Set the jetton price. Admin only.
pub const OP_CHANGE_PRICE: u32 = 0xf4463799;

/// Set the minimum withdrawable amount. Admin only.
pub const OP_CHANGE_WITHDRAW_MINIMUM: u32 = 0x6f45070e;

/// Query id attached to every outbound body.
pub const QUERY_ID: u64 = 0;

/// Value carried by the deploy message: 0.05 TON.
pub const DEPLOY_VALUE: u128 = 50_000_000;

/// Value for admin/content/withdraw-address changes, discovery, and
/// withdrawal: 0.1 TON.
pub const SIMPLE_CHANGE_VALUE: u128 = 100_000_000;

/// Value for state, price, and withdraw-minimum changes: 0.2 TON.
pub const GATED_CHANGE_VALUE: u128 = 200_000_000;

/// Added on top of the mint total to cover processing: 0.1 TON.
pub const MINT_SURCHARGE: u128 = 100_000_000;

/// Default forward amount for minted jettons: 0.05 TON.
pub const DEFAULT_FORWARD_TON: u128 = 50_000_000;

/// Default total amount shipped with a mint: 0.1 TON.
pub const DEFAULT_TOTAL_TON: u128 = 100_000_000;

/// Coins reserved in the initial storage cell: 1 TON.
pub const RESERVE_COINS: u128 = 1_000_000_000;

/// Sender pays transfer fees separately from the message value.
pub const SEND_MODE_PAY_GAS_SEPARATELY: u8 = 1;
