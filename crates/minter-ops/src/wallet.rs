//! Wallet v3r2 signing.
//!
//! Outbound sends are wrapped in an external message to the operator's
//! wallet contract, whose body the wallet verifies against the operator's
//! Ed25519 key: `sig:512 subwallet:32 valid_until:32 seqno:32 (mode:8
//! ^msg)*`.

use std::sync::Arc;

use minter_cell::{BagOfCells, Cell, CellBuilder, MsgAddress};
use minter_staking::StateInit;

use crate::error::OpsResult;
use crate::keys::WalletKeypair;

/// Default subwallet id for v3 wallets.
pub const DEFAULT_SUBWALLET_ID: u32 = 698_983_191;

/// Published wallet v3r2 contract code.
pub const WALLET_V3R2_CODE: &str = "te6cckEBAQEAcQAA3v8AIN0gggFMl7ohggEznLqxn3Gw7UTQ0x/THzHXC//jBOCk8mCDCNcYINMf0x/TH/gjE7vyY+1E0NMf0x/T/9FRMrryoVFEuvKiBPkBVBBV+RDyo/gAkyDXSpbTB9QC+wDo0QGkyMsfyx/L/8ntVBC9ba0=";

/// One message in a signed transfer.
pub struct Transfer {
    pub to: MsgAddress,
    pub value: u128,
    pub body: Option<Arc<Cell>>,
    pub state_init: Option<StateInit>,
    pub mode: u8,
}

/// A v3r2 wallet bound to an operator keypair.
pub struct WalletV3R2 {
    keypair: WalletKeypair,
    subwallet_id: u32,
    code: Arc<Cell>,
    address: MsgAddress,
}

impl WalletV3R2 {
    /// Derive the wallet in `workchain` from its keypair.
    pub fn new(keypair: WalletKeypair, workchain: i8) -> OpsResult<Self> {
        let code = BagOfCells::deserialize_base64(WALLET_V3R2_CODE)?
            .single_root()?
            .clone();
        let data = Arc::new(Self::initial_data(&keypair, DEFAULT_SUBWALLET_ID)?);
        let state_init = StateInit {
            code: code.clone(),
            data,
        };
        let address = MsgAddress::internal(workchain, state_init.to_cell()?.hash());
        Ok(Self {
            keypair,
            subwallet_id: DEFAULT_SUBWALLET_ID,
            code,
            address,
        })
    }

    /// The wallet contract's address.
    pub fn address(&self) -> &MsgAddress {
        &self.address
    }

    /// The wallet's own state init, needed for its first outbound transfer.
    pub fn state_init(&self) -> OpsResult<StateInit> {
        Ok(StateInit {
            code: self.code.clone(),
            data: Arc::new(Self::initial_data(&self.keypair, self.subwallet_id)?),
        })
    }

    /// Build and sign an external message carrying `transfer` at `seqno`,
    /// valid until `valid_until` (unix seconds). Returns the serialized BoC
    /// ready for submission.
    pub fn signed_external(
        &self,
        transfer: &Transfer,
        seqno: u32,
        valid_until: u32,
    ) -> OpsResult<Vec<u8>> {
        let internal = Arc::new(Self::internal_message(transfer)?);

        let mut body = CellBuilder::new();
        body.store_u32(self.subwallet_id)?;
        body.store_u32(valid_until)?;
        body.store_u32(seqno)?;
        body.store_u8(transfer.mode)?;
        body.store_ref(internal)?;
        let body = body.build()?;

        let signature = self.keypair.sign(&body.hash());

        let mut signed = CellBuilder::new();
        signed.store_bytes(&signature)?;
        signed.store_bits(body.data(), body.bit_len())?;
        for reference in body.references() {
            signed.store_ref(reference.clone())?;
        }
        let signed = Arc::new(signed.build()?);

        // ext_in_msg_info$10 src:addr_none dest import_fee:0.
        let mut external = CellBuilder::new();
        external.store_uint(0b10, 2)?;
        external.store_address(&MsgAddress::Null)?;
        external.store_address(&self.address)?;
        external.store_coins(0)?;
        // Wallet state init travels along until the first transfer deploys it.
        if seqno == 0 {
            external.store_bit(true)?;
            external.store_bit(true)?;
            external.store_ref(Arc::new(self.state_init()?.to_cell()?))?;
        } else {
            external.store_bit(false)?;
        }
        external.store_bit(true)?;
        external.store_ref(signed)?;
        let external = external.build()?;

        Ok(BagOfCells::from_root(external).serialize()?)
    }

    /// `int_msg_info$0` header plus optional state init and body refs.
    fn internal_message(transfer: &Transfer) -> OpsResult<Cell> {
        let mut builder = CellBuilder::new();
        builder.store_bit(false)?; // int_msg_info$0
        builder.store_bit(true)?; // ihr_disabled
        builder.store_bit(true)?; // bounce
        builder.store_bit(false)?; // bounced
        builder.store_address(&MsgAddress::Null)?; // src, filled by validator
        builder.store_address(&transfer.to)?;
        builder.store_coins(transfer.value)?;
        builder.store_bit(false)?; // no extra currencies
        builder.store_coins(0)?; // ihr_fee
        builder.store_coins(0)?; // fwd_fee
        builder.store_u64(0)?; // created_lt
        builder.store_u32(0)?; // created_at

        match &transfer.state_init {
            Some(init) => {
                builder.store_bit(true)?;
                builder.store_bit(true)?;
                builder.store_ref(Arc::new(init.to_cell()?))?;
            }
            None => {
                builder.store_bit(false)?;
            }
        }
        match &transfer.body {
            Some(body) => {
                builder.store_bit(true)?;
                builder.store_ref(body.clone())?;
            }
            None => {
                builder.store_bit(false)?;
            }
        }
        Ok(builder.build()?)
    }

    fn initial_data(keypair: &WalletKeypair, subwallet_id: u32) -> OpsResult<Cell> {
        let mut builder = CellBuilder::new();
        builder.store_u32(0)?; // seqno
        builder.store_u32(subwallet_id)?;
        builder.store_bytes(keypair.public_key())?;
        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minter_cell::CellSlice;

    fn wallet() -> WalletV3R2 {
        WalletV3R2::new(WalletKeypair::from_secret([9; 32]), 0).unwrap()
    }

    #[test]
    fn address_is_deterministic() {
        let a = wallet();
        let b = wallet();
        assert_eq!(a.address(), b.address());
        assert!(matches!(a.address(), MsgAddress::Internal { workchain: 0, .. }));
    }

    #[test]
    fn different_keys_different_addresses() {
        let a = WalletV3R2::new(WalletKeypair::from_secret([1; 32]), 0).unwrap();
        let b = WalletV3R2::new(WalletKeypair::from_secret([2; 32]), 0).unwrap();
        assert_ne!(a.address(), b.address());
    }

    #[test]
    fn internal_message_layout() {
        let to = MsgAddress::internal(0, [0x44; 32]);
        let transfer = Transfer {
            to: to.clone(),
            value: 100_000_000,
            body: None,
            state_init: None,
            mode: 1,
        };
        let cell = WalletV3R2::internal_message(&transfer).unwrap();
        let mut slice = CellSlice::new(&cell);
        assert!(!slice.load_bit().unwrap()); // internal
        assert!(slice.load_bit().unwrap()); // ihr_disabled
        assert!(slice.load_bit().unwrap()); // bounce
        assert!(!slice.load_bit().unwrap()); // bounced
        assert_eq!(slice.load_address().unwrap(), MsgAddress::Null);
        assert_eq!(slice.load_address().unwrap(), to);
        assert_eq!(slice.load_coins().unwrap(), 100_000_000);
    }

    #[test]
    fn first_transfer_carries_wallet_state_init() {
        let wallet = wallet();
        let transfer = Transfer {
            to: MsgAddress::internal(0, [0x44; 32]),
            value: 1,
            body: None,
            state_init: None,
            mode: 1,
        };
        let boc = wallet.signed_external(&transfer, 0, 1_700_000_000).unwrap();
        let root = BagOfCells::deserialize(&boc).unwrap();
        let root = root.single_root().unwrap();
        // state init ref plus signed body ref
        assert_eq!(root.reference_count(), 2);

        let boc = wallet.signed_external(&transfer, 1, 1_700_000_000).unwrap();
        let root = BagOfCells::deserialize(&boc).unwrap();
        let root = root.single_root().unwrap();
        assert_eq!(root.reference_count(), 1);
    }
}
