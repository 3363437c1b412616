//! TON message addresses.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE, URL_SAFE_NO_PAD};

use crate::{CellBuilder, CellError, CellResult, CellSlice, crc16_xmodem};

/// A TON message address.
///
/// Standard internal addresses are a signed 8-bit workchain plus a 256-bit
/// account id. The two text forms both appear in operator input:
///
/// - raw: `0:183f2f4ee3...` (workchain, colon, 64 hex digits);
/// - user-friendly: 48-character base64 of tag byte, workchain byte, account
///   id, and a CRC16-XMODEM checksum. Tag 0x11 is bounceable, 0x51
///   non-bounceable, with 0x80 added for testnet-only addresses.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum MsgAddress {
    /// `addr_none$00`.
    Null,
    /// `addr_std$10` without anycast.
    Internal { workchain: i8, account: [u8; 32] },
}

const TAG_BOUNCEABLE: u8 = 0x11;
const TAG_NON_BOUNCEABLE: u8 = 0x51;
const TAG_TESTNET: u8 = 0x80;

impl MsgAddress {
    /// Construct a standard internal address.
    pub fn internal(workchain: i8, account: [u8; 32]) -> Self {
        Self::Internal { workchain, account }
    }

    /// The account id, or zeros for the null address.
    pub fn account(&self) -> [u8; 32] {
        match self {
            Self::Null => [0u8; 32],
            Self::Internal { account, .. } => *account,
        }
    }

    /// The workchain, or 0 for the null address.
    pub fn workchain(&self) -> i8 {
        match self {
            Self::Null => 0,
            Self::Internal { workchain, .. } => *workchain,
        }
    }

    /// Serialize into a builder: 2-bit tag, then for `addr_std$10` the
    /// anycast-absent bit, 8-bit workchain, and 256-bit account id.
    pub fn store_into(&self, builder: &mut CellBuilder) -> CellResult<()> {
        match self {
            Self::Null => {
                builder.store_uint(0b00, 2)?;
            }
            Self::Internal { workchain, account } => {
                builder.store_uint(0b10, 2)?;
                builder.store_bit(false)?;
                builder.store_uint(*workchain as u8 as u64, 8)?;
                builder.store_bytes(account)?;
            }
        }
        Ok(())
    }

    /// Deserialize from a slice. External and var addresses are rejected;
    /// the minter only ever deals in null and standard internal addresses.
    pub fn load_from(slice: &mut CellSlice<'_>) -> CellResult<Self> {
        match slice.load_uint(2)? {
            0b00 => Ok(Self::Null),
            0b10 => {
                if slice.load_bit()? {
                    return Err(CellError::InvalidAddress(
                        "anycast addresses are not supported".into(),
                    ));
                }
                let workchain = slice.load_u8()? as i8;
                let bytes = slice.load_bytes(32)?;
                let mut account = [0u8; 32];
                account.copy_from_slice(&bytes);
                Ok(Self::Internal { workchain, account })
            }
            tag => Err(CellError::InvalidAddress(format!(
                "unsupported address tag {tag:#04b}"
            ))),
        }
    }

    /// Parse either the raw `wc:hex` form or the user-friendly base64 form.
    pub fn parse(input: &str) -> CellResult<Self> {
        let input = input.trim();
        if input.contains(':') {
            Self::parse_raw(input)
        } else {
            Self::parse_user_friendly(input)
        }
    }

    fn parse_raw(input: &str) -> CellResult<Self> {
        let (wc, hex) = input
            .split_once(':')
            .ok_or_else(|| CellError::InvalidAddress(input.into()))?;
        let workchain: i32 = wc
            .parse()
            .map_err(|_| CellError::InvalidAddress(format!("bad workchain in {input}")))?;
        if workchain != 0 && workchain != -1 {
            return Err(CellError::InvalidAddress(format!(
                "unsupported workchain {workchain}"
            )));
        }
        if hex.len() != 64 {
            return Err(CellError::InvalidAddress(format!(
                "account id must be 64 hex digits, got {}",
                hex.len()
            )));
        }
        let mut account = [0u8; 32];
        for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(chunk)
                .map_err(|_| CellError::InvalidAddress(input.into()))?;
            account[i] = u8::from_str_radix(pair, 16)
                .map_err(|_| CellError::InvalidAddress(format!("bad hex in {input}")))?;
        }
        Ok(Self::Internal {
            workchain: workchain as i8,
            account,
        })
    }

    fn parse_user_friendly(input: &str) -> CellResult<Self> {
        let decoded = URL_SAFE
            .decode(input)
            .or_else(|_| URL_SAFE_NO_PAD.decode(input))
            .or_else(|_| STANDARD.decode(input))
            .map_err(|e| CellError::InvalidAddress(format!("{input}: {e}")))?;
        if decoded.len() != 36 {
            return Err(CellError::InvalidAddress(format!(
                "expected 36 bytes, got {}",
                decoded.len()
            )));
        }
        let tag = decoded[0] & !TAG_TESTNET;
        if tag != TAG_BOUNCEABLE && tag != TAG_NON_BOUNCEABLE {
            return Err(CellError::InvalidAddress(format!(
                "unknown address tag {:#04x}",
                decoded[0]
            )));
        }
        let expected = u16::from_be_bytes([decoded[34], decoded[35]]);
        let actual = crc16_xmodem(&decoded[..34]);
        if expected != actual {
            return Err(CellError::InvalidAddress(format!(
                "checksum mismatch in {input}"
            )));
        }
        let workchain = decoded[1] as i8;
        let mut account = [0u8; 32];
        account.copy_from_slice(&decoded[2..34]);
        Ok(Self::Internal { workchain, account })
    }

    /// Raw text form, `workchain:hex`.
    pub fn to_raw(&self) -> String {
        let account = self.account();
        let hex: String = account.iter().map(|b| format!("{b:02x}")).collect();
        format!("{}:{}", self.workchain(), hex)
    }

    /// User-friendly base64 form (url-safe alphabet).
    pub fn to_user_friendly(&self, bounceable: bool, testnet: bool) -> String {
        let mut tag = if bounceable {
            TAG_BOUNCEABLE
        } else {
            TAG_NON_BOUNCEABLE
        };
        if testnet {
            tag |= TAG_TESTNET;
        }
        let mut bytes = Vec::with_capacity(36);
        bytes.push(tag);
        bytes.push(self.workchain() as u8);
        bytes.extend_from_slice(&self.account());
        let checksum = crc16_xmodem(&bytes);
        bytes.extend_from_slice(&checksum.to_be_bytes());
        URL_SAFE.encode(bytes)
    }
}

impl FromStr for MsgAddress {
    type Err = CellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MsgAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "addr_none"),
            Self::Internal { .. } => write!(f, "{}", self.to_raw()),
        }
    }
}

impl fmt::Debug for MsgAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CellBuilder;

    fn sample() -> MsgAddress {
        MsgAddress::internal(0, [0x42; 32])
    }

    #[test]
    fn raw_roundtrip() {
        let address = sample();
        let raw = address.to_raw();
        assert_eq!(MsgAddress::parse(&raw).unwrap(), address);
    }

    #[test]
    fn user_friendly_roundtrip() {
        let address = sample();
        for (bounceable, testnet) in [(true, false), (false, false), (true, true)] {
            let text = address.to_user_friendly(bounceable, testnet);
            assert_eq!(text.len(), 48);
            assert_eq!(MsgAddress::parse(&text).unwrap(), address);
        }
    }

    #[test]
    fn cell_roundtrip() {
        let address = sample();
        let mut builder = CellBuilder::new();
        builder.store_address(&address).unwrap();
        let cell = builder.build().unwrap();
        assert_eq!(cell.bit_len(), 2 + 1 + 8 + 256);

        let mut slice = CellSlice::new(&cell);
        assert_eq!(slice.load_address().unwrap(), address);
    }

    #[test]
    fn null_address_is_two_bits() {
        let mut builder = CellBuilder::new();
        builder.store_address(&MsgAddress::Null).unwrap();
        let cell = builder.build().unwrap();
        assert_eq!(cell.bit_len(), 2);

        let mut slice = CellSlice::new(&cell);
        assert_eq!(slice.load_address().unwrap(), MsgAddress::Null);
    }

    #[test]
    fn corrupted_checksum_rejected() {
        let mut text = sample().to_user_friendly(true, false).into_bytes();
        // Flip a character in the checksum region.
        let last = text.len() - 1;
        text[last] = if text[last] == b'A' { b'B' } else { b'A' };
        let text = String::from_utf8(text).unwrap();
        assert!(MsgAddress::parse(&text).is_err());
    }

    #[test]
    fn masterchain_raw_form() {
        let address = MsgAddress::internal(-1, [0x11; 32]);
        let raw = address.to_raw();
        assert!(raw.starts_with("-1:"));
        assert_eq!(MsgAddress::parse(&raw).unwrap(), address);
    }
}
