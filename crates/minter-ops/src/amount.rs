//! TON amount parsing and formatting.
//!
//! Operators type decimal TON ("1.5"); the chain deals in nanotons.

use crate::error::{OpsError, OpsResult};

const NANO: u128 = 1_000_000_000;

/// Parse a decimal TON amount into nanotons. At most nine fractional
/// digits; anything else is a configuration error for the caller to
/// re-prompt on.
pub fn parse_ton(input: &str) -> OpsResult<u128> {
    let input = input.trim();
    if input.is_empty() {
        return Err(OpsError::Config("empty amount".into()));
    }
    let (whole, frac) = match input.split_once('.') {
        Some((w, f)) => (w, f),
        None => (input, ""),
    };
    if frac.len() > 9 {
        return Err(OpsError::Config(format!(
            "too many decimal places in {input}"
        )));
    }
    let whole: u128 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| OpsError::Config(format!("invalid amount {input}")))?
    };
    let frac_nano: u128 = if frac.is_empty() {
        0
    } else {
        let padded = format!("{frac:0<9}");
        padded
            .parse()
            .map_err(|_| OpsError::Config(format!("invalid amount {input}")))?
    };
    whole
        .checked_mul(NANO)
        .and_then(|n| n.checked_add(frac_nano))
        .ok_or_else(|| OpsError::Config(format!("amount too large: {input}")))
}

/// Format nanotons as decimal TON without trailing zeros.
pub fn format_ton(nanotons: u128) -> String {
    let whole = nanotons / NANO;
    let frac = nanotons % NANO;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{frac:09}");
    let frac = frac.trim_end_matches('0');
    format!("{whole}.{frac}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_whole_and_fractional() {
        assert_eq!(parse_ton("1").unwrap(), 1_000_000_000);
        assert_eq!(parse_ton("0.05").unwrap(), 50_000_000);
        assert_eq!(parse_ton("1.5").unwrap(), 1_500_000_000);
        assert_eq!(parse_ton(".1").unwrap(), 100_000_000);
        assert_eq!(parse_ton("0.000000001").unwrap(), 1);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_ton("").is_err());
        assert!(parse_ton("abc").is_err());
        assert!(parse_ton("1.1234567891").is_err());
        assert!(parse_ton("-1").is_err());
    }

    #[test]
    fn format_strips_trailing_zeros() {
        assert_eq!(format_ton(1_000_000_000), "1");
        assert_eq!(format_ton(1_500_000_000), "1.5");
        assert_eq!(format_ton(50_000_000), "0.05");
        assert_eq!(format_ton(1), "0.000000001");
    }

    #[test]
    fn roundtrip() {
        for nanotons in [0u128, 1, 50_000_000, 1_000_000_000, 123_456_789_012] {
            assert_eq!(parse_ton(&format_ton(nanotons)).unwrap(), nanotons);
        }
    }
}
