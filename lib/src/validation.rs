//! Input validation at the user-facing boundary.

use ethereum_types::U256;

use crate::error::{Result, WalletError};
use crate::types::Address;

const WEI_PER_ETH_DIGITS: usize = 18;

pub fn parse_address(s: &str) -> Result<Address> {
    s.trim().parse()
}

pub fn parse_tx_id(s: &str) -> Result<u64> {
    s.trim()
        .parse()
        .map_err(|_| WalletError::InvalidInput(format!("not a valid proposal id: {s}")))
}

/// Parses a decimal ETH amount (`"1"`, `"0.5"`, `".25"`) into wei.
/// At most 18 fractional digits.
pub fn parse_eth_amount(s: &str) -> Result<U256> {
    let s = s.trim();
    let (whole, frac) = match s.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (s, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(WalletError::InvalidInput("amount is empty".into()));
    }
    let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
    if !all_digits(whole) || !all_digits(frac) {
        return Err(WalletError::InvalidInput(format!(
            "amount must be a decimal number: {s}"
        )));
    }
    if frac.len() > WEI_PER_ETH_DIGITS {
        return Err(WalletError::InvalidInput(format!(
            "amount has more than {WEI_PER_ETH_DIGITS} fractional digits: {s}"
        )));
    }

    let overflow = || WalletError::InvalidInput(format!("amount too large: {s}"));
    let whole_wei = parse_dec(if whole.is_empty() { "0" } else { whole })?
        .checked_mul(U256::exp10(WEI_PER_ETH_DIGITS))
        .ok_or_else(overflow)?;
    let frac_wei = if frac.is_empty() {
        U256::zero()
    } else {
        let mut padded = frac.to_string();
        while padded.len() < WEI_PER_ETH_DIGITS {
            padded.push('0');
        }
        parse_dec(&padded)?
    };
    whole_wei.checked_add(frac_wei).ok_or_else(overflow)
}

fn parse_dec(digits: &str) -> Result<U256> {
    U256::from_dec_str(digits)
        .map_err(|_| WalletError::InvalidInput(format!("not a decimal number: {digits}")))
}

/// Renders a wei amount as a decimal ETH string, trimming trailing zeros.
pub fn format_eth(wei: U256) -> String {
    let ether = wei / U256::exp10(WEI_PER_ETH_DIGITS);
    let remainder = wei % U256::exp10(WEI_PER_ETH_DIGITS);
    if remainder.is_zero() {
        return ether.to_string();
    }
    let mut frac = remainder.to_string();
    while frac.len() < WEI_PER_ETH_DIGITS {
        frac.insert(0, '0');
    }
    let frac = frac.trim_end_matches('0');
    format!("{ether}.{frac}")
}
