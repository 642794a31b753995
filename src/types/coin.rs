//! Coin amounts held by accounts and carried in transfer packets.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WithdrawError};

/// A single denomination and amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: u128,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Largest amount an ICS-20 packet can carry: 2^256 - 1.
const MAX_PACKET_AMOUNT: &str =
    "115792089237316195423570985008687907853269984665640564039457584007913129639935";

/// Checks the decimal amount string of a transfer payload.
///
/// Amounts are 256-bit on the wire. They are checked for syntax and range
/// only, never converted, since the engine reverses held balances rather than
/// the packet amount.
pub fn validate_amount(amount: &str) -> Result<()> {
    if amount.is_empty() {
        return Err(WithdrawError::InvalidCoins("empty amount".to_string()));
    }
    if !amount.bytes().all(|b| b.is_ascii_digit()) {
        return Err(WithdrawError::InvalidCoins(format!("invalid amount: {}", amount)));
    }

    let significant = amount.trim_start_matches('0');
    if significant.is_empty() {
        return Err(WithdrawError::InvalidCoins("amount must be positive".to_string()));
    }
    // Equal-length digit strings compare like the numbers they spell.
    if significant.len() > MAX_PACKET_AMOUNT.len()
        || (significant.len() == MAX_PACKET_AMOUNT.len() && significant > MAX_PACKET_AMOUNT)
    {
        return Err(WithdrawError::InvalidCoins(format!("amount out of range: {}", amount)));
    }
    Ok(())
}

/// Renders a list of coins the way balances are logged: `10aevmos,5ibc/...`.
pub fn coins_to_string(coins: &[Coin]) -> String {
    coins
        .iter()
        .map(|coin| coin.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
