//! Asset amounts and the vesting-share price.
//!
//! Amounts are signed raw integers scaled by the symbol's precision
//! (`1.000 STEEM` is `1_000` raw, `1.000000 VESTS` is `1_000_000` raw).
//! Consensus arithmetic never touches floating point.

use crate::error::StateError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three asset classes the governance core tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Symbol {
    /// The liquid unit.
    Steem,
    /// The dollar-pegged liquid unit.
    Sbd,
    /// The non-transferable stake unit.
    Vests,
}

impl Symbol {
    /// Number of decimal places in the display form.
    pub fn precision(self) -> u32 {
        match self {
            Symbol::Steem | Symbol::Sbd => 3,
            Symbol::Vests => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Symbol::Steem => "STEEM",
            Symbol::Sbd => "SBD",
            Symbol::Vests => "VESTS",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw amount tagged with its symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    pub amount: i64,
    pub symbol: Symbol,
}

impl Asset {
    pub const fn new(amount: i64, symbol: Symbol) -> Self {
        Self { amount, symbol }
    }

    pub const fn steem(amount: i64) -> Self {
        Self::new(amount, Symbol::Steem)
    }

    pub const fn sbd(amount: i64) -> Self {
        Self::new(amount, Symbol::Sbd)
    }

    pub const fn vests(amount: i64) -> Self {
        Self::new(amount, Symbol::Vests)
    }

    pub const fn zero(symbol: Symbol) -> Self {
        Self::new(0, symbol)
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    pub fn is_negative(&self) -> bool {
        self.amount < 0
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = 10i64.pow(self.symbol.precision());
        let sign = if self.amount < 0 { "-" } else { "" };
        let abs = self.amount.unsigned_abs();
        let scale = scale as u64;
        write!(
            f,
            "{sign}{}.{:0width$} {}",
            abs / scale,
            abs % scale,
            self.symbol,
            width = self.symbol.precision() as usize
        )
    }
}

/// Checked addition on raw amounts, mapping overflow to [`StateError::Overflow`].
pub fn checked_add(a: i64, b: i64) -> Result<i64, StateError> {
    a.checked_add(b).ok_or(StateError::Overflow)
}

/// Checked subtraction on raw amounts, mapping overflow to [`StateError::Overflow`].
pub fn checked_sub(a: i64, b: i64) -> Result<i64, StateError> {
    a.checked_sub(b).ok_or(StateError::Overflow)
}

/// `value * numerator / denominator` in 128-bit, truncating toward zero.
pub fn mul_div(value: i64, numerator: i64, denominator: i64) -> Result<i64, StateError> {
    if denominator == 0 {
        return Err(StateError::Overflow);
    }
    let wide = i128::from(value) * i128::from(numerator) / i128::from(denominator);
    i64::try_from(wide).map_err(|_| StateError::Overflow)
}

/// The exchange rate between the vesting fund (STEEM) and vesting shares (VESTS).
///
/// An empty pool prices 1.000 STEEM at 1000.000000 VESTS.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingPrice {
    /// Raw STEEM side.
    pub fund: i64,
    /// Raw VESTS side.
    pub shares: i64,
}

impl VestingPrice {
    pub const DEFAULT: Self = Self {
        fund: 1_000,
        shares: 1_000_000,
    };

    /// Price from the global vesting totals.
    pub fn from_totals(total_vesting_fund_steem: i64, total_vesting_shares: i64) -> Self {
        if total_vesting_fund_steem <= 0 || total_vesting_shares <= 0 {
            Self::DEFAULT
        } else {
            Self {
                fund: total_vesting_fund_steem,
                shares: total_vesting_shares,
            }
        }
    }

    /// Convert raw STEEM to raw VESTS.
    pub fn to_vests(&self, steem: i64) -> Result<i64, StateError> {
        mul_div(steem, self.shares, self.fund)
    }

    /// Convert raw VESTS to raw STEEM.
    pub fn to_steem(&self, vests: i64) -> Result<i64, StateError> {
        mul_div(vests, self.fund, self.shares)
    }
}

impl Default for VestingPrice {
    fn default() -> Self {
        Self::DEFAULT
    }
}
