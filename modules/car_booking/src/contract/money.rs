use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Amount must not be negative: {amount}")]
    Negative { amount: String },

    #[error("Amount has more than two fractional digits: {amount}")]
    TooPrecise { amount: String },

    #[error("Amount out of range: {amount}")]
    Overflow { amount: String },

    #[error("Invalid amount '{input}'")]
    Parse { input: String },
}

/// Non-negative currency amount in integer cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money {
    cents: i64,
}

impl Money {
    pub const ZERO: Money = Money { cents: 0 };

    pub fn from_cents(cents: i64) -> Result<Self, MoneyError> {
        if cents < 0 {
            return Err(MoneyError::Negative {
                amount: Decimal::new(cents, 2).to_string(),
            });
        }
        Ok(Self { cents })
    }

    /// Exact conversion; amounts finer than one cent are rejected, not rounded.
    pub fn from_decimal(amount: Decimal) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::Negative {
                amount: amount.to_string(),
            });
        }
        if amount.normalize().scale() > 2 {
            return Err(MoneyError::TooPrecise {
                amount: amount.to_string(),
            });
        }
        let cents = amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|c| c.to_i64())
            .ok_or_else(|| MoneyError::Overflow {
                amount: amount.to_string(),
            })?;
        Ok(Self { cents })
    }

    pub fn cents(self) -> i64 {
        self.cents
    }

    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.cents, 2)
    }

    /// `None` on overflow or a negative factor.
    pub fn checked_mul(self, factor: i64) -> Option<Money> {
        if factor < 0 {
            return None;
        }
        self.cents
            .checked_mul(factor)
            .map(|cents| Money { cents })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| MoneyError::Parse {
            input: s.to_string(),
        })?;
        Self::from_decimal(amount)
    }
}
