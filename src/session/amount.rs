//! Validated reimbursement amounts.

use std::{fmt::Display, str::FromStr};

use crate::Error;

/// A finite amount of money strictly greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Amount(f64);

impl Amount {
    /// Create an amount.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidAmount] if `amount` is NaN, infinite, zero or
    /// negative.
    pub fn new(amount: f64) -> Result<Self, Error> {
        if amount.is_finite() && amount > 0.0 {
            Ok(Self(amount))
        } else {
            Err(Error::InvalidAmount(amount.to_string()))
        }
    }

    /// The amount as a number.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl FromStr for Amount {
    type Err = Error;

    /// Parse user input such as `" 25.50 "`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        let amount: f64 = trimmed
            .parse()
            .map_err(|_| Error::InvalidAmount(trimmed.to_owned()))?;

        Amount::new(amount).map_err(|_| Error::InvalidAmount(trimmed.to_owned()))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
