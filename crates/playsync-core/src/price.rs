//! Integer price arithmetic.
//!
//! Catalog prices are held as micros (millionths of the currency's major
//! unit). The Play API wants two encodings of the same value: a decimal micros
//! string for one-time products and a `units` + `nanos` pair for subscription
//! base plans. Both conversions here are exact integer arithmetic.

use serde::{Deserialize, Serialize};

/// Micros in one major currency unit.
pub const MICROS_PER_UNIT: u64 = 1_000_000;

const NANOS_PER_MICRO: u32 = 1_000;

/// A non-negative price in micros, e.g. `Micros(13_990_000)` is $13.99.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Micros(pub u64);

impl Micros {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Whole currency units, `floor(micros / 1e6)`.
    #[must_use]
    pub const fn units(self) -> u64 {
        self.0 / MICROS_PER_UNIT
    }

    /// Fractional part in nanos, `(micros mod 1e6) * 1000`.
    ///
    /// Always below `1_000_000_000`, so it fits the API's `int32` field.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn nanos(self) -> u32 {
        // remainder is < 1_000_000, so the cast is lossless
        (self.0 % MICROS_PER_UNIT) as u32 * NANOS_PER_MICRO
    }

    /// Formats the amount with two decimals and thousands separators,
    /// without a currency symbol: `10007990000` becomes `"10,007.99"`.
    ///
    /// Sub-cent micros round half up.
    #[must_use]
    pub fn amount(self) -> String {
        let cents = (u128::from(self.0) + 5_000) / 10_000;
        let whole = cents / 100;
        let frac = cents % 100;
        format!("{}.{frac:02}", group_thousands(&whole.to_string()))
    }
}

impl std::fmt::Display for Micros {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}", self.amount())
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
