//! Canonical rendering of field values that enter a signature.
//!
//! The gateway hashes the textual form of each field, so the rendering is part
//! of the wire contract: amounts use a decimal point and a fixed number of
//! fractional digits, enum-like values use their upper-cased symbolic name,
//! identifiers pass through untouched.

use rust_decimal::{Decimal, RoundingStrategy};

/// Types whose canonical form is a symbolic name (e.g. `PayAtFawry`).
pub trait Symbolic {
    /// The variant name as declared by the gateway, before case folding.
    fn symbol(&self) -> &'static str;

    /// The name that enters a signature. Aliased variants sign as their primary name.
    fn signed_symbol(&self) -> &'static str {
        self.symbol()
    }
}

/// A single value and the rule used to render it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Canonical<'a> {
    /// Identifier or free text, rendered verbatim.
    Text(&'a str),
    /// Amount with two fractional digits (`350` -> `"350.00"`).
    Amount(Decimal),
    /// Amount with one fractional digit, used by the V1 notification (`"350.0"`).
    AmountOneDecimal(Decimal),
    /// Symbolic name, upper-cased (`PayAtFawry` -> `"PAYATFAWRY"`).
    Symbol(&'static str),
    /// Plain decimal integer.
    Integer(i64),
}

impl Canonical<'_> {
    pub fn symbol_of(value: &impl Symbolic) -> Canonical<'static> {
        Canonical::Symbol(value.signed_symbol())
    }

    pub fn render(&self) -> String {
        match *self {
            Canonical::Text(s) => s.to_string(),
            Canonical::Amount(d) => fixed_decimal(d, 2),
            Canonical::AmountOneDecimal(d) => fixed_decimal(d, 1),
            Canonical::Symbol(s) => upper_symbol(s),
            Canonical::Integer(i) => i.to_string(),
        }
    }
}

/// Render `value` with exactly `places` fractional digits, rounding half away from zero.
pub fn fixed_decimal(value: Decimal, places: u32) -> String {
    let rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", places as usize, rounded)
}

/// Upper-case a symbolic name. Gateway literals such as `ORDER_FAILED` keep their underscore.
pub fn upper_symbol(symbol: &str) -> String {
    symbol.to_ascii_uppercase()
}
