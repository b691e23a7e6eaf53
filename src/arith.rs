//! Arithmetic engine: the five binary operations and the symbol dispatcher.

use crate::error::CalcError;
use std::fmt;
use std::str::FromStr;

/// Decimal places kept by `multiply`, `divide` and `power`.
pub const DECIMAL_PLACES: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,      // +
    Subtract, // -
    Multiply, // *
    Divide,   // /
    Power,    // **
}

impl Operator {
    pub const ALL: [Operator; 5] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
        Operator::Power,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Power => "**",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Operator> {
        Operator::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    pub fn apply(self, a: f64, b: f64) -> Result<f64, CalcError> {
        match self {
            Operator::Add => Ok(add(a, b)),
            Operator::Subtract => Ok(subtract(a, b)),
            Operator::Multiply => Ok(multiply(a, b)),
            Operator::Divide => divide(a, b),
            Operator::Power => Ok(power(a, b)),
        }
    }
}

impl FromStr for Operator {
    type Err = CalcError;

    fn from_str(symbol: &str) -> Result<Self, Self::Err> {
        Operator::from_symbol(symbol).ok_or_else(|| CalcError::InvalidOperator(symbol.to_owned()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

pub fn add(a: f64, b: f64) -> f64 {
    a + b
}

pub fn subtract(a: f64, b: f64) -> f64 {
    a - b
}

pub fn multiply(a: f64, b: f64) -> f64 {
    round_to_decimal(a * b, DECIMAL_PLACES)
}

pub fn divide(a: f64, b: f64) -> Result<f64, CalcError> {
    if b == 0.0 {
        return Err(CalcError::DivisionByZero);
    }
    Ok(round_to_decimal(a / b, DECIMAL_PLACES))
}

pub fn power(base: f64, exponent: f64) -> f64 {
    round_to_decimal(base.powf(exponent), DECIMAL_PLACES)
}

/// Rounds half away from zero at the given number of decimal places.
/// Non-finite values pass through unchanged.
pub fn round_to_decimal(number: f64, decimal_places: i32) -> f64 {
    let multiplier = 10f64.powi(decimal_places);
    (number * multiplier).round() / multiplier
}

/// Maps an operator symbol onto its operation.
///
/// An unrecognised symbol or a NaN operand yields `Ok(0.0)` rather than an
/// error. Keypad input that never formed a number ends up here, and the
/// calculator has always shown `0` for it. That masks mistakes as well, so
/// each such call is logged at warn level.
pub fn operate(symbol: &str, a: f64, b: f64) -> Result<f64, CalcError> {
    let op = match Operator::from_symbol(symbol) {
        Some(op) => op,
        None => {
            log::warn!("operate: unrecognised operator {:?}, yielding 0", symbol);
            return Ok(0.0);
        }
    };
    if a.is_nan() || b.is_nan() {
        log::warn!("operate: {} {} {} has a NaN operand, yielding 0", a, op, b);
        return Ok(0.0);
    }
    op.apply(a, b)
}
