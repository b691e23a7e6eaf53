//! Calculator state machine.
//!
//! `Calculator` owns the display buffer and the `Registers` holding the
//! pending operation. Every press goes through `Calculator::press`; there
//! is no other way to mutate the state.

use crate::arith::{self, Operator};
use crate::error::CalcError;
use crate::format::{format_number, parse_float};
use crate::key::Key;

/// Operands and operators of the pending calculation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Registers {
    pub number_a: Option<f64>,
    pub number_b: Option<f64>,
    pub operator: Option<Operator>,
    /// Operator the next chained evaluation is committed to.
    pub previous_operator: Option<Operator>,
    pub last_key: Option<Key>,
}

impl Registers {
    /// Stores `symbol` as the current operator. Anything outside the
    /// operator set is rejected and leaves the registers untouched.
    pub fn set_operator(&mut self, symbol: &str) -> Result<Operator, CalcError> {
        let op: Operator = symbol.parse()?;
        self.operator = Some(op);
        Ok(op)
    }

    pub fn is_last_key_operator(&self) -> bool {
        matches!(self.last_key, Some(key) if key.is_operator())
    }

    fn clear(&mut self) {
        *self = Registers::default();
    }
}

/// Set when an operand is present and is a finite number.
pub fn is_valid(operand: Option<f64>) -> bool {
    matches!(operand, Some(value) if value.is_finite())
}

// Operands hold a finite number or NaN; an overflowing entry is left unset.
fn operand(value: f64) -> Option<f64> {
    if value.is_infinite() {
        None
    } else {
        Some(value)
    }
}

/// Read-only view of the calculator, for rendering and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub display: String,
    pub registers: Registers,
}

#[derive(Debug, Clone, Default)]
pub struct Calculator {
    display: String,
    registers: Registers,
    // the display holds a result or an error that the next key discards
    showing_result: bool,
    error: Option<CalcError>,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    /// The failure the display is showing, if any.
    pub fn error(&self) -> Option<&CalcError> {
        self.error.as_ref()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            display: self.display.clone(),
            registers: self.registers,
        }
    }

    /// Applies one key press.
    ///
    /// The only error is `InvalidOperator`, returned for `%` before the
    /// pending calculation is touched. Division by zero is shown on the
    /// display instead.
    pub fn press(&mut self, key: Key) -> Result<(), CalcError> {
        log::debug!("press {:<5} display={:?} {:?}", key.label(), self.display, self.registers);

        if self.showing_result {
            self.clear();
        }

        match key {
            Key::Digit(_) | Key::Point => self.display.push_str(key.label()),
            Key::Operator(_) | Key::Percent => self.operator_pressed(key.label())?,
            Key::Equals => self.equals(),
            Key::Delete => {
                self.display.pop();
            }
            Key::Clear => self.clear(),
            Key::Negate => self.negate(),
        }

        self.registers.last_key = Some(key);
        Ok(())
    }

    /// Presses each key in turn, stopping at the first error.
    pub fn press_all<I>(&mut self, keys: I) -> Result<(), CalcError>
    where
        I: IntoIterator<Item = Key>,
    {
        keys.into_iter().try_for_each(|key| self.press(key))
    }

    fn clear(&mut self) {
        self.display.clear();
        self.registers.clear();
        self.showing_result = false;
        self.error = None;
    }

    fn negate(&mut self) {
        if self.display.starts_with('-') {
            self.display.remove(0);
        } else {
            self.display.insert(0, '-');
        }
    }

    fn operator_pressed(&mut self, symbol: &str) -> Result<(), CalcError> {
        let op = self.registers.set_operator(symbol)?;

        if self.registers.is_last_key_operator() {
            // Consecutive operators collapse onto the last one
            self.registers.previous_operator = Some(op);
            return Ok(());
        }

        let value = operand(parse_float(&self.display));
        if !is_valid(self.registers.number_a) {
            self.registers.number_a = value;
        } else if !is_valid(self.registers.number_b) {
            self.registers.number_b = value;
        }
        self.display.clear();

        if is_valid(self.registers.number_a) && is_valid(self.registers.number_b) {
            match self.evaluate(self.registers.previous_operator) {
                Ok(result) if result.is_finite() => {
                    log::debug!("chained result {}", format_number(result));
                    self.registers.number_a = Some(result);
                    self.registers.number_b = None;
                }
                Ok(result) => {
                    // Overflow ends the chain like `=` does
                    log::debug!("chained result {} is not finite", format_number(result));
                    self.registers.clear();
                    self.display = format_number(result);
                    self.showing_result = true;
                    return Ok(());
                }
                Err(err) => {
                    self.show_error(&err);
                    return Ok(());
                }
            }
        }

        self.registers.previous_operator = Some(op);
        Ok(())
    }

    fn equals(&mut self) {
        if !is_valid(self.registers.number_b) {
            self.registers.number_b = operand(parse_float(&self.display));
        }
        match self.evaluate(self.registers.operator) {
            Ok(result) => self.display = format_number(result),
            Err(err) => {
                self.display = format!("Error: {}", err);
                self.error = Some(err);
            }
        }
        self.showing_result = true;
    }

    fn evaluate(&self, operator: Option<Operator>) -> Result<f64, CalcError> {
        let symbol = operator.map_or("", Operator::symbol);
        arith::operate(
            symbol,
            self.registers.number_a.unwrap_or(f64::NAN),
            self.registers.number_b.unwrap_or(f64::NAN),
        )
    }

    fn show_error(&mut self, err: &CalcError) {
        log::debug!("evaluation failed: {}", err);
        self.registers.clear();
        self.display = format!("Error: {}", err);
        self.error = Some(err.clone());
        self.showing_result = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::tokenize_keys;

    fn run(line: &str) -> Calculator {
        let mut calc = Calculator::new();
        calc.press_all(tokenize_keys(line).unwrap()).unwrap();
        calc
    }

    #[test]
    fn digits_accumulate_on_the_display() {
        let calc = run("12.5");
        assert_eq!(calc.display(), "12.5");
        assert_eq!(
            *calc.registers(),
            Registers {
                last_key: Some(Key::Digit(5)),
                ..Registers::default()
            }
        );
    }

    #[test]
    fn first_operator_moves_display_into_number_a() {
        let calc = run("42 +");
        assert_eq!(calc.display(), "");
        assert_eq!(calc.registers().number_a, Some(42.0));
        assert_eq!(calc.registers().number_b, None);
        assert_eq!(calc.registers().operator, Some(Operator::Add));
        assert_eq!(calc.registers().previous_operator, Some(Operator::Add));
    }

    #[test]
    fn second_operator_evaluates_the_pending_pair() {
        let calc = run("5 + 3 *");
        assert_eq!(calc.registers().number_a, Some(8.0));
        assert_eq!(calc.registers().number_b, None);
        assert_eq!(calc.registers().operator, Some(Operator::Multiply));
        assert_eq!(calc.display(), "");
    }

    #[test]
    fn collapsed_operator_is_used_when_chaining() {
        let calc = run("5 + * 3 + 1 =");
        assert_eq!(calc.display(), "16");
    }

    #[test]
    fn set_operator_rejects_unknown_symbols() {
        let mut registers = Registers::default();
        assert_eq!(
            registers.set_operator("%"),
            Err(CalcError::InvalidOperator("%".to_owned()))
        );
        assert_eq!(registers.operator, None);
        assert_eq!(registers.set_operator("**"), Ok(Operator::Power));
        assert_eq!(registers.operator, Some(Operator::Power));
    }

    #[test]
    fn percent_is_rejected_without_touching_state() {
        let mut calc = run("5 + 3");
        let before = calc.snapshot();
        assert_eq!(
            calc.press(Key::Percent),
            Err(CalcError::InvalidOperator("%".to_owned()))
        );
        assert_eq!(calc.snapshot(), before);
    }

    #[test]
    fn delete_only_touches_the_display() {
        let mut calc = run("7 * 123");
        calc.press(Key::Delete).unwrap();
        assert_eq!(calc.display(), "12");
        assert_eq!(calc.registers().number_a, Some(7.0));
        calc.press_all([Key::Delete, Key::Delete, Key::Delete]).unwrap();
        assert_eq!(calc.display(), "");
        assert_eq!(calc.registers().operator, Some(Operator::Multiply));
    }

    #[test]
    fn clear_resets_everything() {
        let mut calc = run("7 * 3 - 12");
        calc.press(Key::Clear).unwrap();
        assert_eq!(calc.display(), "");
        assert_eq!(
            *calc.registers(),
            Registers {
                last_key: Some(Key::Clear),
                ..Registers::default()
            }
        );
    }

    #[test]
    fn negate_toggles_the_sign() {
        assert_eq!(run("5 +/-").display(), "-5");
        assert_eq!(run("5 +/- +/-").display(), "5");
        assert_eq!(run("+/- 4 - 6 =").display(), "-10");
    }

    #[test]
    fn equals_without_an_operator_soft_fails() {
        assert_eq!(run("5 =").display(), "0");
        assert_eq!(run("=").display(), "0");
    }

    #[test]
    fn division_by_zero_is_displayed() {
        let calc = run("5 / 0 =");
        assert_eq!(calc.display(), "Error: Can not divide by zero");
        assert_eq!(calc.error(), Some(&CalcError::DivisionByZero));
    }

    #[test]
    fn error_state_follows_the_display() {
        assert_eq!(run("5 + 1 =").error(), None);
        assert_eq!(run("8 / 0 +").error(), Some(&CalcError::DivisionByZero));
        assert_eq!(run("8 / 0 = 2").error(), None);
    }

    #[test]
    fn only_finite_operands_are_valid() {
        assert!(is_valid(Some(0.0)));
        assert!(is_valid(Some(-1e300)));
        assert!(!is_valid(None));
        assert!(!is_valid(Some(f64::NAN)));
        assert!(!is_valid(Some(f64::INFINITY)));
        assert!(!is_valid(Some(f64::NEG_INFINITY)));
    }

    #[test]
    fn chained_division_by_zero_is_displayed_and_reset() {
        let mut calc = run("8 / 0 +");
        assert_eq!(calc.display(), "Error: Can not divide by zero");
        assert_eq!(calc.registers().number_a, None);
        calc.press(Key::Digit(4)).unwrap();
        assert_eq!(calc.display(), "4");
    }
}
