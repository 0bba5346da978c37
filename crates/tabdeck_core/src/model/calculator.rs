//! Calculator input state machine.
//!
//! # Responsibility
//! - Translate digit/operator/equals/clear/backspace events into state
//!   transitions with left-to-right chained folding (no precedence).
//! - Project the visible text from state on demand via [`CalculatorState::render`].
//!
//! # Invariants
//! - `awaiting_second_operand == true` implies `operator` and
//!   `first_operand` are both set.
//! - `first_operand` and `operator` are set and cleared together.
//! - Division by zero is recorded as [`CalcFault`], never as a panic.
//!
//! # See also
//! - `model::number` for display text parsing/formatting.

use crate::model::number::{format_number, parse_float};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Text shown while a [`CalcFault`] is active.
pub const ERROR_DISPLAY: &str = "Error";

const INITIAL_DISPLAY: &str = "0";

/// Binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Symbol used in the rendered expression.
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
        }
    }

    /// Parses a keypad symbol. Accepts `×` and `÷` as keypad aliases.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '*' | '×' => Some(Self::Multiply),
            '/' | '÷' => Some(Self::Divide),
            _ => None,
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Arithmetic failure surfaced as a display value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcFault {
    DivideByZero,
}

impl Display for CalcFault {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DivideByZero => write!(f, "division by zero"),
        }
    }
}

/// Applies `op` to `a` and `b` with IEEE-754 double semantics.
///
/// Dividing by `0` (or `-0`) yields `Err(CalcFault::DivideByZero)`; every
/// other input, including `NaN`, follows plain float arithmetic.
pub fn evaluate(a: f64, b: f64, op: Operator) -> Result<f64, CalcFault> {
    match op {
        Operator::Add => Ok(a + b),
        Operator::Subtract => Ok(a - b),
        Operator::Multiply => Ok(a * b),
        Operator::Divide => {
            if b == 0.0 {
                Err(CalcFault::DivideByZero)
            } else {
                Ok(a / b)
            }
        }
    }
}

/// One discrete input event from the keypad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalcKey {
    /// `0-9` or `.`.
    Digit(char),
    Operator(Operator),
    Equals,
    Clear,
    Backspace,
}

impl CalcKey {
    /// Stable event label for logs.
    pub fn label(self) -> &'static str {
        match self {
            Self::Digit(_) => "digit",
            Self::Operator(_) => "operator",
            Self::Equals => "equals",
            Self::Clear => "clear",
            Self::Backspace => "backspace",
        }
    }
}

impl FromStr for CalcKey {
    type Err = CalcKeyError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let trimmed = token.trim();
        let mut chars = trimmed.chars();
        if let (Some(symbol), None) = (chars.next(), chars.next()) {
            if is_entry_char(symbol) {
                return Ok(Self::Digit(symbol));
            }
            if let Some(op) = Operator::from_symbol(symbol) {
                return Ok(Self::Operator(op));
            }
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "=" | "enter" | "equals" => Ok(Self::Equals),
            "c" | "ac" | "clear" => Ok(Self::Clear),
            "del" | "backspace" | "⌫" => Ok(Self::Backspace),
            "" => Err(CalcKeyError::Empty),
            _ => Err(CalcKeyError::Unknown(trimmed.to_string())),
        }
    }
}

/// Keypad token parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalcKeyError {
    Empty,
    Unknown(String),
}

impl Display for CalcKeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "calculator key cannot be empty"),
            Self::Unknown(token) => write!(f, "unknown calculator key `{token}`"),
        }
    }
}

impl Error for CalcKeyError {}

/// Owned calculator state. Lives for the whole session.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorState {
    display_value: String,
    first_operand: Option<f64>,
    operator: Option<Operator>,
    awaiting_second_operand: bool,
    fault: Option<CalcFault>,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculatorState {
    /// Creates the initial `Idle` state showing `"0"`.
    pub fn new() -> Self {
        Self {
            display_value: INITIAL_DISPLAY.to_string(),
            first_operand: None,
            operator: None,
            awaiting_second_operand: false,
            fault: None,
        }
    }

    /// Raw text of the operand being entered.
    pub fn display_value(&self) -> &str {
        &self.display_value
    }

    pub fn first_operand(&self) -> Option<f64> {
        self.first_operand
    }

    pub fn operator(&self) -> Option<Operator> {
        self.operator
    }

    pub fn is_awaiting_second_operand(&self) -> bool {
        self.awaiting_second_operand
    }

    pub fn fault(&self) -> Option<CalcFault> {
        self.fault
    }

    /// Dispatches one keypad event.
    pub fn apply(&mut self, key: CalcKey) {
        match key {
            CalcKey::Digit(digit) => self.append_digit(digit),
            CalcKey::Operator(op) => self.choose_operator(op),
            CalcKey::Equals => self.equals(),
            CalcKey::Clear => self.clear(),
            CalcKey::Backspace => self.backspace(),
        }
    }

    /// Appends a digit or decimal point to the operand being entered.
    ///
    /// A lone `"0"` is replaced rather than prefixed. Characters outside
    /// `0-9` and `.` are ignored. Multiple decimal points are accepted;
    /// `parse_float` reads the longest valid prefix later.
    pub fn append_digit(&mut self, digit: char) {
        if !is_entry_char(digit) {
            return;
        }
        if self.fault.is_some() {
            *self = Self::new();
        }

        if self.awaiting_second_operand {
            self.display_value.clear();
            self.display_value.push(digit);
            self.awaiting_second_operand = false;
        } else if self.display_value == INITIAL_DISPLAY {
            self.display_value = digit.to_string();
        } else {
            self.display_value.push(digit);
        }
    }

    /// Removes the last character of the operand being entered.
    ///
    /// Never leaves the display empty. Erasing the whole second operand
    /// returns to the operator-pending state so the expression reads
    /// `"5 + "` again instead of `"5 + 0"`.
    pub fn backspace(&mut self) {
        if self.fault.is_some() {
            *self = Self::new();
            return;
        }

        let entering_second = self.operator.is_some() && !self.awaiting_second_operand;
        if self.display_value.chars().count() > 1 {
            self.display_value.pop();
        } else {
            self.display_value = INITIAL_DISPLAY.to_string();
            if entering_second {
                self.awaiting_second_operand = true;
            }
        }
    }

    /// Selects the next operator, folding any pending operation first.
    ///
    /// `5 + 3 +` folds to a first operand of `8` and shows `"8 + "`.
    pub fn choose_operator(&mut self, next: Operator) {
        if self.fault.is_some() {
            return;
        }

        let input = parse_float(&self.display_value);
        match (self.first_operand, self.operator) {
            (None, _) => self.first_operand = Some(input),
            (Some(first), Some(pending)) => match evaluate(first, input, pending) {
                Ok(result) => {
                    self.display_value = format_number(result);
                    self.first_operand = Some(result);
                }
                Err(fault) => {
                    self.fail(fault);
                    return;
                }
            },
            (Some(_), None) => {}
        }

        self.operator = Some(next);
        self.awaiting_second_operand = true;
    }

    /// Completes the pending operation. No-op when nothing is pending.
    pub fn equals(&mut self) {
        if self.fault.is_some() {
            return;
        }
        let (Some(first), Some(op)) = (self.first_operand, self.operator) else {
            return;
        };

        let outcome = evaluate(first, parse_float(&self.display_value), op);
        self.first_operand = None;
        self.operator = None;
        self.awaiting_second_operand = false;

        match outcome {
            Ok(result) => self.display_value = format_number(result),
            Err(fault) => self.fail(fault),
        }
    }

    /// Resets every field to the initial state.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Text the display should show for the current state.
    ///
    /// - fault: `"Error"`
    /// - operator chosen, awaiting: `"5 + "`
    /// - entering second operand: `"5 + 3"`
    /// - otherwise: the display value
    pub fn render(&self) -> String {
        if self.fault.is_some() {
            return ERROR_DISPLAY.to_string();
        }

        match (self.first_operand, self.operator) {
            (Some(first), Some(op)) if self.awaiting_second_operand => {
                format!("{} {} ", format_number(first), op)
            }
            (Some(first), Some(op)) => {
                format!("{} {} {}", format_number(first), op, self.display_value)
            }
            _ => self.display_value.clone(),
        }
    }

    /// Running expression, empty when no operator is active.
    pub fn expression(&self) -> String {
        if self.fault.is_none() && self.operator.is_some() {
            self.render()
        } else {
            String::new()
        }
    }

    fn fail(&mut self, fault: CalcFault) {
        *self = Self::new();
        self.fault = Some(fault);
    }
}

fn is_entry_char(symbol: char) -> bool {
    symbol.is_ascii_digit() || symbol == '.'
}

#[cfg(test)]
mod tests {
    use super::{evaluate, CalcFault, CalcKey, CalcKeyError, CalculatorState, Operator};

    fn press_all(state: &mut CalculatorState, tokens: &[&str]) {
        for token in tokens {
            state.apply(token.parse().expect("token should parse"));
        }
    }

    #[test]
    fn evaluate_rejects_zero_divisor_including_negative_zero() {
        assert_eq!(
            evaluate(4.0, 0.0, Operator::Divide),
            Err(CalcFault::DivideByZero)
        );
        assert_eq!(
            evaluate(4.0, -0.0, Operator::Divide),
            Err(CalcFault::DivideByZero)
        );
        assert_eq!(evaluate(9.0, 3.0, Operator::Divide), Ok(3.0));
    }

    #[test]
    fn evaluate_propagates_nan_without_fault() {
        let result = evaluate(1.0, f64::NAN, Operator::Divide).expect("nan is not a fault");
        assert!(result.is_nan());
    }

    #[test]
    fn key_parsing_accepts_keypad_aliases() {
        assert_eq!("7".parse::<CalcKey>(), Ok(CalcKey::Digit('7')));
        assert_eq!(".".parse::<CalcKey>(), Ok(CalcKey::Digit('.')));
        assert_eq!("×".parse::<CalcKey>(), Ok(CalcKey::Operator(Operator::Multiply)));
        assert_eq!("Enter".parse::<CalcKey>(), Ok(CalcKey::Equals));
        assert_eq!("DEL".parse::<CalcKey>(), Ok(CalcKey::Backspace));
        assert_eq!("ac".parse::<CalcKey>(), Ok(CalcKey::Clear));
    }

    #[test]
    fn key_parsing_rejects_unknown_tokens() {
        assert_eq!("".parse::<CalcKey>(), Err(CalcKeyError::Empty));
        assert_eq!(
            "%".parse::<CalcKey>(),
            Err(CalcKeyError::Unknown("%".to_string()))
        );
        assert_eq!(
            "12".parse::<CalcKey>(),
            Err(CalcKeyError::Unknown("12".to_string()))
        );
    }

    #[test]
    fn awaiting_flag_implies_operands_are_set() {
        let mut state = CalculatorState::new();
        press_all(&mut state, &["9", "-"]);

        assert!(state.is_awaiting_second_operand());
        assert_eq!(state.operator(), Some(Operator::Subtract));
        assert_eq!(state.first_operand(), Some(9.0));
        assert_eq!(state.expression(), "9 - ");
    }

    #[test]
    fn erasing_second_operand_returns_to_operator_pending() {
        let mut state = CalculatorState::new();
        press_all(&mut state, &["5", "+", "3", "DEL"]);

        assert!(state.is_awaiting_second_operand());
        assert_eq!(state.render(), "5 + ");

        press_all(&mut state, &["7", "="]);
        assert_eq!(state.render(), "12");
    }

    #[test]
    fn fault_clears_pending_operation() {
        let mut state = CalculatorState::new();
        press_all(&mut state, &["4", "/", "0", "+"]);

        assert_eq!(state.fault(), Some(CalcFault::DivideByZero));
        assert_eq!(state.operator(), None);
        assert_eq!(state.first_operand(), None);
        assert_eq!(state.expression(), "");
    }
}
