//! Calculator widget service.
//!
//! # Responsibility
//! - Own one [`CalculatorState`] for the session.
//! - Push the rendered text to a [`DisplaySink`] after every event.
//!
//! # Invariants
//! - The sink receives exactly one update per handled event, plus one at
//!   construction.
//! - Rejected tokens never reach the state machine and never update the sink.

use crate::model::calculator::{CalcKey, CalcKeyError, CalculatorState, Operator};
use log::debug;

/// Single-argument "set visible text" target.
pub trait DisplaySink {
    fn show(&mut self, text: &str);
}

impl<F: FnMut(&str)> DisplaySink for F {
    fn show(&mut self, text: &str) {
        self(text)
    }
}

/// Calculator widget bound to a display sink.
pub struct CalculatorService<S: DisplaySink> {
    state: CalculatorState,
    sink: S,
}

impl<S: DisplaySink> CalculatorService<S> {
    /// Creates a calculator in its initial state and shows `"0"`.
    pub fn new(sink: S) -> Self {
        let mut service = Self {
            state: CalculatorState::new(),
            sink,
        };
        service.refresh();
        service
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    /// Text currently shown.
    pub fn display(&self) -> String {
        self.state.render()
    }

    /// Handles one keypad event.
    pub fn press(&mut self, key: CalcKey) {
        self.state.apply(key);
        debug!(
            "event=calc_input module=calculator key={} awaiting={} fault={}",
            key.label(),
            self.state.is_awaiting_second_operand(),
            self.state.fault().is_some()
        );
        self.refresh();
    }

    /// Parses and handles one keypad token (`"7"`, `"+"`, `"="`, `"C"`, `"DEL"`).
    pub fn press_token(&mut self, token: &str) -> Result<(), CalcKeyError> {
        let key = token.parse::<CalcKey>()?;
        self.press(key);
        Ok(())
    }

    pub fn append_digit(&mut self, digit: char) {
        self.press(CalcKey::Digit(digit));
    }

    pub fn choose_operator(&mut self, op: Operator) {
        self.press(CalcKey::Operator(op));
    }

    pub fn equals(&mut self) {
        self.press(CalcKey::Equals);
    }

    pub fn clear(&mut self) {
        self.press(CalcKey::Clear);
    }

    pub fn backspace(&mut self) {
        self.press(CalcKey::Backspace);
    }

    fn refresh(&mut self) {
        let text = self.state.render();
        self.sink.show(&text);
    }
}
