use proptest::prelude::*;
use tabdeck_core::{evaluate, format_number, parse_float, CalcKey, CalculatorState, Operator};

fn digit_strategy() -> impl Strategy<Value = char> {
    prop::sample::select(vec!['0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '.'])
}

proptest! {
    #[test]
    fn digits_without_operator_concatenate(digits in prop::collection::vec(digit_strategy(), 1..24)) {
        let mut state = CalculatorState::new();
        let mut expected = String::from("0");
        for digit in &digits {
            state.apply(CalcKey::Digit(*digit));
            if expected == "0" {
                expected = digit.to_string();
            } else {
                expected.push(*digit);
            }
        }

        prop_assert_eq!(state.render(), expected);
        prop_assert_eq!(state.expression(), "");
    }

    #[test]
    fn clear_always_returns_initial_state(tokens in prop::collection::vec(
        prop::sample::select(vec!["1", "9", ".", "+", "-", "*", "/", "=", "DEL", "0"]),
        0..32,
    )) {
        let mut state = CalculatorState::new();
        for token in &tokens {
            state.apply(token.parse::<CalcKey>().unwrap());
        }
        state.clear();

        prop_assert_eq!(state.render(), "0");
        prop_assert_eq!(state.expression(), "");
    }

    #[test]
    fn awaiting_flag_always_has_operands(tokens in prop::collection::vec(
        prop::sample::select(vec!["3", "0", ".", "+", "/", "=", "DEL", "C"]),
        0..32,
    )) {
        let mut state = CalculatorState::new();
        for token in &tokens {
            state.apply(token.parse::<CalcKey>().unwrap());
            if state.is_awaiting_second_operand() {
                prop_assert!(state.operator().is_some());
                prop_assert!(state.first_operand().is_some());
            }
        }
    }

    #[test]
    fn evaluate_matches_native_double_arithmetic(a in -1e12f64..1e12, b in -1e12f64..1e12) {
        prop_assert_eq!(evaluate(a, b, Operator::Add), Ok(a + b));
        prop_assert_eq!(evaluate(a, b, Operator::Subtract), Ok(a - b));
        prop_assert_eq!(evaluate(a, b, Operator::Multiply), Ok(a * b));
    }

    #[test]
    fn formatted_numbers_read_back_exactly(value in prop::num::f64::NORMAL) {
        let text = format_number(value);
        prop_assert_eq!(parse_float(&text), value);
    }
}
