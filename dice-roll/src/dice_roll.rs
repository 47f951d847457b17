/*
Copyright 2021 Robin Marchart

   Licensed under the Apache License, Version 2.0 (the "License");
   you may not use this file except in compliance with the License.
   You may obtain a copy of the License at

       http://www.apache.org/licenses/LICENSE-2.0

   Unless required by applicable law or agreed to in writing, software
   distributed under the License is distributed on an "AS IS" BASIS,
   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
   See the License for the specific language governing permissions and
   limitations under the License.
*/


use crate::{
    dice_types::*,
    error::EvaluationError,
    random::BaseRoller,
};

#[cfg(feature = "logging")]
use log::debug;

/// Evaluation of one AST node: its value and its rendering with every dice
/// term replaced by the faces actually rolled.
pub trait ExpressionEvaluate {
    fn evaluate(&self, roller: &BaseRoller) -> Result<DNotationResult, EvaluationError>;
}

fn apply_additive(
    left: DNotationResult,
    op: AdditiveOp,
    right: DNotationResult,
) -> Result<DNotationResult, EvaluationError> {
    let str_value = format!("{} {} {}", left.str_value, op, right.str_value);
    let value = match op {
        AdditiveOp::Add => left.value.checked_add(right.value),
        AdditiveOp::Sub => left.value.checked_sub(right.value),
    };
    match value {
        Some(value) => Ok(DNotationResult { value, str_value }),
        None => Err(EvaluationError::Overflow { context: str_value }),
    }
}

fn apply_multiplicative(
    left: DNotationResult,
    op: MultiplicativeOp,
    right: DNotationResult,
) -> Result<DNotationResult, EvaluationError> {
    let str_value = format!("{} {} {}", left.str_value, op, right.str_value);
    match op {
        MultiplicativeOp::Mul => match left.value.checked_mul(right.value) {
            Some(value) => Ok(DNotationResult { value, str_value }),
            None => Err(EvaluationError::Overflow { context: str_value }),
        },
        MultiplicativeOp::Div if right.value == 0 => {
            Err(EvaluationError::DivideByZero { context: str_value })
        }
        // truncates toward zero; only i64::MIN / -1 can fail here
        MultiplicativeOp::Div => match left.value.checked_div(right.value) {
            Some(value) => Ok(DNotationResult { value, str_value }),
            None => Err(EvaluationError::Overflow { context: str_value }),
        },
    }
}

impl ExpressionEvaluate for Expression {
    fn evaluate(&self, roller: &BaseRoller) -> Result<DNotationResult, EvaluationError> {
        let mut result = self.first.evaluate(roller)?;
        for (op, term) in &self.rest {
            let right = term.evaluate(roller)?;
            result = apply_additive(result, *op, right)?;
        }
        Ok(result)
    }
}

impl ExpressionEvaluate for Term {
    fn evaluate(&self, roller: &BaseRoller) -> Result<DNotationResult, EvaluationError> {
        let mut result = self.first.evaluate(roller)?;
        for (op, factor) in &self.rest {
            let right = factor.evaluate(roller)?;
            result = apply_multiplicative(result, *op, right)?;
        }
        Ok(result)
    }
}

impl ExpressionEvaluate for DFactor {
    fn evaluate(&self, roller: &BaseRoller) -> Result<DNotationResult, EvaluationError> {
        match self {
            DFactor::Value(value) => value.evaluate(roller),
            DFactor::Dice { count, sides } => {
                let count = count.evaluate(roller)?.value;
                let sides = sides.evaluate(roller)?.value;
                let roll = roller
                    .roll(count, sides)
                    .map_err(|source| EvaluationError::InvalidDice {
                        context: self.to_string(),
                        source,
                    })?;
                let value = roll.checked_value().ok_or_else(|| EvaluationError::Overflow {
                    context: self.to_string(),
                })?;
                #[cfg(feature = "logging")]
                {
                    debug!("dice term {} rolled {}", &self, &roll);
                }
                Ok(DNotationResult {
                    value,
                    str_value: roll.to_string(),
                })
            }
        }
    }
}

impl ExpressionEvaluate for Value {
    fn evaluate(&self, roller: &BaseRoller) -> Result<DNotationResult, EvaluationError> {
        match self {
            Value::Constant(c) => Ok(DNotationResult {
                value: *c,
                str_value: c.to_string(),
            }),
            Value::SubExpression(expr) => expr.evaluate(roller).map(|inner| DNotationResult {
                value: inner.value,
                str_value: format!("( {} )", inner.str_value),
            }),
        }
    }
}

impl ExpressionEvaluate for Box<Expression> {
    fn evaluate(&self, roller: &BaseRoller) -> Result<DNotationResult, EvaluationError> {
        self.as_ref().evaluate(roller)
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::{
        error::InvalidArgument,
        parser::{parse_expression, parse_normalized},
        random::ScriptedSource,
    };
    use proptest::prelude::*;

    fn eval_with(faces: Vec<i64>, input: &str) -> Result<DNotationResult, EvaluationError> {
        let roller = BaseRoller::new(ScriptedSource::new(faces));
        parse_expression(input).unwrap().evaluate(&roller)
    }

    fn result(value: i64, str_value: &str) -> DNotationResult {
        DNotationResult {
            value,
            str_value: str_value.to_string(),
        }
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval_with(vec![], "4 + 5"), Ok(result(9, "4 + 5")));
        assert_eq!(eval_with(vec![], "4+5"), Ok(result(9, "4 + 5")));
        assert_eq!(eval_with(vec![], "1 + 2 * 3"), Ok(result(7, "1 + 2 * 3")));
        assert_eq!(eval_with(vec![], "10 - 2 - 3"), Ok(result(5, "10 - 2 - 3")));
        assert_eq!(eval_with(vec![], "7 / 2"), Ok(result(3, "7 / 2")));
        assert_eq!(eval_with(vec![], "1 - 8 / 3"), Ok(result(-1, "1 - 8 / 3")));
        assert_eq!(
            eval_with(vec![], "(1 - 8) / 3"),
            Ok(result(-2, "( 1 - 8 ) / 3"))
        );
        assert_eq!(
            eval_with(vec![], "100 / 10 / 5"),
            Ok(result(2, "100 / 10 / 5"))
        );
    }

    #[test]
    fn test_dice_golden() {
        assert_eq!(eval_with(vec![3, 3, 2], "3d6"), Ok(result(8, "[3 + 3 + 2]")));
        assert_eq!(
            eval_with(vec![9, 9, 6, 9, 8, 11, 11, 2, 2, 4], "5d10 + 2 * (2d12 - 3d4)"),
            Ok(result(
                69,
                "[9 + 9 + 6 + 9 + 8] + 2 * ( [11 + 11] - [2 + 2 + 4] )"
            ))
        );
        assert_eq!(
            eval_with(vec![17, 4], "d20 + d8 + 3"),
            Ok(result(24, "[17] + [4] + 3"))
        );
    }

    #[test]
    fn test_dice_count_from_expression() {
        let roller = BaseRoller::new(ScriptedSource::new(vec![3, 5, 1, 6]));
        assert_eq!(
            parse_normalized("(1d4)d6").unwrap().evaluate(&roller),
            Ok(result(12, "[5 + 1 + 6]"))
        );
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(
            eval_with(vec![], "4 / (2 - 2)"),
            Err(EvaluationError::DivideByZero {
                context: "4 / ( 2 - 2 )".to_string()
            })
        );
        assert_eq!(
            eval_with(vec![1, 1], "2d6 / 0 + 1"),
            Err(EvaluationError::DivideByZero {
                context: "[1 + 1] / 0".to_string()
            })
        );
    }

    #[test]
    fn test_overflow() {
        assert_eq!(
            eval_with(vec![], "9223372036854775807 + 1"),
            Err(EvaluationError::Overflow {
                context: "9223372036854775807 + 1".to_string()
            })
        );
        assert!(matches!(
            eval_with(vec![], "9223372036854775807 * 2"),
            Err(EvaluationError::Overflow { .. })
        ));
    }

    #[test]
    fn test_invalid_dice() {
        assert!(matches!(
            eval_with(vec![], "0d6"),
            Err(EvaluationError::InvalidDice { ref context, .. }) if context == "0d6"
        ));
        assert!(matches!(
            eval_with(vec![], "2d0"),
            Err(EvaluationError::InvalidDice { ref context, .. }) if context == "2d0"
        ));
        let roller = BaseRoller::new(ScriptedSource::new(vec![1])).with_max_dice(5);
        assert_eq!(
            parse_expression("6d6").unwrap().evaluate(&roller),
            Err(EvaluationError::InvalidDice {
                context: "6d6".to_string(),
                source: InvalidArgument("6 dice exceed the limit of 5".to_string())
            })
        );
    }

    #[test]
    fn test_seeded_evaluation_is_deterministic() {
        let expr = parse_expression("5d10 + 2 * (2d12 - 3d4)").unwrap();
        let first = BaseRoller::seeded(42);
        let second = BaseRoller::seeded(42);
        assert_eq!(expr.evaluate(&first), expr.evaluate(&second));
        let outcome = expr.evaluate(&BaseRoller::seeded(42)).unwrap();
        assert!(outcome.value >= 5 + 2 * (2 - 12) && outcome.value <= 50 + 2 * (24 - 3));
    }

    fn reference(first: i64, rest: &[(char, i64)]) -> i64 {
        let mut total = 0;
        let mut sign = 1;
        let mut term = first;
        for (op, n) in rest {
            match op {
                '*' => term *= n,
                '/' => term /= n,
                _ => {
                    total += sign * term;
                    sign = if *op == '+' { 1 } else { -1 };
                    term = *n;
                }
            }
        }
        total + sign * term
    }

    proptest! {
        #[test]
        fn arithmetic_matches_reference(
            first in 0i64..100,
            rest in proptest::collection::vec((prop_oneof![Just('+'), Just('-'), Just('*'), Just('/')], 1i64..100), 0..6)
        ) {
            let mut text = first.to_string();
            for (op, n) in &rest {
                text.push_str(&format!(" {} {}", op, n));
            }
            let roller = BaseRoller::seeded(0);
            let evaluated = parse_expression(&text).unwrap().evaluate(&roller).unwrap();
            prop_assert_eq!(evaluated.value, reference(first, &rest));
            prop_assert_eq!(evaluated.str_value, text);
        }

        #[test]
        fn dice_sum_in_range(count in 1i64..30, sides in 1i64..30, seed in any::<u64>()) {
            let roller = BaseRoller::seeded(seed);
            let evaluated = parse_expression(&format!("{}d{}", count, sides))
                .unwrap()
                .evaluate(&roller)
                .unwrap();
            prop_assert!(evaluated.value >= count && evaluated.value <= count * sides);
            prop_assert_eq!(evaluated.str_value.matches('+').count() as i64, count - 1);
        }
    }
}
