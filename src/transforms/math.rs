//! # Arithmetic Transforms
//!
//! Two mutually exclusive strategies for dimension tokens authored as
//! arithmetic (`"8px * 2"`). A pipeline registers exactly one of them.
//!
//! - **`math/evaluate`** folds the expression strictly left to right, with no
//!   operator precedence: `"10 - 2 * 3"` is `(10 - 2) * 3 = 24`, emitted as
//!   `"24rem"`. Operands may be bare numbers, `rem` lengths, or `px` lengths
//!   (converted with the base font size). It reads the authored value
//!   (references substituted), so earlier transforms cannot hide the
//!   expression. Values containing a CSS function call pass through.
//! - **`math/calc`** leaves the arithmetic to the browser by wrapping any
//!   string with a space-padded `*` or `-` in `calc(...)`, recursing into
//!   composite values. Already wrapped values are left untouched.

use super::{is_dimension, Transform, TransformError, TransformOptions};
use crate::tokens::value::parse_number;
use crate::tokens::{format_number, TokenKind, TokenNode, TokenValue};

// ============================================================================
// EVALUATE
// ============================================================================

pub fn evaluate() -> Transform {
    Transform::value("math/evaluate", is_dimension, evaluate_value)
}

fn evaluate_value(node: &TokenNode, options: &TransformOptions) -> Result<TokenValue, TransformError> {
    let TokenValue::String(raw) = &node.original.resolved else {
        return Ok(node.value.clone());
    };
    // CSS functions (`calc(...)`, `var(--x)`) are left for the browser.
    if raw.contains('(') {
        return Ok(node.value.clone());
    }
    match evaluate_expression(raw, options.base_font_size)? {
        Some(result) => Ok(TokenValue::String(format!("{}rem", format_number(result)))),
        None => Ok(node.value.clone()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            _ => None,
        }
    }
}

/// Evaluates `expression` left to right.
///
/// Returns `Ok(None)` when the text is not arithmetic: no binary operator (a
/// plain value such as `"16px"` or `"-2"`) or no numeric operand at all
/// (`"fit-content"`). Otherwise `Ok(Some(rem))` with the result in rem.
pub fn evaluate_expression(expression: &str, base_font_size: f64) -> Result<Option<f64>, TransformError> {
    let mut operands = Vec::new();
    let mut operators = Vec::new();
    let mut current = String::new();

    for c in expression.chars() {
        match Operator::from_char(c) {
            // A sign at the start of an operand is unary; one after `1e` is an exponent.
            Some(op) if !current.trim().is_empty() && !ends_with_exponent(&current) => {
                operands.push(std::mem::take(&mut current));
                operators.push(op);
            }
            _ => current.push(c),
        }
    }
    operands.push(current);

    // Hyphenated keywords (`fit-content`) are not arithmetic.
    if operators.is_empty()
        || operands
            .iter()
            .all(|operand| parse_operand(operand, base_font_size).is_none())
    {
        return Ok(None);
    }
    if operands.last().is_some_and(|last| last.trim().is_empty()) {
        return Err(TransformError::DanglingOperator(expression.to_string()));
    }

    let parse = |segment: &str| {
        parse_operand(segment, base_font_size).ok_or_else(|| TransformError::NonNumericOperand {
            expression: expression.to_string(),
            segment: segment.trim().to_string(),
        })
    };

    let mut acc = parse(operands[0].as_str())?;
    for (op, operand) in operators.iter().zip(operands.iter().skip(1)) {
        let rhs = parse(operand.as_str())?;
        acc = match op {
            Operator::Add => acc + rhs,
            Operator::Sub => acc - rhs,
            Operator::Mul => acc * rhs,
            Operator::Div if rhs == 0.0 => {
                return Err(TransformError::DivisionByZero(expression.to_string()))
            }
            Operator::Div => acc / rhs,
        };
    }
    Ok(Some(acc))
}

fn ends_with_exponent(operand: &str) -> bool {
    let mut tail = operand.chars().rev();
    matches!(tail.next(), Some('e' | 'E')) && tail.next().is_some_and(|c| c.is_ascii_digit())
}

fn parse_operand(segment: &str, base_font_size: f64) -> Option<f64> {
    let segment = segment.trim();
    if let Some(rem) = segment.strip_suffix("rem") {
        return parse_number(rem);
    }
    if let Some(px) = segment.strip_suffix("px") {
        return parse_number(px).map(|n| n / base_font_size);
    }
    parse_number(segment)
}

// ============================================================================
// CALC
// ============================================================================

pub fn calc() -> Transform {
    Transform::value(
        "math/calc",
        |node| is_dimension(node) || node.kind == TokenKind::BoxShadow,
        |node, _| Ok(wrap_calc(&node.value)),
    )
}

/// Wraps every string containing ` * ` or ` - ` in `calc(...)`, recursing into
/// arrays and objects. Returns a new value; the input is not modified.
pub fn wrap_calc(value: &TokenValue) -> TokenValue {
    match value {
        TokenValue::String(text) if needs_calc(text) => TokenValue::String(format!("calc({})", text.trim())),
        TokenValue::Array(items) => TokenValue::Array(items.iter().map(wrap_calc).collect()),
        TokenValue::Object(map) => TokenValue::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), wrap_calc(item)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn needs_calc(text: &str) -> bool {
    let text = text.trim();
    !text.starts_with("calc(") && (text.contains(" * ") || text.contains(" - "))
}
