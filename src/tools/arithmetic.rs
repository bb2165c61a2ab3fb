use crate::core::content::ToolOutput;
use crate::domain::Operation;

pub const DIVIDE_BY_ZERO: &str = "Error: Cannot divide by zero";

pub fn add(a: f64, b: f64) -> ToolOutput {
    ToolOutput::text(format_number(a + b))
}

/// Division by zero is reported as ordinary output text.
pub fn calculate(operation: Operation, a: f64, b: f64) -> ToolOutput {
    let value = match operation {
        Operation::Add => a + b,
        Operation::Subtract => a - b,
        Operation::Multiply => a * b,
        Operation::Divide => {
            if b == 0.0 {
                return ToolOutput::text(DIVIDE_BY_ZERO);
            }
            a / b
        }
    };
    ToolOutput::text(format_number(value))
}

/// ECMAScript `Number::toString` rendering: shortest round-trip digits,
/// positional for magnitudes in `[1e-6, 1e21)`, exponent form (`1e+21`,
/// `1.5e-7`) outside it. Integral values carry no `.0`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_positive() { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        // covers -0
        return "0".to_string();
    }
    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }
    let exp = format!("{value:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}
