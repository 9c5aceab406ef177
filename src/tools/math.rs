//! Math tools

use super::{ToolError, evaluate};

/// Square root of a non-negative number
pub fn calculate_square_root(number: f64) -> Result<f64, ToolError> {
    if number < 0.0 {
        return Err(ToolError::Domain(format!("cannot take the square root of {}", number)));
    }
    Ok(number.sqrt())
}

/// Arithmetic mean of a non-empty list
pub fn calculate_average(numbers: &[f64]) -> Result<f64, ToolError> {
    if numbers.is_empty() {
        return Err(ToolError::Value("cannot average an empty list".to_string()));
    }
    Ok(numbers.iter().sum::<f64>() / numbers.len() as f64)
}

pub fn is_greater_than(a: f64, b: f64) -> bool {
    a > b
}

/// Evaluate an arithmetic expression such as `"(3 + 4) * 2"`
pub fn basic_calculator(expression: &str) -> Result<f64, ToolError> {
    evaluate(expression)
}
