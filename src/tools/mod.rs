//! Deterministic tools the model can ask for
//!
//! Every tool is a pure function over typed positional arguments. The
//! [`ToolRegistry`] maps tool names to their [`ToolSpec`]s and is built once,
//! then handed to the dispatcher.

mod expr;
mod math;
mod registry;
mod text;

pub use expr::evaluate;
pub use math::{basic_calculator, calculate_average, calculate_square_root, is_greater_than};
pub use registry::{CheckedArgs, ToolCategory, ToolHandler, ToolRegistry, ToolSpec};
pub use text::{contains_substring, count_letters, count_vowels, count_words};

use std::fmt;
use thiserror::Error;

/// Shape of one positional tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Number,
    NumberList,
    Text,
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgKind::Number => write!(f, "number"),
            ArgKind::NumberList => write!(f, "list of numbers"),
            ArgKind::Text => write!(f, "text"),
        }
    }
}

/// A converted tool argument
#[derive(Debug, Clone, PartialEq)]
pub enum ToolArg {
    Number(f64),
    NumberList(Vec<f64>),
    Text(String),
}

impl ToolArg {
    pub fn kind(&self) -> ArgKind {
        match self {
            ToolArg::Number(_) => ArgKind::Number,
            ToolArg::NumberList(_) => ArgKind::NumberList,
            ToolArg::Text(_) => ArgKind::Text,
        }
    }
}

impl fmt::Display for ToolArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolArg::Number(n) => write!(f, "{}", n),
            ToolArg::NumberList(ns) => {
                let items: Vec<String> = ns.iter().map(|n| n.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            ToolArg::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// Value computed by a tool
#[derive(Debug, Clone, PartialEq)]
pub enum ToolValue {
    Number(f64),
    Count(usize),
    Bool(bool),
}

impl ToolValue {
    /// Numeric view, used when one tool's output feeds another
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ToolValue::Number(n) => Some(*n),
            ToolValue::Count(c) => Some(*c as f64),
            ToolValue::Bool(_) => None,
        }
    }
}

impl fmt::Display for ToolValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolValue::Number(n) => write!(f, "{}", n),
            ToolValue::Count(c) => write!(f, "{}", c),
            ToolValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Outcome of running a tool: a value, or a description of what went wrong
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResult {
    Value(ToolValue),
    Error(String),
}

impl ToolResult {
    pub fn error(message: impl Into<String>) -> Self {
        ToolResult::Error(message.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ToolResult::Error(_))
    }

    pub fn value(&self) -> Option<&ToolValue> {
        match self {
            ToolResult::Value(v) => Some(v),
            ToolResult::Error(_) => None,
        }
    }
}

impl fmt::Display for ToolResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolResult::Value(v) => write!(f, "{}", v),
            ToolResult::Error(e) => write!(f, "{}", e),
        }
    }
}

/// Failures raised inside a tool
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToolError {
    #[error("math domain error: {0}")]
    Domain(String),

    #[error("invalid value: {0}")]
    Value(String),

    #[error("parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("division by zero")]
    ZeroDivision,

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
}
