//! Tool registry - the fixed catalogue of tools and their handlers

use std::collections::HashMap;
use std::fmt;

use super::{
    ArgKind, ToolArg, ToolError, ToolValue, basic_calculator, calculate_average, calculate_square_root,
    contains_substring, count_letters, count_vowels, count_words, is_greater_than,
};

/// Handler invoked with arguments already checked against the declared params
pub type ToolHandler = fn(&CheckedArgs<'_>) -> Result<ToolValue, ToolError>;

/// Arguments that matched a tool's declared params, sorted by kind.
///
/// Indices count arguments of one kind only: for `[Number, Text, Number]`
/// the second number is `number(1)`.
#[derive(Debug, Default, PartialEq)]
pub struct CheckedArgs<'a> {
    numbers: Vec<f64>,
    lists: Vec<&'a [f64]>,
    texts: Vec<&'a str>,
}

impl<'a> CheckedArgs<'a> {
    pub fn number(&self, i: usize) -> f64 {
        self.numbers[i]
    }

    pub fn list(&self, i: usize) -> &'a [f64] {
        self.lists[i]
    }

    pub fn text(&self, i: usize) -> &'a str {
        self.texts[i]
    }
}

/// Grouping used when listing tools in prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolCategory {
    Math,
    String,
}

impl fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolCategory::Math => write!(f, "Math Tools"),
            ToolCategory::String => write!(f, "String Tools"),
        }
    }
}

/// A callable tool: name, parameter shape and implementation
#[derive(Clone)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// Call syntax shown to the model, e.g. `is_greater_than(a, b)`
    pub signature: &'static str,
    pub category: ToolCategory,
    pub params: &'static [ArgKind],
    handler: ToolHandler,
}

impl ToolSpec {
    pub fn new(
        name: &'static str,
        description: &'static str,
        signature: &'static str,
        category: ToolCategory,
        params: &'static [ArgKind],
        handler: ToolHandler,
    ) -> Self {
        Self {
            name,
            description,
            signature,
            category,
            params,
            handler,
        }
    }

    /// Check argument shape, then run the handler
    pub fn invoke(&self, args: &[ToolArg]) -> Result<ToolValue, ToolError> {
        let checked = self.check_args(args)?;
        (self.handler)(&checked)
    }

    fn check_args<'a>(&self, args: &'a [ToolArg]) -> Result<CheckedArgs<'a>, ToolError> {
        if args.len() != self.params.len() {
            return Err(ToolError::InvalidArguments(format!(
                "{} takes {} argument(s), got {}",
                self.name,
                self.params.len(),
                args.len()
            )));
        }
        let mut checked = CheckedArgs::default();
        for (i, (arg, expected)) in args.iter().zip(self.params).enumerate() {
            match (arg, expected) {
                (ToolArg::Number(n), ArgKind::Number) => checked.numbers.push(*n),
                (ToolArg::NumberList(ns), ArgKind::NumberList) => checked.lists.push(ns.as_slice()),
                (ToolArg::Text(s), ArgKind::Text) => checked.texts.push(s.as_str()),
                _ => {
                    return Err(ToolError::InvalidArguments(format!(
                        "{} argument {} must be {}, got {}",
                        self.name,
                        i + 1,
                        expected,
                        arg.kind()
                    )));
                }
            }
        }
        Ok(checked)
    }
}

impl fmt::Debug for ToolSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolSpec")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .field("params", &self.params)
            .finish()
    }
}

/// Immutable catalogue of tools, looked up by name
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    specs: Vec<ToolSpec>,
    index: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    /// Registry with the eight standard math and string tools
    pub fn standard() -> Self {
        use ArgKind::*;

        Self::new()
            // Math
            .with_tool(ToolSpec::new(
                "calculate_square_root",
                "Square root of a non-negative number",
                "calculate_square_root(number)",
                ToolCategory::Math,
                &[Number],
                square_root,
            ))
            .with_tool(ToolSpec::new(
                "calculate_average",
                "Arithmetic mean of a list of numbers",
                "calculate_average([number1, number2, ...])",
                ToolCategory::Math,
                &[NumberList],
                average,
            ))
            .with_tool(ToolSpec::new(
                "is_greater_than",
                "Whether a is greater than b",
                "is_greater_than(a, b)",
                ToolCategory::Math,
                &[Number, Number],
                greater_than,
            ))
            .with_tool(ToolSpec::new(
                "basic_calculator",
                "Evaluate an arithmetic expression",
                "basic_calculator(\"expression\")",
                ToolCategory::Math,
                &[Text],
                calculator,
            ))
            // String
            .with_tool(ToolSpec::new(
                "count_vowels",
                "Number of vowels (a, e, i, o, u) in the text",
                "count_vowels(\"text\")",
                ToolCategory::String,
                &[Text],
                vowels,
            ))
            .with_tool(ToolSpec::new(
                "count_letters",
                "Number of alphabetic characters in the text",
                "count_letters(\"text\")",
                ToolCategory::String,
                &[Text],
                letters,
            ))
            .with_tool(ToolSpec::new(
                "count_words",
                "Number of whitespace-separated words in the text",
                "count_words(\"text\")",
                ToolCategory::String,
                &[Text],
                words,
            ))
            .with_tool(ToolSpec::new(
                "contains_substring",
                "Whether the text contains the substring, ignoring case",
                "contains_substring(\"text\", \"substring\")",
                ToolCategory::String,
                &[Text, Text],
                substring,
            ))
    }

    /// Create an empty registry (for custom tool sets)
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool, replacing any tool already registered under the same name
    pub fn with_tool(mut self, spec: ToolSpec) -> Self {
        let existing = self.index.get(spec.name).copied();
        match existing {
            Some(i) => self.specs[i] = spec,
            None => {
                self.index.insert(spec.name, self.specs.len());
                self.specs.push(spec);
            }
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.index.get(name).map(|&i| &self.specs[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Tools in registration order
    pub fn iter(&self) -> impl Iterator<Item = &ToolSpec> {
        self.specs.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.specs.iter().map(|s| s.name).collect()
    }

    pub fn in_category(&self, category: ToolCategory) -> impl Iterator<Item = &ToolSpec> {
        self.specs.iter().filter(move |s| s.category == category)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

fn square_root(args: &CheckedArgs<'_>) -> Result<ToolValue, ToolError> {
    calculate_square_root(args.number(0)).map(ToolValue::Number)
}

fn average(args: &CheckedArgs<'_>) -> Result<ToolValue, ToolError> {
    calculate_average(args.list(0)).map(ToolValue::Number)
}

fn greater_than(args: &CheckedArgs<'_>) -> Result<ToolValue, ToolError> {
    Ok(ToolValue::Bool(is_greater_than(args.number(0), args.number(1))))
}

fn calculator(args: &CheckedArgs<'_>) -> Result<ToolValue, ToolError> {
    basic_calculator(args.text(0)).map(ToolValue::Number)
}

fn vowels(args: &CheckedArgs<'_>) -> Result<ToolValue, ToolError> {
    Ok(ToolValue::Count(count_vowels(args.text(0))))
}

fn letters(args: &CheckedArgs<'_>) -> Result<ToolValue, ToolError> {
    Ok(ToolValue::Count(count_letters(args.text(0))))
}

fn words(args: &CheckedArgs<'_>) -> Result<ToolValue, ToolError> {
    Ok(ToolValue::Count(count_words(args.text(0))))
}

fn substring(args: &CheckedArgs<'_>) -> Result<ToolValue, ToolError> {
    Ok(ToolValue::Bool(contains_substring(args.text(0), args.text(1))))
}
