//! Tool dispatch - find the tool call in a model reply and run it
//!
//! The dispatcher owns an immutable [`ToolRegistry`] and an [`Extractor`].
//! Whatever the reply contains, dispatch returns either "no tool" or a
//! [`ToolResult`]; tool failures never escape as errors.

mod matcher;

pub use matcher::{ArgPattern, CALL_PRIORITY, CallMatcher, Extractor, ExtractorOptions, KNOWN_WORD, PHRASE_RULES};

use std::fmt;

use log::{info, warn};

use crate::error::Result;
use crate::tools::{ToolArg, ToolRegistry, ToolResult};

/// A tool invocation extracted from reply text
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub name: String,
    pub args: Vec<ToolArg>,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, args: Vec<ToolArg>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

impl fmt::Display for ToolCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self.args.iter().map(|a| a.to_string()).collect();
        write!(f, "{}({})", self.name, args.join(", "))
    }
}

/// Outcome of dispatching one reply
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// Nothing recognizable; the caller falls back to the model's own answer
    NoTool,
    Executed { call: ToolCall, result: ToolResult },
}

impl Dispatch {
    pub fn tool_name(&self) -> Option<&str> {
        match self {
            Dispatch::NoTool => None,
            Dispatch::Executed { call, .. } => Some(&call.name),
        }
    }

    pub fn result(&self) -> Option<&ToolResult> {
        match self {
            Dispatch::NoTool => None,
            Dispatch::Executed { result, .. } => Some(result),
        }
    }
}

/// Extracts and executes tool calls against a fixed registry
#[derive(Debug, Clone)]
pub struct ToolDispatcher {
    registry: ToolRegistry,
    extractor: Extractor,
}

impl ToolDispatcher {
    pub fn new(registry: ToolRegistry, extractor: Extractor) -> Self {
        Self { registry, extractor }
    }

    /// Standard registry and standard extraction rules
    pub fn standard() -> Result<Self> {
        Ok(Self::new(ToolRegistry::standard(), Extractor::standard()?))
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    pub fn extract(&self, reply: &str, query: &str) -> Option<ToolCall> {
        self.extractor.extract(reply, query)
    }

    /// Run a call. Unknown tools and tool failures become error results.
    pub fn execute(&self, call: &ToolCall) -> ToolResult {
        let Some(spec) = self.registry.get(&call.name) else {
            warn!("Extracted call to unregistered tool {}", call.name);
            return ToolResult::error(format!("Tool {} not found", call.name));
        };

        match spec.invoke(&call.args) {
            Ok(value) => {
                info!("Executed {} -> {}", call, value);
                ToolResult::Value(value)
            }
            Err(e) => {
                warn!("Tool {} failed: {}", call, e);
                ToolResult::error(format!("Error executing tool {}: {}", call.name, e))
            }
        }
    }

    /// Extract from `reply` and execute whatever was found
    pub fn dispatch(&self, reply: &str, query: &str) -> Dispatch {
        match self.extract(reply, query) {
            Some(call) => {
                let result = self.execute(&call);
                Dispatch::Executed { call, result }
            }
            None => Dispatch::NoTool,
        }
    }
}
