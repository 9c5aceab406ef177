//! Query processing - the two round-trip reasoning cycle
//!
//! 1. Ask the model to reason about the query and name a tool call
//! 2. Dispatch whatever tool call the reply contains
//! 3. If a tool ran, ask the model for a final answer given its result;
//!    otherwise keep the model's own `Answer:` section

mod prompt;
mod sections;
pub mod shortcuts;

pub use prompt::{final_answer_prompt, reasoning_prompt};
pub use sections::ReplySections;

use std::fmt;

use log::{debug, info, warn};
use serde::Serialize;

use crate::dispatch::{Dispatch, ToolDispatcher};
use crate::error::Result;
use crate::llm::{CompletionRequest, LlmClient};

const RULE_WIDTH: usize = 50;

/// Everything shown to the operator for one query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryOutcome {
    pub query: String,
    pub reasoning: String,
    pub tool_used: Option<String>,
    pub tool_result: Option<String>,
    pub answer: String,
}

impl fmt::Display for QueryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let heavy = "=".repeat(RULE_WIDTH);
        let light = "-".repeat(RULE_WIDTH);

        writeln!(f, "{}", heavy)?;
        writeln!(f, "Query: {}", self.query)?;
        writeln!(f, "{}", light)?;
        writeln!(f, "Reasoning:\n{}", self.reasoning)?;
        writeln!(f, "{}", light)?;
        match &self.tool_used {
            Some(tool) => {
                writeln!(f, "Tool Used: {}", tool)?;
                writeln!(f, "Tool Result: {}", self.tool_result.as_deref().unwrap_or(""))?;
            }
            None => writeln!(f, "No tool was used.")?,
        }
        writeln!(f, "{}", light)?;
        writeln!(f, "Final Answer: {}", self.answer)?;
        write!(f, "{}", heavy)
    }
}

/// Per-run switches for the reasoner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReasonerOptions {
    pub benchmark_shortcuts: bool,
    pub max_tokens: Option<u32>,
}

/// Drives one query at a time through the model and the dispatcher
pub struct Reasoner<C: LlmClient> {
    client: C,
    dispatcher: ToolDispatcher,
    options: ReasonerOptions,
}

impl<C: LlmClient> Reasoner<C> {
    pub fn new(client: C, dispatcher: ToolDispatcher, options: ReasonerOptions) -> Self {
        Self {
            client,
            dispatcher,
            options,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn dispatcher(&self) -> &ToolDispatcher {
        &self.dispatcher
    }

    /// Process one query. Fails only when a model call fails.
    pub async fn process(&self, query: &str) -> Result<QueryOutcome> {
        if self.options.benchmark_shortcuts
            && let Some(shortcut) = shortcuts::find(query)
        {
            match shortcut.run(&self.dispatcher, query) {
                Some(outcome) => {
                    info!("Answered with shortcut {}", shortcut.name);
                    return Ok(outcome);
                }
                None => warn!("Shortcut {} failed, asking the model instead", shortcut.name),
            }
        }

        let reply = self
            .ask(reasoning_prompt(query, self.dispatcher.registry()))
            .await?;
        let sections = ReplySections::parse(&reply);

        match self.dispatcher.dispatch(&reply, query) {
            Dispatch::Executed { call, result } => {
                info!("Tool {} returned {}", call.name, result);
                let answer = self
                    .ask(final_answer_prompt(query, &sections.reasoning, &call.name, &result))
                    .await?;

                Ok(QueryOutcome {
                    query: query.to_string(),
                    reasoning: sections.reasoning,
                    tool_used: Some(call.name),
                    tool_result: Some(result.to_string()),
                    answer,
                })
            }
            Dispatch::NoTool => {
                info!("No tool identified, keeping the model's own answer");
                Ok(QueryOutcome {
                    query: query.to_string(),
                    reasoning: sections.reasoning,
                    tool_used: None,
                    tool_result: None,
                    answer: sections.answer,
                })
            }
        }
    }

    async fn ask(&self, prompt: String) -> Result<String> {
        let mut request = CompletionRequest::prompt(prompt);
        if let Some(max_tokens) = self.options.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        debug!("Asking {} ({} prompt bytes)", self.client.model(), request.messages[0].content.len());
        let response = self.client.complete(request).await?;
        if response.stop_reason.is_truncated() {
            warn!("Model reply was truncated at the token limit");
        }
        Ok(response.content)
    }
}
