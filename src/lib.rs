//! Reasoner - tool-assisted reasoning over a chat-completions model
//!
//! A query goes to the model, the tool call it proposes is pulled out of the
//! free-form reply by the [`dispatch::ToolDispatcher`] and run locally, and
//! the tool result goes back to the model for the final answer.

pub mod dispatch;
pub mod error;
pub mod llm;
pub mod reasoning;
pub mod tools;

pub use error::{ReasonerError, Result};
