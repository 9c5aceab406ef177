//! Prompts for the two model round trips

use std::fmt::Write;

use super::sections::{ANSWER, REASONING, TOOL_CALL};
use crate::tools::{ToolCategory, ToolRegistry, ToolResult};

/// First round trip: reason about `query` and name a tool call
pub fn reasoning_prompt(query: &str, registry: &ToolRegistry) -> String {
    let mut prompt = String::new();

    let _ = writeln!(prompt, "Answer the following query with step-by-step reasoning:\n");
    let _ = writeln!(prompt, "\"{}\"\n", query);
    let _ = writeln!(
        prompt,
        "Work out how to solve it first. Every calculation or string operation MUST go \
         through one of the tools below, however simple it looks. Do not compute results yourself.\n"
    );

    for category in [ToolCategory::Math, ToolCategory::String] {
        let mut tools = registry.in_category(category).peekable();
        if tools.peek().is_none() {
            continue;
        }
        let _ = writeln!(prompt, "{}:", category);
        for tool in tools {
            let _ = writeln!(prompt, "- {}", tool.signature);
        }
        prompt.push('\n');
    }

    let _ = writeln!(prompt, "Reply in exactly this format:\n");
    let _ = writeln!(prompt, "{} [your step-by-step reasoning]", REASONING);
    let _ = writeln!(prompt, "{} [the tool and its arguments, e.g. count_words(\"a b c\")]", TOOL_CALL);
    let _ = writeln!(prompt, "{} [your final answer]\n", ANSWER);
    let _ = writeln!(
        prompt,
        "If the query needs several tools, name one tool call at a time."
    );

    prompt
}

/// Second round trip: turn the tool result into a final answer
pub fn final_answer_prompt(query: &str, reasoning: &str, tool: &str, result: &ToolResult) -> String {
    format!(
        "Given this reasoning:\n\n{reasoning}\n\n\
         and the result of the tool {tool}: {result}\n\n\
         what is the final answer to the query: \"{query}\"?\n\n\
         Reply with the final answer only, without further explanation."
    )
}
