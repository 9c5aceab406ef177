//! Splits a model reply into its `Reasoning:` / `Tool Call:` / `Answer:` sections

pub const REASONING: &str = "Reasoning:";
pub const TOOL_CALL: &str = "Tool Call:";
pub const ANSWER: &str = "Answer:";

/// The three labelled parts of a reply; missing sections are empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplySections {
    pub reasoning: String,
    pub tool_call: String,
    pub answer: String,
}

impl ReplySections {
    pub fn parse(reply: &str) -> Self {
        Self {
            reasoning: section(reply, REASONING, &[TOOL_CALL, ANSWER]),
            tool_call: section(reply, TOOL_CALL, &[ANSWER]),
            answer: section(reply, ANSWER, &[]),
        }
    }
}

/// Text after the first `marker`, up to the nearest of `terminators`
fn section(reply: &str, marker: &str, terminators: &[&str]) -> String {
    let Some(start) = reply.find(marker) else {
        return String::new();
    };
    let body = &reply[start + marker.len()..];
    let end = terminators
        .iter()
        .filter_map(|t| body.find(t))
        .min()
        .unwrap_or(body.len());
    body[..end].trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_reply() {
        let reply = "Reasoning: I must count the vowels.\n\
                     Tool Call: count_vowels(\"Multimodality\")\n\
                     Answer: 5";
        let sections = ReplySections::parse(reply);

        assert_eq!(sections.reasoning, "I must count the vowels.");
        assert_eq!(sections.tool_call, "count_vowels(\"Multimodality\")");
        assert_eq!(sections.answer, "5");
    }

    #[test]
    fn test_reasoning_spans_lines() {
        let reply = "Reasoning:\n1. average\n2. square root\nAnswer: about 5.83";
        let sections = ReplySections::parse(reply);

        assert_eq!(sections.reasoning, "1. average\n2. square root");
        assert!(sections.tool_call.is_empty());
        assert_eq!(sections.answer, "about 5.83");
    }

    #[test]
    fn test_answer_runs_to_end() {
        let sections = ReplySections::parse("Answer: yes.\nIt has 8 consonants.");
        assert_eq!(sections.answer, "yes.\nIt has 8 consonants.");
        assert!(sections.reasoning.is_empty());
    }

    #[test]
    fn test_missing_sections() {
        assert_eq!(ReplySections::parse("just some text"), ReplySections::default());
    }

    #[test]
    fn test_tool_call_without_answer() {
        let sections = ReplySections::parse("Reasoning: r\nTool Call: is_greater_than(7, 4)");
        assert_eq!(sections.reasoning, "r");
        assert_eq!(sections.tool_call, "is_greater_than(7, 4)");
        assert!(sections.answer.is_empty());
    }

    #[test]
    fn test_markers_are_case_sensitive() {
        let sections = ReplySections::parse("answer: 4");
        assert!(sections.answer.is_empty());
    }
}
