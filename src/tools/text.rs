//! String tools

const VOWELS: &str = "aeiouAEIOU";

pub fn count_vowels(text: &str) -> usize {
    text.chars().filter(|c| VOWELS.contains(*c)).count()
}

pub fn count_letters(text: &str) -> usize {
    text.chars().filter(|c| c.is_alphabetic()).count()
}

pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Case-insensitive containment check
pub fn contains_substring(text: &str, substring: &str) -> bool {
    text.to_lowercase().contains(&substring.to_lowercase())
}
