//! Spell-Check Post-Processor
//!
//! Splits article text into an ordered token sequence in which whitespace and
//! punctuation survive as standalone tokens, so concatenating the tokens back
//! together is lossless. Word tokens are checked against the dictionary and
//! misspellings are replaced by the dictionary's first suggestion, preserving
//! leading capitalization.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dictionary::Dictionary;
use crate::models::SpellCorrection;

// Three arms, tried in order: a word (letter/digit head, then letters,
// digits, apostrophes or hyphens), a whitespace run, any other single
// character. Together they cover every character, which is what makes
// reassembly-by-concatenation exact.
static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{L}\p{N}][\p{L}\p{N}'’-]*|\s+|[\s\S]").expect("Invalid token pattern")
});

/// One tokenizer output unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A correctable word
    Word(String),
    /// Whitespace or punctuation, passed through untouched
    Other(String),
}

impl Token {
    /// The token's text, whichever kind it is
    pub fn as_str(&self) -> &str {
        match self {
            Token::Word(s) | Token::Other(s) => s,
        }
    }
}

/// Result of a spell-check pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellCheckResult {
    /// The reassembled, corrected text
    pub corrected: String,

    /// Substitutions in the order they occurred
    pub corrections: Vec<SpellCorrection>,
}

/// Split text into an ordered, lossless token sequence
pub fn tokenize(text: &str) -> Vec<Token> {
    TOKEN_PATTERN
        .find_iter(text)
        .map(|m| {
            let token = m.as_str();
            match token.chars().next() {
                Some(c) if c.is_alphanumeric() => Token::Word(token.to_string()),
                _ => Token::Other(token.to_string()),
            }
        })
        .collect()
}

/// Correct misspelled words in `text` against `dictionary`.
///
/// Deterministic for a fixed dictionary and input: unknown words take the
/// dictionary's first suggestion, words without a suggestion pass through
/// unchanged and unrecorded.
pub fn correct_text(dictionary: &Dictionary, text: &str) -> SpellCheckResult {
    let mut corrected = String::with_capacity(text.len());
    let mut corrections = Vec::new();

    for token in tokenize(text) {
        match token {
            Token::Word(word) => {
                if dictionary.check(&word) {
                    corrected.push_str(&word);
                } else if let Some(suggestion) = dictionary.suggest(&word) {
                    let replacement = match_capitalization(&word, &suggestion);
                    corrections.push(SpellCorrection {
                        original: word,
                        suggestion: replacement.clone(),
                    });
                    corrected.push_str(&replacement);
                } else {
                    corrected.push_str(&word);
                }
            }
            Token::Other(other) => corrected.push_str(&other),
        }
    }

    SpellCheckResult {
        corrected,
        corrections,
    }
}

/// Capitalize the suggestion's first letter when the original token began
/// with an uppercase letter.
fn match_capitalization(original: &str, suggestion: &str) -> String {
    let starts_upper = original
        .chars()
        .next()
        .map(char::is_uppercase)
        .unwrap_or(false);

    if !starts_upper {
        return suggestion.to_string();
    }

    let mut chars = suggestion.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dictionary(words: &str) -> Dictionary {
        Dictionary::from_word_list(words)
    }

    fn reassemble(tokens: &[Token]) -> String {
        tokens.iter().map(Token::as_str).collect()
    }

    #[test]
    fn test_tokenizer_round_trip_is_exact() {
        let inputs = [
            "",
            "plain words only",
            "  leading and trailing  ",
            "Punct! And... more?! (parens) [brackets] — dash",
            "hyphen-ated and apostrophe's and digits 42nd",
            "unicode: café, naïve, Zürich, 北京",
            "newlines\nand\ttabs\r\nmixed",
        ];

        for input in inputs {
            assert_eq!(reassemble(&tokenize(input)), input, "input {:?}", input);
        }
    }

    #[test]
    fn test_tokenizer_classifies_words_and_separators() {
        let tokens = tokenize("It's a test.");

        assert_eq!(
            tokens,
            vec![
                Token::Word("It's".to_string()),
                Token::Other(" ".to_string()),
                Token::Word("a".to_string()),
                Token::Other(" ".to_string()),
                Token::Word("test".to_string()),
                Token::Other(".".to_string()),
            ]
        );
    }

    #[test]
    fn test_leading_apostrophe_is_not_a_word_head() {
        let tokens = tokenize("'tis");
        assert_eq!(tokens[0], Token::Other("'".to_string()));
        assert_eq!(tokens[1], Token::Word("tis".to_string()));
    }

    #[test]
    fn test_correct_article_is_idempotent() {
        let dict = dictionary("every\nword\nhere\nis\nknown\n");
        let text = "Every word here is known.";

        let result = correct_text(&dict, text);

        assert_eq!(result.corrected, text);
        assert!(result.corrections.is_empty());
    }

    #[test]
    fn test_scenario_ths_is_gud() {
        let dict = dictionary("this\nis\ngood\n");

        let result = correct_text(&dict, "Ths is gud.");

        assert_eq!(result.corrected, "This is good.");
        assert_eq!(
            result.corrections,
            vec![
                SpellCorrection {
                    original: "Ths".to_string(),
                    suggestion: "This".to_string(),
                },
                SpellCorrection {
                    original: "gud".to_string(),
                    suggestion: "good".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_unknown_word_without_suggestion_passes_through() {
        let dict = dictionary("unrelated\nvocabulary\n");

        let result = correct_text(&dict, "qwxzvb stays");

        assert_eq!(result.corrected, "qwxzvb stays");
        assert!(result.corrections.is_empty());
    }

    #[test]
    fn test_lowercase_misspelling_keeps_lowercase_suggestion() {
        let dict = dictionary("kettle\n");
        let result = correct_text(&dict, "a ketle");
        assert_eq!(result.corrected, "a kettle");
        assert_eq!(result.corrections[0].suggestion, "kettle");
    }

    #[test]
    fn test_punctuation_and_whitespace_survive_corrections() {
        let dict = dictionary("good\n");
        let result = correct_text(&dict, "  gud,\n\tgud!  ");
        assert_eq!(result.corrected, "  good,\n\tgood!  ");
        assert_eq!(result.corrections.len(), 2);
    }
}
