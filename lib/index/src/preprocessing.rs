//! Text preprocessing
//!
//! Splits field text into overlapping chunks as configured by an index's
//! `text_preprocessing` block.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tensorgate_core::{validate_str_against_enum, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMethod {
    Character,
    Word,
    Sentence,
    Passage,
}

impl SplitMethod {
    pub const VALUES: &'static [&'static str] = &["character", "word", "sentence", "passage"];

    pub fn as_str(&self) -> &'static str {
        match self {
            SplitMethod::Character => "character",
            SplitMethod::Word => "word",
            SplitMethod::Sentence => "sentence",
            SplitMethod::Passage => "passage",
        }
    }

    fn separator(&self) -> &'static str {
        match self {
            SplitMethod::Character => "",
            SplitMethod::Word | SplitMethod::Sentence => " ",
            SplitMethod::Passage => "\n\n",
        }
    }
}

impl FromStr for SplitMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match validate_str_against_enum(s, Self::VALUES, true)? {
            "character" => Ok(SplitMethod::Character),
            "word" => Ok(SplitMethod::Word),
            "sentence" => Ok(SplitMethod::Sentence),
            _ => Ok(SplitMethod::Passage),
        }
    }
}

impl fmt::Display for SplitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split `text` into chunks of `split_length` units overlapping by `split_overlap`.
///
/// Empty or whitespace-only text yields a single `" "` chunk. A zero length is
/// treated as one, and the overlap is capped below the length.
pub fn split_text(
    text: &str,
    method: SplitMethod,
    split_length: usize,
    split_overlap: usize,
) -> Vec<String> {
    if text.trim().is_empty() {
        return vec![" ".to_string()];
    }

    let units: Vec<String> = match method {
        SplitMethod::Character => text.chars().map(String::from).collect(),
        SplitMethod::Word => text.split_whitespace().map(str::to_string).collect(),
        SplitMethod::Sentence => sentences(text),
        SplitMethod::Passage => text
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect(),
    };

    let length = split_length.max(1);
    let overlap = split_overlap.min(length - 1);
    let separator = method.separator();

    if units.len() <= length {
        return vec![units.join(separator)];
    }

    (0..units.len() - overlap)
        .step_by(length - overlap)
        .map(|start| {
            let end = (start + length).min(units.len());
            units[start..end].join(separator)
        })
        .collect()
}

fn sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let at_boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
        if at_boundary {
            let end = i + c.len_utf8();
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                out.push(sentence.to_string());
            }
            start = end;
        }
    }
    let rest = text[start..].trim();
    if !rest.is_empty() {
        out.push(rest.to_string());
    }
    out
}

/// Prepend `prefix` to every chunk. `None` and `""` leave chunks unchanged.
pub fn prefix_text_chunks(chunks: &[String], prefix: Option<&str>) -> Vec<String> {
    match prefix {
        Some(prefix) if !prefix.is_empty() => {
            chunks.iter().map(|c| format!("{}{}", prefix, c)).collect()
        }
        _ => chunks.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const METHODS: [SplitMethod; 3] = [SplitMethod::Character, SplitMethod::Word, SplitMethod::Sentence];

    #[test]
    fn test_split_method_parse() {
        assert_eq!("sentence".parse::<SplitMethod>().unwrap(), SplitMethod::Sentence);
        assert_eq!("passage".parse::<SplitMethod>().unwrap(), SplitMethod::Passage);
        let err = "sasa".parse::<SplitMethod>().unwrap_err();
        assert!(err.message().contains("sasa"));
    }

    #[test]
    fn test_empty_and_whitespace() {
        for text in ["", " ", "\r", "   ", "\r\t", "\r  \t"] {
            for method in METHODS {
                assert_eq!(split_text(text, method, 2, 0), vec![" "]);
            }
        }
    }

    #[test]
    fn test_single_character() {
        for method in METHODS {
            assert_eq!(split_text("a", method, 2, 0), vec!["a"]);
        }
    }

    #[test]
    fn test_character_windows() {
        let text = "short";
        assert_eq!(split_text(text, SplitMethod::Character, 4, 1), vec!["shor", "rt"]);
        assert_eq!(split_text(text, SplitMethod::Character, 4, 2), vec!["shor", "ort"]);
        assert_eq!(split_text(text, SplitMethod::Character, 4, 3), vec!["shor", "hort"]);
        assert_eq!(
            split_text(text, SplitMethod::Character, 1, 0),
            vec!["s", "h", "o", "r", "t"]
        );
        assert_eq!(split_text(text, SplitMethod::Word, 4, 1), vec![text]);
        assert_eq!(split_text(text, SplitMethod::Sentence, 4, 1), vec![text]);
    }

    #[test]
    fn test_sentence_windows() {
        let text = "The cat sat. The dog ran! Did the bird fly? It did.";
        assert_eq!(
            split_text(text, SplitMethod::Sentence, 2, 0),
            vec!["The cat sat. The dog ran!", "Did the bird fly? It did."]
        );
        assert_eq!(
            split_text(text, SplitMethod::Sentence, 2, 1),
            vec!["The cat sat. The dog ran!", "The dog ran! Did the bird fly?", "Did the bird fly? It did."]
        );
        // decimals are not sentence boundaries
        assert_eq!(split_text("Pi is 3.14 roughly.", SplitMethod::Sentence, 1, 0).len(), 1);
    }

    #[test]
    fn test_word_and_passage_windows() {
        assert_eq!(
            split_text("one two  three four", SplitMethod::Word, 3, 1),
            vec!["one two three", "three four"]
        );
        assert_eq!(
            split_text("first\n\nsecond\n\n\n\nthird", SplitMethod::Passage, 2, 0),
            vec!["first\n\nsecond", "third"]
        );
    }

    #[test]
    fn test_degenerate_lengths() {
        assert_eq!(split_text("abc", SplitMethod::Character, 0, 0), vec!["a", "b", "c"]);
        assert_eq!(split_text("abcd", SplitMethod::Character, 2, 5), vec!["ab", "bc", "cd"]);
    }

    #[test]
    fn test_prefix_text_chunks() {
        let chunks: Vec<String> = ["a", "b", "c", ""].iter().map(|s| s.to_string()).collect();
        assert_eq!(
            prefix_text_chunks(&chunks, Some("prefix_")),
            vec!["prefix_a", "prefix_b", "prefix_c", "prefix_"]
        );
        assert_eq!(prefix_text_chunks(&chunks, Some("")), chunks);
        assert_eq!(prefix_text_chunks(&chunks, None), chunks);
    }
}
