// Word tokenizer shared by vocabulary building and weighting
use crate::stopwords::StopWords;

/// Case-insensitive word tokenizer.
///
/// Lowercases, splits on every non-alphanumeric character, drops tokens
/// shorter than `min_len` characters and then drops stop words.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    min_len: usize,
    stop_words: StopWords,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(2, StopWords::english())
    }
}

impl Tokenizer {
    pub fn new(min_len: usize, stop_words: StopWords) -> Self {
        Self {
            min_len: min_len.max(1),
            stop_words,
        }
    }

    pub fn min_len(&self) -> usize {
        self.min_len
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    #[inline]
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|s| s.chars().count() >= self.min_len)
            .filter(|s| !self.stop_words.contains(s))
            .map(str::to_string)
            .collect()
    }
}
