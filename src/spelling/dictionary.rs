//! Word-frequency dictionary backing the spelling suggester.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ahash::AHashMap;
use log::{debug, warn};

use crate::error::Result;

/// Words (lowercased) and how often each was seen.
#[derive(Debug, Clone, Default)]
pub struct SpellingDictionary {
    words: AHashMap<String, u64>,
    total_count: u64,
}

impl SpellingDictionary {
    /// Create a new empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dictionary from `(word, frequency)` pairs.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<str>,
    {
        let mut dictionary = SpellingDictionary::new();
        for (word, frequency) in words {
            dictionary.add_word(word.as_ref(), frequency);
        }
        dictionary
    }

    /// Add `frequency` occurrences of `word`. Existing counts accumulate.
    pub fn add_word(&mut self, word: &str, frequency: u64) {
        let normalized = word.to_lowercase();
        *self.words.entry(normalized).or_insert(0) += frequency;
        self.total_count += frequency;
    }

    /// Check if a word exists in the dictionary.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(&word.to_lowercase())
    }

    /// Get the frequency of a word, 0 if absent.
    pub fn frequency(&self, word: &str) -> u64 {
        self.words.get(&word.to_lowercase()).copied().unwrap_or(0)
    }

    /// Iterate over all `(word, frequency)` entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.words.iter().map(|(word, &freq)| (word.as_str(), freq))
    }

    /// Get the total number of unique words.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Get the total frequency count.
    pub fn total_frequency(&self) -> u64 {
        self.total_count
    }

    /// Whether the dictionary has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Load a dictionary from a text file with one word per line; every
    /// occurrence counts once.
    pub fn load_from_word_list<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut dictionary = SpellingDictionary::new();
        let reader = BufReader::new(File::open(path.as_ref())?);

        for line in reader.lines() {
            let line = line?;
            let word = line.trim();
            if !word.is_empty() {
                dictionary.add_word(word, 1);
            }
        }

        debug!(
            "loaded {} words from {}",
            dictionary.word_count(),
            path.as_ref().display()
        );
        Ok(dictionary)
    }

    /// Load a dictionary from a frequency file with format "word frequency"
    /// per line. Malformed lines are skipped.
    pub fn load_from_frequency_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut dictionary = SpellingDictionary::new();
        let reader = BufReader::new(File::open(path.as_ref())?);

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match parse_frequency_line(&line) {
                Some((word, frequency)) => dictionary.add_word(word, frequency),
                None => warn!("skipping malformed dictionary line {}: {line:?}", line_num + 1),
            }
        }

        debug!(
            "loaded {} words from {}",
            dictionary.word_count(),
            path.as_ref().display()
        );
        Ok(dictionary)
    }
}

/// Parse a `word frequency` line.
pub fn parse_frequency_line(line: &str) -> Option<(&str, u64)> {
    let mut parts = line.split_whitespace();
    let word = parts.next()?;
    let frequency = parts.next()?.parse::<u64>().ok()?;
    Some((word, frequency))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_add_word_accumulates() {
        let mut dict = SpellingDictionary::new();
        dict.add_word("Hello", 2);
        dict.add_word("hello", 3);
        dict.add_word("world", 1);

        assert_eq!(dict.frequency("hello"), 5);
        assert_eq!(dict.frequency("HELLO"), 5);
        assert_eq!(dict.word_count(), 2);
        assert_eq!(dict.total_frequency(), 6);
        assert!(dict.contains("World"));
        assert!(!dict.contains("missing"));
    }

    #[test]
    fn test_parse_frequency_line() {
        assert_eq!(parse_frequency_line("apple 12"), Some(("apple", 12)));
        assert_eq!(parse_frequency_line("  apple\t3  "), Some(("apple", 3)));
        assert_eq!(parse_frequency_line("apple"), None);
        assert_eq!(parse_frequency_line("apple many"), None);
    }

    #[test]
    fn test_load_from_frequency_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "apple 10").unwrap();
        writeln!(file, "apply 4").unwrap();
        writeln!(file, "broken line here").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "apple 2").unwrap();

        let dict = SpellingDictionary::load_from_frequency_file(file.path()).unwrap();
        assert_eq!(dict.word_count(), 2);
        assert_eq!(dict.frequency("apple"), 12);
        assert_eq!(dict.total_frequency(), 16);
    }

    #[test]
    fn test_load_from_word_list() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "cat\ncar\ncat\n").unwrap();

        let dict = SpellingDictionary::load_from_word_list(file.path()).unwrap();
        assert_eq!(dict.frequency("cat"), 2);
        assert_eq!(dict.frequency("car"), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SpellingDictionary::load_from_word_list("/nonexistent/words.txt").unwrap_err();
        assert!(matches!(err, crate::error::FalcataError::Io(_)));
    }
}
