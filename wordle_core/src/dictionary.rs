use std::io::{BufRead, ErrorKind};
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::word::Word;

/// The candidate secret words, loaded once from a csv file.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: Vec<Arc<Word>>,
    word_len: usize,
}

impl Dictionary {
    /// Reads `text,frequency[,day]` rows. The first line is a header and is
    /// dropped unread. Rows without a word are logged and skipped; rows with
    /// malformed numbers are kept.
    pub fn parse<R: BufRead>(reader: R) -> Self {
        let mut words = Vec::new();
        let mut word_len = usize::MAX;

        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line = match line {
                Ok(line) => line,
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    log::warn!("[csvLine {line_no}] {e}");
                    continue;
                }
                Err(e) => {
                    log::error!("[csvLine {line_no}] read aborted: {e}");
                    break;
                }
            };
            if line_no == 1 {
                continue;
            }
            match line.parse::<Word>() {
                Ok(word) => {
                    if word.frequency().is_none() {
                        log::debug!("[csvLine {line_no}] no frequency for {word}");
                    }
                    word_len = word_len.min(word.len());
                    words.push(Arc::new(word));
                }
                Err(e) => log::warn!("[csvLine {line_no}] {e}"),
            }
        }

        if words.is_empty() {
            word_len = 0;
        }
        log::info!("Wordle database loaded ... [{}] words", words.len());
        Self { words, word_len }
    }

    /// Orders the words by descending frequency.
    pub fn sort(&mut self) {
        self.words.sort_by(|a, b| a.frequency_order(b));
    }

    pub fn words(&self) -> &[Arc<Word>] {
        &self.words
    }

    /// Shortest word length in the dictionary; every valid guess has it.
    pub fn word_len(&self) -> usize {
        self.word_len
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn is_valid_guess(&self, word: &str) -> bool {
        word.chars().count() == self.word_len
    }

    /// Picks a secret uniformly at random.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Arc<Word>> {
        self.words.choose(rng).cloned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const CSV: &str = "word,occurrence,day\nCRANE,1.0e-4\nSLATE,2.0e-4\nPLANT,5.0e-4\n";

    fn texts(dict: &Dictionary) -> Vec<&str> {
        dict.words().iter().map(|w| w.text()).collect()
    }

    #[test]
    fn test_parse_and_sort() {
        let mut dict = Dictionary::parse(CSV.as_bytes());
        assert_eq!(texts(&dict), ["CRANE", "SLATE", "PLANT"]);
        dict.sort();
        assert_eq!(texts(&dict), ["PLANT", "SLATE", "CRANE"]);
        assert_eq!(dict.word_len(), 5);
    }

    #[test]
    fn test_header_dropped_by_position() {
        // The header looks like a word but is still skipped.
        let dict = Dictionary::parse("ABOUT,1.0\nCRANE,1.0\n".as_bytes());
        assert_eq!(texts(&dict), ["CRANE"]);
    }

    #[test]
    fn test_word_len_is_minimum() {
        let dict = Dictionary::parse("h\nCRANES,1\nCRANE,1\nCRANIUM,1\n".as_bytes());
        assert_eq!(dict.word_len(), 5);
        assert!(dict.is_valid_guess("SLATE"));
        assert!(!dict.is_valid_guess("SLATES"));
    }

    #[test]
    fn test_bad_rows() {
        let dict = Dictionary::parse("h\n\nCRANE,abc\n,1.0\nSLATE,2.0,x\n".as_bytes());
        assert_eq!(texts(&dict), ["CRANE", "SLATE"]);
        assert_eq!(dict.words()[0].frequency(), None);
    }

    #[test]
    fn test_invalid_utf8_line_skipped() {
        let mut bytes = b"h\nCRANE,1.0\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
        bytes.extend_from_slice(b"SLATE,2.0\n");
        let dict = Dictionary::parse(&bytes[..]);
        assert_eq!(texts(&dict), ["CRANE", "SLATE"]);
    }

    #[test]
    fn test_empty() {
        let dict = Dictionary::parse("word,occurrence\n".as_bytes());
        assert!(dict.is_empty());
        assert_eq!(dict.word_len(), 0);
        assert!(dict.pick(&mut rand::thread_rng()).is_none());
    }

    #[test]
    fn test_pick() {
        let dict = Dictionary::parse(CSV.as_bytes());
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let word = dict.pick(&mut rng).unwrap();
            assert!(dict.words().iter().any(|w| Arc::ptr_eq(w, &word)));
        }
    }
}
