use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Hint character for a letter present elsewhere in the secret.
pub const HINT_PRESENT: char = '*';
/// Hint character for a letter absent from the secret.
pub const HINT_ABSENT: char = '-';
/// Hint character used for every position when the guess length is wrong.
pub const HINT_MISMATCH: char = '?';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordError {
    #[error("empty word in csv line {0:?}")]
    Empty(String),
}

/// A dictionary entry, parsed from a `text,frequency[,day]` csv line.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    text: String,
    frequency: Option<f64>,
    day: Option<u32>,
}

impl Word {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn frequency(&self) -> Option<f64> {
        self.frequency
    }

    pub fn day(&self) -> Option<u32> {
        self.day
    }

    /// Length of the word in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Scores `guess` against this word.
    ///
    /// Exact matches are emitted as the secret letter itself. Remaining
    /// positions get `*` if the guessed letter is still available among the
    /// secret letters that were not matched exactly (each one is consumed
    /// once credited), `-` otherwise. A guess of the wrong length yields a
    /// string of `?`.
    pub fn hints(&self, guess: &str) -> String {
        let secret: Vec<char> = self.text.chars().collect();
        let guess: Vec<char> = guess.chars().collect();
        if secret.len() != guess.len() {
            return HINT_MISMATCH.to_string().repeat(secret.len());
        }

        let mut hints: Vec<Option<char>> = vec![None; secret.len()];
        let mut unmatched: HashMap<char, usize> = HashMap::new();
        for ((hint, &s), &g) in hints.iter_mut().zip(&secret).zip(&guess) {
            if s == g {
                *hint = Some(s);
            } else {
                *unmatched.entry(s).or_insert(0) += 1;
            }
        }

        hints
            .into_iter()
            .zip(&guess)
            .map(|(hint, g)| {
                if let Some(exact) = hint {
                    return exact;
                }
                match unmatched.get_mut(g) {
                    Some(left) if *left > 0 => {
                        *left -= 1;
                        HINT_PRESENT
                    }
                    _ => HINT_ABSENT,
                }
            })
            .collect()
    }

    /// Dictionary order: higher frequency first, undefined frequencies last.
    pub fn frequency_order(&self, other: &Self) -> Ordering {
        match (self.frequency, other.frequency) {
            (Some(a), Some(b)) => b.total_cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl FromStr for Word {
    type Err = WordError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut fields = line.split(',');
        let text = fields.next().unwrap_or_default().trim().to_uppercase();
        if text.is_empty() {
            return Err(WordError::Empty(line.to_string()));
        }
        let frequency = fields.next().and_then(|f| f.trim().parse::<f64>().ok());
        let day = fields.next().and_then(|d| d.trim().parse::<u32>().ok());
        Ok(Self {
            text,
            frequency,
            day,
        })
    }
}

/// Six-digit mantissa with a signed exponent of at least two digits, e.g.
/// `1.000000e-04`.
fn scientific(value: f64) -> String {
    let raw = format!("{value:.6e}");
    match raw.split_once('e').map(|(m, e)| (m, e.parse::<i32>())) {
        Some((mantissa, Ok(exp))) => {
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
        }
        _ => raw,
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, ", self.text)?;
        match self.frequency {
            Some(freq) => write!(f, "{}, ", scientific(freq))?,
            None => write!(f, "null, ")?,
        }
        match self.day {
            Some(day) => write!(f, "{day}]"),
            None => write!(f, "null]"),
        }
    }
}
