use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::word::Word;

/// A session untouched for this long is an orphan and may be evicted.
pub const ORPHAN_AFTER: Duration = Duration::from_secs(12 * 60 * 60);
/// Number of uppercase hex characters in a session id.
pub const SESSION_ID_LEN: usize = 8;
/// Display name used when a player does not give one.
pub const ANONYMOUS: &str = "~anonymous~";

/// A scored guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guess {
    pub word: String,
    pub hint: String,
}

impl fmt::Display for Guess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} > {}", self.word, self.hint)
    }
}

/// One player's game against a secret word.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    name: String,
    secret: Arc<Word>,
    guesses: Vec<Guess>,
    solved_at: usize,
    spoiled: bool,
    last_activity: Instant,
}

/// Generates a fresh session id: the first eight hex digits of a v4 uuid,
/// uppercased.
pub fn new_session_id() -> String {
    Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(SESSION_ID_LEN)
        .collect::<String>()
        .to_uppercase()
}

impl Session {
    pub fn with_id(id: impl Into<String>, name: impl Into<String>, secret: Arc<Word>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            secret,
            guesses: Vec::new(),
            solved_at: 0,
            spoiled: false,
            last_activity: Instant::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn guesses(&self) -> &[Guess] {
        &self.guesses
    }

    /// 1-based index of the winning guess, 0 while unsolved.
    pub fn solved_at(&self) -> usize {
        self.solved_at
    }

    pub fn is_solved(&self) -> bool {
        self.solved_at > 0
    }

    pub fn is_spoiled(&self) -> bool {
        self.spoiled
    }

    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    pub fn last_hint(&self) -> Option<&str> {
        self.guesses.last().map(|g| g.hint.as_str())
    }

    /// Records a guess and returns whether it matched the secret.
    /// Duplicate guesses are accepted; the first winning guess is kept.
    pub fn check_word(&mut self, word: &str) -> bool {
        let hint = self.secret.hints(word);
        let solved = hint == word;
        self.guesses.push(Guess {
            word: word.to_string(),
            hint,
        });
        if solved && self.solved_at == 0 {
            self.solved_at = self.guesses.len();
        }
        solved
    }

    /// Reveals the secret, spoiling the session if it was not solved yet.
    pub fn reveal(&mut self) -> &Word {
        if !self.is_solved() {
            self.spoiled = true;
        }
        &self.secret
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn is_orphan(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_activity) >= ORPHAN_AFTER
    }

    pub fn state(&self) -> String {
        let count = self.guesses.len();
        let spoiled = if self.spoiled { "SPOILED/" } else { "" };
        match count {
            0 => "NOT Started!".to_string(),
            _ if self.is_solved() && count > self.solved_at => format!(
                "Already {spoiled}SOLVED in {} guesses. Still guessing?",
                self.solved_at
            ),
            _ if self.is_solved() => format!("{spoiled}SOLVED in {} guesses!", self.solved_at),
            1..=3 => "GUESSING".to_string(),
            4..=5 => "GUESSING Hard!".to_string(),
            6..=9 => "GUESSING Too Hard!".to_string(),
            _ => "GUESSING Randomly?".to_string(),
        }
    }

    /// `(ID : name) state`, with `!` in place of `:` once spoiled.
    pub fn summary(&self) -> String {
        let mark = if self.spoiled { '!' } else { ':' };
        format!("({} {} {}) {}", self.id, mark, self.name, self.state())
    }

    pub fn cmp_by_name(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn session(secret: &str) -> Session {
        let word: Word = format!("{secret},1.0").parse().unwrap();
        Session::with_id("0A1B2C3D", "alice", Arc::new(word))
    }

    #[test]
    fn test_new_session_id_shape() {
        for _ in 0..100 {
            let id = new_session_id();
            assert_eq!(id.len(), SESSION_ID_LEN);
            assert!(id.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
        }
    }

    #[test]
    fn test_check_word_solves_once() {
        let mut s = session("CRANE");
        assert!(!s.check_word("SLATE"));
        assert_eq!(s.last_hint(), Some("--A-E"));
        assert!(s.check_word("CRANE"));
        assert_eq!(s.solved_at(), 2);
        assert!(s.check_word("CRANE"));
        assert_eq!(s.solved_at(), 2);
        assert_eq!(s.guesses().len(), 3);
        assert_eq!(s.guesses()[2].to_string(), "CRANE > CRANE");
    }

    #[test]
    fn test_reveal_spoils_unsolved() {
        let mut s = session("CRANE");
        assert_eq!(s.reveal().text(), "CRANE");
        assert!(s.is_spoiled());
        s.check_word("CRANE");
        assert!(s.is_spoiled());
        assert_eq!(s.state(), "SPOILED/SOLVED in 1 guesses!");
    }

    #[test]
    fn test_reveal_after_solve_keeps_clean() {
        let mut s = session("CRANE");
        s.check_word("CRANE");
        s.reveal();
        assert!(!s.is_spoiled());
        assert_eq!(s.summary(), "(0A1B2C3D : alice) SOLVED in 1 guesses!");
    }

    #[test]
    fn test_state_progression() {
        let mut s = session("CRANE");
        assert_eq!(s.state(), "NOT Started!");
        let expected = [
            (1, "GUESSING"),
            (3, "GUESSING"),
            (4, "GUESSING Hard!"),
            (5, "GUESSING Hard!"),
            (6, "GUESSING Too Hard!"),
            (9, "GUESSING Too Hard!"),
            (10, "GUESSING Randomly?"),
        ];
        let mut count = 0;
        for (target, state) in expected {
            while count < target {
                s.check_word("SLATE");
                count += 1;
            }
            assert_eq!(s.state(), state, "after {count} guesses");
        }
    }

    #[test]
    fn test_still_guessing_after_solve() {
        let mut s = session("CRANE");
        s.check_word("SLATE");
        s.check_word("CRANE");
        s.reveal();
        s.check_word("PLANT");
        assert_eq!(s.state(), "Already SOLVED in 2 guesses. Still guessing?");
    }

    #[test]
    fn test_spoiled_summary_mark() {
        let mut s = session("CRANE");
        s.reveal();
        assert_eq!(s.summary(), "(0A1B2C3D ! alice) NOT Started!");
    }

    #[test]
    fn test_orphan_threshold() {
        let s = session("CRANE");
        let t = s.last_activity();
        assert!(!s.is_orphan(t));
        assert!(!s.is_orphan(t + ORPHAN_AFTER - Duration::from_secs(1)));
        assert!(s.is_orphan(t + ORPHAN_AFTER));
        assert!(s.is_orphan(t + ORPHAN_AFTER + Duration::from_secs(1)));
    }

    #[test]
    fn test_order_by_name() {
        let word: Arc<Word> = Arc::new("CRANE,1".parse().unwrap());
        let mut sessions = vec![
            Session::with_id("00000002", "bob", Arc::clone(&word)),
            Session::with_id("00000001", "alice", Arc::clone(&word)),
            Session::with_id("00000000", "bob", word),
        ];
        sessions.sort_by(Session::cmp_by_name);
        let ids: Vec<&str> = sessions.iter().map(Session::id).collect();
        assert_eq!(ids, ["00000001", "00000000", "00000002"]);
    }
}
