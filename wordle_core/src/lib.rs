//! Game logic for the wordle session service: dictionary words, hint
//! scoring, and per-player sessions.

pub mod dictionary;
pub mod session;
pub mod word;

pub use dictionary::Dictionary;
pub use session::{Guess, Session, ANONYMOUS, ORPHAN_AFTER, SESSION_ID_LEN};
pub use word::{Word, WordError};
