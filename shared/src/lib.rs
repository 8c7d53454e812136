use serde::{Deserialize, Serialize};

/// A reply of the wordle `/api` endpoint.
///
/// Every variant serializes as a flat json object; the underscore-prefixed
/// field names are what clients read. Absent optional fields are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Msg {
        #[serde(rename = "_sid")]
        sid: String,
        #[serde(rename = "_word", default, skip_serializing_if = "Option::is_none")]
        word: Option<String>,
        #[serde(rename = "_message")]
        message: String,
    },
    Stats {
        #[serde(rename = "_state")]
        state: String,
        #[serde(rename = "_count")]
        count: usize,
        #[serde(rename = "_sessions")]
        sessions: Vec<String>,
    },
    Err {
        #[serde(rename = "_error")]
        error: String,
    },
}

impl Answer {
    pub fn msg(sid: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Msg {
            sid: sid.into(),
            word: None,
            message: message.into(),
        }
    }

    pub fn msg_with_word(
        sid: impl Into<String>,
        message: impl Into<String>,
        word: impl Into<String>,
    ) -> Self {
        Self::Msg {
            sid: sid.into(),
            word: Some(word.into()),
            message: message.into(),
        }
    }

    /// Stats reply; `count` always matches the listed sessions.
    pub fn stats(state: impl Into<String>, sessions: Vec<String>) -> Self {
        Self::Stats {
            state: state.into(),
            count: sessions.len(),
            sessions,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self::Err {
            error: error.into(),
        }
    }
}
