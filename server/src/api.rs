use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use shared::Answer;
use std::str::FromStr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use wordle_core::{Session, ANONYMOUS};

use crate::auth::{check_pwd, ALLOWED_PWD_HASHES};
use crate::error::CommandError;
use crate::registry::Registry;

pub fn router(registry: Arc<Registry>) -> Router {
    Router::new()
        .route("/api", get(api_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(registry)
}

/// Query parameters in request order; lookups return the first value.
#[derive(Debug, Clone, Default)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn require(&self, key: &'static str) -> Result<&str, CommandError> {
        self.get(key).ok_or(CommandError::MissingParam(key))
    }
}

impl From<Vec<(String, String)>> for Params {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    New,
    Close,
    Check,
    Reveal,
    Reset,
    Stats,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "new" => Ok(Self::New),
            "close" => Ok(Self::Close),
            "check" => Ok(Self::Check),
            "reveal" => Ok(Self::Reveal),
            "reset" => Ok(Self::Reset),
            "stats" => Ok(Self::Stats),
            _ => Err(CommandError::UnknownCommand),
        }
    }
}

/// A successful reply and its status: 200, or 203 for a guess that missed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: StatusCode,
    pub answer: Answer,
}

impl Reply {
    fn ok(answer: Answer) -> Self {
        Self {
            status: StatusCode::OK,
            answer,
        }
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        (self.status, Json(self.answer)).into_response()
    }
}

pub async fn api_handler(
    State(registry): State<Arc<Registry>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Reply, CommandError> {
    dispatch(&registry, &Params::from(pairs)).await
}

pub async fn dispatch(registry: &Registry, params: &Params) -> Result<Reply, CommandError> {
    let command: Command = params.require("cmd")?.parse()?;
    tracing::debug!(?command, "Dispatching command");

    match command {
        Command::New => {
            if !registry.is_ready().await {
                return Err(CommandError::NotReady);
            }
            let name = params.get("name").unwrap_or(ANONYMOUS);
            let sid = registry.new_session(name)?;
            Ok(Reply::ok(Answer::msg(sid, "Session created!")))
        }
        Command::Close => {
            let sid = params.require("sid")?;
            if !registry.close_session(sid) {
                return Err(CommandError::InvalidSession);
            }
            Ok(Reply::ok(Answer::msg(sid, "Session closed!")))
        }
        Command::Check => {
            let sid = params.require("sid")?;
            registry.with_session(sid, |session| {
                let word = params.require("word")?.to_uppercase();
                if !registry.is_word_valid(&word) {
                    return Err(CommandError::InvalidWord);
                }
                let solved = session.check_word(&word);
                let hint = session.last_hint().unwrap_or_default().to_string();
                tracing::debug!(session_id = %sid, word = %word, hint = %hint, solved, "Guess checked");
                let status = if solved {
                    StatusCode::OK
                } else {
                    StatusCode::NON_AUTHORITATIVE_INFORMATION
                };
                Ok(Reply {
                    status,
                    answer: Answer::msg_with_word(sid, hint, word),
                })
            })
        }
        Command::Reveal => {
            let sid = params.require("sid")?;
            registry.with_session(sid, |session| {
                let secret = session.reveal().text().to_string();
                tracing::info!(session_id = %sid, "Secret revealed");
                Ok(Reply::ok(Answer::msg_with_word(
                    sid,
                    "Secret revealed!",
                    secret,
                )))
            })
        }
        Command::Reset => reset_and_stats(registry, params, &ALLOWED_PWD_HASHES).await,
        Command::Stats => stats(registry, params).await,
    }
}

/// Clears every session once `pwd` hashes into `allowed`, then answers with
/// the (now empty) stats.
async fn reset_and_stats(
    registry: &Registry,
    params: &Params,
    allowed: &[&str],
) -> Result<Reply, CommandError> {
    check_pwd(params.require("pwd")?, allowed)?;
    registry.reset();
    stats(registry, params).await
}

async fn stats(registry: &Registry, params: &Params) -> Result<Reply, CommandError> {
    match params.get("sid") {
        Some(sid) => registry.with_session(sid, |session| Ok(Reply::ok(session_stats(session)))),
        None => Ok(Reply::ok(registry.stats().await)),
    }
}

fn session_stats(session: &Session) -> Answer {
    Answer::stats(
        session.summary(),
        session.guesses().iter().map(ToString::to_string).collect(),
    )
}
