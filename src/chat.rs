//! Transport-neutral chat events and render requests.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Conversation key; one session per chat.
pub type ChatId = i64;

/// An inbound event from the chat front end.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// `/name args...`; `args` is the raw text after the command.
    Command {
        name: String,
        #[serde(default)]
        args: String,
    },
    /// Press of a selectable action, carrying its opaque id.
    Button { data: String },
    /// A free-text message.
    Text { text: String },
}

impl Event {
    pub fn command(name: impl Into<String>, args: impl Into<String>) -> Self {
        Event::Command {
            name: name.into(),
            args: args.into(),
        }
    }

    pub fn button(data: impl Into<String>) -> Self {
        Event::Button { data: data.into() }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Event::Text { text: text.into() }
    }
}

/// A selectable action shown under a reply.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub label: String,
    pub id: String,
}

impl Action {
    pub fn new(label: impl Into<String>, id: impl fmt::Display) -> Self {
        Self {
            label: label.into(),
            id: id.to_string(),
        }
    }
}

/// Outbound render request: text plus optional actions.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            actions: Vec::new(),
        }
    }

    pub fn with_actions(text: impl Into<String>, actions: Vec<Action>) -> Self {
        Self {
            text: text.into(),
            actions,
        }
    }
}

/// Typed view of a button id. Payloads stay raw so the receiver decides
/// whether they are valid.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ButtonId {
    Size(String),
    Players(String),
    Match(String),
    View(String),
    Delete(String),
    BackToHistory,
    NewTournament,
    RetrySave,
    Unknown(String),
}

impl ButtonId {
    pub fn parse(data: &str) -> Self {
        match data {
            "back_to_history" => return ButtonId::BackToHistory,
            "new_tournament" => return ButtonId::NewTournament,
            "retry_save" => return ButtonId::RetrySave,
            _ => {}
        }
        let Some((kind, payload)) = data.split_once('_') else {
            return ButtonId::Unknown(data.to_string());
        };
        let payload = payload.to_string();
        match kind {
            "size" => ButtonId::Size(payload),
            "players" => ButtonId::Players(payload),
            "match" => ButtonId::Match(payload),
            "view" => ButtonId::View(payload),
            "delete" => ButtonId::Delete(payload),
            _ => ButtonId::Unknown(data.to_string()),
        }
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ButtonId::Size(n) => write!(f, "size_{}", n),
            ButtonId::Players(n) => write!(f, "players_{}", n),
            ButtonId::Match(idx) => write!(f, "match_{}", idx),
            ButtonId::View(id) => write!(f, "view_{}", id),
            ButtonId::Delete(id) => write!(f, "delete_{}", id),
            ButtonId::BackToHistory => write!(f, "back_to_history"),
            ButtonId::NewTournament => write!(f, "new_tournament"),
            ButtonId::RetrySave => write!(f, "retry_save"),
            ButtonId::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}
