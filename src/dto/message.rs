//! Transport-neutral view of one inbound chat message.

use serde::{Deserialize, Serialize};

/// A message as seen by the dispatcher, independent of the chat platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Chat the reply goes back to.
    pub chat_id: i64,
    /// Who wrote the message.
    pub sender: Sender,
    /// One-to-one conversation with the bot, as opposed to a group.
    pub private: bool,
    /// Present when the message starts with a bot command.
    pub command: Option<CommandInvocation>,
    /// Attached photo sizes, smallest first.
    pub photos: Vec<PhotoRef>,
}

/// Author of an inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    /// Platform user id, stable for the account's lifetime.
    pub id: i64,
    /// Platform handle; `None` when the user has not set one.
    pub username: Option<String>,
    /// Display name.
    pub first_name: String,
}

/// A `/command arguments` line split into its two parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandInvocation {
    /// Command token without the leading slash or any `@botname` suffix.
    pub name: String,
    /// Rest of the line, trimmed. Empty when no argument was given.
    pub arguments: String,
}

/// One resolution of an attached photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRef {
    /// Identifier used to download the file; also names the archived copy.
    pub file_id: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CommandInvocation {
    /// Split `text` into a command and its arguments.
    ///
    /// Returns `None` unless `text` starts with `/` followed by a non-empty token.
    pub fn parse(text: &str) -> Option<Self> {
        let rest = text.strip_prefix('/')?;
        let (token, arguments) = match rest.find(char::is_whitespace) {
            Some(idx) => (&rest[..idx], rest[idx..].trim()),
            None => (rest, ""),
        };
        let name = token.split_once('@').map_or(token, |(name, _bot)| name);
        if name.is_empty() {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            arguments: arguments.to_string(),
        })
    }
}

impl InboundMessage {
    /// Whether the message opens with a bot command.
    pub fn is_command(&self) -> bool {
        self.command.is_some()
    }

    /// The highest resolution attachment, which the platform sends last.
    pub fn largest_photo(&self) -> Option<&PhotoRef> {
        self.photos.last()
    }
}
