//! Subset of the Telegram Bot API wire format used by the bot.

use serde::{Deserialize, Serialize};

use crate::dto::{CommandInvocation, InboundMessage, PhotoRef, Sender};

const PRIVATE_CHAT: &str = "private";
const BOT_COMMAND: &str = "bot_command";

/// Envelope wrapping every Bot API response.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub entities: Vec<MessageEntity>,
    #[serde(default)]
    pub photo: Vec<PhotoSize>,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageEntity {
    #[serde(rename = "type")]
    pub kind: String,
    pub offset: usize,
    pub length: usize,
}

#[derive(Debug, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize)]
pub struct File {
    pub file_id: String,
    #[serde(default)]
    pub file_path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GetUpdatesRequest {
    pub offset: i64,
    pub timeout: u64,
    pub allowed_updates: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct SendMessageRequest {
    pub chat_id: i64,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct GetFileRequest<'a> {
    pub file_id: &'a str,
}

impl Message {
    /// A message is a command when it opens with a `bot_command` entity.
    pub fn is_command(&self) -> bool {
        self.entities
            .first()
            .is_some_and(|entity| entity.kind == BOT_COMMAND && entity.offset == 0)
    }

    /// Convert into the transport-neutral form. Messages without an author
    /// (channel posts) are dropped.
    pub fn into_inbound(self) -> Option<InboundMessage> {
        let command = if self.is_command() {
            self.text.as_deref().and_then(CommandInvocation::parse)
        } else {
            None
        };
        let from = self.from?;

        Some(InboundMessage {
            chat_id: self.chat.id,
            sender: Sender {
                id: from.id,
                username: from.username.filter(|name| !name.is_empty()),
                first_name: from.first_name,
            },
            private: self.chat.kind == PRIVATE_CHAT,
            command,
            photos: self.photo.into_iter().map(Into::into).collect(),
        })
    }
}

impl From<PhotoSize> for PhotoRef {
    fn from(value: PhotoSize) -> Self {
        Self {
            file_id: value.file_id,
            width: value.width,
            height: value.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn decode(value: serde_json::Value) -> Vec<Update> {
        let response: ApiResponse<Vec<Update>> = serde_json::from_value(value).unwrap();
        assert!(response.ok);
        response.result.unwrap()
    }

    #[test]
    fn private_command_is_converted() {
        let updates = decode(json!({
            "ok": true,
            "result": [{
                "update_id": 10,
                "message": {
                    "message_id": 1,
                    "from": {"id": 42, "is_bot": false, "first_name": "Sam", "username": "sam"},
                    "chat": {"id": 42, "type": "private", "first_name": "Sam"},
                    "date": 1714564800,
                    "text": "/jointeam@scavenge_bot Foxes",
                    "entities": [{"type": "bot_command", "offset": 0, "length": 22}]
                }
            }]
        }));

        let message = updates
            .into_iter()
            .next()
            .and_then(|update| update.message)
            .and_then(Message::into_inbound)
            .unwrap();

        assert_eq!(message.chat_id, 42);
        assert!(message.private);
        assert_eq!(message.sender.username.as_deref(), Some("sam"));
        assert_eq!(
            message.command,
            Some(CommandInvocation {
                name: "jointeam".into(),
                arguments: "Foxes".into(),
            })
        );
    }

    #[test]
    fn slash_text_without_entity_is_not_a_command() {
        let updates = decode(json!({
            "ok": true,
            "result": [{
                "update_id": 11,
                "message": {
                    "message_id": 2,
                    "from": {"id": 7, "is_bot": false, "first_name": "Kim"},
                    "chat": {"id": -100, "type": "supergroup", "title": "Hunters"},
                    "date": 1714564800,
                    "text": "a /me in the middle",
                    "entities": [{"type": "bot_command", "offset": 2, "length": 3}]
                }
            }]
        }));

        let message = updates
            .into_iter()
            .next()
            .and_then(|update| update.message)
            .and_then(Message::into_inbound)
            .unwrap();

        assert!(!message.private);
        assert_eq!(message.command, None);
        assert_eq!(message.sender.username, None);
    }

    #[test]
    fn photos_keep_platform_order() {
        let updates = decode(json!({
            "ok": true,
            "result": [{
                "update_id": 12,
                "message": {
                    "message_id": 3,
                    "from": {"id": 7, "is_bot": false, "first_name": "Kim", "username": "kim"},
                    "chat": {"id": 7, "type": "private"},
                    "date": 1714564800,
                    "photo": [
                        {"file_id": "s", "file_unique_id": "us", "width": 90, "height": 67, "file_size": 1200},
                        {"file_id": "l", "file_unique_id": "ul", "width": 1280, "height": 960}
                    ]
                }
            }]
        }));

        let message = updates
            .into_iter()
            .next()
            .and_then(|update| update.message)
            .and_then(Message::into_inbound)
            .unwrap();

        assert_eq!(message.photos.len(), 2);
        let largest = message.largest_photo().unwrap();
        assert_eq!(largest.file_id, "l");
        assert_eq!((largest.width, largest.height), (1280, 960));
        assert_eq!(message.command, None);
    }

    #[test]
    fn updates_without_messages_are_tolerated() {
        let updates = decode(json!({
            "ok": true,
            "result": [{"update_id": 13, "edited_message": {"message_id": 4}}]
        }));
        assert_eq!(updates[0].update_id, 13);
        assert!(updates[0].message.is_none());
    }

    #[test]
    fn error_envelope_carries_description() {
        let response: ApiResponse<Vec<Update>> = serde_json::from_value(json!({
            "ok": false,
            "error_code": 401,
            "description": "Unauthorized"
        }))
        .unwrap();
        assert!(!response.ok);
        assert!(response.result.is_none());
        assert_eq!(response.description.as_deref(), Some("Unauthorized"));
    }
}
