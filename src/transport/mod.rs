//! Chat platform seams: where messages come from, where replies go, and how
//! attachments are located.

pub mod telegram;

use futures::{future::BoxFuture, stream::BoxStream};
use thiserror::Error;

use crate::dto::InboundMessage;

/// Failures talking to the chat platform.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("failed to call `{method}`")]
    Request {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },
    /// The platform answered but refused the call.
    #[error("`{method}` rejected: {description}")]
    Rejected {
        method: &'static str,
        description: String,
    },
    /// The platform returned a file without a downloadable path.
    #[error("file `{file_id}` has no download path")]
    MissingFilePath { file_id: String },
}

/// Ordered, effectively endless supply of inbound messages.
pub trait UpdateSource: Send + Sync {
    /// Each item is fully processed before the next is requested.
    fn updates(&self) -> BoxStream<'static, Result<InboundMessage, TransportError>>;
}

/// Delivers reply text to a chat. Failures are reported, never retried.
pub trait ReplySink: Send + Sync {
    /// Send `text` to `chat_id`.
    fn send_reply(&self, chat_id: i64, text: String) -> BoxFuture<'static, Result<(), TransportError>>;
}

/// Turns an attachment identifier into a direct download URL.
pub trait FileResolver: Send + Sync {
    /// Look up where `file_id` can be downloaded from.
    fn resolve_file_url(&self, file_id: &str) -> BoxFuture<'static, Result<String, TransportError>>;
}
