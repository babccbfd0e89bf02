use std::{sync::Arc, time::Duration};

use futures::{StreamExt, future::BoxFuture, stream::BoxStream};
use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};
use tokio::time::sleep;
use tracing::debug;

use crate::{
    dto::InboundMessage,
    transport::{FileResolver, ReplySink, TransportError, UpdateSource},
};

use super::{
    config::TelegramConfig,
    models::{
        ApiResponse, File, GetFileRequest, GetUpdatesRequest, Message, SendMessageRequest, Update,
    },
};

/// Long-poll timeout passed to `getUpdates`, in seconds.
pub const LONG_POLL_TIMEOUT_SECS: u64 = 60;
/// HTTP timeout, leaving headroom over the long poll.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(LONG_POLL_TIMEOUT_SECS + 15);
/// Fixed wait after a failed poll so an outage does not spin the loop.
const POLL_ERROR_PAUSE: Duration = Duration::from_secs(3);
const ALLOWED_UPDATES: &[&str] = &["message"];

/// Bot API client implementing every transport seam.
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    method_base: Arc<str>,
    file_base: Arc<str>,
    poll_timeout_secs: u64,
}

impl TelegramClient {
    /// Build a client for the configured Bot API server.
    pub fn new(config: &TelegramConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| TransportError::Request {
                method: "client",
                source,
            })?;

        Ok(Self {
            client,
            method_base: Arc::from(config.method_base()),
            file_base: Arc::from(config.file_base()),
            poll_timeout_secs: LONG_POLL_TIMEOUT_SECS,
        })
    }

    /// Invoke a Bot API method and unwrap its response envelope.
    async fn call<Req, Res>(&self, method: &'static str, body: &Req) -> Result<Res, TransportError>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        // the URL embeds the bot token, strip it from errors
        let request_error = |source: reqwest::Error| TransportError::Request {
            method,
            source: source.without_url(),
        };

        let response = self
            .client
            .post(format!("{}/{method}", self.method_base))
            .json(body)
            .send()
            .await
            .map_err(request_error)?;

        let envelope = response
            .json::<ApiResponse<Res>>()
            .await
            .map_err(request_error)?;

        match envelope {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse { description, .. } => Err(TransportError::Rejected {
                method,
                description: description.unwrap_or_else(|| "no description".into()),
            }),
        }
    }

    /// Fetch updates with an id of at least `offset`, confirming everything before it.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TransportError> {
        let request = GetUpdatesRequest {
            offset,
            timeout: self.poll_timeout_secs,
            allowed_updates: ALLOWED_UPDATES,
        };
        self.call("getUpdates", &request).await
    }

    /// Post `text` to `chat_id`.
    pub async fn send_message(&self, chat_id: i64, text: String) -> Result<(), TransportError> {
        let request = SendMessageRequest { chat_id, text };
        let _sent: Message = self.call("sendMessage", &request).await?;
        Ok(())
    }

    /// Resolve a file id into a direct download URL.
    pub async fn file_url(&self, file_id: &str) -> Result<String, TransportError> {
        let file: File = self.call("getFile", &GetFileRequest { file_id }).await?;
        let path = file
            .file_path
            .ok_or_else(|| TransportError::MissingFilePath {
                file_id: file.file_id,
            })?;
        Ok(format!("{}/{path}", self.file_base))
    }
}

impl UpdateSource for TelegramClient {
    fn updates(&self) -> BoxStream<'static, Result<InboundMessage, TransportError>> {
        let client = self.clone();
        async_stream::stream! {
            let mut offset = 0;
            loop {
                match client.get_updates(offset).await {
                    Ok(updates) => {
                        for update in updates {
                            offset = offset.max(update.update_id + 1);
                            match update.message.and_then(Message::into_inbound) {
                                Some(message) => yield Ok(message),
                                None => debug!(update_id = update.update_id, "skipping update without a usable message"),
                            }
                        }
                    }
                    Err(err) => {
                        yield Err(err);
                        sleep(POLL_ERROR_PAUSE).await;
                    }
                }
            }
        }
        .boxed()
    }
}

impl ReplySink for TelegramClient {
    fn send_reply(
        &self,
        chat_id: i64,
        text: String,
    ) -> BoxFuture<'static, Result<(), TransportError>> {
        let client = self.clone();
        Box::pin(async move { client.send_message(chat_id, text).await })
    }
}

impl FileResolver for TelegramClient {
    fn resolve_file_url(&self, file_id: &str) -> BoxFuture<'static, Result<String, TransportError>> {
        let client = self.clone();
        let file_id = file_id.to_string();
        Box::pin(async move { client.file_url(&file_id).await })
    }
}
