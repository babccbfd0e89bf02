//! Sequential message loop wrapping every inbound message in one transaction.
//!
//! Each message ends in exactly one terminal action: commit (and maybe reply), or
//! roll back and send a single diagnostic reply. A failed `begin` drops the message.

use std::sync::Arc;

use futures::{StreamExt, stream::BoxStream};
use time::OffsetDateTime;
use tracing::{debug, error, info, warn};

use crate::{
    dao::hunt_store::HuntStore,
    dto::InboundMessage,
    error::ServiceError,
    services::{
        dispatcher::{self, DispatchContext},
        photo_service::PhotoSink,
    },
    state::{AdminList, Game},
    transport::{ReplySink, TransportError},
};

/// Terminal action taken for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No transaction could be opened; nothing was done and nothing is sent.
    Skipped,
    /// Changes are durable. `reply` is `None` when there is nothing to say.
    Committed { reply: Option<String> },
    /// Changes were discarded; `reply` explains the failure to the user.
    Failed { reply: String },
}

impl Outcome {
    /// Text to send back to the chat, if any.
    pub fn reply(&self) -> Option<&str> {
        match self {
            Outcome::Skipped => None,
            Outcome::Committed { reply } => reply.as_deref(),
            Outcome::Failed { reply } => Some(reply),
        }
    }
}

/// Run one message through the dispatcher inside its own transaction.
pub fn process_message(
    store: &mut dyn HuntStore,
    message: &InboundMessage,
    ctx: &DispatchContext<'_>,
) -> Outcome {
    let tx = match store.begin() {
        Ok(tx) => tx,
        Err(err) => {
            error!(chat_id = message.chat_id, error = %err, "failed to begin transaction; dropping message");
            return Outcome::Skipped;
        }
    };

    match dispatcher::handle(tx.as_ref(), message, ctx) {
        Ok(reply) => match tx.commit() {
            Ok(()) => Outcome::Committed {
                reply: Some(reply).filter(|text| !text.is_empty()),
            },
            Err(err) => {
                let err = ServiceError::from(err);
                error!(chat_id = message.chat_id, error = %err.diagnostic(), "failed to commit transaction");
                Outcome::Failed {
                    reply: apology(&err),
                }
            }
        },
        Err(err) => {
            error!(
                chat_id = message.chat_id,
                user_id = message.sender.id,
                error = %err.diagnostic(),
                "unexpected error while handling message; rolling back"
            );
            if let Err(rollback_err) = tx.rollback() {
                warn!(error = %rollback_err, "rollback failed");
            }
            Outcome::Failed {
                reply: apology(&err),
            }
        }
    }
}

fn apology(err: &ServiceError) -> String {
    format!(
        "I'm sorry, I encountered an unexpected error. Please tell the organisers about this: {}",
        err.diagnostic()
    )
}

/// Owns everything the message loop needs.
pub struct Orchestrator {
    store: Box<dyn HuntStore>,
    admins: AdminList,
    game: Game,
    photos: Arc<dyn PhotoSink>,
    replies: Arc<dyn ReplySink>,
    clock: fn() -> OffsetDateTime,
}

impl Orchestrator {
    /// Assemble a loop reading the wall clock.
    pub fn new(
        store: Box<dyn HuntStore>,
        admins: AdminList,
        game: Game,
        photos: Arc<dyn PhotoSink>,
        replies: Arc<dyn ReplySink>,
    ) -> Self {
        Self {
            store,
            admins,
            game,
            photos,
            replies,
            clock: OffsetDateTime::now_utc,
        }
    }

    /// Replace the wall clock, mostly for tests.
    pub fn with_clock(mut self, clock: fn() -> OffsetDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// Consume `updates` one message at a time until the stream ends.
    pub async fn run(
        &mut self,
        mut updates: BoxStream<'static, Result<InboundMessage, TransportError>>,
    ) {
        info!(game = %self.game.title, "message loop started");

        while let Some(update) = updates.next().await {
            let message = match update {
                Ok(message) => message,
                Err(err) => {
                    warn!(error = %err, "failed to receive updates");
                    continue;
                }
            };

            let outcome = self.process(&message);
            debug!(chat_id = message.chat_id, outcome = ?outcome, "message processed");

            if let Some(text) = outcome.reply() {
                if let Err(err) = self
                    .replies
                    .send_reply(message.chat_id, text.to_string())
                    .await
                {
                    warn!(chat_id = message.chat_id, error = %err, "failed to send reply");
                }
            }
        }

        info!("update stream ended; message loop stopped");
    }

    /// Handle one message synchronously; the transaction is closed on return.
    pub fn process(&mut self, message: &InboundMessage) -> Outcome {
        let ctx = DispatchContext {
            admins: &self.admins,
            game: &self.game,
            photos: self.photos.as_ref(),
            now: (self.clock)(),
        };
        process_message(self.store.as_mut(), message, &ctx)
    }
}
