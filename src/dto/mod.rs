//! Data shapes passed between the transport and the services.

pub mod message;
pub mod validation;

pub use message::{CommandInvocation, InboundMessage, PhotoRef, Sender};
