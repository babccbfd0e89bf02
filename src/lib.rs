//! Library crate for scavenge-bot, exposing modules for the binary and tests.

pub mod config;
pub mod dao;
pub mod dto;
pub mod error;
pub mod services;
pub mod state;
pub mod transport;
