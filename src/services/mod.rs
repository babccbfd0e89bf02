//! Bot behaviour: command handling, the transactional loop, and photo archiving.

/// Bot command parsing and help text.
pub mod commands;
/// Per-message state transitions over users and teams.
pub mod dispatcher;
/// Relative time phrases for game announcements.
pub mod humanize;
/// Transactional message loop.
pub mod orchestrator;
/// Background photo archiving.
pub mod photo_service;
