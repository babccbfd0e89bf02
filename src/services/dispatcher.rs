//! Per-message command handling. Every function here runs inside the caller's
//! transaction and only ever returns an error for unexpected failures; the
//! orchestrator rolls back on error and commits otherwise.

use std::fmt::Write as _;

use time::OffsetDateTime;
use tracing::{debug, info};

use crate::{
    dao::{
        hunt_store::HuntTransaction,
        models::{NewTeam, TeamEntity, UserEntity},
    },
    dto::{
        InboundMessage, Sender,
        validation::{validate_team_name, validate_team_name_present},
    },
    error::ServiceError,
    services::{
        commands::{Command, HELP_TEXT},
        humanize::relative_time,
        photo_service::{PhotoSink, PhotoSubmission},
    },
    state::{AdminList, Game, GameStatus},
};

const NO_TEAMS: &str = "There are currently no registered teams";
const UNKNOWN_COMMAND: &str =
    "I'm afraid I don't know that command, please type /help to see a list of available commands";
const ITEMS_LOCKED: &str =
    "The game has not yet started so I can't tell you the items we are looking for yet!";
const PHOTO_WITHOUT_TEAM: &str = "You are not in a team, so I can't save photos for you";

/// Read-only inputs shared by every message, passed explicitly so the handler has no
/// hidden state.
#[derive(Clone, Copy)]
pub struct DispatchContext<'a> {
    /// Usernames promoted to admin on registration.
    pub admins: &'a AdminList,
    /// The hunt being played.
    pub game: &'a Game,
    /// Receives photo handoffs; never blocks and never fails.
    pub photos: &'a dyn PhotoSink,
    /// Wall-clock time the message is handled at.
    pub now: OffsetDateTime,
}

/// Handle one inbound message and produce the reply text (empty for no reply).
pub fn handle(
    tx: &dyn HuntTransaction,
    message: &InboundMessage,
    ctx: &DispatchContext<'_>,
) -> Result<String, ServiceError> {
    let existing = tx.get_user(message.sender.id)?;

    // group chatter that is not addressed to the bot
    if !message.private && !message.is_command() {
        return Ok(String::new());
    }

    let mut user = match existing {
        Some(user) => user,
        None => register_user(tx, &message.sender, ctx.admins)?,
    };

    let mut reply = match &message.command {
        Some(invocation) => {
            let command = Command::from(invocation);
            debug!(user_id = user.id, command = command.name(), "dispatching command");
            run_command(tx, &mut user, command, ctx)?
        }
        None => String::new(),
    };

    if let Some(photo) = message.largest_photo() {
        match user.team_id {
            Some(team_id) => ctx.photos.submit(PhotoSubmission {
                photo: photo.clone(),
                team_id,
                game_title: ctx.game.title.clone(),
            }),
            None => reply = PHOTO_WITHOUT_TEAM.into(),
        }
    }

    Ok(reply)
}

fn register_user(
    tx: &dyn HuntTransaction,
    sender: &Sender,
    admins: &AdminList,
) -> Result<UserEntity, ServiceError> {
    let user_name = sender
        .username
        .as_deref()
        .filter(|name| !name.is_empty())
        .map(str::to_string);

    let user = UserEntity {
        id: sender.id,
        admin: admins.contains(user_name.as_deref()),
        user_name,
        first_name: sender.first_name.clone(),
        team_id: None,
    };
    tx.save_user(&user)?;

    info!(user_id = user.id, admin = user.admin, "registered new user");
    Ok(user)
}

fn run_command(
    tx: &dyn HuntTransaction,
    user: &mut UserEntity,
    command: Command,
    ctx: &DispatchContext<'_>,
) -> Result<String, ServiceError> {
    match command {
        Command::ListTeams => list_teams(tx),
        Command::CreateTeam(name) => create_team(tx, name),
        Command::JoinTeam(name) => join_team(tx, user, &name),
        Command::LeaveTeam(name) => leave_team(tx, user, &name),
        Command::Me => describe_user(tx, user),
        Command::Game => Ok(game_status(ctx.game, ctx.now)),
        Command::Items => Ok(game_items(ctx.game, ctx.now)),
        Command::Help => Ok(HELP_TEXT.into()),
        Command::Unknown(_) => Ok(UNKNOWN_COMMAND.into()),
    }
}

fn list_teams(tx: &dyn HuntTransaction) -> Result<String, ServiceError> {
    let teams = tx.list_teams()?;
    if teams.is_empty() {
        return Ok(NO_TEAMS.into());
    }

    let mut text = String::from("Available teams:\n\n");
    push_bullets(&mut text, teams.iter().map(|team| team.name.as_str()));
    Ok(text)
}

fn create_team(tx: &dyn HuntTransaction, name: String) -> Result<String, ServiceError> {
    if let Err(err) = validate_team_name(&name) {
        return Ok(validation_reply(err));
    }

    let team = tx.create_team(NewTeam { name })?;
    info!(team_id = team.id, team = %team.name, "team created");
    Ok(format!("Team '{}' successfully created!", team.name))
}

fn join_team(
    tx: &dyn HuntTransaction,
    user: &mut UserEntity,
    name: &str,
) -> Result<String, ServiceError> {
    let team = match find_team(tx, name)? {
        Ok(team) => team,
        Err(reply) => return Ok(reply),
    };

    user.team_id = Some(team.id);
    tx.save_user(user)?;

    info!(user_id = user.id, team_id = team.id, "user joined team");
    Ok(format!("You have now joined the team: {}", team.name))
}

fn leave_team(
    tx: &dyn HuntTransaction,
    user: &mut UserEntity,
    name: &str,
) -> Result<String, ServiceError> {
    let team = match find_team(tx, name)? {
        Ok(team) => team,
        Err(reply) => return Ok(reply),
    };

    if !user.is_member_of(&team) {
        return Ok(format!(
            "You are not currently in the team '{name}' so you cannot leave them!"
        ));
    }

    user.team_id = None;
    tx.save_user(user)?;

    info!(user_id = user.id, team_id = team.id, "user left team");
    Ok(format!("You have now left the team: {}", team.name))
}

/// Resolve a team named in a command argument. The inner `Err` is the reply to send
/// when the argument is missing or names no team.
fn find_team(
    tx: &dyn HuntTransaction,
    name: &str,
) -> Result<Result<TeamEntity, String>, ServiceError> {
    if let Err(err) = validate_team_name_present(name) {
        return Ok(Err(validation_reply(err)));
    }

    match tx.get_team_by_name(name)? {
        Some(team) => Ok(Ok(team)),
        None => Ok(Err(format!(
            "I'm sorry, I can't find a team with the name '{name}', please check and tell me again"
        ))),
    }
}

fn describe_user(tx: &dyn HuntTransaction, user: &UserEntity) -> Result<String, ServiceError> {
    let mut text = format!("Your name is: {}\n", user.first_name);

    match user.team_id {
        Some(team_id) => {
            let team = tx.get_team_by_id(team_id)?.ok_or_else(|| {
                ServiceError::Integrity(format!(
                    "user {} references missing team {team_id}",
                    user.id
                ))
            })?;
            text.push_str("You are currently in team: ");
            text.push_str(&team.name);
        }
        None => text.push_str("You are not currently in any team"),
    }

    Ok(text)
}

fn game_status(game: &Game, now: OffsetDateTime) -> String {
    match game.status_at(now) {
        GameStatus::NotStarted => format!(
            "The game '{}' has not yet started, and is due to begin {}",
            game.title,
            relative_time(game.start, now)
        ),
        GameStatus::InProgress => format!(
            "The game '{}' is currently underway and is due to finish {}",
            game.title,
            relative_time(game.end(), now)
        ),
        GameStatus::Finished => format!("The game '{}' has already finished", game.title),
    }
}

fn game_items(game: &Game, now: OffsetDateTime) -> String {
    if game.status_at(now) != GameStatus::InProgress {
        return ITEMS_LOCKED.into();
    }

    let mut text = String::from("The game is afoot! The items you are looking for are:\n\n");
    push_bullets(&mut text, game.items.iter().map(String::as_str));

    if !game.bonuses.is_empty() {
        text.push_str("\n\nThere are also the following bonus items to be found:\n\n");
        push_bullets(&mut text, game.bonuses.iter().map(String::as_str));
    }

    text
}

fn push_bullets<'a>(text: &mut String, entries: impl Iterator<Item = &'a str>) {
    for entry in entries {
        let _ = writeln!(text, " - {entry}");
    }
}

fn validation_reply(err: validator::ValidationError) -> String {
    err.message
        .map(|message| message.into_owned())
        .unwrap_or_else(|| err.code.into_owned())
}
