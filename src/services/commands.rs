//! Bot commands understood by the dispatcher.

use crate::dto::CommandInvocation;

/// Reply to `/help`.
pub const HELP_TEXT: &str = "Hello, I know the following commands:

  - /listteams - list the current teams
  - /createteam <name> - create a new team
  - /jointeam <name> - join an existing team
  - /leaveteam <name> - leave your current team
  - /me - show your current status
  - /items - list the items we are currently looking for
  - /game - show the current game status
  - /help - show this message

Send me a photo once you are in a team and I will add it to your team's gallery.
";

/// A parsed command. Names match case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/listteams`
    ListTeams,
    /// `/createteam <name>`
    CreateTeam(String),
    /// `/jointeam <name>`
    JoinTeam(String),
    /// `/leaveteam <name>`
    LeaveTeam(String),
    /// `/me`
    Me,
    /// `/game`
    Game,
    /// `/items`
    Items,
    /// `/help`
    Help,
    /// Anything else, keeping the name for logging.
    Unknown(String),
}

impl Command {
    /// Token used in logs.
    pub fn name(&self) -> &str {
        match self {
            Command::ListTeams => "listteams",
            Command::CreateTeam(_) => "createteam",
            Command::JoinTeam(_) => "jointeam",
            Command::LeaveTeam(_) => "leaveteam",
            Command::Me => "me",
            Command::Game => "game",
            Command::Items => "items",
            Command::Help => "help",
            Command::Unknown(name) => name,
        }
    }
}

impl From<&CommandInvocation> for Command {
    fn from(invocation: &CommandInvocation) -> Self {
        let argument = || invocation.arguments.clone();
        match invocation.name.as_str() {
            "listteams" => Command::ListTeams,
            "createteam" => Command::CreateTeam(argument()),
            "jointeam" => Command::JoinTeam(argument()),
            "leaveteam" => Command::LeaveTeam(argument()),
            "me" => Command::Me,
            "game" => Command::Game,
            "items" => Command::Items,
            "help" => Command::Help,
            other => Command::Unknown(other.to_string()),
        }
    }
}
