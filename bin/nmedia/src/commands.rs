//! Line commands understood by the terminal front-end.

use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Load,
    Like(i64),
    Unlike(i64),
    Remove(i64),
    /// Start editing an existing post.
    Edit(i64),
    /// Drop the current draft and start a new post.
    New,
    Content(String),
    Save,
    Show,
    Offline,
    Online,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}`, try `help`")]
    Unknown(String),
    #[error("`{0}` needs a post id")]
    MissingId(&'static str),
    #[error("`{0}` is not a post id")]
    BadId(String),
}

pub const HELP: &str = "\
commands:
  load              refresh the feed
  like <id>         like a post
  unlike <id>       take a like back
  remove <id>       delete a post
  edit <id>         edit a post from the feed
  new               start a new post
  content <text>    set the draft text
  save              send the draft
  show              print the feed and the draft
  offline | online  toggle the repository
  quit";

fn id(name: &'static str, arg: &str) -> Result<i64, ParseError> {
    if arg.is_empty() {
        return Err(ParseError::MissingId(name));
    }
    arg.parse().map_err(|_| ParseError::BadId(arg.to_string()))
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_start();
        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let arg = rest.trim();
        match name {
            "" => Err(ParseError::Empty),
            "load" => Ok(Command::Load),
            "like" => id("like", arg).map(Command::Like),
            "unlike" => id("unlike", arg).map(Command::Unlike),
            "remove" => id("remove", arg).map(Command::Remove),
            "edit" => id("edit", arg).map(Command::Edit),
            "new" => Ok(Command::New),
            // Untrimmed on purpose: trimming belongs to the controller.
            "content" => Ok(Command::Content(rest.to_string())),
            "save" => Ok(Command::Save),
            "show" => Ok(Command::Show),
            "offline" => Ok(Command::Offline),
            "online" => Ok(Command::Online),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(ParseError::Unknown(other.to_string())),
        }
    }
}
