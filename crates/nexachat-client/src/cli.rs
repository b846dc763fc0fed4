//! Command line and input line parsing for the terminal client.

/// Join a NexaChat room from the terminal.
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "nexachat", version)]
pub struct Cli {
    /// Path to a YAML config file. Built-in defaults apply when absent.
    #[arg(long, env = "NEXACHAT_CONFIG")]
    pub config: Option<String>,

    /// Room to join. A fresh 5-digit room is generated when absent or blank.
    #[arg(long)]
    pub room: Option<String>,

    /// Name to commit as soon as the room is open.
    #[arg(long)]
    pub name: Option<String>,

    /// Relay endpoint, overriding `client.endpoint`.
    #[arg(long, env = "NEXACHAT_ENDPOINT")]
    pub endpoint: Option<String>,
}

/// One line typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLine {
    Name(String),
    Share,
    Leave,
    Help,
    Say(String),
    Unknown(String),
}

pub const HELP: &str = "\
/name <name>  choose your name (once)
/share        print the link to this room
/leave        leave the room (also Ctrl-C)
/help         show this help
anything else is sent as a message";

pub fn parse_line(line: &str) -> InputLine {
    let Some(cmd) = line.trim_start().strip_prefix('/') else {
        return InputLine::Say(line.to_string());
    };
    let (head, rest) = cmd.split_once(char::is_whitespace).unwrap_or((cmd, ""));
    match head {
        "name" => InputLine::Name(rest.to_string()),
        "share" => InputLine::Share,
        "leave" | "quit" => InputLine::Leave,
        "help" => InputLine::Help,
        other => InputLine::Unknown(other.to_string()),
    }
}
