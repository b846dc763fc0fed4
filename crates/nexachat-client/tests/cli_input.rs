#![allow(clippy::unwrap_used)]

use clap::Parser;

use nexachat_client::cli::{parse_line, Cli, InputLine};

#[test]
fn plain_text_is_a_message() {
    assert_eq!(parse_line("hello there"), InputLine::Say("hello there".into()));
    assert_eq!(parse_line("  "), InputLine::Say("  ".into()));
}

#[test]
fn slash_commands() {
    assert_eq!(parse_line("/name  Ann "), InputLine::Name(" Ann ".into()));
    assert_eq!(parse_line("/name"), InputLine::Name(String::new()));
    assert_eq!(parse_line("/share"), InputLine::Share);
    assert_eq!(parse_line("/leave"), InputLine::Leave);
    assert_eq!(parse_line("/quit"), InputLine::Leave);
    assert_eq!(parse_line(" /help"), InputLine::Help);
    assert_eq!(parse_line("/dance now"), InputLine::Unknown("dance".into()));
}

#[test]
fn cli_flags() {
    let cli = Cli::try_parse_from(["nexachat", "--room", "42000", "--name", "Ann"]).unwrap();
    assert_eq!(cli.room.as_deref(), Some("42000"));
    assert_eq!(cli.name.as_deref(), Some("Ann"));
}
