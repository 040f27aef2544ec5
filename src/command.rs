// Command parsing: turns one line of user input into a `Command`.
// Parsing is pure; dispatching lives in `ui`.

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Help,
    /// `auth [token]`. `None` means the shell must prompt for the token.
    SetAuth(Option<String>),
    Status,
    /// `ask <words...>`. An empty question is a usage error.
    Ask(String),
    /// Any line whose first word is not a command.
    FreeText(String),
}

impl Command {
    /// Parse a raw input line. Returns `None` for blank lines.
    ///
    /// Commands are matched case-sensitively on the first whitespace
    /// delimited word. `ask` re-joins its arguments with single spaces;
    /// free text keeps the trimmed line as typed.
    pub fn parse(line: &str) -> Option<Command> {
        let input = line.trim();
        let mut words = input.split_whitespace();
        let first = words.next()?;

        let cmd = match first {
            "exit" | "quit" => Command::Exit,
            "help" => Command::Help,
            "status" => Command::Status,
            "auth" => Command::SetAuth(words.next().map(str::to_string)),
            "ask" => Command::Ask(words.collect::<Vec<_>>().join(" ")),
            _ => Command::FreeText(input.to_string()),
        };
        Some(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("   \t  "), None);
        assert_eq!(Command::parse("\n"), None);
    }

    #[test]
    fn known_commands() {
        assert_eq!(Command::parse("exit"), Some(Command::Exit));
        assert_eq!(Command::parse("quit"), Some(Command::Exit));
        assert_eq!(Command::parse("  help  "), Some(Command::Help));
        assert_eq!(Command::parse("status"), Some(Command::Status));
    }

    #[test]
    fn commands_are_case_sensitive() {
        assert_eq!(
            Command::parse("EXIT"),
            Some(Command::FreeText("EXIT".into()))
        );
        assert_eq!(
            Command::parse("Help me"),
            Some(Command::FreeText("Help me".into()))
        );
    }

    #[test]
    fn auth_takes_second_field_only() {
        assert_eq!(Command::parse("auth"), Some(Command::SetAuth(None)));
        assert_eq!(
            Command::parse("auth pplx-123 extra words"),
            Some(Command::SetAuth(Some("pplx-123".into())))
        );
    }

    #[test]
    fn ask_collapses_whitespace() {
        assert_eq!(
            Command::parse("ask   what  is\tthe capital"),
            Some(Command::Ask("what is the capital".into()))
        );
        assert_eq!(Command::parse("ask"), Some(Command::Ask(String::new())));
        assert_eq!(Command::parse("ask    "), Some(Command::Ask(String::new())));
    }

    #[test]
    fn free_text_keeps_internal_spacing() {
        assert_eq!(
            Command::parse("  what is   the capital of France  "),
            Some(Command::FreeText("what is   the capital of France".into()))
        );
    }

    #[test]
    fn command_word_must_stand_alone() {
        assert_eq!(
            Command::parse("asking about rust"),
            Some(Command::FreeText("asking about rust".into()))
        );
    }
}
