/// What a line typed at the chat prompt asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Clear,
    Quit,
    Suggestions,
    /// Activate the numbered suggestion (1-based).
    Suggestion(usize),
    Unknown(String),
    /// Anything else is sent to the server as typed.
    Message(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(name) = trimmed.strip_prefix('/') else {
            return Command::Message(trimmed.to_string());
        };

        match name {
            "help" | "?" => Command::Help,
            "clear" => Command::Clear,
            "quit" | "exit" => Command::Quit,
            "suggestions" => Command::Suggestions,
            _ => match name.parse::<usize>() {
                Ok(number) if number > 0 => Command::Suggestion(number),
                _ => Command::Unknown(trimmed.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_slash_commands() {
        assert_eq!(Command::parse("/help"), Command::Help);
        assert_eq!(Command::parse("  /clear "), Command::Clear);
        assert_eq!(Command::parse("/exit"), Command::Quit);
        assert_eq!(Command::parse("/suggestions"), Command::Suggestions);
        assert_eq!(Command::parse("/2"), Command::Suggestion(2));
    }

    #[test]
    fn rejects_unknown_commands() {
        assert_eq!(Command::parse("/0"), Command::Unknown("/0".to_string()));
        assert_eq!(Command::parse("/fire"), Command::Unknown("/fire".to_string()));
    }

    #[test]
    fn plain_text_is_a_trimmed_message() {
        assert_eq!(
            Command::parse("  Where is the eyewash station?\n"),
            Command::Message("Where is the eyewash station?".to_string())
        );
        assert_eq!(Command::parse("   "), Command::Message(String::new()));
    }
}
