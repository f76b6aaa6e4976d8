//! # Command Parsing
//!
//! Splits a chat message into a command name and its arguments.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub name: String,
    pub args: Vec<String>,
}

/// `None` when the text does not start with `prefix` or has nothing after it.
pub fn parse_command(prefix: &str, raw_text: &str) -> Option<ParsedCommand> {
    let rest = raw_text.strip_prefix(prefix)?;
    let mut tokens = rest.split_whitespace();
    let name = tokens.next()?.to_string();
    let args = tokens.map(str::to_string).collect();
    Some(ParsedCommand { name, args })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_and_args() {
        let parsed = parse_command("!", "!echo  hello   world").unwrap();
        assert_eq!(parsed.name, "echo");
        assert_eq!(parsed.args, vec!["hello", "world"]);
    }

    #[test]
    fn test_no_args() {
        let parsed = parse_command("!", "!home").unwrap();
        assert_eq!(parsed.name, "home");
        assert!(parsed.args.is_empty());
    }

    #[test]
    fn test_requires_prefix_at_start() {
        assert!(parse_command("!", "home").is_none());
        assert!(parse_command("!", " !home").is_none());
        assert!(parse_command("!", "say !home").is_none());
    }

    #[test]
    fn test_bare_prefix_is_not_a_command() {
        assert!(parse_command("!", "!").is_none());
        assert!(parse_command("!", "!   ").is_none());
    }

    #[test]
    fn test_multi_char_prefix() {
        let parsed = parse_command("bot:", "bot: reload now").unwrap();
        assert_eq!(parsed.name, "reload");
        assert_eq!(parsed.args, vec!["now"]);
    }
}
