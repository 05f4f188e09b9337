//! Command parser - recognizes /cnt management messages

/// A parsed counter management command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CntCommand {
    Add { name: String, aliases: Vec<String> },
    Del { key: String },
    List,
    /// `add` without a counter name
    AddUsage,
    /// `del` without exactly one key
    DelUsage,
    /// Missing or unknown sub-command
    Help,
}

/// Tokenizes raw message text and routes the `cnt` command group
pub struct CommandParser {
    prefix: String,
}

impl CommandParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Returns None when the text is not a counter management command.
    /// The leading marker is the configured prefix (or a plain `/`); the
    /// `cnt` route matches case-insensitively.
    pub fn parse(&self, text: &str) -> Option<CntCommand> {
        let mut parts = text.split_whitespace();
        let head = parts.next()?;
        let route = head
            .strip_prefix(self.prefix.as_str())
            .or_else(|| head.strip_prefix('/'))?;
        if route.to_lowercase() != "cnt" {
            return None;
        }

        let sub = match parts.next() {
            Some(sub) => sub.to_lowercase(),
            None => return Some(CntCommand::Help),
        };
        let args: Vec<String> = parts.map(str::to_string).collect();

        let command = match sub.as_str() {
            "add" => match args.split_first() {
                Some((name, aliases)) => CntCommand::Add {
                    name: name.clone(),
                    aliases: aliases.to_vec(),
                },
                None => CntCommand::AddUsage,
            },
            "del" => {
                if args.len() == 1 {
                    CntCommand::Del {
                        key: args[0].clone(),
                    }
                } else {
                    CntCommand::DelUsage
                }
            }
            "list" => CntCommand::List,
            _ => CntCommand::Help,
        };
        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> CommandParser {
        CommandParser::new("/")
    }

    #[test]
    fn add_with_aliases() {
        assert_eq!(
            parser().parse("/cnt add foo bar baz"),
            Some(CntCommand::Add {
                name: "foo".into(),
                aliases: vec!["bar".into(), "baz".into()],
            })
        );
    }

    #[test]
    fn add_without_name_is_usage() {
        assert_eq!(parser().parse("/cnt add"), Some(CntCommand::AddUsage));
    }

    #[test]
    fn del_takes_exactly_one_key() {
        assert_eq!(
            parser().parse("/cnt del foo"),
            Some(CntCommand::Del { key: "foo".into() })
        );
        assert_eq!(parser().parse("/cnt del"), Some(CntCommand::DelUsage));
        assert_eq!(parser().parse("/cnt del a b"), Some(CntCommand::DelUsage));
    }

    #[test]
    fn route_matches_case_insensitively() {
        assert_eq!(parser().parse("/CNT LIST"), Some(CntCommand::List));
        assert_eq!(parser().parse("/Cnt Add x"), Some(CntCommand::Add {
            name: "x".into(),
            aliases: vec![],
        }));
    }

    #[test]
    fn bare_or_unknown_subcommand_is_help() {
        assert_eq!(parser().parse("/cnt"), Some(CntCommand::Help));
        assert_eq!(parser().parse("/cnt frobnicate"), Some(CntCommand::Help));
    }

    #[test]
    fn other_text_is_not_a_command() {
        assert_eq!(parser().parse("hello cnt"), None);
        assert_eq!(parser().parse("/other add foo"), None);
        assert_eq!(parser().parse(""), None);
    }

    #[test]
    fn custom_prefix_is_honored() {
        let parser = CommandParser::new("!");
        assert_eq!(parser.parse("!cnt list"), Some(CntCommand::List));
        // A plain slash keeps working alongside a custom prefix
        assert_eq!(parser.parse("/cnt list"), Some(CntCommand::List));
    }
}
