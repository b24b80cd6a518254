//! Prefixed text commands.

/// A parsed command, with arguments already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `afk [status…]`
    Afk { status: Option<String> },
    /// `lock|l [#channel]`; `target` is a channel id.
    Lock { target: Option<String> },
    /// `unlock|ul [#channel]`
    Unlock { target: Option<String> },
    /// `snipe|s [page]`
    Snipe { page: i64 },
    /// `clearsnipe|cs`
    ClearSnipe,
}

impl Command {
    /// Parse `content` if it starts with `prefix` followed by a known command
    /// name. Returns `None` for ordinary messages, unknown commands and
    /// channel arguments that are neither a mention nor an id.
    pub fn parse(prefix: &str, content: &str) -> Option<Self> {
        if prefix.is_empty() {
            return None;
        }
        let body = content.trim_start().strip_prefix(prefix)?;
        let (name, rest) = match body.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (body.trim_end(), ""),
        };

        match name {
            "afk" => Some(Self::Afk {
                status: (!rest.is_empty()).then(|| rest.to_string()),
            }),
            "lock" | "l" => Some(Self::Lock {
                target: parse_target(rest)?,
            }),
            "unlock" | "ul" => Some(Self::Unlock {
                target: parse_target(rest)?,
            }),
            "snipe" | "s" => Some(Self::Snipe {
                page: rest
                    .split_whitespace()
                    .next()
                    .and_then(|arg| arg.parse().ok())
                    .unwrap_or(1),
            }),
            "clearsnipe" | "cs" => Some(Self::ClearSnipe),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Afk { .. } => "afk",
            Self::Lock { .. } => "lock",
            Self::Unlock { .. } => "unlock",
            Self::Snipe { .. } => "snipe",
            Self::ClearSnipe => "clearsnipe",
        }
    }
}

/// `Some(None)` when no channel was given, `None` when the argument is not a
/// channel.
fn parse_target(rest: &str) -> Option<Option<String>> {
    let Some(arg) = rest.split_whitespace().next() else {
        return Some(None);
    };
    let id = arg
        .strip_prefix("<#")
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(arg);
    if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
        Some(Some(id.to_string()))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    #[rstest]
    #[case(",afk", Command::Afk { status: None })]
    #[case(",afk   ", Command::Afk { status: None })]
    #[case(",afk gone fishing ", Command::Afk { status: Some("gone fishing".into()) })]
    #[case(",lock", Command::Lock { target: None })]
    #[case(",l <#123>", Command::Lock { target: Some("123".into()) })]
    #[case(",lock 456", Command::Lock { target: Some("456".into()) })]
    #[case(",ul", Command::Unlock { target: None })]
    #[case(",unlock <#9>", Command::Unlock { target: Some("9".into()) })]
    #[case(",snipe", Command::Snipe { page: 1 })]
    #[case(",s 3", Command::Snipe { page: 3 })]
    #[case(",s 0", Command::Snipe { page: 0 })]
    #[case(",s -2", Command::Snipe { page: -2 })]
    #[case(",s two", Command::Snipe { page: 1 })]
    #[case(",cs", Command::ClearSnipe)]
    #[case(",clearsnipe now", Command::ClearSnipe)]
    fn parses(#[case] content: &str, #[case] expected: Command) {
        assert_eq!(Command::parse(",", content), Some(expected));
    }

    #[rstest]
    #[case("hello")]
    #[case("afk")]
    #[case(",")]
    #[case(",afkk")]
    #[case(",lockdown")]
    #[case(",lock general")]
    #[case(",lock <#abc>")]
    #[case("!afk")]
    fn ignores(#[case] content: &str) {
        assert_eq!(Command::parse(",", content), None);
    }

    #[test]
    fn custom_prefix() {
        assert_eq!(
            Command::parse("w!", "w!s 2"),
            Some(Command::Snipe { page: 2 })
        );
        assert_eq!(Command::parse("w!", ",s 2"), None);
    }

    #[rstest]
    #[case("afk is short for away from keyboard")]
    #[case("s 2")]
    #[case("l")]
    fn empty_prefix_matches_nothing(#[case] content: &str) {
        assert_eq!(Command::parse("", content), None);
    }
}
