//! Interactive command syntax.
//!
//! An empty line is Enter. Lines starting with `/` are commands; anything
//! else is text for the focused field followed by Enter.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Enter,
    Cancel,
    Resend,
    /// One-based row number as typed.
    Pick(usize),
    Search(String),
    More,
    Text(String),
    Unknown(String),
}

impl Command {
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Enter;
        }

        let Some(command) = line.strip_prefix('/') else {
            return Self::Text(line.to_string());
        };

        let (name, argument) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(name, rest)| (name, rest.trim()));

        match name.to_lowercase().as_str() {
            "cancel" | "close" | "q" => Self::Cancel,
            "resend" => Self::Resend,
            "more" => Self::More,
            "search" => Self::Search(argument.to_string()),
            "pick" => match argument.parse::<usize>() {
                Ok(row) if row > 0 => Self::Pick(row),
                _ => Self::Unknown(line.to_string()),
            },
            _ => Self::Unknown(line.to_string()),
        }
    }

    /// Zero-based row for [`Command::Pick`].
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Pick(row) => row.checked_sub(1),
            _ => None,
        }
    }
}

pub const HELP: &str = "commands: /pick N  /search TEXT  /more  /resend  /cancel";
