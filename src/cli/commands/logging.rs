use clap::{builder::ValueParser, Arg, Command};

pub const ARG_VERBOSITY: &str = "verbosity";

const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Accepts a count (0-5) or a level name; names map to their count.
#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(|level: &str| -> std::result::Result<u8, String> {
        let level = level.trim();
        if let Ok(count) = level.parse::<u8>() {
            if count <= 5 {
                return Ok(count);
            }
        }

        LEVELS
            .iter()
            .position(|name| name.eq_ignore_ascii_case(level))
            .and_then(|index| u8::try_from(index).ok())
            .ok_or_else(|| {
                format!(
                    "invalid log level '{level}', expected 0-5 or one of: {}",
                    LEVELS.join(", ")
                )
            })
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
            .env("IDENTITY_2FA_LOG_LEVEL")
            .global(true)
            .action(clap::ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names_from_env() {
        for (index, level) in LEVELS.iter().enumerate() {
            temp_env::with_vars([("IDENTITY_2FA_LOG_LEVEL", Some(level.to_uppercase()))], || {
                let matches = with_args(Command::new("test")).get_matches_from(["test"]);
                assert_eq!(
                    matches.get_one::<u8>(ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn unknown_level_is_rejected() {
        temp_env::with_vars([("IDENTITY_2FA_LOG_LEVEL", Some("loud"))], || {
            assert!(with_args(Command::new("test"))
                .try_get_matches_from(["test"])
                .is_err());
        });
    }
}
