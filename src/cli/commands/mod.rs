pub mod api;
pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ArgAction, ArgGroup, ColorChoice, Command,
};

pub const CMD_STATUS: &str = "status";
pub const CMD_REMEMBER_IP: &str = "remember-ip";
pub const CMD_SETUP: &str = "setup";
pub const CMD_DEACTIVATE: &str = "deactivate";
pub const CMD_GATE: &str = "gate";
pub const CMD_SIGN_IN: &str = "sign-in";
pub const CMD_SIGN_OUT: &str = "sign-out";

pub const ARG_STATE: &str = "state";
pub const ARG_PROVIDER: &str = "provider";
pub const ARG_AUTH: &str = "auth";
pub const ARG_UUID: &str = "uuid";
pub const ARG_EMAIL_TOKEN: &str = "email-token";
pub const ARG_CONFIRMATION_TOKEN: &str = "confirmation-token";
pub const ARG_MOBILE: &str = "mobile";
pub const ARG_TOKEN: &str = "token";

fn subcommands(command: Command) -> Command {
    command
        .subcommand(Command::new(CMD_STATUS).about("Show enrolled factors and 2FA settings"))
        .subcommand(
            Command::new(CMD_REMEMBER_IP)
                .about("Remember this IP address so it skips 2FA")
                .arg(
                    Arg::new(ARG_STATE)
                        .help("on or off")
                        .required(true)
                        .value_parser(["on", "off"]),
                ),
        )
        .subcommand(
            Command::new(CMD_SETUP)
                .about("Enroll a second factor, or verify with one using --auth")
                .arg(
                    Arg::new(ARG_PROVIDER)
                        .help("Provider type")
                        .required(true)
                        .value_parser(["phone", "authenticator"]),
                )
                .arg(
                    Arg::new(ARG_AUTH)
                        .long(ARG_AUTH)
                        .help("Verify with the active factor of this type instead of enrolling")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new(CMD_DEACTIVATE)
                .about("Remove an active second factor")
                .arg(
                    Arg::new(ARG_UUID)
                        .help("Identifier of the active factor, as shown by status")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new(CMD_GATE)
                .about("Pass the 2FA gate before continuing to a protected page")
                .arg(
                    Arg::new(ARG_EMAIL_TOKEN)
                        .long(ARG_EMAIL_TOKEN)
                        .help("One-time token from a sign-in email"),
                )
                .arg(
                    Arg::new(ARG_CONFIRMATION_TOKEN)
                        .long(ARG_CONFIRMATION_TOKEN)
                        .help("One-time token from an email confirmation link"),
                )
                .group(
                    ArgGroup::new("exchange-token")
                        .args([ARG_EMAIL_TOKEN, ARG_CONFIRMATION_TOKEN])
                        .multiple(false),
                )
                .arg(
                    Arg::new(ARG_MOBILE)
                        .long(ARG_MOBILE)
                        .help("Pair a companion device once verified")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new(CMD_SIGN_IN)
                .about("Store a session token")
                .arg(
                    Arg::new(ARG_TOKEN)
                        .long(ARG_TOKEN)
                        .help("Session access token")
                        .env("IDENTITY_2FA_TOKEN")
                        .hide_env_values(true)
                        .required(true),
                ),
        )
        .subcommand(Command::new(CMD_SIGN_OUT).about("Forget the stored session token"))
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("identity-2fa")
        .about("Two-factor authentication for platform accounts")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true);

    let command = api::with_args(command);
    let command = logging::with_args(command);
    subcommands(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENV: [(&str, Option<&str>); 5] = [
        ("IDENTITY_2FA_API_URL", None),
        ("IDENTITY_2FA_CLIENT_TYPE", None),
        ("IDENTITY_2FA_CLIENT_KEY", None),
        ("IDENTITY_2FA_SESSION_FILE", None),
        ("IDENTITY_2FA_LOG_LEVEL", None),
    ];

    #[test]
    fn test_new() {
        let command = new();
        assert_eq!(command.get_name(), "identity-2fa");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("Two-factor authentication for platform accounts".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_defaults() {
        temp_env::with_vars(ENV, || {
            let matches = new().get_matches_from(["identity-2fa", "status"]);
            assert_eq!(matches.subcommand_name(), Some(CMD_STATUS));
            assert_eq!(
                matches.get_one::<String>(api::ARG_CLIENT_TYPE).map(String::as_str),
                Some("webshop")
            );
            assert_eq!(
                matches.get_one::<String>(api::ARG_SESSION_FILE).map(String::as_str),
                Some(api::DEFAULT_SESSION_FILE)
            );
            assert_eq!(matches.get_one::<String>(api::ARG_API_URL), None);
        });
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("IDENTITY_2FA_API_URL", Some("https://api.example.org")),
                ("IDENTITY_2FA_CLIENT_TYPE", Some("sponsor")),
                ("IDENTITY_2FA_CLIENT_KEY", Some("k3y")),
                ("IDENTITY_2FA_SESSION_FILE", Some("/tmp/session.json")),
                ("IDENTITY_2FA_LOG_LEVEL", Some("debug")),
            ],
            || {
                let matches = new().get_matches_from(["identity-2fa", "status"]);
                assert_eq!(
                    matches.get_one::<String>(api::ARG_API_URL).map(String::as_str),
                    Some("https://api.example.org")
                );
                assert_eq!(
                    matches.get_one::<String>(api::ARG_CLIENT_TYPE).map(String::as_str),
                    Some("sponsor")
                );
                assert_eq!(
                    matches.get_one::<String>(api::ARG_CLIENT_KEY).map(String::as_str),
                    Some("k3y")
                );
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(3)
                );
            },
        );
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..5_u8 {
            temp_env::with_vars(ENV, || {
                let mut args = vec!["identity-2fa".to_string(), "status".to_string()];
                if index > 0 {
                    args.push(format!("-{}", "v".repeat(usize::from(index))));
                }
                let matches = new().get_matches_from(args);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(index)
                );
            });
        }
    }

    #[test]
    fn test_setup_and_gate_args() {
        temp_env::with_vars(ENV, || {
            let matches = new().get_matches_from(["identity-2fa", "setup", "phone", "--auth"]);
            let Some((CMD_SETUP, sub)) = matches.subcommand() else {
                panic!("expected setup");
            };
            assert_eq!(
                sub.get_one::<String>(ARG_PROVIDER).map(String::as_str),
                Some("phone")
            );
            assert!(sub.get_flag(ARG_AUTH));

            let result = new().try_get_matches_from([
                "identity-2fa",
                "gate",
                "--email-token",
                "a",
                "--confirmation-token",
                "b",
            ]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn test_remember_ip_rejects_other_values() {
        temp_env::with_vars(ENV, || {
            assert!(new()
                .try_get_matches_from(["identity-2fa", "remember-ip", "maybe"])
                .is_err());
        });
    }
}
