//! Maps validated CLI matches to an [`Action`].

use crate::{
    cli::{
        actions::{deactivate, gate, remember_ip, session, setup, status, Action},
        commands::{self, api},
        globals::GlobalArgs,
    },
    identity::{ExchangeToken, ProviderKind},
};
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;

fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a String> {
    matches
        .get_one::<String>(name)
        .with_context(|| format!("missing required argument: {name}"))
}

fn exchange_token(matches: &ArgMatches) -> Option<ExchangeToken> {
    if let Some(token) = matches.get_one::<String>(commands::ARG_EMAIL_TOKEN) {
        return Some(ExchangeToken::EmailSignIn(token.clone()));
    }
    matches
        .get_one::<String>(commands::ARG_CONFIRMATION_TOKEN)
        .map(|token| ExchangeToken::EmailConfirmation(token.clone()))
}

/// # Errors
/// Returns an error if required arguments are missing or invalid.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let globals = GlobalArgs::new(api::Options::parse(matches)?);

    match matches.subcommand() {
        Some((commands::CMD_STATUS, _)) => Ok(Action::Status(status::Args { globals })),
        Some((commands::CMD_REMEMBER_IP, sub)) => Ok(Action::RememberIp(remember_ip::Args {
            globals,
            remember_ip: required(sub, commands::ARG_STATE)? == "on",
        })),
        Some((commands::CMD_SETUP, sub)) => {
            let kind = required(sub, commands::ARG_PROVIDER)?
                .parse::<ProviderKind>()
                .map_err(|err| anyhow!(err))?;
            Ok(Action::Setup(setup::Args {
                globals,
                kind,
                auth: sub.get_flag(commands::ARG_AUTH),
            }))
        }
        Some((commands::CMD_DEACTIVATE, sub)) => Ok(Action::Deactivate(deactivate::Args {
            globals,
            uuid: required(sub, commands::ARG_UUID)?.clone(),
        })),
        Some((commands::CMD_GATE, sub)) => Ok(Action::Gate(gate::Args {
            globals,
            token: exchange_token(sub),
            mobile: sub.get_flag(commands::ARG_MOBILE),
        })),
        Some((commands::CMD_SIGN_IN, sub)) => Ok(Action::SignIn(session::SignInArgs {
            globals,
            token: SecretString::from(required(sub, commands::ARG_TOKEN)?.clone()),
        })),
        Some((commands::CMD_SIGN_OUT, _)) => {
            Ok(Action::SignOut(session::SignOutArgs { globals }))
        }
        Some((name, _)) => Err(anyhow!("unknown command: {name}")),
        None => Err(anyhow!("missing command")),
    }
}
