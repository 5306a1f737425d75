use crate::cli::globals::GlobalArgs;
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

#[derive(Debug)]
pub struct SignInArgs {
    pub globals: GlobalArgs,
    pub token: SecretString,
}

#[derive(Debug)]
pub struct SignOutArgs {
    pub globals: GlobalArgs,
}

/// Stores the session token.
/// # Errors
/// Returns an error if the session file cannot be written.
pub fn sign_in(args: &SignInArgs) -> Result<()> {
    let session = args.globals.session()?;
    session.sign_in(args.token.expose_secret())?;
    info!(path = %args.globals.session_file.display(), "signed in");
    println!("Signed in.");
    Ok(())
}

/// Clears the stored session token.
/// # Errors
/// Returns an error if the session file cannot be updated.
pub fn sign_out(args: &SignOutArgs) -> Result<()> {
    let session = args.globals.session()?;
    session.sign_out()?;
    info!(path = %args.globals.session_file.display(), "signed out");
    println!("Signed out.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cli::commands::api::Options,
        session::{SessionStore, SESSION_KEY},
    };

    fn globals() -> GlobalArgs {
        GlobalArgs::new(Options {
            api_url: "https://api.example.org".to_string(),
            client_type: "webshop".to_string(),
            client_key: None,
            session_file: std::env::temp_dir().join(format!(
                "identity-2fa-cli-session-{}.json",
                ulid::Ulid::new()
            )),
        })
    }

    #[test]
    fn sign_in_then_out() -> Result<()> {
        let globals = globals();
        let store = SessionStore::new(globals.session_file.clone());

        sign_in(&SignInArgs {
            globals: globals.clone(),
            token: SecretString::from("t0k3n".to_string()),
        })?;
        assert_eq!(store.read(SESSION_KEY)?.as_deref(), Some("t0k3n"));
        assert!(globals.session()?.is_signed_in());

        sign_out(&SignOutArgs {
            globals: globals.clone(),
        })?;
        assert_eq!(store.read(SESSION_KEY)?, None);

        let _ = std::fs::remove_file(&globals.session_file);
        Ok(())
    }
}
