//! Login / logout handlers.
//!
//! A successful login stores the token pair in the system keyring so later
//! commands reuse the session instead of logging in again.

use dialoguer::Input;
use secrecy::SecretString;

use sirs_config::Config;
use sirs_core::{Controller, Credentials, SessionContext};

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;

use super::util::prompt_err;

pub async fn login(global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    let resolved = config::resolve(global, cfg)?;
    let mut client_config = resolved.client;

    if client_config.credentials.is_none() {
        let username = match resolved.profile.username {
            Some(name) => name,
            None => Input::new()
                .with_prompt("Username")
                .interact_text()
                .map_err(prompt_err)?,
        };
        let password = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
        if username.is_empty() || password.is_empty() {
            return Err(CliError::Validation {
                field: "credentials".into(),
                reason: "username and password cannot be empty".into(),
            });
        }
        client_config.credentials = Some(Credentials {
            username,
            password: SecretString::from(password),
        });
    }

    let controller = Controller::new(client_config, SessionContext::new())?;
    let session = controller.login().await?;

    if let Err(e) = sirs_config::save_session(&resolved.profile_name, &session) {
        tracing::warn!(error = %e, "could not persist session; later commands will log in again");
    }

    if !global.quiet {
        let who = session.username.as_deref().unwrap_or("user");
        match session.role.as_deref() {
            Some(role) => eprintln!("✓ Logged in as {who} ({role})"),
            None => eprintln!("✓ Logged in as {who}"),
        }
    }
    Ok(())
}

pub fn logout(global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    let profile_name = config::active_profile_name(global, cfg);
    sirs_config::clear_session(&profile_name)?;
    if !global.quiet {
        eprintln!("✓ Session cleared for profile '{profile_name}'");
    }
    Ok(())
}
