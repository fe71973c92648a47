//! Config subcommand handlers.

use dialoguer::{Input, Select};
use secrecy::SecretString;

use sirs_config::{Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

fn available_profiles(cfg: &Config) -> String {
    let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
    names.sort();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => init(),

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = sirs_config::load_config_or_default();
            let out = output::render_single(
                &global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|_| format!("{c:#?}")),
                |c| config::active_profile_name(global, c),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = sirs_config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: available_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            sirs_config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        // ── SetPassword ─────────────────────────────────────────────
        ConfigCommand::SetPassword { profile } => {
            let cfg = sirs_config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    available: available_profiles(&cfg),
                    name: profile_name,
                });
            }

            let secret = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
            if secret.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "value cannot be empty".into(),
                });
            }
            sirs_config::store_password(&profile_name, &SecretString::from(secret))?;
            eprintln!("✓ Password stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}

fn init() -> Result<(), CliError> {
    let config_path = sirs_config::config_path();
    eprintln!("sirs configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let url: String = Input::new()
        .with_prompt("Server URL")
        .default("http://localhost:8000".into())
        .interact_text()
        .map_err(prompt_err)?;

    let username: String = Input::new()
        .with_prompt("Username")
        .interact_text()
        .map_err(prompt_err)?;

    let pass = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
    if username.is_empty() || pass.is_empty() {
        return Err(CliError::Validation {
            field: "credentials".into(),
            reason: "username and password cannot be empty".into(),
        });
    }

    let store_choices = &[
        "Store password in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let store_selection = Select::new()
        .with_prompt("Where to store the password?")
        .items(store_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let password = if store_selection == 0 {
        sirs_config::store_password(&profile_name, &SecretString::from(pass))?;
        eprintln!("   ✓ Password stored in system keyring");
        None
    } else {
        Some(pass)
    };

    let mut cfg = sirs_config::load_config_or_default();
    cfg.profiles.insert(
        profile_name.clone(),
        Profile {
            url,
            username: Some(username),
            password,
            ..Profile::default()
        },
    );
    cfg.default_profile = Some(profile_name.clone());
    sirs_config::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", config_path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Test it: sirs products stats");
    Ok(())
}
