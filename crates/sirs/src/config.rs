//! CLI flag overrides layered on top of `sirs-config` profiles.
//!
//! This is the single place where `GlobalOpts` meets the TOML profile and
//! produces a `sirs_core::ClientConfig`.

use sirs_config::{Config, Profile};
use sirs_core::ClientConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// A profile with every CLI override applied.
#[derive(Debug)]
pub struct Resolved {
    pub profile_name: String,
    pub profile: Profile,
    pub client: ClientConfig,
    /// Rows per page for list rendering.
    pub page_size: usize,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref())
}

/// Build the effective connection settings (flag > env > profile > defaults).
///
/// Without a matching profile, `--url` alone is enough to run.
pub fn resolve(global: &GlobalOpts, config: &Config) -> Result<Resolved, CliError> {
    let profile_name = active_profile_name(global, config);

    let mut profile = match config.profiles.get(&profile_name) {
        Some(p) => p.clone(),
        None if global.url.is_some() => Profile::default(),
        None if global.profile.is_some() => {
            let mut available: Vec<_> = config.profiles.keys().cloned().collect();
            available.sort();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        None => {
            return Err(CliError::NoConfig {
                path: sirs_config::config_path().display().to_string(),
            });
        }
    };

    apply_overrides(&mut profile, global);

    let client = sirs_config::profile_to_client_config(&profile, &profile_name, &config.defaults)?;
    let page_size = profile.page_size.unwrap_or(config.defaults.page_size).max(1);

    Ok(Resolved {
        profile_name,
        profile,
        client,
        page_size,
    })
}

fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(ref url) = global.url {
        profile.url.clone_from(url);
    }
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
}
