pub mod fleet;
pub mod migrate;
pub mod scan;

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

use shepherd_core::{config, FleetConfig};
use shepherd_remote::github::{api_url_from_env, token_from_env};
use shepherd_remote::GithubHost;

/// `--config` if given, else `~/.shepherd/fleet.yaml`, else built-in defaults.
fn load_config(explicit: Option<&Path>) -> Result<FleetConfig> {
    config::resolve(explicit).context("failed to load fleet configuration")
}

/// Load `.env` and require `GITHUB_TOKEN` before anything else, then load the
/// config and build the API client with its timeout.
fn connect(explicit_config: Option<&Path>) -> Result<(FleetConfig, GithubHost)> {
    crate::load_dotenv();
    let token = token_from_env().context("cannot talk to GitHub")?;

    let config = load_config(explicit_config)?;
    let host = GithubHost::new(
        api_url_from_env(),
        token,
        Duration::from_secs(config.http_timeout_secs),
    )
    .context("cannot talk to GitHub")?;
    tracing::debug!(base_url = host.base_url(), "GitHub client ready");
    Ok((config, host))
}
