use std::process::Command;

use anyhow::{Context, Result, bail};

/// Environment variables checked, in order, after the gh CLI.
const TOKEN_VARS: [&str; 2] = ["GH_TOKEN", "GITHUB_TOKEN"];

/// Resolve a GitHub token for `host`: `gh auth token --hostname {host}`
/// first, then `GH_TOKEN`, then `GITHUB_TOKEN`.
pub fn resolve_token(host: &str) -> Result<String> {
    match token_from_gh_cli(host) {
        Ok(token) => return Ok(token),
        Err(e) => tracing::debug!("gh CLI token unavailable for {host}: {e:#}"),
    }

    if let Some(token) = TOKEN_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|token| !token.trim().is_empty())
    {
        return Ok(token.trim().to_owned());
    }

    bail!(
        "no GitHub token found for host \"{host}\". \
         Run `gh auth login`, set GH_TOKEN / GITHUB_TOKEN, \
         or point [source].api_base at a search proxy."
    )
}

fn token_from_gh_cli(host: &str) -> Result<String> {
    let output = Command::new("gh")
        .args(["auth", "token", "--hostname", host])
        .output()
        .context("failed to run `gh auth token`")?;

    if !output.status.success() {
        bail!("gh auth token exited with {}", output.status);
    }

    let token = String::from_utf8(output.stdout)
        .context("gh auth token produced non-UTF-8 output")?
        .trim()
        .to_owned();
    if token.is_empty() {
        bail!("gh auth token returned empty string");
    }
    Ok(token)
}
