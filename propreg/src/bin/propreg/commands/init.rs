use anyhow::{Context, Result};
use clap::Args;

use crate::commands::Session;
use crate::context::{CONFIG_DIR, CONFIG_FILE, ProjectContext, PropregConfig};
use crate::examples::ExampleGroup;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Initialize",
    commands: &[
        "propreg init                 # Write .propreg/config.toml with defaults",
        "propreg init --force         # Overwrite an existing config",
    ],
}];

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration
    #[arg(long)]
    pub force: bool,
}

pub async fn handle_init(args: InitArgs, session: &Session) -> Result<()> {
    let output = &session.output;
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    let ctx = ProjectContext::from_root(current_dir)?;

    if ctx.config_path.exists() && !args.force {
        output.warning(&format!("{} already exists.", ctx.config_path.display()));
        output.info("Use --force to overwrite it.");
        return Ok(());
    }

    let mut config = PropregConfig::default();
    if let Some(url) = &session.api_url {
        config.api.url = url.clone();
    }

    tokio::fs::create_dir_all(&ctx.propreg_dir)
        .await
        .with_context(|| format!("Failed to create {CONFIG_DIR}"))?;
    let body = toml::to_string_pretty(&config).context("Failed to serialize config")?;
    tokio::fs::write(&ctx.config_path, body)
        .await
        .with_context(|| format!("Failed to write {CONFIG_FILE}"))?;

    output.success(&format!("Created {}", ctx.config_path.display()));
    output.key_value("Backend", &config.api.url);
    output.key_value("Page size", &config.table.page_size.to_string());
    Ok(())
}
