//! Waymark - redirect pages and nginx redirect maps for record-based sites.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use waymark::cli::{Cli, Commands, build, check, map, resolve};
use waymark::config::SiteConfig;
use waymark::logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbosity(cli.verbose);

    let config = SiteConfig::load(&cli)?;

    match &cli.command {
        Commands::Build { .. } => build::build_site(config).map(|_| ()),
        Commands::Map { json } => map::print_map(config, *json),
        Commands::Resolve { url } => resolve::resolve_url(config, url),
        Commands::Check => check::check_site(config),
    }
}
