//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Redirect pages and nginx redirect maps for record-based sites
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: waymark.toml)
    #[arg(short = 'C', long, global = true, default_value = "waymark.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Show more output; repeat for low-priority notices
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Override the site URL (and with it the base path).
    ///
    /// Example: serving the site under a subdirectory:
    ///   waymark map --site-url "https://example.org/prefix/"
    #[arg(short = 'U', long = "site-url", global = true, value_hint = clap::ValueHint::Url)]
    pub site_url: Option<String>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write redirect pages and the redirect map
    #[command(visible_alias = "b")]
    Build {
        /// Output directory path (relative to project root)
        #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
        output: Option<PathBuf>,
    },

    /// Print the redirect map to stdout
    #[command(visible_alias = "m")]
    Map {
        /// Print JSON instead of nginx map lines
        #[arg(long)]
        json: bool,
    },

    /// Show what an incoming URL resolves to
    #[command(visible_alias = "r")]
    Resolve {
        /// URL path, e.g. `/about/info/` (percent-encoding allowed)
        url: String,
    },

    /// Report every redirect conflict; fails if any redirect is invalid
    #[command(visible_alias = "c")]
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_build_with_output() {
        let cli = Cli::parse_from(["waymark", "-vv", "build", "--output", "dist"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, PathBuf::from("waymark.toml"));
        assert!(matches!(
            cli.command,
            Commands::Build { output: Some(ref out) } if out == &PathBuf::from("dist")
        ));
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "waymark",
            "map",
            "--json",
            "-C",
            "site/waymark.toml",
            "--site-url",
            "https://example.org/prefix/",
        ]);
        assert!(matches!(cli.command, Commands::Map { json: true }));
        assert_eq!(cli.config, PathBuf::from("site/waymark.toml"));
        assert_eq!(cli.site_url.as_deref(), Some("https://example.org/prefix/"));
    }

    #[test]
    fn test_parse_resolve() {
        let cli = Cli::parse_from(["waymark", "r", "/about/info"]);
        assert!(matches!(cli.command, Commands::Resolve { ref url } if url == "/about/info"));
    }
}
