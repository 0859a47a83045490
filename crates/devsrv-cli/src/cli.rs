//! Command-line argument definitions.

use clap::{ArgAction, Parser};
use devsrv::ServerConfig;
use std::path::PathBuf;

/// Local development web server with on-demand bundling, live reload and a
/// browser playground.
#[derive(Parser, Debug)]
#[command(name = "devsrv", version, about, long_about = None)]
pub struct Cli {
    /// Document root directory
    #[arg(value_name = "DOCUMENT_ROOT", default_value = ".")]
    pub document_root: PathBuf,

    /// Host name to bind
    #[arg(short = 'H', long = "host", default_value = "0.0.0.0", value_name = "HOST")]
    pub host: String,

    /// Port number to bind
    #[arg(short = 'p', long, default_value_t = 3000)]
    pub port: u16,

    /// TLS certificate file (termination is delegated to a front-end)
    #[arg(long, value_name = "FILE")]
    pub tls_cert: Option<PathBuf>,

    /// TLS key file (termination is delegated to a front-end)
    #[arg(long, value_name = "FILE")]
    pub tls_key: Option<PathBuf>,

    /// Directory index file
    #[arg(long, default_value = "index.html", value_name = "FILE")]
    pub directory_index: String,

    /// Reload connected browser tabs when files change
    #[arg(long, default_value_t = true, action = ArgAction::Set, value_name = "BOOL")]
    pub live_reload: bool,

    /// Bundle *.bundle.js requests from TypeScript sources
    #[arg(long, default_value_t = true, action = ArgAction::Set, value_name = "BOOL")]
    pub bundle: bool,

    /// Serve the playground page on *.playground requests
    #[arg(long, default_value_t = true, action = ArgAction::Set, value_name = "BOOL")]
    pub playground: bool,

    /// Enable debug-level logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only show errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Build the server configuration from the parsed arguments.
    pub fn to_config(&self) -> ServerConfig {
        ServerConfig {
            hostname: self.host.clone(),
            port: self.port,
            tls_cert: self.tls_cert.clone(),
            tls_key: self.tls_key.clone(),
            directory_index: self.directory_index.clone(),
            live_reload: self.live_reload,
            bundle: self.bundle,
            playground: self.playground,
            document_root: self.document_root.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["devsrv"]);
        assert_eq!(cli.host, "0.0.0.0");
        assert_eq!(cli.port, 3000);
        assert_eq!(cli.directory_index, "index.html");
        assert!(cli.live_reload);
        assert!(cli.bundle);
        assert!(cli.playground);
        assert_eq!(cli.document_root, PathBuf::from("."));
    }

    #[test]
    fn test_positional_document_root() {
        let cli = Cli::parse_from(["devsrv", "./public"]);
        assert_eq!(cli.document_root, PathBuf::from("./public"));
    }

    #[test]
    fn test_boolean_flags_take_values() {
        let cli = Cli::parse_from([
            "devsrv",
            "--live-reload",
            "false",
            "--bundle",
            "false",
            "--playground",
            "false",
        ]);
        assert!(!cli.live_reload);
        assert!(!cli.bundle);
        assert!(!cli.playground);
    }

    #[test]
    fn test_host_and_port_shorthand() {
        let cli = Cli::parse_from(["devsrv", "-H", "localhost", "-p", "8080"]);
        assert_eq!(cli.host, "localhost");
        assert_eq!(cli.port, 8080);
    }

    #[test]
    fn test_to_config_carries_everything() {
        let cli = Cli::parse_from([
            "devsrv",
            "./site",
            "-p",
            "4000",
            "--directory-index",
            "home.html",
            "--live-reload",
            "false",
        ]);
        let config = cli.to_config();
        assert_eq!(config.document_root, PathBuf::from("./site"));
        assert_eq!(config.port, 4000);
        assert_eq!(config.directory_index, "home.html");
        assert!(!config.live_reload);
        assert!(config.bundle);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["devsrv", "--verbose", "--quiet"]).is_err());
    }
}
