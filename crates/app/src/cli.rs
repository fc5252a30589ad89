//! Command-line flags
//!
//! Every flag overrides the matching key of the loaded configuration.

use std::path::PathBuf;

use clap::Parser;
use scanbridge_domain::Config;

/// Upload a local scan result file to the security platform and wait for it
/// to be ingested.
#[derive(Debug, Parser)]
#[command(name = "scanbridge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON or TOML); also the target of `--save`.
    #[arg(long, short = 'c', env = "SCANBRIDGE_CONFIG", default_value = "config.json")]
    pub config: PathBuf,

    /// OAuth client id.
    #[arg(long)]
    pub client_id: Option<String>,

    /// OAuth client secret.
    #[arg(long)]
    pub client_secret: Option<String>,

    /// Token endpoint URL.
    #[arg(long)]
    pub auth_url: Option<String>,

    /// GraphQL endpoint URL.
    #[arg(long)]
    pub query_url: Option<String>,

    /// Cloud subscription or account of the scanned host.
    #[arg(long)]
    pub subscription_id: Option<String>,

    /// Cloud platform of the scanned host (e.g. AWS, Azure, GCP).
    #[arg(long)]
    pub cloud_type: Option<String>,

    /// Provider-side id of the scanned host.
    #[arg(long)]
    pub provider_id: Option<String>,

    /// Scan result file to upload.
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,

    /// Abort unless exactly one resource matches the cloud type and
    /// provider id.
    #[arg(long)]
    pub verify_resource: bool,

    /// Write the merged configuration back to `--config`.
    #[arg(long)]
    pub save: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub log_json: bool,
}

impl Cli {
    /// Whether any configuration key was given on the command line.
    pub fn has_overrides(&self) -> bool {
        self.client_id.is_some()
            || self.client_secret.is_some()
            || self.auth_url.is_some()
            || self.query_url.is_some()
            || self.subscription_id.is_some()
            || self.cloud_type.is_some()
            || self.provider_id.is_some()
            || self.file.is_some()
    }

    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut Config) {
        fn set(target: &mut String, value: Option<&String>) {
            if let Some(value) = value {
                target.clone_from(value);
            }
        }

        set(&mut config.client_id, self.client_id.as_ref());
        set(&mut config.client_secret, self.client_secret.as_ref());
        set(&mut config.auth_url, self.auth_url.as_ref());
        set(&mut config.query_url, self.query_url.as_ref());
        set(&mut config.scan_subscription_id, self.subscription_id.as_ref());
        set(&mut config.scan_cloud_type, self.cloud_type.as_ref());
        set(&mut config.scan_provider_id, self.provider_id.as_ref());
        if let Some(file) = &self.file {
            config.upload_file = file.display().to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_to_config_json_without_overrides() {
        let cli = Cli::try_parse_from(["scanbridge"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("config.json"));
        assert!(!cli.has_overrides());
        assert!(!cli.save);
    }

    #[test]
    fn flags_override_loaded_values() {
        let cli = Cli::try_parse_from([
            "scanbridge",
            "--client-id",
            "cli-id",
            "--query-url",
            "https://api.example.com/graphql",
            "--provider-id",
            "i-0abc",
            "--file",
            "/tmp/out.json",
            "--save",
        ])
        .unwrap();
        let mut config = Config {
            client_id: "file-id".into(),
            client_secret: "file-secret".into(),
            ..Config::default()
        };

        cli.apply(&mut config);

        assert!(cli.has_overrides());
        assert!(cli.save);
        assert_eq!(config.client_id, "cli-id");
        assert_eq!(config.client_secret, "file-secret");
        assert_eq!(config.query_url, "https://api.example.com/graphql");
        assert_eq!(config.scan_provider_id, "i-0abc");
        assert_eq!(config.upload_file, "/tmp/out.json");
    }
}
