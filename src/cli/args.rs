//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! Every release option can also be supplied through the environment the CI
//! runner exports (`PLUGIN_*` for step settings, `DRONE_*` for the build).
//!
//! # Global Flags
//!
//! - `--config <path>`: TOML file with defaults for any option
//! - `--debug`: Enable debug output
//! - `--quiet` / `-q`: Errors only

use clap::builder::BoolishValueParser;
use clap::Parser;
use std::path::PathBuf;

use crate::core::config::RawConfig;

/// Publish a release and its assets to a Gitea server
#[derive(Parser, Debug)]
#[command(name = "gitea-release")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML file providing defaults for any option below
    #[arg(long, env = "GITEA_RELEASE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Errors only
    #[arg(short, long)]
    pub quiet: bool,

    /// API token used to authenticate against the forge
    #[arg(long, env = "PLUGIN_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Forge server root, e.g. https://gitea.example.com
    #[arg(long, env = "PLUGIN_BASE_URL")]
    pub base_url: Option<String>,

    /// Glob patterns of files to upload (repeatable or comma separated)
    #[arg(long = "files", env = "PLUGIN_FILES", value_delimiter = ',')]
    pub files: Vec<String>,

    /// What to do when an attachment with the same name exists
    #[arg(long, env = "PLUGIN_FILE_EXISTS", value_name = "overwrite|fail|skip")]
    pub file_exists: Option<String>,

    /// Checksum algorithms to generate files for (repeatable or comma separated)
    #[arg(long, env = "PLUGIN_CHECKSUM", value_delimiter = ',')]
    pub checksum: Vec<String>,

    /// Publish the release as a draft
    #[arg(long, env = "PLUGIN_DRAFT", value_parser = BoolishValueParser::new(),
          num_args = 0..=1, default_missing_value = "true")]
    pub draft: Option<bool>,

    /// Mark the release as a prerelease
    #[arg(long, env = "PLUGIN_PRERELEASE", value_parser = BoolishValueParser::new(),
          num_args = 0..=1, default_missing_value = "true")]
    pub prerelease: Option<bool>,

    /// Skip TLS certificate verification and keep cookies between requests
    #[arg(long, env = "PLUGIN_INSECURE", value_parser = BoolishValueParser::new(),
          num_args = 0..=1, default_missing_value = "true")]
    pub insecure: Option<bool>,

    /// Release title, or a file containing it
    #[arg(long, env = "PLUGIN_TITLE")]
    pub title: Option<String>,

    /// Release notes, or a file containing them
    #[arg(long, env = "PLUGIN_NOTE")]
    pub note: Option<String>,

    /// Tag to release instead of the triggering tag, or a file containing it
    #[arg(long, env = "PLUGIN_TAG")]
    pub tag: Option<String>,

    /// Edit the release when it already exists
    #[arg(long, env = "PLUGIN_ALLOW_EDIT", value_parser = BoolishValueParser::new(),
          num_args = 0..=1, default_missing_value = "true")]
    pub allow_edit: Option<bool>,

    /// Abort instead of creating the release when existing releases cannot be listed
    #[arg(long, env = "PLUGIN_STRICT_LOOKUP", value_parser = BoolishValueParser::new(),
          num_args = 0..=1, default_missing_value = "true")]
    pub strict_lookup: Option<bool>,

    /// Repository owner
    #[arg(long, env = "DRONE_REPO_OWNER")]
    pub owner: Option<String>,

    /// Repository name
    #[arg(long, env = "DRONE_REPO_NAME")]
    pub repo: Option<String>,

    /// Triggering CI event (e.g. tag, push)
    #[arg(long, env = "DRONE_BUILD_EVENT")]
    pub event: Option<String>,

    /// Triggering ref (e.g. refs/tags/v1.0.0)
    #[arg(long, env = "DRONE_COMMIT_REF")]
    pub commit_ref: Option<String>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// The release options given on the command line or in the environment.
    ///
    /// Empty values count as unset so an exported-but-blank variable does not
    /// hide a value from the config file.
    pub fn to_raw_config(&self) -> RawConfig {
        fn set(value: &Option<String>) -> Option<String> {
            value.clone().filter(|v| !v.is_empty())
        }
        fn list(values: &[String]) -> Vec<String> {
            values
                .iter()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .collect()
        }

        RawConfig {
            api_key: set(&self.api_key),
            base_url: set(&self.base_url),
            files: list(&self.files),
            file_exists: set(&self.file_exists),
            checksum: list(&self.checksum),
            draft: self.draft,
            prerelease: self.prerelease,
            insecure: self.insecure,
            title: set(&self.title),
            note: set(&self.note),
            tag: set(&self.tag),
            allow_edit: self.allow_edit,
            strict_lookup: self.strict_lookup,
            owner: set(&self.owner),
            repo: set(&self.repo),
            event: set(&self.event),
            commit_ref: set(&self.commit_ref),
        }
    }
}
