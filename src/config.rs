//! Command line arguments and the resolved configuration.
//!
//! `Args` is what clap parses. `Config` is what the rest of the crate uses:
//! credentials are resolved against the environment, the repository URL is
//! split into its parts and every attachment path is checked before any
//! request goes out.

use crate::error::{AttachError, Result};
use clap::{ArgAction, Parser};
use log::LevelFilter;
use regex::Regex;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Duration;

/// Environment variable consulted when `--user` is absent or empty.
pub const USER_ENV: &str = "GITEA_USER";
/// Environment variable consulted when `--pass` is absent or empty.
pub const PASS_ENV: &str = "GITEA_PASS";

/// Log levels selected by the number of `-v` flags.
const LOG_LEVELS: [LevelFilter; 4] = [
    LevelFilter::Error,
    LevelFilter::Info,
    LevelFilter::Debug,
    LevelFilter::Trace,
];

/// Attach files to Gitea Releases
#[derive(Parser, Debug)]
#[command(name = "gitea-release-attach", version, about = "Attach files to Gitea Releases")]
pub struct Args {
    /// Username for accessing Gitea (falls back to GITEA_USER)
    #[arg(short, long)]
    pub user: Option<String>,

    /// Password for accessing Gitea (falls back to GITEA_PASS)
    #[arg(short, long)]
    pub pass: Option<String>,

    /// Repository URL, e.g. gitea.example.com/owner/project
    #[arg(short, long)]
    pub repo: String,

    /// Release Tag
    #[arg(short, long)]
    pub tag: String,

    /// Remove all attachments from existing Release
    #[arg(short, long)]
    pub delete: bool,

    /// File to be attached to Release
    #[arg(short = 'f', long = "attachment", value_name = "FILE", required = true, num_args = 1..)]
    pub attachments: Vec<PathBuf>,

    /// Tool verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Request timeout in seconds, 0 disables it
    #[arg(long, value_name = "SECONDS", default_value_t = 120)]
    pub timeout: u64,
}

impl Args {
    /// Map the verbosity counter to a log level.
    pub fn log_level(&self) -> Result<LevelFilter> {
        LOG_LEVELS
            .get(usize::from(self.verbose))
            .copied()
            .ok_or(AttachError::Verbosity(self.verbose))
    }
}

/// First non-empty value of the flag and the environment variable.
pub fn resolve_credential(flag: Option<String>, env: Option<String>) -> Option<String> {
    flag.filter(|v| !v.is_empty())
        .or_else(|| env.filter(|v| !v.is_empty()))
}

/// Named parts of a repository URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoField {
    Base,
    Owner,
    Project,
}

impl FromStr for RepoField {
    type Err = AttachError;

    fn from_str(key: &str) -> Result<Self> {
        match key {
            "BASE" => Ok(RepoField::Base),
            "OWNER" => Ok(RepoField::Owner),
            "PROJECT" => Ok(RepoField::Project),
            other => Err(AttachError::UnknownRepoField(other.to_string())),
        }
    }
}

/// `base/owner/project`, where owner and project are single path segments.
fn repo_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<base>.+)/(?P<owner>[^/]+)/(?P<project>[^/]+)$")
            .expect("repository URL pattern is valid")
    })
}

/// A repository URL split into `base/owner/project`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoUrl {
    pub base: String,
    pub owner: String,
    pub project: String,
}

impl RepoUrl {
    /// Split a URL of the form `host/owner/project`.
    ///
    /// The last two segments are owner and project, everything before them is
    /// the base, so `https://git.example.com/sub/owner/project` keeps
    /// `https://git.example.com/sub` as base. Trailing slashes are ignored.
    pub fn parse(repo: &str) -> Result<Self> {
        let trimmed = repo.trim().trim_end_matches('/');
        let caps = repo_pattern()
            .captures(trimmed)
            .ok_or_else(|| AttachError::InvalidRepoUrl(repo.to_string()))?;

        let base = caps["base"].trim_end_matches('/');
        if base.is_empty() || base.ends_with(':') {
            return Err(AttachError::InvalidRepoUrl(repo.to_string()));
        }

        Ok(RepoUrl {
            base: base.to_string(),
            owner: caps["owner"].to_string(),
            project: caps["project"].to_string(),
        })
    }

    pub fn get(&self, field: RepoField) -> &str {
        match field {
            RepoField::Base => &self.base,
            RepoField::Owner => &self.owner,
            RepoField::Project => &self.project,
        }
    }

    /// Root of the repository's API, e.g.
    /// `https://example.com/api/v1/repos/owner/project`.
    pub fn api_root(&self) -> String {
        let base = if self.base.starts_with("http://") || self.base.starts_with("https://") {
            self.base.clone()
        } else {
            format!("https://{}", self.base)
        };
        format!("{}/api/v1/repos/{}/{}", base, self.owner, self.project)
    }
}

/// Basic auth credentials. The password never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// Fully resolved configuration, built once and then only read.
#[derive(Debug, Clone)]
pub struct Config {
    pub repo: RepoUrl,
    pub credentials: Credentials,
    pub tag: String,
    pub delete: bool,
    pub attachments: Vec<PathBuf>,
    pub timeout: Option<Duration>,
}

impl Config {
    /// Resolve `args` against the process environment.
    pub fn from_env(args: Args) -> Result<Self> {
        Self::resolve(args, |key| std::env::var(key).ok())
    }

    /// Resolve `args`, looking environment variables up through `env`.
    pub fn resolve<F>(args: Args, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        log::info!("Checking arguments and parameters");

        let username = resolve_credential(args.user, env(USER_ENV))
            .ok_or(AttachError::MissingCredential { name: "Username" })?;
        let password = resolve_credential(args.pass, env(PASS_ENV))
            .ok_or(AttachError::MissingCredential { name: "Password" })?;

        if args.tag.is_empty() {
            return Err(AttachError::MissingArgument("Tag"));
        }

        let repo = RepoUrl::parse(&args.repo)?;

        if args.attachments.is_empty() {
            return Err(AttachError::MissingArgument("Attachment"));
        }
        if let Some(missing) = args.attachments.iter().find(|path| !path.is_file()) {
            return Err(AttachError::MissingAttachment(missing.clone()));
        }

        let config = Config {
            repo,
            credentials: Credentials { username, password },
            tag: args.tag,
            delete: args.delete,
            attachments: args.attachments,
            timeout: (args.timeout > 0).then(|| Duration::from_secs(args.timeout)),
        };
        log::debug!("{:?}", config);

        Ok(config)
    }
}
