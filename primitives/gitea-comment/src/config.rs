//! Configuration loading and validation.
//!
//! Each option reads its environment variable as the default and an explicit
//! flag overrides it. [`Args::into_config`] turns the raw values into an
//! immutable [`CommentConfig`], failing on the first rule that is violated.
//!
//! Typed environment variables are parsed up front by [`check_typed_env`],
//! so a malformed value is fatal even when a flag overrides it.

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::error::CommentError;

/// Raw command-line and environment configuration.
#[derive(Parser, Debug, Clone)]
#[command(name = "gitea-comment")]
#[command(about = "Posts a comment to a Gitea pull request or issue")]
#[command(args_override_self = true)]
pub struct Args {
    /// API token for Gitea.
    #[arg(long, env = "PLUGIN_GITEA_TOKEN", hide_env_values = true)]
    pub gitea_token: Option<String>,

    /// Gitea URL.
    #[arg(long, env = "PLUGIN_GITEA_ADDRESS")]
    pub gitea_address: Option<String>,

    /// Comment for Gitea.
    #[arg(long, env = "PLUGIN_COMMENT")]
    pub comment: Option<String>,

    /// Use file as comment for Gitea.
    #[arg(long, env = "PLUGIN_COMMENT_FILE")]
    pub comment_file: Option<String>,

    /// Wrap the comment in a code block.
    #[arg(
        long = "commentIsCode",
        env = COMMENT_IS_CODE_ENV,
        value_parser = parse_bool,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value = "false",
        default_missing_value = "true"
    )]
    pub comment_is_code: bool,

    /// Owner of the repository.
    #[arg(long, env = "CI_REPO_OWNER")]
    pub repo_owner: Option<String>,

    /// Name of the repository.
    #[arg(long, env = "CI_REPO_NAME")]
    pub repo_name: Option<String>,

    /// Index of the PR.
    #[arg(
        long,
        env = PR_INDEX_ENV,
        default_value_t = 0,
        allow_negative_numbers = true
    )]
    pub pr_index: i64,
}

/// Parses the boolean spellings accepted by CI plugin settings.
pub fn parse_bool(value: &str) -> Result<bool, String> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        other => Err(format!("invalid boolean value `{other}`")),
    }
}

/// Environment variable holding the code-fence switch.
pub const COMMENT_IS_CODE_ENV: &str = "PLUGIN_COMMENT_IS_CODE";

/// Environment variable holding the pull request index.
pub const PR_INDEX_ENV: &str = "CI_COMMIT_PULL_REQUEST";

/// Parses every non-string environment variable that is present.
///
/// `lookup` is `std::env::var_os` outside of tests.
pub fn check_typed_env<F>(lookup: F) -> Result<(), CommentError>
where
    F: Fn(&str) -> Option<OsString>,
{
    let invalid = |name: &str, value: &OsString, reason: String| CommentError::InvalidEnv {
        name: name.to_string(),
        value: value.to_string_lossy().into_owned(),
        reason,
    };

    if let Some(value) = lookup(COMMENT_IS_CODE_ENV) {
        let text = value.to_str().ok_or_else(|| {
            invalid(COMMENT_IS_CODE_ENV, &value, "not valid UTF-8".to_string())
        })?;
        parse_bool(text).map_err(|reason| invalid(COMMENT_IS_CODE_ENV, &value, reason))?;
    }

    if let Some(value) = lookup(PR_INDEX_ENV) {
        let text = value
            .to_str()
            .ok_or_else(|| invalid(PR_INDEX_ENV, &value, "not valid UTF-8".to_string()))?;
        text.parse::<i64>()
            .map_err(|err| invalid(PR_INDEX_ENV, &value, err.to_string()))?;
    }

    Ok(())
}

/// Gitea API token. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct GiteaToken(String);

impl GiteaToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for GiteaToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GiteaToken(***)")
    }
}

/// Where the comment text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentSource {
    Inline(String),
    File(PathBuf),
}

/// Validated configuration for a single comment submission.
#[derive(Debug, Clone)]
pub struct CommentConfig {
    pub token: GiteaToken,
    pub address: String,
    pub repo_owner: String,
    pub repo_name: String,
    pub pr_index: i64,
    pub source: CommentSource,
    pub comment_is_code: bool,
}

/// Returns the value when it is present and non-empty.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl Args {
    /// Validates the raw configuration.
    ///
    /// Rules are checked in a fixed order and only the first violation is
    /// reported.
    pub fn into_config(self) -> Result<CommentConfig, CommentError> {
        let comment = non_empty(self.comment);
        let comment_file = non_empty(self.comment_file);

        let source = match (comment, comment_file) {
            (Some(comment), Some(file)) => {
                tracing::error!(
                    comment = %comment,
                    comment_file = %file,
                    "conflicting comment sources"
                );
                return Err(CommentError::ConflictingComment);
            }
            (None, None) => return Err(CommentError::MissingComment),
            (Some(comment), None) => CommentSource::Inline(comment),
            (None, Some(file)) => CommentSource::File(PathBuf::from(file)),
        };

        let token = non_empty(self.gitea_token).ok_or(CommentError::MissingToken)?;
        let address = non_empty(self.gitea_address).ok_or(CommentError::MissingAddress)?;
        let repo_owner = non_empty(self.repo_owner).ok_or(CommentError::MissingRepoOwner)?;
        let repo_name = non_empty(self.repo_name).ok_or(CommentError::MissingRepoName)?;
        if self.pr_index == 0 {
            return Err(CommentError::MissingPrIndex);
        }

        Ok(CommentConfig {
            token: GiteaToken::new(token),
            address,
            repo_owner,
            repo_name,
            pr_index: self.pr_index,
            source,
            comment_is_code: self.comment_is_code,
        })
    }
}
