//! Gitea Comment - Pull Request Comment Publisher
//!
//! Posts a single comment to a Gitea pull request or issue and exits. Meant
//! to run as a CI plugin step, so every option can come from the environment
//! the CI system exports; an explicit flag always wins over the environment.
//!
//! # Usage
//!
//! ```bash
//! # Inline comment
//! gitea-comment --gitea-address https://git.example.com --gitea-token "$TOKEN" \
//!     --repo-owner acme --repo-name widgets --pr-index 42 --comment "LGTM"
//!
//! # Post a file as a code block, everything else from the CI environment
//! PLUGIN_COMMENT_FILE=plan.txt PLUGIN_COMMENT_IS_CODE=true gitea-comment
//! ```
//!
//! # Environment
//!
//! | Flag              | Variable                 |
//! |-------------------|--------------------------|
//! | `--gitea-token`   | `PLUGIN_GITEA_TOKEN`     |
//! | `--gitea-address` | `PLUGIN_GITEA_ADDRESS`   |
//! | `--comment`       | `PLUGIN_COMMENT`         |
//! | `--comment-file`  | `PLUGIN_COMMENT_FILE`    |
//! | `--commentIsCode` | `PLUGIN_COMMENT_IS_CODE` |
//! | `--repo-owner`    | `CI_REPO_OWNER`          |
//! | `--repo-name`     | `CI_REPO_NAME`           |
//! | `--pr-index`      | `CI_COMMIT_PULL_REQUEST` |
//!
//! Flags take two dashes (`--gitea-token x` or `--gitea-token=x`). The
//! single-dash form of the Go plugin (`-gitea-token x`) is rejected; when a
//! flag repeats, the last occurrence wins.
//!
//! A malformed `PLUGIN_COMMENT_IS_CODE` or `CI_COMMIT_PULL_REQUEST` aborts the
//! run even when the matching flag is also given.
//!
//! Log verbosity follows `RUST_LOG` (default `info`); logs go to stderr.

mod client;
mod comment;
mod config;
mod error;

use anyhow::Context;
use clap::Parser;
use reqwest::{Client, StatusCode};
use tracing_subscriber::EnvFilter;

use crate::config::{Args, CommentConfig, check_typed_env};
use crate::error::CommentError;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolves the comment body and posts it.
async fn run(client: &Client, config: &CommentConfig) -> Result<StatusCode, CommentError> {
    let body = comment::resolve_body(&config.source, config.comment_is_code).await?;
    client::post_comment(client, config, &body).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    check_typed_env(|name| std::env::var_os(name)).context("invalid configuration")?;
    let args = Args::parse();
    init_logging();

    let config = args.into_config().context("invalid configuration")?;
    let client = Client::builder()
        .build()
        .context("failed to build HTTP client")?;

    run(&client, &config).await?;
    Ok(())
}
