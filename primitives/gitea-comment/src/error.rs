//! Errors raised while validating, formatting or posting a comment.

use std::path::PathBuf;

use thiserror::Error;

/// Every failure that stops a comment from being posted.
///
/// None of these are recovered; the binary prints the error and exits.
#[derive(Debug, Error)]
pub enum CommentError {
    /// A typed environment variable could not be parsed.
    #[error("invalid value `{value}` for {name}: {reason}")]
    InvalidEnv {
        name: String,
        value: String,
        reason: String,
    },

    /// Both an inline comment and a comment file were supplied.
    #[error("cannot specify both comment and comment file")]
    ConflictingComment,

    /// Neither an inline comment nor a comment file was supplied.
    #[error("you must provide a comment or comment file")]
    MissingComment,

    #[error("you must provide a Gitea API token")]
    MissingToken,

    #[error("you must provide a Gitea URL")]
    MissingAddress,

    #[error("you must provide a repo owner")]
    MissingRepoOwner,

    #[error("you must provide a repo name")]
    MissingRepoName,

    /// The pull request index was left at its zero default.
    #[error("you must provide an index for the PR")]
    MissingPrIndex,

    /// The comment file could not be opened or read.
    #[error("failed to read comment file {}", path.display())]
    ReadCommentFile {
        /// Path given on the command line or in the environment.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The JSON payload could not be encoded.
    #[error("failed to encode comment payload")]
    Encode(#[from] serde_json::Error),

    /// The request could not be built or the transport failed.
    #[error("failed to send comment to {endpoint}")]
    Request {
        /// Comments endpoint with the token query stripped.
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}
