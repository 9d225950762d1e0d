//! Comment text resolution and code-fence formatting.

use std::path::Path;

use crate::config::CommentSource;
use crate::error::CommentError;

const CODE_FENCE: &str = "```";

/// Wraps text in a Markdown code fence.
pub fn fence(text: &str) -> String {
    format!("{CODE_FENCE}\n{text}\n{CODE_FENCE}")
}

/// Reads the comment file verbatim.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD; nothing is trimmed.
async fn read_comment_file(path: &Path) -> Result<String, CommentError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| CommentError::ReadCommentFile {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Produces the final comment body from its source.
pub async fn resolve_body(source: &CommentSource, is_code: bool) -> Result<String, CommentError> {
    let text = match source {
        CommentSource::Inline(text) => text.clone(),
        CommentSource::File(path) => {
            tracing::debug!(path = %path.display(), "reading comment file");
            read_comment_file(path).await?
        }
    };

    if is_code {
        Ok(fence(&text))
    } else {
        Ok(text)
    }
}
