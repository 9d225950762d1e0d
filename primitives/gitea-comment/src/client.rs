//! Gitea comments endpoint: URL construction and the POST itself.

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::config::CommentConfig;
use crate::error::CommentError;

const JSON: &str = "application/json";

/// Body of a create-comment request.
#[derive(Debug, Serialize)]
pub struct CommentPayload<'a> {
    pub body: &'a str,
}

/// Comments endpoint path for the configured issue, without the token.
///
/// Components are interpolated as given; no percent-encoding is applied.
pub fn comments_endpoint(config: &CommentConfig) -> String {
    format!(
        "{}/api/v1/repos/{}/{}/issues/{}/comments",
        config.address, config.repo_owner, config.repo_name, config.pr_index
    )
}

/// Full request URL including the `access_token` query.
pub fn comment_url(config: &CommentConfig) -> String {
    format!(
        "{}?access_token={}",
        comments_endpoint(config),
        config.token.expose()
    )
}

/// Posts `body` as a new comment.
///
/// The response body is never read and the status is not checked: any
/// completed exchange is a success. Non-2xx statuses are logged.
pub async fn post_comment(
    client: &Client,
    config: &CommentConfig,
    body: &str,
) -> Result<StatusCode, CommentError> {
    let payload = serde_json::to_vec(&CommentPayload { body })?;
    let endpoint = comments_endpoint(config);

    tracing::debug!(
        owner = %config.repo_owner,
        repo = %config.repo_name,
        index = config.pr_index,
        "posting comment"
    );

    let response = client
        .post(comment_url(config))
        .header(ACCEPT, JSON)
        .header(CONTENT_TYPE, JSON)
        .body(payload)
        .send()
        .await
        .map_err(|source| CommentError::Request {
            endpoint: endpoint.clone(),
            source: source.without_url(),
        })?;

    let status = response.status();
    drop(response);

    if status.is_success() {
        tracing::info!(%status, %endpoint, "comment posted");
    } else {
        tracing::warn!(%status, %endpoint, "Gitea answered with a non-success status");
    }

    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CommentSource, GiteaToken};
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn config(address: &str) -> CommentConfig {
        CommentConfig {
            token: GiteaToken::new("tok"),
            address: address.to_string(),
            repo_owner: "acme".to_string(),
            repo_name: "widgets".to_string(),
            pr_index: 42,
            source: CommentSource::Inline("hello".to_string()),
            comment_is_code: false,
        }
    }

    #[test]
    fn url_is_built_literally() {
        assert_eq!(
            comment_url(&config("https://git.example.com")),
            "https://git.example.com/api/v1/repos/acme/widgets/issues/42/comments?access_token=tok"
        );
    }

    #[test]
    fn url_components_are_not_encoded() {
        let mut config = config("https://git.example.com");
        config.repo_owner = "my org".to_string();
        config.token = GiteaToken::new("a&b");
        assert_eq!(
            comment_url(&config),
            "https://git.example.com/api/v1/repos/my org/widgets/issues/42/comments?access_token=a&b"
        );
    }

    #[test]
    fn payload_has_single_body_field() -> TestResult {
        let encoded = serde_json::to_string(&CommentPayload { body: "a \"quoted\"\nline" })?;
        assert_eq!(encoded, r#"{"body":"a \"quoted\"\nline"}"#);
        Ok(())
    }

    #[tokio::test]
    async fn posts_json_with_token_query() -> TestResult {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/repos/acme/widgets/issues/42/comments"))
            .and(query_param("access_token", "tok"))
            .and(header("accept", JSON))
            .and(header("content-type", JSON))
            .and(body_json(serde_json::json!({ "body": "hello" })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let status = post_comment(&Client::new(), &config(&server.uri()), "hello").await?;
        assert_eq!(status, StatusCode::CREATED);
        Ok(())
    }

    #[tokio::test]
    async fn error_status_is_not_a_failure() -> TestResult {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let status = post_comment(&Client::new(), &config(&server.uri()), "hello").await?;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        Ok(())
    }

    #[tokio::test]
    async fn transport_error_hides_token() -> TestResult {
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let address = format!("http://{}", listener.local_addr()?);
        drop(listener);

        let err = post_comment(&Client::new(), &config(&address), "hello")
            .await
            .err()
            .ok_or("expected connection failure")?;

        let rendered = format!("{:?}", anyhow::Error::from(err));
        assert!(rendered.contains("/api/v1/repos/acme/widgets/issues/42/comments"));
        assert!(!rendered.contains("access_token"));
        Ok(())
    }

    #[tokio::test]
    async fn invalid_address_is_a_request_error() -> TestResult {
        let err = post_comment(&Client::new(), &config("not a url"), "hello").await;
        assert!(matches!(err, Err(CommentError::Request { .. })));
        Ok(())
    }
}
