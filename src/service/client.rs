use async_trait::async_trait;
use reqwest::{multipart, Client};
use serde::Deserialize;
use serde_json::Value;

use crate::state::data::{AnalysisResult, SelectedImage};
use crate::state::error::{AnalysisError, ConfigError};

/// Multipart field the analysis service reads the upload from
pub const FILE_FIELD: &str = "file";

/// Anything that can classify a nutrition label image
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyze(&self, image: SelectedImage) -> Result<AnalysisResult, AnalysisError>;
}

/// HTTP client for `POST <base>/analyze`
#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    http: Client,
    endpoint: String,
}

/// Failure body of the analysis service
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
}

impl HttpAnalysisClient {
    /// Build a client for the service rooted at `base_url`
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let http = Client::builder()
            .user_agent(concat!("nutrix/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint: format!("{}/analyze", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisClient {
    async fn analyze(&self, image: SelectedImage) -> Result<AnalysisResult, AnalysisError> {
        let part = multipart::Part::bytes(image.bytes().to_vec())
            .file_name(image.name().to_string())
            .mime_str(image.media_type())
            .map_err(|e| AnalysisError::Transport(e.to_string()))?;
        let form = multipart::Form::new().part(FILE_FIELD, part);

        tracing::info!(endpoint = %self.endpoint, file = image.name(), "submitting image for analysis");

        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AnalysisError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| AnalysisError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "analysis service rejected request");
            return Err(AnalysisError::Service {
                status: status.as_u16(),
                detail: error_detail(&body),
            });
        }

        AnalysisResult::from_json(&body).map_err(|e| AnalysisError::InvalidResponse(e.to_string()))
    }
}

/// Pull a displayable `detail` out of a failure body
///
/// Plain strings are used verbatim. Lists of validation entries are
/// reduced to their `msg` fields.
fn error_detail(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;

    match parsed.detail? {
        Value::String(detail) => Some(detail),
        Value::Array(entries) => {
            let messages: Vec<&str> = entries
                .iter()
                .filter_map(|entry| entry.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::{Classification, NutritionData, PickedFile};
    use crate::state::error::ANALYSIS_FAILED;
    use axum::{
        extract::{Multipart, State},
        http::StatusCode,
        response::IntoResponse,
        routing::post,
        Router,
    };
    use std::sync::Arc;
    use tokio::net::TcpListener;
    use tokio::sync::{oneshot, Mutex};

    /// What the fake service saw in the upload
    #[derive(Debug)]
    struct ReceivedPart {
        field: String,
        file_name: Option<String>,
        content_type: Option<String>,
        bytes: Vec<u8>,
    }

    #[derive(Clone)]
    struct ServerState {
        status: StatusCode,
        body: &'static str,
        tx: Arc<Mutex<Option<oneshot::Sender<ReceivedPart>>>>,
    }

    async fn handle_analyze(
        State(state): State<ServerState>,
        mut multipart: Multipart,
    ) -> impl IntoResponse {
        if let Ok(Some(field)) = multipart.next_field().await {
            let received = ReceivedPart {
                field: field.name().unwrap_or_default().to_string(),
                file_name: field.file_name().map(str::to_string),
                content_type: field.content_type().map(str::to_string),
                bytes: field.bytes().await.map(|b| b.to_vec()).unwrap_or_default(),
            };
            if let Some(tx) = state.tx.lock().await.take() {
                let _ = tx.send(received);
            }
        }
        (state.status, state.body)
    }

    async fn spawn_analysis_server(
        status: StatusCode,
        body: &'static str,
    ) -> (String, oneshot::Receiver<ReceivedPart>) {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let (tx, rx) = oneshot::channel();
        let state = ServerState {
            status,
            body,
            tx: Arc::new(Mutex::new(Some(tx))),
        };
        let app = Router::new()
            .route("/analyze", post(handle_analyze))
            .with_state(state);
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        (format!("http://{addr}"), rx)
    }

    fn label_image() -> SelectedImage {
        SelectedImage::try_from(PickedFile {
            name: "label.jpg".to_string(),
            media_type: "image/jpeg".to_string(),
            bytes: Arc::from(&b"\xff\xd8\xff fake jpeg"[..]),
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_ignores_trailing_slash() {
        let client = HttpAnalysisClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8000/analyze");

        let client = HttpAnalysisClient::new("https://api.example.com/v1").unwrap();
        assert_eq!(client.endpoint(), "https://api.example.com/v1/analyze");
    }

    #[test]
    fn test_error_detail_shapes() {
        assert_eq!(error_detail(br#"{"detail":"Unreadable label"}"#), Some("Unreadable label".into()));
        assert_eq!(
            error_detail(br#"{"detail":[{"loc":["body","file"],"msg":"field required"},{"msg":"bad type"}]}"#),
            Some("field required; bad type".into())
        );
        assert_eq!(error_detail(br#"{"detail":42}"#), None);
        assert_eq!(error_detail(br#"{"error":"x"}"#), None);
        assert_eq!(error_detail(b"<html>Internal Server Error</html>"), None);
    }

    #[tokio::test]
    async fn test_success_returns_parsed_result() {
        let (url, part_rx) = spawn_analysis_server(
            StatusCode::OK,
            r#"{"class":"Safe","score":85,"message":"Good choice","nutrition_data":{"calories":120,"sugar":5,"sat_fat":1,"sodium":90,"fiber":3,"protein":4}}"#,
        )
        .await;
        let client = HttpAnalysisClient::new(&url).unwrap();

        let result = client.analyze(label_image()).await.unwrap();

        assert_eq!(
            result,
            AnalysisResult {
                classification: Classification::Safe,
                score: 85.0,
                message: "Good choice".to_string(),
                better_product: None,
                nutrition_data: NutritionData {
                    calories: 120.0,
                    sugar: 5.0,
                    sat_fat: 1.0,
                    sodium: 90.0,
                    fiber: 3.0,
                    protein: 4.0,
                },
                extracted_text: None,
            }
        );

        let part = part_rx.await.expect("server saw upload");
        assert_eq!(part.field, "file");
        assert_eq!(part.file_name.as_deref(), Some("label.jpg"));
        assert_eq!(part.content_type.as_deref(), Some("image/jpeg"));
        assert_eq!(part.bytes, b"\xff\xd8\xff fake jpeg");
    }

    #[tokio::test]
    async fn test_bad_request_surfaces_detail() {
        let (url, _rx) =
            spawn_analysis_server(StatusCode::BAD_REQUEST, r#"{"detail":"Unreadable label"}"#).await;
        let client = HttpAnalysisClient::new(&url).unwrap();

        let err = client.analyze(label_image()).await.unwrap_err();

        assert_eq!(
            err,
            AnalysisError::Service {
                status: 400,
                detail: Some("Unreadable label".into())
            }
        );
        assert_eq!(err.user_message(), "Unreadable label");
    }

    #[tokio::test]
    async fn test_server_error_with_unparseable_body() {
        let (url, _rx) =
            spawn_analysis_server(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").await;
        let client = HttpAnalysisClient::new(&url).unwrap();

        let err = client.analyze(label_image()).await.unwrap_err();

        assert_eq!(err.user_message(), ANALYSIS_FAILED);
    }

    #[tokio::test]
    async fn test_validation_detail_list() {
        let (url, _rx) = spawn_analysis_server(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail":[{"loc":["body","file"],"msg":"Field required","type":"missing"}]}"#,
        )
        .await;
        let client = HttpAnalysisClient::new(&url).unwrap();

        let err = client.analyze(label_image()).await.unwrap_err();

        assert_eq!(err.user_message(), "Field required");
    }

    #[tokio::test]
    async fn test_success_with_malformed_body_is_invalid_response() {
        let (url, _rx) = spawn_analysis_server(StatusCode::OK, r#"{"class":"Safe"}"#).await;
        let client = HttpAnalysisClient::new(&url).unwrap();

        let err = client.analyze(label_image()).await.unwrap_err();

        assert!(matches!(err, AnalysisError::InvalidResponse(_)));
        assert!(!err.user_message().is_empty());
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        // Grab a free port, then close it so nothing is listening
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let client = HttpAnalysisClient::new(&format!("http://{addr}")).unwrap();
        let err = client.analyze(label_image()).await.unwrap_err();

        match &err {
            AnalysisError::Transport(description) => assert!(!description.is_empty()),
            other => panic!("expected transport error, got {:?}", other),
        }
        assert_eq!(err.user_message(), err.to_string());
    }
}
