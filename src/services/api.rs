//! REST client for the dataset backend
//!
//! Endpoints:
//! - `GET /list` - dataset names
//! - `GET /data?name=&top=` - first rows of a dataset
//! - `POST /query?name=&question=` - natural-language question
//! - `POST /upload` - multipart upload, field `file`
//! - `DELETE /remove?name=` - delete a dataset

use crate::model::rows::{display_value, Row};
use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Failures talking to the backend
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network failure or a body that could not be decoded
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status, with the server's message if it sent one
    #[error("server returned status {status}")]
    Server { status: u16, detail: Option<String> },

    #[error("cannot read {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    /// Text to show the user: the server's message, or `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Server {
                detail: Some(detail),
                ..
            } => detail.clone(),
            _ => fallback.to_string(),
        }
    }

    /// The server's message, if the failure carried one
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Server { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// Reply to a question
#[derive(Debug, Clone, PartialEq)]
pub struct QueryReply {
    /// Plain text, or a base64 PNG when `is_graph` is set
    pub answer: String,
    pub is_graph: bool,
}

#[derive(Deserialize)]
struct RowsBody {
    rows: Vec<Row>,
}

#[derive(Deserialize)]
struct QueryBody {
    answer: Value,
    #[serde(rename = "isGraph", default)]
    is_graph: bool,
}

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    detail: Option<Value>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.detail
            .and_then(|detail| match detail {
                Value::Null => None,
                Value::String(s) => Some(s),
                // Validation errors arrive as a list of {loc, msg, type}
                Value::Array(items) => {
                    let msgs: Vec<String> = items
                        .iter()
                        .map(|item| match item.get("msg") {
                            Some(msg) => display_value(msg),
                            None => item.to_string(),
                        })
                        .collect();
                    Some(msgs.join("; "))
                }
                other => Some(other.to_string()),
            })
            .or(self.error)
    }
}

/// Client for the dataset backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        // Questions can take a long time to answer, so no request timeout
        let http = Client::builder()
            .user_agent(concat!("datadash/", env!("CARGO_PKG_VERSION")))
            .timeout(None::<Duration>)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn list_datasets(&self) -> Result<Vec<String>, ApiError> {
        Self::send(self.http.get(self.url("/list")))
    }

    pub fn fetch_rows(&self, name: &str, top: &str) -> Result<Vec<Row>, ApiError> {
        let request = self
            .http
            .get(self.url("/data"))
            .query(&[("name", name), ("top", top)]);
        let body: RowsBody = Self::send(request)?;
        Ok(body.rows)
    }

    pub fn ask(&self, name: &str, question: &str) -> Result<QueryReply, ApiError> {
        let request = self
            .http
            .post(self.url("/query"))
            .query(&[("name", name), ("question", question)]);
        let body: QueryBody = Self::send(request)?;
        Ok(QueryReply {
            answer: display_value(&body.answer),
            is_graph: body.is_graph,
        })
    }

    pub fn upload(&self, path: &Path) -> Result<String, ApiError> {
        let form = multipart::Form::new()
            .file("file", path)
            .map_err(|source| ApiError::File {
                path: path.to_path_buf(),
                source,
            })?;
        let body: MessageBody = Self::send(self.http.post(self.url("/upload")).multipart(form))?;
        Ok(body.message)
    }

    pub fn remove(&self, name: &str) -> Result<String, ApiError> {
        let request = self
            .http
            .delete(self.url("/remove"))
            .query(&[("name", name)]);
        let body: MessageBody = Self::send(request)?;
        Ok(body.message)
    }

    fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send()?;
        debug!(url = %response.url(), status = %response.status(), "backend response");
        Self::decode(response)
    }

    fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json()?);
        }

        let body = response.text().unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .unwrap_or_default()
            .into_message();
        warn!(status = status.as_u16(), detail = ?detail, "backend error");
        Err(ApiError::Server {
            status: status.as_u16(),
            detail,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn client(server: &mockito::Server) -> ApiClient {
        ApiClient::new(&server.url()).unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let api = ApiClient::new("http://127.0.0.1:5000/").unwrap();
        assert_eq!(api.url("/list"), "http://127.0.0.1:5000/list");
    }

    #[test]
    fn test_list_datasets() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/list")
            .with_header("content-type", "application/json")
            .with_body(r#"["inventory","sales"]"#)
            .create();

        let names = client(&server).list_datasets().unwrap();

        mock.assert();
        assert_eq!(names, vec!["inventory", "sales"]);
    }

    #[test]
    fn test_fetch_rows_keeps_key_order() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/data")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("name".into(), "sales".into()),
                Matcher::UrlEncoded("top".into(), "3".into()),
            ]))
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"rows":[
                    {"id":1,"amount":10.5,"date":"2024-01-01"},
                    {"id":2,"amount":20,"date":"2024-01-02"},
                    {"id":3,"amount":30,"date":"2024-01-03"}]}"#,
            )
            .create();

        let rows = client(&server).fetch_rows("sales", "3").unwrap();

        mock.assert();
        assert_eq!(rows.len(), 3);
        let keys: Vec<&str> = rows[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "amount", "date"]);
    }

    #[test]
    fn test_fetch_rows_server_detail() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/data")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body(r#"{"detail":"No matching file in 'data' folder for base 'ghost'."}"#)
            .create();

        let err = client(&server).fetch_rows("ghost", "5").unwrap_err();

        assert_eq!(
            err.user_message("Error fetching data"),
            "No matching file in 'data' folder for base 'ghost'."
        );
    }

    #[test]
    fn test_validation_detail_is_flattened() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/data")
            .match_query(Matcher::Any)
            .with_status(422)
            .with_body(
                r#"{"detail":[{"loc":["query","top"],"msg":"Input should be a valid integer","type":"int_parsing"}]}"#,
            )
            .create();

        let err = client(&server).fetch_rows("sales", "abc").unwrap_err();

        assert_eq!(err.detail(), Some("Input should be a valid integer"));
    }

    #[test]
    fn test_server_error_without_body_uses_fallback() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/data")
            .match_query(Matcher::Any)
            .with_status(502)
            .with_body("Bad Gateway")
            .create();

        let err = client(&server).fetch_rows("sales", "5").unwrap_err();

        assert!(matches!(err, ApiError::Server { status: 502, detail: None }));
        assert_eq!(err.user_message("Error fetching data"), "Error fetching data");
    }

    #[test]
    fn test_ask_text_answer() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/query")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("name".into(), "sales".into()),
                Matcher::UrlEncoded("question".into(), "average amount?".into()),
            ]))
            .with_body(r#"{"answer":"42.5","isGraph":false}"#)
            .create();

        let reply = client(&server).ask("sales", "average amount?").unwrap();

        mock.assert();
        assert_eq!(
            reply,
            QueryReply {
                answer: "42.5".into(),
                is_graph: false
            }
        );
    }

    #[test]
    fn test_ask_graph_answer() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/query")
            .match_query(Matcher::Any)
            .with_body(r#"{"answer":"iVBORw0KGgo=","isGraph":true}"#)
            .create();

        let reply = client(&server).ask("sales", "plot amounts").unwrap();

        assert!(reply.is_graph);
        assert_eq!(reply.answer, "iVBORw0KGgo=");
    }

    #[test]
    fn test_ask_error_field() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/query")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body(r#"{"error":"llm unavailable"}"#)
            .create();

        let err = client(&server).ask("sales", "q").unwrap_err();

        assert_eq!(err.detail(), Some("llm unavailable"));
    }

    #[test]
    fn test_malformed_body_is_transport_error() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/list")
            .with_body("not json")
            .create();

        let err = client(&server).list_datasets().unwrap_err();

        assert!(matches!(err, ApiError::Transport(_)));
        assert_eq!(err.user_message("Request failed"), "Request failed");
    }

    #[test]
    fn test_unreachable_backend_is_transport_error() {
        let api = ApiClient::new("http://127.0.0.1:1").unwrap();
        assert!(matches!(api.list_datasets(), Err(ApiError::Transport(_))));
    }

    #[test]
    fn test_upload_multipart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "id,amount").unwrap();
        writeln!(file, "1,10").unwrap();

        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/upload")
            .match_header(
                "content-type",
                Matcher::Regex("multipart/form-data".into()),
            )
            .match_body(Matcher::Regex(r#"name="file"; filename="sales.csv""#.into()))
            .with_body(r#"{"message":"File 'sales.csv' uploaded successfully!"}"#)
            .create();

        let message = client(&server).upload(&path).unwrap();

        mock.assert();
        assert_eq!(message, "File 'sales.csv' uploaded successfully!");
    }

    #[test]
    fn test_upload_missing_file() {
        let api = ApiClient::new("http://127.0.0.1:1").unwrap();
        let err = api.upload(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, ApiError::File { .. }));
    }

    #[test]
    fn test_remove() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("DELETE", "/remove")
            .match_query(Matcher::UrlEncoded("name".into(), "sales".into()))
            .with_body(r#"{"message":"Dataset 'sales' removed successfully."}"#)
            .create();

        let message = client(&server).remove("sales").unwrap();

        mock.assert();
        assert_eq!(message, "Dataset 'sales' removed successfully.");
    }

    #[test]
    fn test_remove_not_found() {
        let mut server = mockito::Server::new();
        server
            .mock("DELETE", "/remove")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"detail":"File not found on disk."}"#)
            .create();

        let err = client(&server).remove("ghost").unwrap_err();

        assert_eq!(err.user_message("Remove request failed"), "File not found on disk.");
    }
}
