use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{NewNote, Notebook};
use crate::error::DeliveryError;
use crate::settings::Settings;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const PING_BANNER: &str = "JoplinClipperServer";

/// Paged list envelope returned by collection endpoints.
#[derive(Debug, Deserialize)]
struct Page<T> {
    items: Vec<T>,
    #[serde(default)]
    has_more: bool,
}

/// Blocking client for the note service.
#[derive(Debug, Clone)]
pub struct NoteClient {
    http: Client,
    base_url: String,
    token: String,
}

impl NoteClient {
    /// Client for the service described by `settings`.
    ///
    /// # Errors
    ///
    /// [`DeliveryError::MissingToken`] when no token is configured.
    pub fn new(settings: &Settings) -> Result<Self, DeliveryError> {
        let token = settings.token.trim();
        if token.is_empty() {
            return Err(DeliveryError::MissingToken);
        }
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: settings.base_url(),
            token: token.to_string(),
        })
    }

    /// Builder: talk to `base_url` instead of `localhost:{port}`.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Create a note; returns the created note as JSON.
    ///
    /// # Errors
    ///
    /// [`DeliveryError::Status`] with the response body for any non-2xx answer.
    pub fn create_note(&self, note: &NewNote) -> Result<serde_json::Value, DeliveryError> {
        tracing::debug!(title = %note.title, parent_id = %note.parent_id, "creating note");
        let body = self.send(self.http.post(self.url("/notes")).json(note))?;
        decode(&body)
    }

    /// Check that the service is up.
    ///
    /// # Errors
    ///
    /// [`DeliveryError::Decode`] when something other than the clipper
    /// service answers.
    pub fn ping(&self) -> Result<(), DeliveryError> {
        let body = self.send(self.http.get(self.url("/ping")))?;
        if body.trim() == PING_BANNER {
            Ok(())
        } else {
            Err(DeliveryError::Decode(format!("unexpected ping response: {}", body.trim())))
        }
    }

    /// All notebooks, following pagination.
    ///
    /// # Errors
    ///
    /// Transport, status and decoding failures.
    pub fn list_notebooks(&self) -> Result<Vec<Notebook>, DeliveryError> {
        let mut notebooks = Vec::new();
        let mut page = 1u32;
        loop {
            let request = self.http.get(self.url("/folders")).query(&[("page", page)]);
            let batch: Page<Notebook> = decode(&self.send(request)?)?;
            notebooks.extend(batch.items);
            if !batch.has_more {
                break;
            }
            page += 1;
        }
        Ok(notebooks)
    }

    /// A single notebook by id.
    ///
    /// # Errors
    ///
    /// Transport, status and decoding failures.
    pub fn notebook(&self, id: &str) -> Result<Notebook, DeliveryError> {
        let body = self.send(self.http.get(self.url(&format!("/folders/{id}"))))?;
        decode(&body)
    }

    /// Notebooks matching `name`.
    ///
    /// # Errors
    ///
    /// Transport, status and decoding failures.
    pub fn search_notebooks(&self, name: &str) -> Result<Vec<Notebook>, DeliveryError> {
        let request = self
            .http
            .get(self.url("/search"))
            .query(&[("query", name), ("type", "folder")]);
        let page: Page<Notebook> = decode(&self.send(request)?)?;
        Ok(page.items)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    fn send(&self, request: RequestBuilder) -> Result<String, DeliveryError> {
        let response = request.query(&[("token", self.token.as_str())]).send()?;
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "note service rejected request");
            return Err(DeliveryError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, DeliveryError> {
    serde_json::from_str(body).map_err(|err| DeliveryError::Decode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::mpsc;
    use std::thread;

    fn settings() -> Settings {
        Settings {
            token: "tok".to_string(),
            ..Settings::default()
        }
    }

    fn client_for(url: &str) -> NoteClient {
        NoteClient::new(&settings()).unwrap().with_base_url(url)
    }

    /// Answer one request with `status` and `body`; the raw request is sent back.
    fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, thread::JoinHandle<()>, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel::<String>();

        let handle = thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let _ = tx.send(read_request(&mut stream));
                let response = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        (format!("http://{addr}"), handle, rx)
    }

    fn read_request(stream: &mut TcpStream) -> String {
        let mut data = Vec::new();
        let mut buffer = [0u8; 1024];
        loop {
            let n = stream.read(&mut buffer).unwrap_or(0);
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buffer[..n]);
            let text = String::from_utf8_lossy(&data);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length").then(|| value.trim().parse::<usize>().ok())?
                    })
                    .unwrap_or(0);
                if data.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&data).into_owned()
    }

    #[test]
    fn missing_token_is_rejected_before_any_request() {
        let err = NoteClient::new(&Settings::default()).unwrap_err();
        assert!(matches!(err, DeliveryError::MissingToken));
        let blank = Settings {
            token: "  ".to_string(),
            ..Settings::default()
        };
        assert!(matches!(NoteClient::new(&blank), Err(DeliveryError::MissingToken)));
    }

    #[test]
    fn create_note_posts_json_with_token() {
        let (url, handle, rx) = serve_once("200 OK", r#"{"id":"n1","title":"T"}"#);
        let note = NewNote {
            title: "T".to_string(),
            body: "- a".to_string(),
            parent_id: "nb".to_string(),
            user_created_time: 42,
            source: "Page".to_string(),
            source_url: "https://example.com/".to_string(),
        };

        let created = client_for(&url).create_note(&note).unwrap();
        assert_eq!(created["id"], "n1");

        let request = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert!(request.starts_with("POST /notes?token=tok HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
        let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
        let sent: NewNote = serde_json::from_str(body).unwrap();
        assert_eq!(sent, note);

        handle.join().unwrap();
    }

    #[test]
    fn non_success_status_surfaces_body() {
        let (url, handle, _rx) = serve_once("403 Forbidden", "Invalid \"token\" parameter");
        let note = NewNote {
            title: String::new(),
            body: String::new(),
            parent_id: String::new(),
            user_created_time: 0,
            source: String::new(),
            source_url: String::new(),
        };

        let err = client_for(&url).create_note(&note).unwrap_err();
        assert_eq!(err.to_string(), "note service error: 403 - Invalid \"token\" parameter");

        handle.join().unwrap();
    }

    #[test]
    fn unreachable_service() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let err = client_for(&format!("http://127.0.0.1:{port}")).ping().unwrap_err();
        assert!(matches!(err, DeliveryError::Unreachable(_)));
    }

    #[test]
    fn ping_checks_banner() {
        let (url, handle, rx) = serve_once("200 OK", "JoplinClipperServer");
        client_for(&url).ping().unwrap();
        let request = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert!(request.starts_with("GET /ping?token=tok "));
        handle.join().unwrap();

        let (url, handle, _rx) = serve_once("200 OK", "nginx");
        assert!(matches!(client_for(&url).ping(), Err(DeliveryError::Decode(_))));
        handle.join().unwrap();
    }

    #[test]
    fn list_notebooks_reads_paged_envelope() {
        let (url, handle, rx) = serve_once(
            "200 OK",
            r#"{"items":[{"id":"a","title":"Clips","parent_id":""},{"id":"b","title":"Work"}],"has_more":false}"#,
        );
        let notebooks = client_for(&url).list_notebooks().unwrap();
        assert_eq!(
            notebooks.iter().map(|n| n.title.as_str()).collect::<Vec<_>>(),
            ["Clips", "Work"]
        );
        let request = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert!(request.starts_with("GET /folders?page=1&token=tok "));
        handle.join().unwrap();
    }

    #[test]
    fn notebook_by_id() {
        let (url, handle, rx) = serve_once("200 OK", r#"{"id":"abc","title":"Clips"}"#);
        let notebook = client_for(&url).notebook("abc").unwrap();
        assert_eq!(notebook.title, "Clips");
        assert!(rx.recv_timeout(Duration::from_secs(1)).unwrap().starts_with("GET /folders/abc?token=tok "));
        handle.join().unwrap();
    }

    #[test]
    fn search_encodes_query() {
        let (url, handle, rx) = serve_once("200 OK", r#"{"items":[{"id":"x","title":"My Clips"}],"has_more":false}"#);
        let found = client_for(&url).search_notebooks("My Clips").unwrap();
        assert_eq!(found.len(), 1);
        let request = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert!(request.starts_with("GET /search?query=My+Clips&type=folder&token=tok "));
        handle.join().unwrap();
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let (url, handle, _rx) = serve_once("200 OK", "not json");
        assert!(matches!(client_for(&url).search_notebooks("x"), Err(DeliveryError::Decode(_))));
        handle.join().unwrap();
    }
}
