use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{FolderList, NoteBody, NoteList, ParsedDraft};

/// Anything that can go wrong talking to the note store.
#[derive(Debug, Error)]
pub enum TransportFailure {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: Box<ureq::Transport>,
    },
    #[error("note store answered {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, TransportFailure>;

/// The four round trips the client makes against a note store.
pub trait NoteStore: Send + Sync {
    fn list_folders(&self) -> Result<Vec<String>>;
    fn list_notes(&self, folder: &str) -> Result<Vec<String>>;
    fn read_note(&self, folder: &str, filename: &str) -> Result<String>;
    fn write_note(&self, note: &ParsedDraft) -> Result<()>;
}

pub struct HttpNoteStore {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpNoteStore {
    pub fn new(base_url: &str) -> HttpNoteStore {
        HttpNoteStore {
            agent: ureq::AgentBuilder::new().build(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        let response = self.agent.get(&url).call().map_err(|e| failure(&url, e))?;
        response
            .into_json()
            .map_err(|source| TransportFailure::Decode { url, source })
    }
}

impl NoteStore for HttpNoteStore {
    fn list_folders(&self) -> Result<Vec<String>> {
        let list: FolderList = self.get_json(self.url(&["folders"]))?;
        Ok(list.folders)
    }

    fn list_notes(&self, folder: &str) -> Result<Vec<String>> {
        let list: NoteList = self.get_json(self.url(&["notes", folder]))?;
        Ok(list.notes)
    }

    fn read_note(&self, folder: &str, filename: &str) -> Result<String> {
        let note: NoteBody = self.get_json(self.url(&["note", folder, filename]))?;
        Ok(note.content)
    }

    fn write_note(&self, note: &ParsedDraft) -> Result<()> {
        let url = self.url(&["note"]);
        self.agent
            .post(&url)
            .send_json(note)
            .map_err(|e| failure(&url, e))?;
        Ok(())
    }
}

fn failure(url: &str, error: ureq::Error) -> TransportFailure {
    match error {
        ureq::Error::Status(status, _) => TransportFailure::Status {
            url: url.to_string(),
            status,
        },
        ureq::Error::Transport(transport) => TransportFailure::Request {
            url: url.to_string(),
            source: Box::new(transport),
        },
    }
}

/// A gateway call the controller wants made.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    ListFolders,
    ListNotes { folder: String },
    ReadNote { folder: String, filename: String },
    WriteNote(ParsedDraft),
}

/// The outcome of a `Request`, keyed by what was asked for.
#[derive(Debug)]
pub enum Reply {
    Folders(Result<Vec<String>>),
    Notes {
        folder: String,
        result: Result<Vec<String>>,
    },
    Note {
        folder: String,
        filename: String,
        result: Result<String>,
    },
    Written(Result<()>),
}

/// Performs one request against the store. Exactly one round trip.
pub fn execute(store: &dyn NoteStore, request: Request) -> Reply {
    match request {
        Request::ListFolders => Reply::Folders(store.list_folders()),
        Request::ListNotes { folder } => {
            let result = store.list_notes(&folder);
            Reply::Notes { folder, result }
        }
        Request::ReadNote { folder, filename } => {
            let result = store.read_note(&folder, &filename);
            Reply::Note {
                folder,
                filename,
                result,
            }
        }
        Request::WriteNote(note) => Reply::Written(store.write_note(&note)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    struct Captured {
        request_line: String,
        body: String,
    }

    /// Serves exactly one HTTP request with the given status and body.
    fn serve_once(status: &str, body: &str) -> (String, mpsc::Receiver<Captured>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();

            let mut content_length = 0;
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).unwrap();
                let header = header.trim_end();
                if header.is_empty() {
                    break;
                }
                if let Some((name, value)) = header.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
            }
            let mut body = vec![0; content_length];
            reader.read_exact(&mut body).unwrap();

            let mut stream = stream;
            stream.write_all(response.as_bytes()).unwrap();
            tx.send(Captured {
                request_line: request_line.trim_end().to_string(),
                body: String::from_utf8(body).unwrap(),
            })
            .unwrap();
        });

        (format!("http://{addr}"), rx)
    }

    #[test]
    fn lists_folders() {
        let (url, rx) = serve_once("200 OK", r#"{"folders":["work","home"]}"#);
        let store = HttpNoteStore::new(&url);
        assert_eq!(store.list_folders().unwrap(), vec!["work", "home"]);
        assert_eq!(rx.recv().unwrap().request_line, "GET /folders HTTP/1.1");
    }

    #[test]
    fn missing_notes_field_is_empty() {
        let (url, _rx) = serve_once("200 OK", "{}");
        let store = HttpNoteStore::new(&format!("{url}/"));
        assert!(store.list_notes("work").unwrap().is_empty());
    }

    #[test]
    fn encodes_path_segments() {
        let (url, rx) = serve_once("200 OK", r#"{"content":"hi"}"#);
        let store = HttpNoteStore::new(&url);
        assert_eq!(store.read_note("my notes", "a/b.txt").unwrap(), "hi");
        assert_eq!(
            rx.recv().unwrap().request_line,
            "GET /note/my%20notes/a%2Fb.txt HTTP/1.1"
        );
    }

    #[test]
    fn posts_note_as_json() {
        let (url, rx) = serve_once("200 OK", r#"{"ok":true}"#);
        let store = HttpNoteStore::new(&url);
        let note = ParsedDraft::parse("work\ntodo.txt\nbuy milk\ncall mom").unwrap();
        store.write_note(&note).unwrap();

        let captured = rx.recv().unwrap();
        assert_eq!(captured.request_line, "POST /note HTTP/1.1");
        let body: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "folder": "work", "filename": "todo.txt", "content": "buy milk\ncall mom" })
        );
    }

    #[test]
    fn non_success_status_is_a_failure() {
        let (url, _rx) = serve_once("500 Internal Server Error", "{}");
        let store = HttpNoteStore::new(&url);
        let err = store.list_folders().unwrap_err();
        assert!(matches!(err, TransportFailure::Status { status: 500, .. }));
    }

    #[test]
    fn malformed_json_is_a_failure() {
        let (url, _rx) = serve_once("200 OK", "not json");
        let store = HttpNoteStore::new(&url);
        let err = store.read_note("work", "todo.txt").unwrap_err();
        assert!(matches!(err, TransportFailure::Decode { .. }));
    }

    #[test]
    fn unreachable_store_is_a_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let store = HttpNoteStore::new(&format!("http://{addr}"));
        let err = store.list_folders().unwrap_err();
        assert!(matches!(err, TransportFailure::Request { .. }));
    }
}
