//! Request-sender trait and implementations.
//!
//! The client needs exactly one capability from its environment: send an
//! authenticated HTTP request and get back a JSON body or a transport error.
//! [`rest::RestSender`] provides that over ureq; [`MockSender`] emulates the
//! variable-group endpoints in memory for tests.
//!
//! # Testing
//!
//! ```
//! use adokit::sender::{Method, MockSender, RequestSender};
//!
//! let mut mock = MockSender::with_project("guid-1", "Fabrikam");
//! mock.add_group(4, "release-vars");
//!
//! let listing = mock
//!     .send(
//!         Method::Get,
//!         "https://mock/Fabrikam/_apis/distributedtask/variablegroups?api-version=7.1-preview.2",
//!         None,
//!     )
//!     .unwrap();
//! assert_eq!(listing["count"], 1);
//! ```

pub mod rest;

use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

/// HTTP method of a request going through the seam.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl Method {
    /// The method as its wire spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// Transport-level failure returned by a sender.
///
/// Carries only what the transport knows; the client layers method, URL, and
/// target-name context on top when converting to [`crate::Error`].
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct SendError {
    /// Error message.
    pub message: String,
    /// HTTP status code if one was received.
    pub status: Option<u16>,
}

impl SendError {
    /// Create a transport error.
    pub fn new(message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }
}

/// The single capability the client requires from its environment.
///
/// Authentication is entirely the sender's concern; the client never sees a
/// credential. Responses with no body (DELETE) surface as `Value::Null`.
pub trait RequestSender: Send + Sync {
    /// Send one request and return the parsed JSON body.
    fn send(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Value, SendError>;
}

/// In-memory sender emulating the variable-group endpoints, for tests.
///
/// Holds a mutable set of groups and a project list, and answers the same
/// routes the real service exposes: the organization project list, the
/// project-scoped group listing (with its case-insensitive `groupName`
/// filter), and create/update/delete. Write failures can be injected per
/// delete id or for all writes.
#[derive(Debug, Clone, Default)]
pub struct MockSender {
    projects: Arc<Mutex<Vec<(String, String)>>>,
    groups: Arc<Mutex<Vec<Value>>>,
    last_id: Arc<Mutex<u64>>,
    failing_deletes: Arc<Mutex<Vec<u64>>>,
    fail_writes: Arc<Mutex<bool>>,
}

impl MockSender {
    /// Create an empty mock with no projects or groups.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock pre-configured with a single project.
    #[must_use]
    pub fn with_project(id: impl Into<String>, name: impl Into<String>) -> Self {
        let mock = Self::new();
        mock.projects
            .lock()
            .unwrap()
            .push((id.into(), name.into()));
        mock
    }

    /// Add a project to the organization listing.
    pub fn add_project(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.projects
            .lock()
            .unwrap()
            .push((id.into(), name.into()));
    }

    /// Seed a well-formed group into the remote listing.
    pub fn add_group(&mut self, id: u64, name: &str) {
        self.groups.lock().unwrap().push(json!({
            "id": id,
            "name": name,
            "type": "Vsts",
            "variables": {},
        }));
        let mut last = self.last_id.lock().unwrap();
        *last = (*last).max(id);
    }

    /// Seed a raw listing entry, including malformed ones (missing or
    /// non-positive ids) that the client must treat as absent.
    pub fn push_raw_group(&mut self, entry: Value) {
        self.groups.lock().unwrap().push(entry);
    }

    /// Make DELETE fail for one id while others keep working.
    pub fn fail_delete(&mut self, id: u64) {
        self.failing_deletes.lock().unwrap().push(id);
    }

    /// Make every create and update fail at the transport.
    pub fn set_fail_writes(&mut self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    /// Names currently present in the emulated listing, in insertion order.
    #[must_use]
    pub fn group_names(&self) -> Vec<String> {
        self.groups
            .lock()
            .unwrap()
            .iter()
            .filter_map(|g| g.get("name").and_then(Value::as_str).map(String::from))
            .collect()
    }

    /// Number of groups currently in the emulated listing.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.lock().unwrap().len()
    }

    fn alloc_id(&self) -> u64 {
        let mut last = self.last_id.lock().unwrap();
        *last += 1;
        *last
    }

    fn listing_response(&self, filter: Option<&str>) -> Value {
        let groups = self.groups.lock().unwrap();
        let value: Vec<Value> = groups
            .iter()
            .filter(|g| {
                // The real service filters groupName case-insensitively;
                // exact matching is the client's job.
                filter.is_none_or(|wanted| {
                    g.get("name")
                        .and_then(Value::as_str)
                        .is_some_and(|name| name.eq_ignore_ascii_case(wanted))
                })
            })
            .cloned()
            .collect();
        json!({ "count": value.len(), "value": value })
    }

    fn projects_response(&self) -> Value {
        let projects = self.projects.lock().unwrap();
        let value: Vec<Value> = projects
            .iter()
            .map(|(id, name)| json!({ "id": id, "name": name }))
            .collect();
        json!({ "count": value.len(), "value": value })
    }
}

/// Extract one query parameter from a URL, percent-decoded.
fn query_param(url: &str, key: &str) -> Option<String> {
    let query = url.split_once('?')?.1;
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key).then(|| urlencoding::decode(v).ok().map(|s| s.into_owned()))?
    })
}

/// Extract the trailing path id from `.../variablegroups/{id}?...`.
fn path_id(url: &str) -> Option<u64> {
    let path = url.split('?').next()?;
    path.rsplit('/').next()?.parse().ok()
}

impl RequestSender for MockSender {
    fn send(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Value, SendError> {
        match method {
            Method::Get if url.contains("/_apis/projects") => Ok(self.projects_response()),
            Method::Get if url.contains("/_apis/distributedtask/variablegroups") => {
                Ok(self.listing_response(query_param(url, "groupName").as_deref()))
            }
            Method::Post => {
                if *self.fail_writes.lock().unwrap() {
                    return Err(SendError::new("HTTP 500", Some(500)));
                }
                let body = body.ok_or_else(|| SendError::new("missing request body", None))?;
                let name = body
                    .get("name")
                    .and_then(Value::as_str)
                    .ok_or_else(|| SendError::new("body missing name", None))?
                    .to_string();
                let id = self.alloc_id();
                let entry = json!({ "id": id, "name": name, "type": "Vsts", "variables": {} });
                self.groups.lock().unwrap().push(entry.clone());
                Ok(entry)
            }
            Method::Put => {
                if *self.fail_writes.lock().unwrap() {
                    return Err(SendError::new("HTTP 500", Some(500)));
                }
                let id = path_id(url).ok_or_else(|| SendError::new("bad update url", None))?;
                let body = body.ok_or_else(|| SendError::new("missing request body", None))?;
                let name = body
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let mut groups = self.groups.lock().unwrap();
                let entry = groups
                    .iter_mut()
                    .find(|g| g.get("id").and_then(Value::as_u64) == Some(id))
                    .ok_or_else(|| SendError::new("HTTP 404", Some(404)))?;
                *entry = json!({ "id": id, "name": name, "type": "Vsts", "variables": {} });
                Ok(entry.clone())
            }
            Method::Delete => {
                let id = path_id(url).ok_or_else(|| SendError::new("bad delete url", None))?;
                if self.failing_deletes.lock().unwrap().contains(&id) {
                    return Err(SendError::new("HTTP 500", Some(500)));
                }
                let mut groups = self.groups.lock().unwrap();
                let before = groups.len();
                groups.retain(|g| g.get("id").and_then(Value::as_u64) != Some(id));
                if groups.len() == before {
                    return Err(SendError::new("HTTP 404", Some(404)));
                }
                Ok(Value::Null)
            }
            Method::Get => Err(SendError::new(format!("unexpected GET {url}"), None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_param_decodes() {
        let url = "https://mock/p/_apis/distributedtask/variablegroups?groupName=release%20vars&api-version=7.1-preview.2";
        assert_eq!(query_param(url, "groupName").as_deref(), Some("release vars"));
        assert_eq!(query_param(url, "missing"), None);
    }

    #[test]
    fn test_path_id() {
        assert_eq!(
            path_id("https://mock/_apis/distributedtask/variablegroups/42?api-version=7.1-preview.2"),
            Some(42)
        );
        assert_eq!(
            path_id("https://mock/_apis/distributedtask/variablegroups?api-version=7.1-preview.2"),
            None
        );
    }

    #[test]
    fn test_mock_listing_filter_is_case_insensitive() {
        let mut mock = MockSender::new();
        mock.add_group(1, "Deploy");

        let all = mock
            .send(Method::Get, "https://mock/p/_apis/distributedtask/variablegroups?api-version=7.1-preview.2", None)
            .unwrap();
        assert_eq!(all["count"], 1);

        let filtered = mock
            .send(
                Method::Get,
                "https://mock/p/_apis/distributedtask/variablegroups?groupName=deploy&api-version=7.1-preview.2",
                None,
            )
            .unwrap();
        assert_eq!(filtered["count"], 1);
        assert_eq!(filtered["value"][0]["name"], "Deploy");
    }

    #[test]
    fn test_mock_create_allocates_increasing_ids() {
        let mock = MockSender::new();
        let first = mock
            .send(
                Method::Post,
                "https://mock/_apis/distributedtask/variablegroups?api-version=7.1-preview.2",
                Some(&json!({ "name": "a" })),
            )
            .unwrap();
        let second = mock
            .send(
                Method::Post,
                "https://mock/_apis/distributedtask/variablegroups?api-version=7.1-preview.2",
                Some(&json!({ "name": "b" })),
            )
            .unwrap();
        assert_eq!(first["id"], 1);
        assert_eq!(second["id"], 2);
        assert_eq!(mock.group_count(), 2);
    }

    #[test]
    fn test_mock_delete_removes_and_404s() {
        let mut mock = MockSender::new();
        mock.add_group(5, "x");

        let url = "https://mock/_apis/distributedtask/variablegroups/5?projectIds=guid&api-version=7.1-preview.2";
        assert!(mock.send(Method::Delete, url, None).is_ok());
        assert_eq!(mock.group_count(), 0);

        let again = mock.send(Method::Delete, url, None);
        assert_eq!(again.unwrap_err().status, Some(404));
    }

    #[test]
    fn test_mock_injected_delete_failure() {
        let mut mock = MockSender::new();
        mock.add_group(5, "x");
        mock.fail_delete(5);

        let url = "https://mock/_apis/distributedtask/variablegroups/5?projectIds=guid&api-version=7.1-preview.2";
        let err = mock.send(Method::Delete, url, None).unwrap_err();
        assert_eq!(err.status, Some(500));
        assert_eq!(mock.group_count(), 1);
    }
}
