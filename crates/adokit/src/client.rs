//! High-level client for variable group resources.
//!
//! This module provides the [`Client`] used to look up projects, list and
//! find variable groups, and issue create/update/delete requests. All remote
//! access goes through the [`RequestSender`] seam, so the client itself is
//! testable without a network.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::payload::GroupPayload;
use crate::sender::rest::RestSender;
use crate::sender::{Method, RequestSender};
use crate::types::{ProjectRef, VariableGroupRef};

/// REST API version for variable group endpoints.
const GROUPS_API_VERSION: &str = "7.1-preview.2";

/// REST API version for the organization project listing.
const PROJECTS_API_VERSION: &str = "7.1";

/// Client scoped to one organization.
///
/// # Example
///
/// ```no_run
/// use adokit::Client;
///
/// let client = Client::new("https://dev.azure.com/contoso", "pat-token");
/// let project = client.resolve_project("Fabrikam").unwrap();
/// for group in client.list_all(&project).unwrap() {
///     println!("{:>6}  {}", group.id, group.name);
/// }
/// ```
pub struct Client {
    sender: Box<dyn RequestSender>,
    org_url: String,
}

impl Client {
    /// Create a client against an organization URL, authenticating with a
    /// personal access token.
    #[must_use]
    pub fn new(org_url: impl Into<String>, pat: &str) -> Self {
        Self::with_sender(org_url, Box::new(RestSender::with_pat(pat)))
    }

    /// Create a client with a custom sender (useful for testing).
    #[must_use]
    pub fn with_sender(org_url: impl Into<String>, sender: Box<dyn RequestSender>) -> Self {
        let mut org_url = org_url.into();
        while org_url.ends_with('/') {
            org_url.pop();
        }
        Self { sender, org_url }
    }

    /// The organization base URL this client is scoped to.
    #[must_use]
    pub fn org_url(&self) -> &str {
        &self.org_url
    }

    // =========================================================================
    // URL builders
    // =========================================================================

    fn projects_url(&self) -> String {
        format!(
            "{}/_apis/projects?api-version={PROJECTS_API_VERSION}",
            self.org_url
        )
    }

    fn list_url(&self, project: &ProjectRef) -> String {
        format!(
            "{}/{}/_apis/distributedtask/variablegroups?api-version={GROUPS_API_VERSION}",
            self.org_url,
            urlencoding::encode(&project.name)
        )
    }

    fn filter_url(&self, project: &ProjectRef, name: &str) -> String {
        format!(
            "{}/{}/_apis/distributedtask/variablegroups?groupName={}&api-version={GROUPS_API_VERSION}",
            self.org_url,
            urlencoding::encode(&project.name),
            urlencoding::encode(name)
        )
    }

    fn create_url(&self) -> String {
        format!(
            "{}/_apis/distributedtask/variablegroups?api-version={GROUPS_API_VERSION}",
            self.org_url
        )
    }

    fn group_url(&self, id: u64) -> String {
        format!(
            "{}/_apis/distributedtask/variablegroups/{id}?api-version={GROUPS_API_VERSION}",
            self.org_url
        )
    }

    fn delete_url(&self, project: &ProjectRef, id: u64) -> String {
        format!(
            "{}/_apis/distributedtask/variablegroups/{id}?projectIds={}&api-version={GROUPS_API_VERSION}",
            self.org_url,
            urlencoding::encode(&project.id)
        )
    }

    // =========================================================================
    // Directory operations
    // =========================================================================

    /// Resolve a project by name from the organization project list.
    ///
    /// Project names are matched case-insensitively, as the service treats
    /// them. A project that cannot be found is fatal to the whole run, so
    /// this returns an error rather than an absent value.
    pub fn resolve_project(&self, name: &str) -> Result<ProjectRef> {
        let url = self.projects_url();
        let body = self
            .sender
            .send(Method::Get, &url, None)
            .map_err(|e| Error::remote_query("GET", &url, e))?;

        entries(&body)
            .iter()
            .find_map(|entry| {
                let id = entry.get("id")?.as_str()?;
                let entry_name = entry.get("name")?.as_str()?;
                entry_name
                    .eq_ignore_ascii_case(name)
                    .then(|| ProjectRef::new(id, entry_name))
            })
            .ok_or_else(|| Error::ProjectNotFound(name.to_string()))
    }

    /// List every variable group in the project.
    ///
    /// An empty project is a valid outcome, not an error. Listing entries
    /// without a usable positive id are skipped.
    pub fn list_all(&self, project: &ProjectRef) -> Result<Vec<VariableGroupRef>> {
        let url = self.list_url(project);
        let body = self
            .sender
            .send(Method::Get, &url, None)
            .map_err(|e| Error::remote_query("GET", &url, e))?;
        Ok(entries(&body).iter().filter_map(group_ref).collect())
    }

    /// Find a variable group by exact name.
    ///
    /// The remote filter matches names case-insensitively, so the exact
    /// (case-sensitive) comparison happens here. Zero matches, entries with
    /// malformed ids, and near-miss names all yield `Ok(None)`.
    pub fn find_by_name(
        &self,
        project: &ProjectRef,
        name: &str,
    ) -> Result<Option<VariableGroupRef>> {
        let url = self.filter_url(project, name);
        let body = self
            .sender
            .send(Method::Get, &url, None)
            .map_err(|e| Error::remote_query("GET", &url, e))?;
        Ok(entries(&body)
            .iter()
            .filter_map(group_ref)
            .find(|group| group.name == name))
    }

    // =========================================================================
    // Write operations
    // =========================================================================

    /// Create a new variable group in the project.
    pub fn create(&self, project: &ProjectRef, payload: &GroupPayload) -> Result<VariableGroupRef> {
        let url = self.create_url();
        let body = payload.create_body(project);
        let response = self
            .sender
            .send(Method::Post, &url, Some(&body))
            .map_err(|e| Error::remote_write(&payload.name, "POST", &url, e))?;

        log::info!("created variable group '{}'", payload.name);
        group_ref(&response).ok_or_else(|| Error::RemoteWrite {
            name: payload.name.clone(),
            method: "POST",
            url,
            message: "response missing a usable group id".to_string(),
            status: None,
        })
    }

    /// Replace the variable group with the given remote id.
    pub fn update(
        &self,
        project: &ProjectRef,
        id: u64,
        payload: &GroupPayload,
    ) -> Result<VariableGroupRef> {
        let url = self.group_url(id);
        let body = payload.update_body(project, id);
        let response = self
            .sender
            .send(Method::Put, &url, Some(&body))
            .map_err(|e| Error::remote_write(&payload.name, "PUT", &url, e))?;

        log::info!("updated variable group '{}' (id {id})", payload.name);
        Ok(group_ref(&response).unwrap_or_else(|| VariableGroupRef {
            id,
            name: payload.name.clone(),
        }))
    }

    /// Delete a variable group from the project.
    pub fn delete(&self, project: &ProjectRef, group: &VariableGroupRef) -> Result<()> {
        let url = self.delete_url(project, group.id);
        self.sender
            .send(Method::Delete, &url, None)
            .map_err(|e| Error::remote_write(&group.name, "DELETE", &url, e))?;

        log::info!("deleted variable group '{}' (id {})", group.name, group.id);
        Ok(())
    }
}

/// The `value` array of a collection response, or empty.
fn entries(body: &Value) -> &[Value] {
    body.get("value")
        .and_then(Value::as_array)
        .map_or(&[], Vec::as_slice)
}

/// Extract a minimal group projection from a listing entry.
///
/// Entries whose id is missing, non-integer, or not positive are treated as
/// absent rather than as data-integrity errors.
fn group_ref(entry: &Value) -> Option<VariableGroupRef> {
    let name = entry.get("name")?.as_str()?.to_string();
    match entry.get("id").and_then(Value::as_u64) {
        Some(id) if id > 0 => Some(VariableGroupRef { id, name }),
        _ => {
            log::debug!("skipping listing entry '{name}' with missing or non-positive id");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sender::{MockSender, SendError};
    use serde_json::json;
    use std::collections::BTreeMap;

    const ORG: &str = "https://dev.azure.com/contoso";

    struct FailingSender;

    impl RequestSender for FailingSender {
        fn send(
            &self,
            _method: Method,
            _url: &str,
            _body: Option<&Value>,
        ) -> std::result::Result<Value, SendError> {
            Err(SendError::new("connection refused", None))
        }
    }

    fn mock_client() -> (MockSender, Client, ProjectRef) {
        let mock = MockSender::with_project("guid-1", "Fabrikam");
        let client = Client::with_sender(ORG, Box::new(mock.clone()));
        let project = ProjectRef::new("guid-1", "Fabrikam");
        (mock, client, project)
    }

    fn payload(name: &str) -> GroupPayload {
        GroupPayload {
            name: name.to_string(),
            description: String::new(),
            group_type: "Vsts".to_string(),
            variables: BTreeMap::new(),
        }
    }

    #[test]
    fn test_url_builders() {
        let client = Client::with_sender(ORG, Box::new(MockSender::new()));
        let project = ProjectRef::new("guid-1", "Fabrikam");

        assert_eq!(
            client.projects_url(),
            "https://dev.azure.com/contoso/_apis/projects?api-version=7.1"
        );
        assert_eq!(
            client.list_url(&project),
            "https://dev.azure.com/contoso/Fabrikam/_apis/distributedtask/variablegroups?api-version=7.1-preview.2"
        );
        assert_eq!(
            client.filter_url(&project, "release vars"),
            "https://dev.azure.com/contoso/Fabrikam/_apis/distributedtask/variablegroups?groupName=release%20vars&api-version=7.1-preview.2"
        );
        assert_eq!(
            client.group_url(42),
            "https://dev.azure.com/contoso/_apis/distributedtask/variablegroups/42?api-version=7.1-preview.2"
        );
        assert_eq!(
            client.delete_url(&project, 42),
            "https://dev.azure.com/contoso/_apis/distributedtask/variablegroups/42?projectIds=guid-1&api-version=7.1-preview.2"
        );
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = Client::with_sender("https://dev.azure.com/contoso/", Box::new(MockSender::new()));
        assert_eq!(client.org_url(), ORG);
    }

    #[test]
    fn test_resolve_project_case_insensitive() {
        let (_, client, _) = mock_client();
        let project = client.resolve_project("fabrikam").unwrap();
        assert_eq!(project.id, "guid-1");
        assert_eq!(project.name, "Fabrikam");
    }

    #[test]
    fn test_resolve_project_not_found() {
        let (_, client, _) = mock_client();
        let err = client.resolve_project("Missing").unwrap_err();
        assert!(matches!(err, Error::ProjectNotFound(_)));
    }

    #[test]
    fn test_list_all_empty_project_is_ok() {
        let (_, client, project) = mock_client();
        assert!(client.list_all(&project).unwrap().is_empty());
    }

    #[test]
    fn test_list_all_returns_refs() {
        let (mut mock, client, project) = mock_client();
        mock.add_group(4, "release-vars");
        mock.add_group(9, "deploy-vars");

        let listing = client.list_all(&project).unwrap();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0], VariableGroupRef { id: 4, name: "release-vars".to_string() });
    }

    #[test]
    fn test_list_all_skips_malformed_ids() {
        let (mut mock, client, project) = mock_client();
        mock.add_group(4, "good");
        mock.push_raw_group(json!({ "id": 0, "name": "zero" }));
        mock.push_raw_group(json!({ "id": "abc", "name": "stringy" }));
        mock.push_raw_group(json!({ "name": "missing" }));

        let listing = client.list_all(&project).unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].name, "good");
    }

    #[test]
    fn test_find_by_name_absent_on_empty_listing() {
        let (_, client, project) = mock_client();
        assert!(client.find_by_name(&project, "anything").unwrap().is_none());
    }

    #[test]
    fn test_find_by_name_requires_exact_case() {
        let (mut mock, client, project) = mock_client();
        mock.add_group(7, "Deploy");

        // The remote filter returns the near-miss; exact matching rejects it.
        assert!(client.find_by_name(&project, "deploy").unwrap().is_none());
        let found = client.find_by_name(&project, "Deploy").unwrap().unwrap();
        assert_eq!(found.id, 7);
    }

    #[test]
    fn test_find_by_name_malformed_id_is_absent() {
        let (mut mock, client, project) = mock_client();
        mock.push_raw_group(json!({ "id": 0, "name": "broken" }));
        assert!(client.find_by_name(&project, "broken").unwrap().is_none());
    }

    #[test]
    fn test_create_returns_remote_identity() {
        let (mock, client, project) = mock_client();
        let created = client.create(&project, &payload("release-vars")).unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.name, "release-vars");
        assert_eq!(mock.group_names(), vec!["release-vars"]);
    }

    #[test]
    fn test_update_replaces_by_id() {
        let (mut mock, client, project) = mock_client();
        mock.add_group(5, "old-name");

        let updated = client.update(&project, 5, &payload("old-name")).unwrap();
        assert_eq!(updated.id, 5);
        assert_eq!(mock.group_count(), 1);
    }

    #[test]
    fn test_delete_removes_group() {
        let (mut mock, client, project) = mock_client();
        mock.add_group(5, "victim");

        let group = VariableGroupRef { id: 5, name: "victim".to_string() };
        client.delete(&project, &group).unwrap();
        assert_eq!(mock.group_count(), 0);
    }

    #[test]
    fn test_query_failure_maps_to_remote_query() {
        let client = Client::with_sender(ORG, Box::new(FailingSender));
        let project = ProjectRef::new("guid-1", "Fabrikam");

        let err = client.list_all(&project).unwrap_err();
        match err {
            Error::RemoteQuery { method, url, message, .. } => {
                assert_eq!(method, "GET");
                assert!(url.contains("variablegroups"));
                assert!(message.contains("connection refused"));
            }
            other => panic!("expected RemoteQuery, got {other:?}"),
        }
    }

    #[test]
    fn test_write_failure_carries_target_name() {
        let client = Client::with_sender(ORG, Box::new(FailingSender));
        let project = ProjectRef::new("guid-1", "Fabrikam");

        let err = client.create(&project, &payload("release-vars")).unwrap_err();
        match err {
            Error::RemoteWrite { name, method, .. } => {
                assert_eq!(name, "release-vars");
                assert_eq!(method, "POST");
            }
            other => panic!("expected RemoteWrite, got {other:?}"),
        }
    }
}
