//! Project and contract endpoints plus the wire shapes they return.

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::{routes, ApiClient, ApiResponse, ApiResult, MultipartPayload};

/// Locally picked file attached to an upload before the server names it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalFile {
    pub name: String,
}

/// Reference to a file uploaded out-of-band; the wizard only carries ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadedFile {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<LocalFile>,
}

impl UploadedFile {
    pub fn new(id: impl Into<String>, original_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            original_name: Some(original_name.into()),
            file: None,
        }
    }

    pub fn display_name(&self) -> &str {
        self.original_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or_else(|| self.file.as_ref().map(|file| file.name.as_str()))
            .unwrap_or("-")
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ServerAddress {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub providence: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub municipality: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ProjectDetails {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub reference: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub amount: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub currency: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub begin_date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub documents: Vec<UploadedFile>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub address: Vec<ServerAddress>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ContractDetails {
    #[serde(default, deserialize_with = "lenient_string")]
    pub project_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub signed_by: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub position: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub currency: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub amount: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub organization: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub place: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date_of_signing: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub documents: Vec<UploadedFile>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub reference: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CreatedContract {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
}

/// Accepts strings, numbers, booleans and `null` (as empty) for text fields.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        other => other.to_string(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

/// Normalizes `null`, a single object, or a list into a list.
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(
        match Option::<OneOrMany<T>>::deserialize(deserializer)? {
            None => Vec::new(),
            Some(OneOrMany::Many(items)) => items,
            Some(OneOrMany::One(item)) => vec![item],
        },
    )
}

/// Project and contract calls used by the contract wizard.
#[async_trait]
pub trait ContractApi: Send + Sync {
    async fn project_details(&self, project_id: &str) -> ApiResult<ApiResponse>;
    async fn contract_details(&self, contract_id: &str) -> ApiResult<ApiResponse>;
    async fn create_contract(&self, payload: MultipartPayload) -> ApiResult<ApiResponse>;
}

#[async_trait]
impl ContractApi for ApiClient {
    async fn project_details(&self, project_id: &str) -> ApiResult<ApiResponse> {
        debug!(project_id, "fetching project details");
        let route = routes::project_details(project_id);
        self.send(self.authorized(Method::GET, &route)?).await
    }

    async fn contract_details(&self, contract_id: &str) -> ApiResult<ApiResponse> {
        debug!(contract_id, "fetching contract details");
        self.send(
            self.authorized(Method::POST, routes::CONTRACT_DETAILS)?
                .json(&json!({ "contract_id": contract_id })),
        )
        .await
    }

    async fn create_contract(&self, payload: MultipartPayload) -> ApiResult<ApiResponse> {
        debug!(fields = ?payload.names(), "submitting contract");
        let form = payload.into_form()?;
        self.send(self.authorized(Method::POST, routes::CONTRACT_CREATE)?.multipart(form))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_accept_single_object_or_list() {
        let single: ContractDetails = serde_json::from_value(json!({
            "project_id": 12,
            "amount": "1500.00",
            "documents": { "id": 3, "original_name": "scan.pdf" },
        }))
        .unwrap();
        assert_eq!(single.project_id, "12");
        assert_eq!(single.documents, vec![UploadedFile::new("3", "scan.pdf")]);

        let many: ContractDetails = serde_json::from_value(json!({
            "documents": [
                { "id": "a", "original_name": "one.pdf" },
                { "id": "b", "file": { "name": "two.pdf" } },
            ],
        }))
        .unwrap();
        assert_eq!(many.documents.len(), 2);
        assert_eq!(many.documents[1].display_name(), "two.pdf");

        let none: ContractDetails =
            serde_json::from_value(json!({ "documents": null, "reference": null })).unwrap();
        assert!(none.documents.is_empty());
        assert_eq!(none.reference, "");
    }

    #[test]
    fn project_amount_may_be_numeric() {
        let project: ProjectDetails = serde_json::from_value(json!({
            "name": "Bridge",
            "amount": 250000,
            "currency": "USD",
            "address": [{ "city": "Goma" }],
        }))
        .unwrap();
        assert_eq!(project.amount, "250000");
        assert_eq!(project.address[0].city.as_deref(), Some("Goma"));
        assert!(project.documents.is_empty());
    }

    #[test]
    fn display_name_prefers_server_name() {
        let file = UploadedFile {
            id: "1".into(),
            original_name: Some("server.pdf".into()),
            file: Some(LocalFile {
                name: "local.pdf".into(),
            }),
        };
        assert_eq!(file.display_name(), "server.pdf");
    }
}
