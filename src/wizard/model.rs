//! Wizard state records and the single merge from info form to review data.

use serde::{Deserialize, Serialize};

use crate::api::contract::{ContractDetails, ProjectDetails, ServerAddress, UploadedFile};
use crate::currency::normalize_amount;

pub const DEFAULT_CURRENCY: &str = "USD";

/// Values held by the info step; survives back-navigation from the review step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractDraft {
    pub signed_by: String,
    pub position: String,
    pub organization: String,
    pub amount: String,
    pub currency: String,
    pub date_of_signing: String,
    pub place: String,
    pub reference: String,
    pub name: String,
    pub contract_files: Vec<UploadedFile>,
}

impl Default for ContractDraft {
    fn default() -> Self {
        Self {
            signed_by: String::new(),
            position: String::new(),
            organization: String::new(),
            amount: String::new(),
            currency: DEFAULT_CURRENCY.to_string(),
            date_of_signing: String::new(),
            place: String::new(),
            reference: String::new(),
            name: String::new(),
            contract_files: Vec::new(),
        }
    }
}

impl ContractDraft {
    /// Draft seeded from an existing contract; `amount` is normalized
    /// (`"1500.00"` -> `"1500"`).
    pub fn from_details(details: &ContractDetails) -> Self {
        Self {
            signed_by: details.signed_by.clone(),
            position: details.position.clone(),
            organization: details.organization.clone(),
            amount: normalize_amount(&details.amount),
            currency: details.currency.clone(),
            date_of_signing: details.date_of_signing.clone(),
            place: details.place.clone(),
            reference: details.reference.clone(),
            name: details.name.clone(),
            contract_files: details.documents.clone(),
        }
    }

    pub fn to_info(&self) -> ContractInfo {
        ContractInfo {
            signed_by: self.signed_by.clone(),
            position: self.position.clone(),
            organization: self.organization.clone(),
            amount: self.amount.clone(),
            currency: self.currency.clone(),
            date_of_signing: self.date_of_signing.clone(),
            place: self.place.clone(),
            reference: self.reference.clone(),
            name: self.name.clone(),
            contract_files: self.contract_files.clone(),
        }
    }
}

/// Validated output of the info form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractInfo {
    pub signed_by: String,
    pub position: String,
    pub organization: String,
    pub amount: String,
    pub currency: String,
    pub date_of_signing: String,
    pub place: String,
    pub reference: String,
    pub name: String,
    pub contract_files: Vec<UploadedFile>,
}

impl From<ContractInfo> for ContractDraft {
    fn from(info: ContractInfo) -> Self {
        Self {
            signed_by: info.signed_by,
            position: info.position,
            organization: info.organization,
            amount: info.amount,
            currency: info.currency,
            date_of_signing: info.date_of_signing,
            place: info.place,
            reference: info.reference,
            name: info.name,
            contract_files: info.contract_files,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub providence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub municipality: Option<String>,
}

/// Numbers server addresses `1..=n` in arrival order.
pub fn number_addresses(addresses: &[ServerAddress]) -> Vec<Address> {
    addresses
        .iter()
        .zip(1u32..)
        .map(|(address, id)| Address {
            id,
            country: address.country.clone(),
            providence: address.providence.clone(),
            city: address.city.clone(),
            municipality: address.municipality.clone(),
        })
        .collect()
}

/// Read-only projection shown on the review step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractReviewData {
    pub project_name: String,
    pub reference: String,
    pub project_amount: String,
    pub project_currency: String,
    pub begin_date: String,
    pub end_date: String,
    pub description: String,
    pub project_files: Vec<UploadedFile>,
    pub address: Vec<Address>,

    pub signed_by: String,
    pub position: String,
    pub organization: String,
    pub amount: String,
    pub currency: String,
    pub date_of_signing: String,
    pub contract_files: Vec<UploadedFile>,
    pub place: String,
    pub contract_reference: String,
    pub contract_name: String,
}

impl ContractReviewData {
    /// Copies the project-level fields; the project currency also becomes the
    /// contract currency shown on review.
    pub fn apply_project(&mut self, project: &ProjectDetails) {
        self.project_name = project.name.clone();
        self.reference = project.reference.clone();
        self.project_amount = project.amount.clone();
        self.project_currency = project.currency.clone();
        self.currency = project.currency.clone();
        self.begin_date = project.begin_date.clone();
        self.end_date = project.end_date.clone();
        self.description = project.description.clone();
        self.project_files = project.documents.clone();
        self.address = number_addresses(&project.address);
    }

    /// Projects the info step into the contract-level fields.
    /// `reference` and `name` land in `contract_reference` and `contract_name`.
    pub fn merge_info(&mut self, info: &ContractInfo) {
        self.signed_by = info.signed_by.clone();
        self.position = info.position.clone();
        self.organization = info.organization.clone();
        self.amount = info.amount.clone();
        self.currency = info.currency.clone();
        self.date_of_signing = info.date_of_signing.clone();
        self.contract_files = info.contract_files.clone();
        self.place = info.place.clone();
        self.contract_reference = info.reference.clone();
        self.contract_name = info.name.clone();
    }
}
