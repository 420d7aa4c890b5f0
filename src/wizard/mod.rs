//! Two-step contract creation wizard: contract info, then review and submit.
//!
//! * `load` pulls the project (and, in edit mode, the contract) into state.
//! * `submit_info` validates the info step and moves to review.
//! * `submit` posts the multipart payload from the review step.

pub mod errors;
pub mod model;
pub mod review;

use tracing::{debug, error, info, warn};

use crate::api::contract::{ContractDetails, CreatedContract, ProjectDetails};
use crate::api::{ContractApi, Envelope, MultipartPayload};
use crate::dates::format_submission_date;
use crate::forms::contract_info::{project_budget, ContractInfoForm};
use crate::forms::modal::Modal;
use crate::forms::Toast;

pub use errors::{classify_contract_error, submission_error_key, ContractErrorKey, WizardError};
pub use model::{Address, ContractDraft, ContractInfo, ContractReviewData};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    Info = 0,
    Review = 1,
}

pub const STEPS: [WizardStep; 2] = [WizardStep::Info, WizardStep::Review];

impl WizardStep {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        STEPS.get(index).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Info => "contract_info",
            WizardStep::Review => "review",
        }
    }
}

/// Route parameters the wizard is opened with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardRoute {
    pub project_id: Option<String>,
    pub contract_id: Option<String>,
}

impl WizardRoute {
    pub fn for_project(project_id: impl Into<String>) -> Self {
        Self {
            project_id: Some(project_id.into()),
            contract_id: None,
        }
    }

    pub fn for_contract(contract_id: impl Into<String>) -> Self {
        Self {
            project_id: None,
            contract_id: Some(contract_id.into()),
        }
    }

    fn normalized(self) -> Self {
        let keep = |id: Option<String>| id.filter(|value| !value.trim().is_empty());
        Self {
            project_id: keep(self.project_id),
            contract_id: keep(self.contract_id),
        }
    }
}

/// Notified when the surrounding UI resets its file pickers.
pub trait FilesResetListener {
    fn on_files_reset(&mut self);
}

/// Multipart body sent to the create-contract endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractPayload {
    pub signed_by: String,
    pub position: String,
    pub currency: String,
    pub amount: String,
    pub organization: String,
    pub place: String,
    pub date_of_signing: String,
    pub document_ids: String,
    pub reference: String,
    pub name: String,
    pub project_id: Option<String>,
    pub contract_id: Option<String>,
}

impl ContractPayload {
    /// `project_id` is the route project; `edit` carries `(project id,
    /// contract id)` resolved from an existing contract.
    pub fn build(
        draft: &ContractDraft,
        project_id: Option<&str>,
        edit: Option<(&str, &str)>,
    ) -> Result<Self, WizardError> {
        let date_of_signing = format_submission_date(&draft.date_of_signing)
            .ok_or_else(|| WizardError::InvalidSigningDate(draft.date_of_signing.clone()))?;
        let document_ids = draft
            .contract_files
            .iter()
            .map(|file| file.id.as_str())
            .collect::<Vec<_>>()
            .join(",");
        Ok(Self {
            signed_by: draft.signed_by.clone(),
            position: draft.position.clone(),
            currency: draft.currency.clone(),
            amount: draft.amount.clone(),
            organization: draft.organization.clone(),
            place: draft.place.clone(),
            date_of_signing,
            document_ids,
            reference: draft.reference.clone(),
            name: draft.name.clone(),
            project_id: project_id
                .or(edit.map(|(project, _)| project))
                .map(str::to_string),
            contract_id: edit.map(|(_, contract)| contract.to_string()),
        })
    }

    pub fn to_multipart(&self) -> MultipartPayload {
        let mut payload = MultipartPayload::new()
            .text("signed_by", &self.signed_by)
            .text("position", &self.position)
            .text("currency", &self.currency)
            .text("amount", &self.amount)
            .text("organization", &self.organization)
            .text("place", &self.place)
            .text("date_of_signing", &self.date_of_signing)
            .text("document_ids", &self.document_ids)
            .text("reference", &self.reference)
            .text("name", &self.name);
        if let Some(project_id) = &self.project_id {
            payload.push_text("project_id", project_id);
        }
        if let Some(contract_id) = &self.contract_id {
            payload.push_text("contract_id", contract_id);
        }
        payload
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub contract_id: String,
    /// `"<project id>/<contract id>"`, shown by the confirmation modal.
    pub link: String,
    pub toast: Toast,
}

pub struct ContractWizard<'a, A: ContractApi + ?Sized> {
    api: &'a A,
    route: WizardRoute,
    current_step: WizardStep,
    form_data: ContractDraft,
    review_data: ContractReviewData,
    edit_project_id: Option<String>,
    new_contract_id: Option<String>,
    loading: bool,
    pending: bool,
    confirmation: Modal,
}

impl<'a, A: ContractApi + ?Sized> ContractWizard<'a, A> {
    pub fn new(api: &'a A, route: WizardRoute) -> Self {
        Self {
            api,
            route: route.normalized(),
            current_step: WizardStep::Info,
            form_data: ContractDraft::default(),
            review_data: ContractReviewData::default(),
            edit_project_id: None,
            new_contract_id: None,
            loading: false,
            pending: false,
            confirmation: Modal::default(),
        }
    }

    pub fn steps(&self) -> &'static [WizardStep] {
        &STEPS
    }

    pub fn current_step(&self) -> WizardStep {
        self.current_step
    }

    pub fn draft(&self) -> &ContractDraft {
        &self.form_data
    }

    pub fn review_data(&self) -> &ContractReviewData {
        &self.review_data
    }

    pub fn route(&self) -> &WizardRoute {
        &self.route
    }

    pub fn edit_project_id(&self) -> Option<&str> {
        self.edit_project_id.as_deref()
    }

    pub fn new_contract_id(&self) -> Option<&str> {
        self.new_contract_id.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn is_edit_mode(&self) -> bool {
        self.route.contract_id.is_some()
    }

    pub fn confirmation(&self) -> &Modal {
        &self.confirmation
    }

    pub fn close_confirmation(&mut self) {
        self.confirmation.close();
    }

    /// A project is selected either by the route or through the edited contract.
    pub fn project_selected(&self) -> bool {
        self.route.project_id.is_some() || self.edit_project_id.is_some()
    }

    /// The info form for the current state, bounded by the project budget when
    /// a project is selected.
    pub fn info_form(&self) -> ContractInfoForm {
        let limit = if self.project_selected() {
            project_budget(&self.review_data.project_amount)
        } else {
            None
        };
        ContractInfoForm::new(limit)
    }

    /// Moves back (or stays); forward clicks are ignored.
    pub fn click_step(&mut self, index: usize) -> bool {
        match WizardStep::from_index(index) {
            Some(step) if step < self.current_step => {
                debug!(from = ?self.current_step, to = ?step, "wizard step changed");
                self.current_step = step;
                true
            }
            _ => false,
        }
    }

    pub fn submit_info(&mut self, values: ContractInfo) -> Result<(), WizardError> {
        let info = self.info_form().submit(&values).map_err(WizardError::Invalid)?;
        self.review_data.merge_info(&info);
        self.form_data = ContractDraft::from(info);
        self.current_step = WizardStep::Review;
        debug!("contract info accepted; reviewing");
        Ok(())
    }

    pub async fn load(&mut self) {
        if let Some(project_id) = self.route.project_id.clone() {
            self.fetch_project(&project_id).await;
        }
        if let Some(contract_id) = self.route.contract_id.clone() {
            self.fetch_contract(&contract_id).await;
        }
    }

    async fn fetch_project(&mut self, project_id: &str) {
        self.loading = true;
        let result = match self.api.project_details(project_id).await {
            Ok(response) => response.envelope::<ProjectDetails>(),
            Err(err) => Err(err),
        };
        self.loading = false;

        match result {
            Ok(Envelope { data: project, .. }) => {
                self.review_data.apply_project(&project);
                self.form_data.currency = project.currency;
                info!(project_id, "project details loaded");
            }
            Err(err) => {
                error!(project_id, error = %err, "failed to load project details");
            }
        }
    }

    async fn fetch_contract(&mut self, contract_id: &str) {
        self.loading = true;
        let result = match self.api.contract_details(contract_id).await {
            Ok(response) => response.envelope::<ContractDetails>(),
            Err(err) => Err(err),
        };
        self.loading = false;

        let envelope = match result {
            Ok(envelope) => envelope,
            Err(err) => {
                error!(contract_id, error = %err, "failed to load contract details");
                return;
            }
        };
        if envelope.status != Some(200) {
            warn!(contract_id, status = ?envelope.status, "contract details not accepted");
            return;
        }

        let contract = envelope.data;
        self.edit_project_id = Some(contract.project_id.clone()).filter(|id| !id.is_empty());
        self.form_data = ContractDraft::from_details(&contract);
        info!(contract_id, project_id = %contract.project_id, "contract loaded for editing");
        if let Some(project_id) = self.edit_project_id.clone() {
            self.fetch_project(&project_id).await;
        }
    }

    fn edit_target(&self) -> Option<(&str, &str)> {
        match (&self.edit_project_id, &self.route.contract_id) {
            (Some(project), Some(contract)) => Some((project.as_str(), contract.as_str())),
            _ => None,
        }
    }

    pub fn payload(&self) -> Result<ContractPayload, WizardError> {
        ContractPayload::build(
            &self.form_data,
            self.route.project_id.as_deref(),
            self.edit_target(),
        )
    }

    pub async fn submit(&mut self) -> Result<SubmissionOutcome, WizardError> {
        if self.current_step != WizardStep::Review {
            return Err(WizardError::NotOnReview);
        }
        if self.pending {
            return Err(WizardError::SubmissionPending);
        }
        let payload = self.payload()?;

        self.pending = true;
        let result = self.api.create_contract(payload.to_multipart()).await;
        self.pending = false;

        let response = result.map_err(|source| {
            let key = submission_error_key(&source, self.is_edit_mode());
            error!(key = %key, error = %source, "contract submission failed");
            WizardError::Rejected { key, source }
        })?;
        let created: Envelope<CreatedContract> = response
            .envelope()
            .map_err(WizardError::UnexpectedResponse)?;

        let contract_id = created.data.id;
        let project_id = self
            .route
            .project_id
            .as_deref()
            .or(self.edit_project_id.as_deref())
            .unwrap_or_default();
        let link = format!("{project_id}/{contract_id}");
        self.new_contract_id = Some(contract_id.clone());
        self.confirmation.open();
        info!(%contract_id, edit = self.is_edit_mode(), "contract submitted");

        Ok(SubmissionOutcome {
            contract_id,
            link,
            toast: Toast::success(if self.is_edit_mode() {
                "contract_updated_successfully"
            } else {
                "contract_created_successfully"
            }),
        })
    }

    /// Back to the initial state, keeping the route.
    pub fn reset(&mut self) {
        let route = self.route.clone();
        *self = Self::new(self.api, route);
    }
}

impl<A: ContractApi + ?Sized> FilesResetListener for ContractWizard<'_, A> {
    fn on_files_reset(&mut self) {
        self.form_data.contract_files.clear();
        self.review_data.contract_files.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::contract::UploadedFile;

    fn draft() -> ContractDraft {
        ContractDraft {
            signed_by: "Jane".into(),
            position: "Director".into(),
            organization: "Kivu".into(),
            amount: "1500".into(),
            currency: "USD".into(),
            date_of_signing: "05-03-2024".into(),
            place: "Goma".into(),
            reference: "CT-1".into(),
            name: "Deck".into(),
            contract_files: vec![UploadedFile::new("3", "a.pdf"), UploadedFile::new("8", "b.pdf")],
        }
    }

    #[test]
    fn step_indices_and_titles() {
        assert_eq!(STEPS.len(), 2);
        assert_eq!(WizardStep::from_index(1), Some(WizardStep::Review));
        assert_eq!(WizardStep::from_index(2), None);
        assert_eq!(WizardStep::Info.title(), "contract_info");
        assert_eq!(WizardStep::Review.index(), 1);
    }

    #[test]
    fn payload_in_project_mode() {
        let payload = ContractPayload::build(&draft(), Some("42"), None).unwrap();
        assert_eq!(payload.date_of_signing, "2024-03-05");
        assert_eq!(payload.document_ids, "3,8");
        assert_eq!(payload.project_id.as_deref(), Some("42"));
        assert_eq!(payload.contract_id, None);
        let multipart = payload.to_multipart();
        assert_eq!(multipart.get("project_id"), Some("42"));
        assert!(!multipart.contains("contract_id"));
    }

    #[test]
    fn payload_in_edit_mode() {
        let payload = ContractPayload::build(&draft(), None, Some(("7", "99"))).unwrap();
        assert_eq!(payload.project_id.as_deref(), Some("7"));
        assert_eq!(payload.contract_id.as_deref(), Some("99"));
        let multipart = payload.to_multipart();
        assert_eq!(
            multipart.names(),
            vec![
                "signed_by",
                "position",
                "currency",
                "amount",
                "organization",
                "place",
                "date_of_signing",
                "document_ids",
                "reference",
                "name",
                "project_id",
                "contract_id",
            ]
        );
    }

    #[test]
    fn payload_rejects_unparseable_date() {
        let mut bad = draft();
        bad.date_of_signing = "yesterday".into();
        assert!(matches!(
            ContractPayload::build(&bad, Some("1"), None),
            Err(WizardError::InvalidSigningDate(_))
        ));
    }

    #[test]
    fn empty_route_ids_are_ignored() {
        let route = WizardRoute {
            project_id: Some(" ".into()),
            contract_id: Some(String::new()),
        }
        .normalized();
        assert_eq!(route, WizardRoute::default());
    }
}
