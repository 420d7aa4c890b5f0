//! Step one of the contract wizard: the contract info form.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{value_map, FieldDescriptor, FieldErrors, FormDescriptor, FormFlow, Validator};
use crate::currency::{parse_amount, CurrencyCode};
use crate::dates::parse_signing_date;
use crate::wizard::model::ContractInfo;

static CURRENCY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[A-Za-z]{3}\s*$").expect("currency pattern compiles"));

fn signing_date(value: &str) -> Result<(), String> {
    parse_signing_date(value)
        .map(|_| ())
        .ok_or_else(|| "invalid_date_format".to_string())
}

pub struct ContractInfoForm {
    descriptor: FormDescriptor,
    project_amount: Option<f64>,
}

impl ContractInfoForm {
    /// `project_amount` is the budget of the selected project, when known.
    pub fn new(project_amount: Option<f64>) -> Self {
        let text = |key, label, required| FieldDescriptor::new(key, label).required(required);
        let descriptor = FormDescriptor::new(
            "contract_info",
            vec![
                text("signed_by", "Signed by", "signed_by_required"),
                text("position", "Position", "position_required"),
                text("organization", "Organization", "organization_required"),
                text("amount", "Amount", "amount_required")
                    .rule(Validator::PositiveNumber("amount_must_be_positive")),
                text("currency", "Currency", "currency_required")
                    .rule(Validator::Matches(CURRENCY.clone(), "invalid_currency")),
                text("date_of_signing", "Date of signing", "date_of_signing_required")
                    .rule(Validator::custom(signing_date)),
                text("place", "Place", "place_required"),
                text("reference", "Reference", "reference_required"),
                text("name", "Contract name", "contract_name_required"),
            ],
        );
        Self {
            descriptor,
            project_amount: project_amount.filter(|amount| *amount > 0.0),
        }
    }

    /// Validates `info` and returns it trimmed, with the currency upper-cased
    /// and the attached files untouched.
    pub fn submit(&self, info: &ContractInfo) -> Result<ContractInfo, FieldErrors> {
        let mut committed = self.run(info_map(info))?;
        committed.contract_files = info.contract_files.clone();
        Ok(committed)
    }
}

fn info_map(info: &ContractInfo) -> BTreeMap<String, String> {
    value_map([
        ("signed_by", info.signed_by.as_str()),
        ("position", info.position.as_str()),
        ("organization", info.organization.as_str()),
        ("amount", info.amount.as_str()),
        ("currency", info.currency.as_str()),
        ("date_of_signing", info.date_of_signing.as_str()),
        ("place", info.place.as_str()),
        ("reference", info.reference.as_str()),
        ("name", info.name.as_str()),
    ])
}

impl FormFlow for ContractInfoForm {
    type Output = ContractInfo;

    fn descriptor(&self) -> &FormDescriptor {
        &self.descriptor
    }

    fn cross_check(&self, values: &BTreeMap<String, String>, errors: &mut FieldErrors) {
        let Some(limit) = self.project_amount else {
            return;
        };
        if errors.contains("amount") {
            return;
        }
        let amount = values
            .get("amount")
            .and_then(|raw| raw.trim().parse::<f64>().ok());
        if matches!(amount, Some(value) if value > limit) {
            errors.insert("amount", "contract_amount_exceeds_project");
        }
    }

    fn commit(&self, mut values: BTreeMap<String, String>) -> ContractInfo {
        let mut take = |key: &str| values.remove(key).unwrap_or_default().trim().to_string();
        ContractInfo {
            signed_by: take("signed_by"),
            position: take("position"),
            organization: take("organization"),
            amount: take("amount"),
            currency: CurrencyCode::new(take("currency")).as_str().to_string(),
            date_of_signing: take("date_of_signing"),
            place: take("place"),
            reference: take("reference"),
            name: take("name"),
            contract_files: Vec::new(),
        }
    }
}

/// Budget of a project as the server reports it (`"250000.00"`, `250000`).
pub fn project_budget(raw: &str) -> Option<f64> {
    parse_amount(raw).filter(|amount| *amount > 0.0)
}
