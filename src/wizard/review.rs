//! Read-only projection of [`ContractReviewData`] into labeled sections.
//!
//! Every row renders something: absent values become `-`, an empty address
//! list becomes the `no_addresses_added` marker.

use std::fmt::Write as _;

use crate::api::contract::UploadedFile;
use crate::currency::{format_amount, CurrencyCode, LocaleConfig};
use crate::dates::{format_review_date, PLACEHOLDER};
use crate::wizard::model::{Address, ContractReviewData, DEFAULT_CURRENCY};

pub const NO_ADDRESSES: &str = "no_addresses_added";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRow {
    pub sr_no: u32,
    pub country: String,
    pub province: String,
    pub city: String,
    pub municipality: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewValue {
    Text(String),
    Files(Vec<String>),
    Addresses(Vec<AddressRow>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRow {
    pub label: &'static str,
    pub value: ReviewValue,
}

impl ReviewRow {
    fn text(label: &'static str, value: String) -> Self {
        Self {
            label,
            value: ReviewValue::Text(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSection {
    pub title: &'static str,
    pub rows: Vec<ReviewRow>,
}

impl ReviewSection {
    pub fn row(&self, label: &str) -> Option<&ReviewValue> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| &row.value)
    }
}

fn or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        PLACEHOLDER.to_string()
    } else {
        value.to_string()
    }
}

/// `"<currency> <grouped amount>"`, with `USD` when no currency is known.
pub fn display_amount(amount: &str, currency: &str, locale: &LocaleConfig) -> String {
    if amount.trim().is_empty() {
        return PLACEHOLDER.to_string();
    }
    let code = if currency.trim().is_empty() {
        CurrencyCode::new(DEFAULT_CURRENCY)
    } else {
        CurrencyCode::new(currency)
    };
    format!("{} {}", code.as_str(), format_amount(amount, &code, locale))
}

fn file_names(files: &[UploadedFile]) -> ReviewValue {
    if files.is_empty() {
        ReviewValue::Text(PLACEHOLDER.to_string())
    } else {
        ReviewValue::Files(files.iter().map(|file| file.display_name().to_string()).collect())
    }
}

fn address_rows(addresses: &[Address]) -> ReviewValue {
    if addresses.is_empty() {
        return ReviewValue::Text(NO_ADDRESSES.to_string());
    }
    let cell = |value: &Option<String>| or_dash(value.as_deref().unwrap_or(""));
    ReviewValue::Addresses(
        addresses
            .iter()
            .map(|address| AddressRow {
                sr_no: address.id,
                country: cell(&address.country),
                province: cell(&address.providence),
                city: cell(&address.city),
                municipality: cell(&address.municipality),
            })
            .collect(),
    )
}

pub fn project_review(data: &ContractReviewData, locale: &LocaleConfig) -> Vec<ReviewSection> {
    let project = ReviewSection {
        title: "project_info",
        rows: vec![
            ReviewRow::text("project_name", or_dash(&data.project_name)),
            ReviewRow::text("project_reference", or_dash(&data.reference)),
            ReviewRow::text(
                "amount",
                display_amount(&data.project_amount, &data.project_currency, locale),
            ),
            ReviewRow::text("project_begin_date", format_review_date(&data.begin_date)),
            ReviewRow::text("project_end_date", format_review_date(&data.end_date)),
            ReviewRow::text("description", or_dash(&data.description)),
            ReviewRow {
                label: "upload_files",
                value: file_names(&data.project_files),
            },
            ReviewRow {
                label: "address",
                value: address_rows(&data.address),
            },
        ],
    };
    let contract = ReviewSection {
        title: "contract_info",
        rows: vec![
            ReviewRow::text("contract_name", or_dash(&data.contract_name)),
            ReviewRow::text("contract_reference", or_dash(&data.contract_reference)),
            ReviewRow::text(
                "contract_amount",
                display_amount(&data.amount, &data.currency, locale),
            ),
            ReviewRow::text("signed_by", or_dash(&data.signed_by)),
            ReviewRow::text("position", or_dash(&data.position)),
            ReviewRow::text("organization", or_dash(&data.organization)),
            ReviewRow::text("date_of_signing", format_review_date(&data.date_of_signing)),
            ReviewRow::text("place_of_signing", or_dash(&data.place)),
            ReviewRow {
                label: "upload_contract_files",
                value: file_names(&data.contract_files),
            },
        ],
    };
    vec![project, contract]
}

/// Plain-text layout used by the CLI.
pub fn render_text(sections: &[ReviewSection]) -> String {
    let mut out = String::new();
    for (index, section) in sections.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "== {} ==", section.title);
        for row in &section.rows {
            match &row.value {
                ReviewValue::Text(text) => {
                    let _ = writeln!(out, "{}: {}", row.label, text);
                }
                ReviewValue::Files(names) => {
                    let chips: Vec<String> = names.iter().map(|name| format!("[{name}]")).collect();
                    let _ = writeln!(out, "{}: {}", row.label, chips.join(" "));
                }
                ReviewValue::Addresses(rows) => {
                    let _ = writeln!(out, "{}:", row.label);
                    for address in rows {
                        let _ = writeln!(
                            out,
                            "  {} | {} | {} | {} | {}",
                            address.sr_no,
                            address.country,
                            address.province,
                            address.city,
                            address.municipality
                        );
                    }
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_data_renders_placeholders() {
        let sections = project_review(&ContractReviewData::default(), &LocaleConfig::default());
        let project = &sections[0];
        assert_eq!(project.row("project_name"), Some(&ReviewValue::Text("-".into())));
        assert_eq!(project.row("amount"), Some(&ReviewValue::Text("-".into())));
        assert_eq!(project.row("upload_files"), Some(&ReviewValue::Text("-".into())));
        assert_eq!(
            project.row("address"),
            Some(&ReviewValue::Text(NO_ADDRESSES.into()))
        );
        assert_eq!(
            sections[1].row("date_of_signing"),
            Some(&ReviewValue::Text("-".into()))
        );
    }

    #[test]
    fn amounts_fall_back_to_usd() {
        let locale = LocaleConfig::default();
        assert_eq!(display_amount("1234567.5", "", &locale), "USD 1,234,567.50");
        assert_eq!(display_amount("2500", "cdf", &locale), "CDF 2,500.00");
    }

    #[test]
    fn address_cells_default_to_dash() {
        let data = ContractReviewData {
            address: vec![Address {
                id: 1,
                city: Some("Goma".into()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let sections = project_review(&data, &LocaleConfig::default());
        match sections[0].row("address") {
            Some(ReviewValue::Addresses(rows)) => {
                assert_eq!(rows[0].city, "Goma");
                assert_eq!(rows[0].country, "-");
            }
            other => panic!("unexpected address value: {other:?}"),
        }
    }
}
