//! RAF 1 claim form, captured on behalf of the claimant.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::report::{check_width, parse_date, require, Report, ReportKind, RowError};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClaimForm {
    pub claimant_name: String,
    pub claimant_id: String,
    pub claim_number: String,
    pub date_of_birth: Date,
    pub residential_address: String,
    pub postal_address: String,
    pub phone_number: String,
    pub email_address: String,
    pub occupation: String,
    pub employer_name: String,
    pub employer_address: String,
    pub claim_description: String,
}

const COLUMNS: &[&str] = &[
    "claimant_id",
    "claimant_name",
    "claim_number",
    "date_of_birth",
    "residential_address",
    "postal_address",
    "phone_number",
    "email_address",
    "occupation",
    "employer_name",
    "employer_address",
    "claim_description",
];

impl Report for ClaimForm {
    const KIND: ReportKind = ReportKind::Claim;

    fn columns() -> &'static [&'static str] {
        COLUMNS
    }

    fn to_row(&self) -> Result<Vec<String>, RowError> {
        Ok(vec![
            self.claimant_id.clone(),
            self.claimant_name.clone(),
            self.claim_number.clone(),
            self.date_of_birth.to_string(),
            self.residential_address.clone(),
            self.postal_address.clone(),
            self.phone_number.clone(),
            self.email_address.clone(),
            self.occupation.clone(),
            self.employer_name.clone(),
            self.employer_address.clone(),
            self.claim_description.clone(),
        ])
    }

    fn from_row(row: &[String]) -> Result<Self, RowError> {
        check_width(row, COLUMNS.len())?;
        Ok(ClaimForm {
            claimant_id: row[0].clone(),
            claimant_name: row[1].clone(),
            claim_number: row[2].clone(),
            date_of_birth: parse_date("date_of_birth", &row[3])?,
            residential_address: row[4].clone(),
            postal_address: row[5].clone(),
            phone_number: row[6].clone(),
            email_address: row[7].clone(),
            occupation: row[8].clone(),
            employer_name: row[9].clone(),
            employer_address: row[10].clone(),
            claim_description: row[11].clone(),
        })
    }

    fn identity(&self) -> &str {
        &self.claimant_id
    }

    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        require(
            &mut errors,
            "claimant_id",
            !self.claimant_id.trim().is_empty(),
        );
        require(
            &mut errors,
            "claimant_name",
            !self.claimant_name.trim().is_empty(),
        );
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
