//! Supplier claim form, used by treatment providers billing against a case.

use serde::{Deserialize, Serialize};

use super::report::{
    check_width, parse_num, parse_yes_no, require, Report, ReportKind, RowError, YesNo,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SupplierClaim {
    pub supplier_name: String,
    pub supplier_contact: String,
    pub supplier_email: String,
    pub practice_number: String,
    pub tax_reference_number: String,
    pub physical_address: String,
    pub claim_for_emergency_treatment: YesNo,
    pub total_amount_claimed: f64,
    pub claim_description: String,
}

const COLUMNS: &[&str] = &[
    "supplier_name",
    "supplier_contact",
    "supplier_email",
    "practice_number",
    "tax_reference_number",
    "physical_address",
    "claim_for_emergency_treatment",
    "total_amount_claimed",
    "claim_description",
];

impl Report for SupplierClaim {
    const KIND: ReportKind = ReportKind::SupplierClaim;

    fn columns() -> &'static [&'static str] {
        COLUMNS
    }

    fn to_row(&self) -> Result<Vec<String>, RowError> {
        Ok(vec![
            self.supplier_name.clone(),
            self.supplier_contact.clone(),
            self.supplier_email.clone(),
            self.practice_number.clone(),
            self.tax_reference_number.clone(),
            self.physical_address.clone(),
            self.claim_for_emergency_treatment.as_str().to_string(),
            self.total_amount_claimed.to_string(),
            self.claim_description.clone(),
        ])
    }

    fn from_row(row: &[String]) -> Result<Self, RowError> {
        check_width(row, COLUMNS.len())?;
        Ok(SupplierClaim {
            supplier_name: row[0].clone(),
            supplier_contact: row[1].clone(),
            supplier_email: row[2].clone(),
            practice_number: row[3].clone(),
            tax_reference_number: row[4].clone(),
            physical_address: row[5].clone(),
            claim_for_emergency_treatment: parse_yes_no("claim_for_emergency_treatment", &row[6])?,
            total_amount_claimed: parse_num("total_amount_claimed", &row[7])?,
            claim_description: row[8].clone(),
        })
    }

    fn identity(&self) -> &str {
        &self.supplier_name
    }

    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        require(
            &mut errors,
            "supplier_name",
            !self.supplier_name.trim().is_empty(),
        );
        require(
            &mut errors,
            "practice_number",
            !self.practice_number.trim().is_empty(),
        );
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
