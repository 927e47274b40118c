//! Serious injury assessment, as completed by the examining practitioner.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::report::{
    check_width, parse_date, parse_yes_no, require, Report, ReportKind, RowError, YesNo,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Mild => "Mild",
            Severity::Moderate => "Moderate",
            Severity::Severe => "Severe",
        }
    }

    fn parse(column: &'static str, value: &str) -> Result<Self, RowError> {
        match value {
            "Mild" => Ok(Severity::Mild),
            "Moderate" => Ok(Severity::Moderate),
            "Severe" => Ok(Severity::Severe),
            other => Err(RowError::Cell {
                column,
                message: format!("unknown severity `{other}`"),
            }),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InjuryAssessment {
    pub patient_name: String,
    pub patient_id: String,
    pub claim_number: String,
    pub contact_number: String,
    pub assessment_date: Date,
    pub accident_date: Date,
    pub practitioner_name: String,
    pub practice_number: String,
    pub practitioner_contact: String,
    pub practitioner_email: String,
    pub injury_description: String,
    pub injury_severity: Severity,
    pub treatment_given: String,
    pub current_symptoms: String,
    pub diagnosis: String,
    pub clinical_studies: String,
    pub medical_history: String,
    pub personal_history: String,
    pub educational_occupational_history: String,
    pub reached_mmi: YesNo,
}

const COLUMNS: &[&str] = &[
    "patient_id",
    "patient_name",
    "claim_number",
    "contact_number",
    "assessment_date",
    "accident_date",
    "practitioner_name",
    "practice_number",
    "practitioner_contact",
    "practitioner_email",
    "injury_description",
    "injury_severity",
    "treatment_given",
    "current_symptoms",
    "diagnosis",
    "clinical_studies",
    "medical_history",
    "personal_history",
    "educational_occupational_history",
    "reached_mmi",
];

impl Report for InjuryAssessment {
    const KIND: ReportKind = ReportKind::Injury;

    fn columns() -> &'static [&'static str] {
        COLUMNS
    }

    fn to_row(&self) -> Result<Vec<String>, RowError> {
        Ok(vec![
            self.patient_id.clone(),
            self.patient_name.clone(),
            self.claim_number.clone(),
            self.contact_number.clone(),
            self.assessment_date.to_string(),
            self.accident_date.to_string(),
            self.practitioner_name.clone(),
            self.practice_number.clone(),
            self.practitioner_contact.clone(),
            self.practitioner_email.clone(),
            self.injury_description.clone(),
            self.injury_severity.as_str().to_string(),
            self.treatment_given.clone(),
            self.current_symptoms.clone(),
            self.diagnosis.clone(),
            self.clinical_studies.clone(),
            self.medical_history.clone(),
            self.personal_history.clone(),
            self.educational_occupational_history.clone(),
            self.reached_mmi.as_str().to_string(),
        ])
    }

    fn from_row(row: &[String]) -> Result<Self, RowError> {
        check_width(row, COLUMNS.len())?;
        Ok(InjuryAssessment {
            patient_id: row[0].clone(),
            patient_name: row[1].clone(),
            claim_number: row[2].clone(),
            contact_number: row[3].clone(),
            assessment_date: parse_date("assessment_date", &row[4])?,
            accident_date: parse_date("accident_date", &row[5])?,
            practitioner_name: row[6].clone(),
            practice_number: row[7].clone(),
            practitioner_contact: row[8].clone(),
            practitioner_email: row[9].clone(),
            injury_description: row[10].clone(),
            injury_severity: Severity::parse("injury_severity", &row[11])?,
            treatment_given: row[12].clone(),
            current_symptoms: row[13].clone(),
            diagnosis: row[14].clone(),
            clinical_studies: row[15].clone(),
            medical_history: row[16].clone(),
            personal_history: row[17].clone(),
            educational_occupational_history: row[18].clone(),
            reached_mmi: parse_yes_no("reached_mmi", &row[19])?,
        })
    }

    fn identity(&self) -> &str {
        &self.patient_id
    }

    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        require(&mut errors, "patient_id", !self.patient_id.trim().is_empty());
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InjuryAssessment {
        InjuryAssessment {
            patient_name: "L. van Wyk".to_string(),
            patient_id: "7709015800085".to_string(),
            claim_number: "CLM-88".to_string(),
            contact_number: "082 555 0172".to_string(),
            assessment_date: Date::constant(2024, 7, 2),
            accident_date: Date::constant(2024, 6, 14),
            practitioner_name: "Dr. N. Pillay".to_string(),
            practice_number: "MP0412345".to_string(),
            practitioner_contact: "021 555 0134".to_string(),
            practitioner_email: "n.pillay@example.org".to_string(),
            injury_description: "Fractured left tibia, whiplash".to_string(),
            injury_severity: Severity::Severe,
            treatment_given: "Open reduction, internal fixation".to_string(),
            current_symptoms: "Limited mobility, chronic pain".to_string(),
            diagnosis: "Comminuted tibial fracture".to_string(),
            clinical_studies: "X-ray 2024-06-14, MRI 2024-06-20".to_string(),
            medical_history: "Hypertension".to_string(),
            personal_history: "Lives alone".to_string(),
            educational_occupational_history: "Warehouse supervisor".to_string(),
            reached_mmi: YesNo::No,
        }
    }

    #[test]
    fn scalar_round_trip() {
        let report = sample();
        let back = InjuryAssessment::from_row(&report.to_row().unwrap()).unwrap();
        assert_eq!(back.patient_id, report.patient_id);
        assert_eq!(back.assessment_date, report.assessment_date);
        assert_eq!(back.injury_severity, Severity::Severe);
        assert_eq!(back.reached_mmi, YesNo::No);
    }

    #[test]
    fn missing_patient_id_is_rejected() {
        let mut report = sample();
        report.patient_id.clear();
        assert!(report.validate().is_err());
    }

    #[test]
    fn patient_name_is_not_required() {
        let mut report = sample();
        report.patient_name.clear();
        assert!(report.validate().is_ok());
    }
}
