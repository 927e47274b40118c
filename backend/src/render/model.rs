//! `Printable` implementations: how each report kind lays out into sections.

use common::model::accident::{AccidentReport, Driver};
use common::model::claim::ClaimForm;
use common::model::document::CaseDocument;
use common::model::injury::InjuryAssessment;
use common::model::report::{Report, ReportKind};
use common::model::supplier::SupplierClaim;

use super::{DocSection, DocumentModel, Printable};

fn document(kind: ReportKind, sections: Vec<DocSection>) -> DocumentModel {
    DocumentModel {
        title: kind.title().to_string(),
        subtitle: String::new(),
        sections,
    }
}

fn driver_section(label: &str, driver: &Driver) -> DocSection {
    let mut section = DocSection::new(format!("{label} Information"))
        .field("Name", &driver.name)
        .field("ID", &driver.id_number)
        .field("Injuries", &driver.injuries)
        .field("License Number", &driver.license_number)
        .field(
            "License Date Issued",
            driver
                .license_date_issued
                .map(|d| d.to_string())
                .unwrap_or_default(),
        )
        .field("Endorsements", &driver.license_endorsements)
        .field("Physical/Mental Defects", &driver.physical_mental_defects)
        .field("Residential Address", &driver.residential_address)
        .field("Work Address", &driver.work_address)
        .field("Employed", driver.employed.as_str())
        .field("Employer", &driver.employer)
        .field("Medical Aid", driver.medical_aid.as_str())
        .field("Medical Aid Company", &driver.medical_aid_company)
        .field("Car Insurance", driver.insured.as_str())
        .field("Insurance Company", &driver.insurance_company)
        .field("Under the Influence", driver.under_influence.as_str());
    if let Some(url) = &driver.license_image_url {
        section = section.image(url);
    }
    section
}

impl Printable for AccidentReport {
    fn document(&self) -> DocumentModel {
        let mut sections = vec![DocSection::new("Accident Summary")
            .field("Case Number", &self.case_number)
            .field("Accident Date", self.accident_date.to_string())
            .field("Accident Time", self.accident_time.to_string())
            .field("Road Name", &self.road_name)
            .field("Police Station", &self.police_station)
            .field("Police Reference Number", &self.police_reference_number)
            .field("Speed Limit", self.speed_limit.to_string())
            .field("Weather", self.weather.as_str())
            .field("Road Condition", self.road_condition.as_str())
            .field("Number of Vehicles", self.vehicles.len().to_string())];

        let mut vehicles = DocSection::new("Vehicles Involved");
        for (i, v) in self.vehicles.iter().enumerate() {
            vehicles = vehicles
                .field(&format!("Vehicle {} Registration", i + 1), &v.registration_number)
                .field(
                    &format!("Vehicle {} Description", i + 1),
                    format!("{} {} {} ({})", v.make, v.model, v.year, v.color),
                );
        }
        sections.push(vehicles);

        sections.push(driver_section("Driver A", &self.driver_a));
        sections.push(driver_section("Driver B", &self.driver_b));

        let mut witnesses = DocSection::new("Witness Information");
        for (i, w) in self.witnesses.iter().enumerate() {
            witnesses = witnesses
                .field(&format!("Witness {} Name", i + 1), &w.name)
                .field(&format!("Witness {} ID", i + 1), &w.id_number)
                .field(&format!("Witness {} Contact", i + 1), &w.contact);
        }
        sections.push(witnesses);

        let mut media = DocSection::new("Accident Media")
            .field_opt("Video", &self.accident_video_url)
            .field("Voice Notes", self.voice_note_urls.join(" "));
        for url in &self.accident_image_urls {
            media = media.image(url);
        }
        sections.push(media);

        document(Self::KIND, sections)
    }
}

impl Printable for InjuryAssessment {
    fn document(&self) -> DocumentModel {
        document(
            Self::KIND,
            vec![
                DocSection::new("Patient Information")
                    .field("Patient Name", &self.patient_name)
                    .field("Patient ID", &self.patient_id)
                    .field("Claim Number", &self.claim_number)
                    .field("Contact Number", &self.contact_number)
                    .field("Assessment Date", self.assessment_date.to_string())
                    .field("Date of Accident", self.accident_date.to_string()),
                DocSection::new("Medical Practitioner")
                    .field("Name", &self.practitioner_name)
                    .field("Practice Number", &self.practice_number)
                    .field("Contact", &self.practitioner_contact)
                    .field("Email", &self.practitioner_email),
                DocSection::new("Medical Details")
                    .field("Injury Description", &self.injury_description)
                    .field("Severity", self.injury_severity.as_str())
                    .field("Treatment Given", &self.treatment_given)
                    .field("Current Symptoms", &self.current_symptoms)
                    .field("Diagnosis", &self.diagnosis)
                    .field("Clinical Studies", &self.clinical_studies),
                DocSection::new("History")
                    .field("Medical History", &self.medical_history)
                    .field("Social and Personal History", &self.personal_history)
                    .field(
                        "Educational and Occupational History",
                        &self.educational_occupational_history,
                    )
                    .field("Reached MMI", self.reached_mmi.as_str()),
            ],
        )
    }
}

impl Printable for ClaimForm {
    fn document(&self) -> DocumentModel {
        document(
            Self::KIND,
            vec![
                DocSection::new("Claimant Information")
                    .field("Claimant Name", &self.claimant_name)
                    .field("Claimant ID", &self.claimant_id)
                    .field("Claim Number", &self.claim_number)
                    .field("Date of Birth", self.date_of_birth.to_string()),
                DocSection::new("Contact Details")
                    .field("Residential Address", &self.residential_address)
                    .field("Postal Address", &self.postal_address)
                    .field("Phone Number", &self.phone_number)
                    .field("Email", &self.email_address),
                DocSection::new("Employment")
                    .field("Occupation", &self.occupation)
                    .field("Employer Name", &self.employer_name)
                    .field("Employer Address", &self.employer_address),
                DocSection::new("Claim").field("Description", &self.claim_description),
            ],
        )
    }
}

impl Printable for SupplierClaim {
    fn document(&self) -> DocumentModel {
        document(
            Self::KIND,
            vec![
                DocSection::new("Supplier Information")
                    .field("Supplier Name", &self.supplier_name)
                    .field("Contact Number", &self.supplier_contact)
                    .field("Email", &self.supplier_email)
                    .field("Practice Number", &self.practice_number)
                    .field("Tax Reference Number", &self.tax_reference_number)
                    .field("Physical Address", &self.physical_address),
                DocSection::new("Claim Information")
                    .field(
                        "Claim for Emergency Treatment",
                        self.claim_for_emergency_treatment.as_str(),
                    )
                    .field(
                        "Total Amount Claimed",
                        format!("{:.2}", self.total_amount_claimed),
                    )
                    .field("Description", &self.claim_description),
            ],
        )
    }
}

impl Printable for CaseDocument {
    fn document(&self) -> DocumentModel {
        let mut section = DocSection::new("Document Details")
            .field("Linked Case Number", &self.case_number)
            .field("Source", self.source.as_str())
            .field("Institution", &self.institution_name)
            .field("Author", &self.author_name)
            .field("Location", &self.location)
            .field("Report Date", self.report_date.to_string())
            .field_opt("Document", &self.document_url);
        if let Some(url) = &self.document_url {
            // Only image documents can be embedded; the field above always
            // carries the locator.
            if [".png", ".jpg", ".jpeg"].iter().any(|ext| url.ends_with(ext)) {
                section = section.image(url);
            }
        }
        document(Self::KIND, vec![section])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::report::NOT_AVAILABLE;
    use jiff::civil::Date;

    #[test]
    fn absent_fields_render_as_placeholders_not_omissions() {
        let claim = ClaimForm {
            claimant_name: "P. Dlamini".to_string(),
            claimant_id: "8806140233081".to_string(),
            claim_number: String::new(),
            date_of_birth: Date::constant(1988, 6, 14),
            residential_address: String::new(),
            postal_address: String::new(),
            phone_number: String::new(),
            email_address: String::new(),
            occupation: String::new(),
            employer_name: String::new(),
            employer_address: String::new(),
            claim_description: String::new(),
        };
        let doc = claim.document();
        let all_fields: Vec<_> = doc.sections.iter().flat_map(|s| &s.fields).collect();
        // Every declared label is present even when the value is empty.
        assert_eq!(all_fields.len(), 12);
        assert!(all_fields
            .iter()
            .any(|f| f.label == "Claim Number" && f.value == NOT_AVAILABLE));
    }
}
