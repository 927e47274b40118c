//! Supporting documents (medical or police reports) filed against an existing
//! accident case. The document itself lives in the media store; the row keeps
//! provenance plus the locator.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::report::{
    cell_opt, check_width, opt_cell, parse_date, require, Report, ReportKind, RowError,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentSource {
    Medical,
    Police,
}

impl DocumentSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentSource::Medical => "Medical",
            DocumentSource::Police => "Police",
        }
    }

    fn parse(column: &'static str, value: &str) -> Result<Self, RowError> {
        match value {
            "Medical" => Ok(DocumentSource::Medical),
            "Police" => Ok(DocumentSource::Police),
            other => Err(RowError::Cell {
                column,
                message: format!("unknown document source `{other}`"),
            }),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CaseDocument {
    pub case_number: String,
    pub source: DocumentSource,
    pub institution_name: String,
    pub author_name: String,
    pub location: String,
    pub report_date: Date,
    #[serde(default)]
    pub document_url: Option<String>,
}

const COLUMNS: &[&str] = &[
    "case_number",
    "source",
    "institution_name",
    "author_name",
    "location",
    "report_date",
    "document_url",
];

impl Report for CaseDocument {
    const KIND: ReportKind = ReportKind::CaseDocument;

    fn columns() -> &'static [&'static str] {
        COLUMNS
    }

    fn to_row(&self) -> Result<Vec<String>, RowError> {
        Ok(vec![
            self.case_number.clone(),
            self.source.as_str().to_string(),
            self.institution_name.clone(),
            self.author_name.clone(),
            self.location.clone(),
            self.report_date.to_string(),
            opt_cell(&self.document_url),
        ])
    }

    fn from_row(row: &[String]) -> Result<Self, RowError> {
        check_width(row, COLUMNS.len())?;
        Ok(CaseDocument {
            case_number: row[0].clone(),
            source: DocumentSource::parse("source", &row[1])?,
            institution_name: row[2].clone(),
            author_name: row[3].clone(),
            location: row[4].clone(),
            report_date: parse_date("report_date", &row[5])?,
            document_url: cell_opt(&row[6]),
        })
    }

    fn identity(&self) -> &str {
        &self.case_number
    }

    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        require(&mut errors, "case_number", !self.case_number.trim().is_empty());
        require(
            &mut errors,
            "institution_name",
            !self.institution_name.trim().is_empty(),
        );
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
