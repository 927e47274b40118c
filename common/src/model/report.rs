//! Shared vocabulary for every report kind.
//!
//! A report is a flat struct whose fields map 1:1 to the columns of its table.
//! The declared column order (`Report::columns`) is the only schema contract the
//! tabular store has: `to_row` must produce values in exactly that order and
//! `from_row` must consume them in the same order. Nested sub-structures
//! (vehicles, drivers, witnesses, media locator lists) are stored as JSON cells
//! so they round-trip losslessly.
//!
//! Every stored row additionally carries a system-generated `record_id` column
//! owned by the store itself; it is the key for updates and is never part of
//! `columns()`.

use jiff::civil::{Date, Time};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Placeholder written for fields the user did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Accident,
    Injury,
    Claim,
    SupplierClaim,
    CaseDocument,
}

impl ReportKind {
    pub const ALL: [ReportKind; 5] = [
        ReportKind::Accident,
        ReportKind::Injury,
        ReportKind::Claim,
        ReportKind::SupplierClaim,
        ReportKind::CaseDocument,
    ];

    /// Name of the backing table (one table per kind).
    pub fn table_name(&self) -> &'static str {
        match self {
            ReportKind::Accident => "accident_reports",
            ReportKind::Injury => "injury_assessments",
            ReportKind::Claim => "claims",
            ReportKind::SupplierClaim => "supplier_claims",
            ReportKind::CaseDocument => "case_documents",
        }
    }

    /// Human-readable document title.
    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Accident => "Accident Report",
            ReportKind::Injury => "Serious Injury Assessment Report",
            ReportKind::Claim => "RAF 1 Claim Form",
            ReportKind::SupplierClaim => "Supplier Claim Form",
            ReportKind::CaseDocument => "Case Document",
        }
    }

    /// URL path segment used by the HTTP API.
    pub fn path_segment(&self) -> &'static str {
        match self {
            ReportKind::Accident => "accident",
            ReportKind::Injury => "injury",
            ReportKind::Claim => "claim",
            ReportKind::SupplierClaim => "supplier-claim",
            ReportKind::CaseDocument => "case-document",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown report kind: {0}")]
pub struct UnknownKind(pub String);

impl std::str::FromStr for ReportKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportKind::ALL
            .into_iter()
            .find(|k| k.path_segment() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// Data-shape error raised when a stored row cannot be decoded back into its
/// report struct, or a report cannot be encoded into a row.
#[derive(Debug, Error)]
pub enum RowError {
    #[error("row has {got} cells, expected {expected}")]
    Width { expected: usize, got: usize },
    #[error("column `{column}`: {message}")]
    Cell { column: &'static str, message: String },
    #[error("column `{column}` could not be encoded: {source}")]
    Encode {
        column: &'static str,
        source: serde_json::Error,
    },
}

/// A record as held by the store: the system-generated id plus the report.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Stored<R> {
    pub record_id: String,
    #[serde(flatten)]
    pub report: R,
}

/// One report kind's schema and row codec.
pub trait Report: Serialize + DeserializeOwned + Sized {
    const KIND: ReportKind;

    /// Declared column order, excluding the store-owned `record_id`.
    fn columns() -> &'static [&'static str];

    /// Values in declared column order.
    fn to_row(&self) -> Result<Vec<String>, RowError>;

    /// Inverse of `to_row`. Numeric and date parse failures surface as
    /// `RowError::Cell`, never a panic.
    fn from_row(row: &[String]) -> Result<Self, RowError>;

    /// The human-entered identifier, also the designated search column.
    fn identity(&self) -> &str;

    /// Presence checks for required fields. Violations block the save and no
    /// partial write happens.
    fn validate(&self) -> Result<(), Vec<String>>;

    /// Forces conditional fields to the `N/A` placeholder when their governing
    /// flag is not `Yes`.
    fn normalize(&mut self) {}
}

/// Two-state flag as entered on the forms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    #[default]
    No,
}

impl YesNo {
    pub fn as_str(&self) -> &'static str {
        match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        }
    }

    pub fn is_yes(&self) -> bool {
        matches!(self, YesNo::Yes)
    }
}

pub(crate) fn parse_yes_no(column: &'static str, value: &str) -> Result<YesNo, RowError> {
    match value {
        "Yes" => Ok(YesNo::Yes),
        "No" => Ok(YesNo::No),
        other => Err(RowError::Cell {
            column,
            message: format!("expected Yes or No, got `{other}`"),
        }),
    }
}

pub(crate) fn check_width(row: &[String], expected: usize) -> Result<(), RowError> {
    if row.len() != expected {
        return Err(RowError::Width {
            expected,
            got: row.len(),
        });
    }
    Ok(())
}

pub(crate) fn parse_date(column: &'static str, value: &str) -> Result<Date, RowError> {
    value.parse().map_err(|e: jiff::Error| RowError::Cell {
        column,
        message: e.to_string(),
    })
}

pub(crate) fn parse_time(column: &'static str, value: &str) -> Result<Time, RowError> {
    value.parse().map_err(|e: jiff::Error| RowError::Cell {
        column,
        message: e.to_string(),
    })
}

pub(crate) fn parse_num<T>(column: &'static str, value: &str) -> Result<T, RowError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| RowError::Cell {
        column,
        message: e.to_string(),
    })
}

/// JSON-encodes a nested sub-structure into a single cell.
pub(crate) fn encode_cell<T: Serialize>(column: &'static str, value: &T) -> Result<String, RowError> {
    serde_json::to_string(value).map_err(|source| RowError::Encode { column, source })
}

pub(crate) fn decode_cell<T: DeserializeOwned>(column: &'static str, value: &str) -> Result<T, RowError> {
    serde_json::from_str(value).map_err(|e| RowError::Cell {
        column,
        message: e.to_string(),
    })
}

/// Optional free-text field as stored: the placeholder when absent.
pub(crate) fn opt_cell(value: &Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.clone(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub(crate) fn cell_opt(value: &str) -> Option<String> {
    if value.is_empty() || value == NOT_AVAILABLE {
        None
    } else {
        Some(value.to_string())
    }
}

pub(crate) fn require(errors: &mut Vec<String>, column: &'static str, present: bool) {
    if !present {
        errors.push(format!("{column} is required"));
    }
}
