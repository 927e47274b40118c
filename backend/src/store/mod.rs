//! Tabular persistence: one CSV table per report kind under the data
//! directory, header row first, `record_id` always the leading column.
//!
//! Column order is the only schema contract, so every operation re-checks the
//! stored header against the kind's declared columns and refuses to touch a
//! drifted table instead of silently corrupting rows. Updates key on the
//! store-generated `record_id`; value-match updates demand exactly one hit.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use common::model::report::{Report, ReportKind, RowError, Stored};
use log::debug;
use tempfile::NamedTempFile;
use thiserror::Error;
use uuid::Uuid;

/// System-owned leading column, assigned on append.
pub const RECORD_ID_COLUMN: &str = "record_id";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Row(#[from] RowError),
    #[error("{table}: no row matches {key}")]
    NotFound { table: &'static str, key: String },
    #[error("{table}: {count} rows match {column} = `{value}`, refusing ambiguous update")]
    AmbiguousMatch {
        table: &'static str,
        column: String,
        value: String,
        count: usize,
    },
    #[error("{table}: stored header does not match declared columns (found: {found})")]
    SchemaDrift { table: &'static str, found: String },
    #[error("{table}: unknown match column `{column}`")]
    UnknownColumn { table: &'static str, column: String },
}

/// A workbook of CSV tables, one file per report kind.
pub struct CsvWorkbook {
    dir: PathBuf,
}

impl CsvWorkbook {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(CsvWorkbook { dir })
    }

    fn table_path(&self, kind: ReportKind) -> PathBuf {
        self.dir.join(format!("{}.csv", kind.table_name()))
    }

    fn expected_header<R: Report>() -> Vec<&'static str> {
        std::iter::once(RECORD_ID_COLUMN)
            .chain(R::columns().iter().copied())
            .collect()
    }

    /// Reads the whole table as raw rows: (record_id, cells in declared order).
    /// A missing file is an empty table. Header drift is an error.
    fn read_raw<R: Report>(&self, path: &Path) -> Result<Vec<(String, Vec<String>)>, StoreError> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(path)?;
        let expected = Self::expected_header::<R>();
        let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if header != expected {
            return Err(StoreError::SchemaDrift {
                table: R::KIND.table_name(),
                found: header.join(","),
            });
        }
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
            if cells.is_empty() {
                continue;
            }
            let id = cells.remove(0);
            rows.push((id, cells));
        }
        Ok(rows)
    }

    /// Rewrites the table atomically: header plus the given raw rows go to a
    /// temp file in the same directory, which then replaces the table.
    fn write_raw<R: Report>(
        &self,
        path: &Path,
        rows: &[(String, Vec<String>)],
    ) -> Result<(), StoreError> {
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        {
            let mut writer = csv::Writer::from_writer(&mut tmp);
            writer.write_record(Self::expected_header::<R>())?;
            for (id, cells) in rows {
                writer.write_record(std::iter::once(id.as_str()).chain(cells.iter().map(String::as_str)))?;
            }
            writer.flush()?;
        }
        tmp.flush()?;
        tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }

    /// Appends exactly one row and returns the generated record id. There is
    /// deliberately no uniqueness check on the identity column.
    pub fn append<R: Report>(&self, report: &R) -> Result<String, StoreError> {
        let path = self.table_path(R::KIND);
        if !path.exists() {
            self.write_raw::<R>(&path, &[])?;
        } else {
            // Validate the header before appending blind.
            self.read_raw::<R>(&path)?;
        }
        let id = Uuid::new_v4().to_string();
        let file = OpenOptions::new().append(true).open(&path)?;
        let mut writer = csv::Writer::from_writer(file);
        let row = report.to_row()?;
        writer.write_record(std::iter::once(id.as_str()).chain(row.iter().map(String::as_str)))?;
        writer.flush()?;
        debug!("appended record {} to {}", id, R::KIND.table_name());
        Ok(id)
    }

    /// Full-table fetch. Filtering happens on the caller's side.
    pub fn rows<R: Report>(&self) -> Result<Vec<Stored<R>>, StoreError> {
        let path = self.table_path(R::KIND);
        let mut out = Vec::new();
        for (record_id, cells) in self.read_raw::<R>(&path)? {
            out.push(Stored {
                record_id,
                report: R::from_row(&cells)?,
            });
        }
        Ok(out)
    }

    pub fn get<R: Report>(&self, record_id: &str) -> Result<Stored<R>, StoreError> {
        self.rows::<R>()?
            .into_iter()
            .find(|r| r.record_id == record_id)
            .ok_or_else(|| StoreError::NotFound {
                table: R::KIND.table_name(),
                key: record_id.to_string(),
            })
    }

    /// Overwrites the row with the given record id, leaving all others intact.
    pub fn update<R: Report>(&self, record_id: &str, report: &R) -> Result<(), StoreError> {
        let path = self.table_path(R::KIND);
        let mut rows = self.read_raw::<R>(&path)?;
        let slot = rows
            .iter_mut()
            .find(|(id, _)| id == record_id)
            .ok_or_else(|| StoreError::NotFound {
                table: R::KIND.table_name(),
                key: record_id.to_string(),
            })?;
        slot.1 = report.to_row()?;
        self.write_raw::<R>(&path, &rows)
    }

    /// Updates the single row whose `column` cell equals `value`. Zero matches
    /// is not-found and leaves the table untouched; more than one match is
    /// refused rather than silently taking the first hit.
    pub fn update_where<R: Report>(
        &self,
        column: &str,
        value: &str,
        report: &R,
    ) -> Result<String, StoreError> {
        let idx = R::columns()
            .iter()
            .position(|c| *c == column)
            .ok_or_else(|| StoreError::UnknownColumn {
                table: R::KIND.table_name(),
                column: column.to_string(),
            })?;
        let path = self.table_path(R::KIND);
        let mut rows = self.read_raw::<R>(&path)?;
        let matches: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, (_, cells))| cells.get(idx).map(String::as_str) == Some(value))
            .map(|(i, _)| i)
            .collect();
        match matches.as_slice() {
            [] => Err(StoreError::NotFound {
                table: R::KIND.table_name(),
                key: format!("{column} = `{value}`"),
            }),
            [only] => {
                rows[*only].1 = report.to_row()?;
                let id = rows[*only].0.clone();
                self.write_raw::<R>(&path, &rows)?;
                Ok(id)
            }
            _ => Err(StoreError::AmbiguousMatch {
                table: R::KIND.table_name(),
                column: column.to_string(),
                value: value.to_string(),
                count: matches.len(),
            }),
        }
    }

    /// Case-insensitive substring search on the identity column.
    pub fn search<R: Report>(&self, term: &str) -> Result<Vec<Stored<R>>, StoreError> {
        let needle = term.to_lowercase();
        Ok(self
            .rows::<R>()?
            .into_iter()
            .filter(|r| r.report.identity().to_lowercase().contains(&needle))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::claim::ClaimForm;
    use common::model::report::Report as _;
    use jiff::civil::Date;
    use tempfile::tempdir;

    fn claim(id: &str, name: &str) -> ClaimForm {
        ClaimForm {
            claimant_name: name.to_string(),
            claimant_id: id.to_string(),
            claim_number: format!("RAF-{id}"),
            date_of_birth: Date::constant(1990, 1, 31),
            residential_address: "12 Long St".to_string(),
            postal_address: "PO Box 9".to_string(),
            phone_number: "021 555 0100".to_string(),
            email_address: "x@example.com".to_string(),
            occupation: "Driver".to_string(),
            employer_name: "Acme".to_string(),
            employer_address: "1 Acme Rd".to_string(),
            claim_description: "whiplash, loss of income".to_string(),
        }
    }

    #[test]
    fn append_then_read_back_in_declared_order() {
        let dir = tempdir().unwrap();
        let wb = CsvWorkbook::open(dir.path()).unwrap();
        let saved = claim("A1", "P. Dlamini");
        let id = wb.append(&saved).unwrap();

        let rows = wb.rows::<ClaimForm>().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].record_id, id);
        assert_eq!(rows[0].report.to_row().unwrap(), saved.to_row().unwrap());
    }

    #[test]
    fn update_by_identity_touches_only_the_matched_row() {
        let dir = tempdir().unwrap();
        let wb = CsvWorkbook::open(dir.path()).unwrap();
        wb.append(&claim("A1", "first")).unwrap();
        wb.append(&claim("B2", "second")).unwrap();

        let mut changed = claim("A1", "first, amended");
        changed.occupation = "Foreman".to_string();
        wb.update_where("claimant_id", "A1", &changed).unwrap();

        let rows = wb.rows::<ClaimForm>().unwrap();
        let a1 = rows.iter().find(|r| r.report.claimant_id == "A1").unwrap();
        let b2 = rows.iter().find(|r| r.report.claimant_id == "B2").unwrap();
        assert_eq!(a1.report.claimant_name, "first, amended");
        assert_eq!(b2.report.claimant_name, "second");
    }

    #[test]
    fn update_with_no_match_reports_not_found_and_changes_nothing() {
        let dir = tempdir().unwrap();
        let wb = CsvWorkbook::open(dir.path()).unwrap();
        wb.append(&claim("A1", "only")).unwrap();

        let err = wb
            .update_where("claimant_id", "ZZ", &claim("ZZ", "ghost"))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        let rows = wb.rows::<ClaimForm>().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].report.claimant_name, "only");
    }

    #[test]
    fn ambiguous_match_is_refused() {
        let dir = tempdir().unwrap();
        let wb = CsvWorkbook::open(dir.path()).unwrap();
        wb.append(&claim("A1", "first")).unwrap();
        wb.append(&claim("A1", "duplicate")).unwrap();

        let err = wb
            .update_where("claimant_id", "A1", &claim("A1", "which one?"))
            .unwrap_err();
        assert!(matches!(err, StoreError::AmbiguousMatch { count: 2, .. }));
    }

    #[test]
    fn update_by_record_id() {
        let dir = tempdir().unwrap();
        let wb = CsvWorkbook::open(dir.path()).unwrap();
        let id = wb.append(&claim("A1", "before")).unwrap();
        wb.update(&id, &claim("A1", "after")).unwrap();
        assert_eq!(wb.get::<ClaimForm>(&id).unwrap().report.claimant_name, "after");

        let err = wb.update("no-such-id", &claim("A1", "x")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn search_is_case_insensitive_substring_on_identity() {
        let dir = tempdir().unwrap();
        let wb = CsvWorkbook::open(dir.path()).unwrap();
        for id in ["100", "200", "123"] {
            wb.append(&claim(id, "n")).unwrap();
        }
        let hits = wb.search::<ClaimForm>("1").unwrap();
        let mut ids: Vec<&str> = hits.iter().map(|r| r.report.claimant_id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, ["100", "123"]);
    }

    #[test]
    fn drifted_header_is_rejected() {
        let dir = tempdir().unwrap();
        let wb = CsvWorkbook::open(dir.path()).unwrap();
        wb.append(&claim("A1", "n")).unwrap();

        // Tamper with the header the way an out-of-band edit would.
        let path = dir.path().join("claims.csv");
        let contents = std::fs::read_to_string(&path).unwrap();
        let tampered = contents.replacen("claimant_id", "claimant", 1);
        std::fs::write(&path, tampered).unwrap();

        let err = wb.rows::<ClaimForm>().unwrap_err();
        assert!(matches!(err, StoreError::SchemaDrift { .. }));
    }
}
