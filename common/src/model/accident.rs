//! Accident report: the richest of the report kinds, with two driver
//! sub-records, dynamic vehicle/witness lists and media locator lists.

use jiff::civil::{Date, Time};
use serde::{Deserialize, Serialize};

use super::report::{
    cell_opt, check_width, decode_cell, encode_cell, opt_cell, parse_date, parse_num, parse_time,
    Report, ReportKind, RowError, YesNo, NOT_AVAILABLE,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weather {
    Clear,
    Rainy,
    Foggy,
    Snowy,
}

impl Weather {
    pub fn as_str(&self) -> &'static str {
        match self {
            Weather::Clear => "Clear",
            Weather::Rainy => "Rainy",
            Weather::Foggy => "Foggy",
            Weather::Snowy => "Snowy",
        }
    }

    fn parse(column: &'static str, value: &str) -> Result<Self, RowError> {
        match value {
            "Clear" => Ok(Weather::Clear),
            "Rainy" => Ok(Weather::Rainy),
            "Foggy" => Ok(Weather::Foggy),
            "Snowy" => Ok(Weather::Snowy),
            other => Err(RowError::Cell {
                column,
                message: format!("unknown weather `{other}`"),
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoadCondition {
    Good,
    Wet,
    Icy,
}

impl RoadCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoadCondition::Good => "Good",
            RoadCondition::Wet => "Wet",
            RoadCondition::Icy => "Icy",
        }
    }

    fn parse(column: &'static str, value: &str) -> Result<Self, RowError> {
        match value {
            "Good" => Ok(RoadCondition::Good),
            "Wet" => Ok(RoadCondition::Wet),
            "Icy" => Ok(RoadCondition::Icy),
            other => Err(RowError::Cell {
                column,
                message: format!("unknown road condition `{other}`"),
            }),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub registration_number: String,
    pub make: String,
    pub model: String,
    pub year: String,
    pub color: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Witness {
    pub name: String,
    pub id_number: String,
    pub contact: String,
}

/// Driver sub-record. The employer, medical aid company and insurance company
/// fields are conditional: they only carry a value while the governing flag is
/// `Yes`, otherwise `normalize` pins them to the placeholder.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub name: String,
    pub id_number: String,
    pub injuries: String,
    pub license_number: String,
    pub license_date_issued: Option<Date>,
    pub license_endorsements: String,
    pub physical_mental_defects: String,
    pub residential_address: String,
    pub work_address: String,
    pub employed: YesNo,
    pub employer: String,
    pub medical_aid: YesNo,
    pub medical_aid_company: String,
    pub insured: YesNo,
    pub insurance_company: String,
    pub under_influence: YesNo,
    pub license_image_url: Option<String>,
}

impl Driver {
    pub fn normalize(&mut self) {
        if !self.employed.is_yes() {
            self.employer = NOT_AVAILABLE.to_string();
        }
        if !self.medical_aid.is_yes() {
            self.medical_aid_company = NOT_AVAILABLE.to_string();
        }
        if !self.insured.is_yes() {
            self.insurance_company = NOT_AVAILABLE.to_string();
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccidentReport {
    pub case_number: String,
    pub accident_date: Date,
    pub accident_time: Time,
    pub road_name: String,
    pub police_station: String,
    pub police_reference_number: String,
    pub speed_limit: u32,
    pub weather: Weather,
    pub road_condition: RoadCondition,
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    pub driver_a: Driver,
    pub driver_b: Driver,
    #[serde(default)]
    pub witnesses: Vec<Witness>,
    #[serde(default)]
    pub accident_image_urls: Vec<String>,
    #[serde(default)]
    pub accident_video_url: Option<String>,
    #[serde(default)]
    pub voice_note_urls: Vec<String>,
}

const COLUMNS: &[&str] = &[
    "case_number",
    "accident_date",
    "accident_time",
    "road_name",
    "police_station",
    "police_reference_number",
    "speed_limit",
    "weather",
    "road_condition",
    "vehicles",
    "driver_a",
    "driver_b",
    "witnesses",
    "accident_image_urls",
    "accident_video_url",
    "voice_note_urls",
];

impl Report for AccidentReport {
    const KIND: ReportKind = ReportKind::Accident;

    fn columns() -> &'static [&'static str] {
        COLUMNS
    }

    fn to_row(&self) -> Result<Vec<String>, RowError> {
        Ok(vec![
            self.case_number.clone(),
            self.accident_date.to_string(),
            self.accident_time.to_string(),
            self.road_name.clone(),
            self.police_station.clone(),
            self.police_reference_number.clone(),
            self.speed_limit.to_string(),
            self.weather.as_str().to_string(),
            self.road_condition.as_str().to_string(),
            encode_cell("vehicles", &self.vehicles)?,
            encode_cell("driver_a", &self.driver_a)?,
            encode_cell("driver_b", &self.driver_b)?,
            encode_cell("witnesses", &self.witnesses)?,
            encode_cell("accident_image_urls", &self.accident_image_urls)?,
            opt_cell(&self.accident_video_url),
            encode_cell("voice_note_urls", &self.voice_note_urls)?,
        ])
    }

    fn from_row(row: &[String]) -> Result<Self, RowError> {
        check_width(row, COLUMNS.len())?;
        Ok(AccidentReport {
            case_number: row[0].clone(),
            accident_date: parse_date("accident_date", &row[1])?,
            accident_time: parse_time("accident_time", &row[2])?,
            road_name: row[3].clone(),
            police_station: row[4].clone(),
            police_reference_number: row[5].clone(),
            speed_limit: parse_num("speed_limit", &row[6])?,
            weather: Weather::parse("weather", &row[7])?,
            road_condition: RoadCondition::parse("road_condition", &row[8])?,
            vehicles: decode_cell("vehicles", &row[9])?,
            driver_a: decode_cell("driver_a", &row[10])?,
            driver_b: decode_cell("driver_b", &row[11])?,
            witnesses: decode_cell("witnesses", &row[12])?,
            accident_image_urls: decode_cell("accident_image_urls", &row[13])?,
            accident_video_url: cell_opt(&row[14]),
            voice_note_urls: decode_cell("voice_note_urls", &row[15])?,
        })
    }

    fn identity(&self) -> &str {
        &self.case_number
    }

    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        super::report::require(&mut errors, "case_number", !self.case_number.trim().is_empty());
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn normalize(&mut self) {
        self.driver_a.normalize();
        self.driver_b.normalize();
        if matches!(&self.accident_video_url, Some(v) if v.trim().is_empty()) {
            self.accident_video_url = None;
        }
    }
}
