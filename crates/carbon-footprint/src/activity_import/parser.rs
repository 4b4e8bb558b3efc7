use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::str::FromStr;

use crate::emissions::{
    ActivityRecord, AirTravelRecord, Category, CombustionRecord, ElectricityRecord,
    FugitiveRecord, HeatingRecord, PaperRecord, RailTravelRecord, RoadTravelRecord,
    SolidWasteRecord, Unit, UnsupportedValue, WastewaterRecord, WaterRecord,
};

/// Why a single sheet row could not become an activity record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowError {
    #[error(transparent)]
    Unsupported(#[from] UnsupportedValue),
    #[error("missing required column '{column}'")]
    Missing { column: &'static str },
    #[error("column '{column}' holds '{value}', expected a number")]
    InvalidNumber { column: &'static str, value: String },
    #[error("column '{column}' holds '{value}', expected yes or no")]
    InvalidFlag { column: &'static str, value: String },
}

#[derive(Debug)]
pub(crate) struct ParsedRow {
    pub(crate) line: u64,
    pub(crate) outcome: Result<ActivityRecord, RowError>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<ParsedRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        let line = record.position().map_or(0, |position| position.line());
        let row: ActivityRow = record.deserialize(Some(&headers))?;
        rows.push(ParsedRow {
            line,
            outcome: row.into_record(),
        });
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct ActivityRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    category: Option<String>,
    #[serde(default)]
    source: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    amount: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    unit: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "empty_string_as_none")]
    subtype: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    vehicle: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    eco_labeled: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    calorific_value_mj: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    density_kg_l: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    emission_factor_co2_kg_gj: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    emission_factor_ch4_kg_gj: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    emission_factor_n2o_kg_gj: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    gwp_factor: Option<String>,
}

impl ActivityRow {
    fn into_record(self) -> Result<ActivityRecord, RowError> {
        let category: Category = required(&self.category, "category")?.parse()?;
        let amount = number("amount", required(&self.amount, "amount")?)?;
        let unit = match self.unit.as_deref() {
            Some(value) => value.parse()?,
            None => default_unit(category).ok_or(RowError::Missing { column: "unit" })?,
        };
        let source = self.source.clone();

        let record = match category {
            Category::Combustion => {
                let fuel = required(&self.subtype, "type")?.parse()?;
                let mut record = CombustionRecord::new(source, fuel, amount, unit);
                record.vehicle = parse_optional(&self.vehicle)?;
                record.calorific_value_mj =
                    optional_number("calorific_value_mj", &self.calorific_value_mj)?;
                record.density_kg_l = optional_number("density_kg_l", &self.density_kg_l)?;
                record.emission_factor_co2_kg_gj =
                    optional_number("emission_factor_co2_kg_gj", &self.emission_factor_co2_kg_gj)?;
                record.emission_factor_ch4_kg_gj =
                    optional_number("emission_factor_ch4_kg_gj", &self.emission_factor_ch4_kg_gj)?;
                record.emission_factor_n2o_kg_gj =
                    optional_number("emission_factor_n2o_kg_gj", &self.emission_factor_n2o_kg_gj)?;
                ActivityRecord::Combustion(record)
            }
            Category::Fugitive => ActivityRecord::Fugitive(FugitiveRecord {
                source,
                refrigerant_type: required(&self.subtype, "type")?.parse()?,
                amount,
                unit,
                gwp_factor: optional_number("gwp_factor", &self.gwp_factor)?,
            }),
            Category::Electricity => ActivityRecord::Electricity(ElectricityRecord {
                source,
                amount,
                unit,
            }),
            Category::DistrictHeating => ActivityRecord::DistrictHeating(HeatingRecord {
                source,
                amount,
                unit,
            }),
            Category::Water => ActivityRecord::Water(WaterRecord {
                source,
                volume: amount,
                unit,
            }),
            Category::Paper => ActivityRecord::Paper(PaperRecord {
                source,
                mass: amount,
                unit,
                eco_labeled: flag("eco_labeled", &self.eco_labeled)?,
            }),
            Category::SolidWaste => ActivityRecord::SolidWaste(SolidWasteRecord {
                source,
                mass: amount,
                unit,
            }),
            Category::Wastewater => ActivityRecord::Wastewater(WastewaterRecord {
                source,
                volume: amount,
                unit,
            }),
            Category::AirTravel => ActivityRecord::AirTravel(AirTravelRecord {
                source,
                distance: amount,
                unit,
                flight_class: parse_optional(&self.subtype)?.unwrap_or_default(),
            }),
            Category::RailTravel => ActivityRecord::RailTravel(RailTravelRecord {
                source,
                distance: amount,
                unit,
            }),
            Category::RoadTravel => ActivityRecord::RoadTravel(RoadTravelRecord {
                source,
                distance: amount,
                unit,
                vehicle_type: required(&self.subtype, "type")?.parse()?,
            }),
        };

        Ok(record)
    }
}

/// Unit assumed when the sheet leaves the unit column blank; fuels must always state one.
fn default_unit(category: Category) -> Option<Unit> {
    match category {
        Category::Combustion => None,
        Category::Water | Category::Wastewater => Some(Unit::CubicMeters),
        Category::Fugitive | Category::Paper | Category::SolidWaste => Some(Unit::Kilograms),
        Category::Electricity => Some(Unit::KilowattHours),
        Category::DistrictHeating => Some(Unit::Gigajoules),
        Category::AirTravel | Category::RailTravel | Category::RoadTravel => {
            Some(Unit::Kilometers)
        }
    }
}

fn required<'a>(value: &'a Option<String>, column: &'static str) -> Result<&'a str, RowError> {
    value.as_deref().ok_or(RowError::Missing { column })
}

fn parse_optional<T>(value: &Option<String>) -> Result<Option<T>, RowError>
where
    T: FromStr<Err = UnsupportedValue>,
{
    value
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(RowError::from)
}

fn number(column: &'static str, value: &str) -> Result<f64, RowError> {
    value
        .replace(',', "")
        .parse::<f64>()
        .map_err(|_| RowError::InvalidNumber {
            column,
            value: value.to_string(),
        })
}

fn optional_number(column: &'static str, value: &Option<String>) -> Result<Option<f64>, RowError> {
    value.as_deref().map(|value| number(column, value)).transpose()
}

fn flag(column: &'static str, value: &Option<String>) -> Result<bool, RowError> {
    match value.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None | Some("no" | "false" | "n" | "0") => Ok(false),
        Some("yes" | "true" | "y" | "1") => Ok(true),
        Some(other) => Err(RowError::InvalidFlag {
            column,
            value: other.to_string(),
        }),
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
