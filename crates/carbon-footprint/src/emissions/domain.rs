use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::units::Unit;

/// Activity category; every record and registry entry belongs to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Combustion,
    Fugitive,
    Electricity,
    DistrictHeating,
    Water,
    Paper,
    SolidWaste,
    Wastewater,
    AirTravel,
    RailTravel,
    RoadTravel,
}

impl Category {
    pub const fn ordered() -> [Self; 11] {
        [
            Self::Combustion,
            Self::Fugitive,
            Self::Electricity,
            Self::DistrictHeating,
            Self::Water,
            Self::Paper,
            Self::SolidWaste,
            Self::Wastewater,
            Self::AirTravel,
            Self::RailTravel,
            Self::RoadTravel,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Combustion => "combustion",
            Self::Fugitive => "fugitive",
            Self::Electricity => "electricity",
            Self::DistrictHeating => "district_heating",
            Self::Water => "water",
            Self::Paper => "paper",
            Self::SolidWaste => "solid_waste",
            Self::Wastewater => "wastewater",
            Self::AirTravel => "air_travel",
            Self::RailTravel => "rail_travel",
            Self::RoadTravel => "road_travel",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Combustion => "Stationary & Mobile Combustion",
            Self::Fugitive => "Fugitive Refrigerants",
            Self::Electricity => "Purchased Electricity",
            Self::DistrictHeating => "District Heating",
            Self::Water => "Water Supply",
            Self::Paper => "Paper Usage",
            Self::SolidWaste => "Solid Waste Disposal",
            Self::Wastewater => "Wastewater Treatment",
            Self::AirTravel => "Air Travel",
            Self::RailTravel => "Rail Travel",
            Self::RoadTravel => "Taxi & Bus Travel",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = UnsupportedValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_choice("category", value, &Self::ordered(), |category| {
            category.key()
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    #[serde(alias = "Natural Gas")]
    NaturalGas,
    #[serde(alias = "Heating Oil")]
    HeatingOil,
    #[serde(alias = "Diesel")]
    Diesel,
    #[serde(alias = "Petrol")]
    Petrol,
    #[serde(alias = "Coal")]
    Coal,
}

impl FuelType {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::NaturalGas,
            Self::HeatingOil,
            Self::Diesel,
            Self::Petrol,
            Self::Coal,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::NaturalGas => "natural_gas",
            Self::HeatingOil => "heating_oil",
            Self::Diesel => "diesel",
            Self::Petrol => "petrol",
            Self::Coal => "coal",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NaturalGas => "Natural Gas",
            Self::HeatingOil => "Heating Oil",
            Self::Diesel => "Diesel",
            Self::Petrol => "Petrol",
            Self::Coal => "Coal",
        }
    }
}

impl FromStr for FuelType {
    type Err = UnsupportedValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_choice("fuel type", value, &Self::ordered(), |fuel| fuel.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RefrigerantType {
    R407C,
    R32,
    R410A,
    #[serde(rename = "custom", alias = "Custom")]
    Custom,
}

impl RefrigerantType {
    pub const fn ordered() -> [Self; 4] {
        [Self::R407C, Self::R32, Self::R410A, Self::Custom]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::R407C => "R407C",
            Self::R32 => "R32",
            Self::R410A => "R410A",
            Self::Custom => "custom",
        }
    }
}

impl FromStr for RefrigerantType {
    type Err = UnsupportedValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_choice("refrigerant type", value, &Self::ordered(), |refrigerant| {
            refrigerant.key()
        })
    }
}

/// Vehicle profile used to estimate fuel burned from fleet mileage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FleetVehicle {
    #[serde(alias = "Passenger Car Diesel")]
    PassengerCarDiesel,
}

impl FleetVehicle {
    pub const fn ordered() -> [Self; 1] {
        [Self::PassengerCarDiesel]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::PassengerCarDiesel => "passenger_car_diesel",
        }
    }
}

impl FromStr for FleetVehicle {
    type Err = UnsupportedValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_choice("fleet vehicle", value, &Self::ordered(), |vehicle| {
            vehicle.key()
        })
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FlightClass {
    #[default]
    Economy,
    Business,
}

impl FlightClass {
    pub const fn ordered() -> [Self; 2] {
        [Self::Economy, Self::Business]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Economy => "economy",
            Self::Business => "business",
        }
    }
}

impl FromStr for FlightClass {
    type Err = UnsupportedValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_choice("flight class", value, &Self::ordered(), |class| class.key())
    }
}

/// Flight length classification; factors per mile fall as flights get longer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HaulBand {
    Short,
    Medium,
    Long,
}

impl HaulBand {
    const SHORT_HAUL_LIMIT_MILES: f64 = 300.0;
    const MEDIUM_HAUL_LIMIT_MILES: f64 = 2300.0;

    pub fn from_miles(miles: f64) -> Self {
        if miles < Self::SHORT_HAUL_LIMIT_MILES {
            Self::Short
        } else if miles < Self::MEDIUM_HAUL_LIMIT_MILES {
            Self::Medium
        } else {
            Self::Long
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Short => "short_haul",
            Self::Medium => "medium_haul",
            Self::Long => "long_haul",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadVehicle {
    #[serde(alias = "Taxi")]
    Taxi,
    #[serde(alias = "Bus")]
    Bus,
}

impl RoadVehicle {
    pub const fn ordered() -> [Self; 2] {
        [Self::Taxi, Self::Bus]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Taxi => "taxi",
            Self::Bus => "bus",
        }
    }
}

impl FromStr for RoadVehicle {
    type Err = UnsupportedValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_choice("vehicle type", value, &Self::ordered(), |vehicle| {
            vehicle.key()
        })
    }
}

/// Raised when a free-form value does not name a member of a closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported {kind} '{value}'")]
pub struct UnsupportedValue {
    pub kind: &'static str,
    pub value: String,
}

pub(crate) fn parse_choice<T: Copy>(
    kind: &'static str,
    value: &str,
    choices: &[T],
    key: impl Fn(T) -> &'static str,
) -> Result<T, UnsupportedValue> {
    let wanted = comparable(value);
    choices
        .iter()
        .copied()
        .find(|choice| comparable(key(*choice)) == wanted)
        .ok_or_else(|| UnsupportedValue {
            kind,
            value: value.trim().to_string(),
        })
}

fn comparable(value: &str) -> String {
    value
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

fn default_kilograms() -> Unit {
    Unit::Kilograms
}

fn default_kilowatt_hours() -> Unit {
    Unit::KilowattHours
}

fn default_gigajoules() -> Unit {
    Unit::Gigajoules
}

fn default_cubic_meters() -> Unit {
    Unit::CubicMeters
}

fn default_kilometers() -> Unit {
    Unit::Kilometers
}

/// Fuel burned in boilers, generators or fleet vehicles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombustionRecord {
    pub source: String,
    pub fuel_type: FuelType,
    pub unit: Unit,
    pub amount: f64,
    /// Required when `unit` is a distance: fuel use is estimated from mileage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<FleetVehicle>,
    /// MJ per kg, or MJ per m3 for gaseous fuels.
    #[serde(
        default,
        alias = "calorific_value_mj_kg",
        skip_serializing_if = "Option::is_none"
    )]
    pub calorific_value_mj: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density_kg_l: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emission_factor_co2_kg_gj: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emission_factor_ch4_kg_gj: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emission_factor_n2o_kg_gj: Option<f64>,
}

impl CombustionRecord {
    pub fn new(source: impl Into<String>, fuel_type: FuelType, amount: f64, unit: Unit) -> Self {
        Self {
            source: source.into(),
            fuel_type,
            unit,
            amount,
            vehicle: None,
            calorific_value_mj: None,
            density_kg_l: None,
            emission_factor_co2_kg_gj: None,
            emission_factor_ch4_kg_gj: None,
            emission_factor_n2o_kg_gj: None,
        }
    }
}

/// Refrigerant refilled into cooling equipment, assumed to replace leaked charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FugitiveRecord {
    pub source: String,
    pub refrigerant_type: RefrigerantType,
    #[serde(alias = "amount_kg")]
    pub amount: f64,
    #[serde(default = "default_kilograms")]
    pub unit: Unit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gwp_factor: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectricityRecord {
    #[serde(default)]
    pub source: String,
    #[serde(alias = "amount_kwh")]
    pub amount: f64,
    #[serde(default = "default_kilowatt_hours")]
    pub unit: Unit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatingRecord {
    #[serde(default)]
    pub source: String,
    #[serde(alias = "amount_gj")]
    pub amount: f64,
    #[serde(default = "default_gigajoules")]
    pub unit: Unit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterRecord {
    #[serde(default)]
    pub source: String,
    #[serde(alias = "volume_m3")]
    pub volume: f64,
    #[serde(default = "default_cubic_meters")]
    pub unit: Unit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperRecord {
    #[serde(default)]
    pub source: String,
    #[serde(alias = "mass_kg")]
    pub mass: f64,
    #[serde(default = "default_kilograms")]
    pub unit: Unit,
    #[serde(default)]
    pub eco_labeled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolidWasteRecord {
    #[serde(default)]
    pub source: String,
    #[serde(alias = "mass_kg")]
    pub mass: f64,
    #[serde(default = "default_kilograms")]
    pub unit: Unit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WastewaterRecord {
    #[serde(default)]
    pub source: String,
    #[serde(alias = "volume_m3")]
    pub volume: f64,
    #[serde(default = "default_cubic_meters")]
    pub unit: Unit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirTravelRecord {
    #[serde(default)]
    pub source: String,
    #[serde(alias = "distance_km")]
    pub distance: f64,
    #[serde(default = "default_kilometers")]
    pub unit: Unit,
    #[serde(default)]
    pub flight_class: FlightClass,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RailTravelRecord {
    #[serde(default)]
    pub source: String,
    #[serde(alias = "distance_km")]
    pub distance: f64,
    #[serde(default = "default_kilometers")]
    pub unit: Unit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadTravelRecord {
    #[serde(default)]
    pub source: String,
    #[serde(alias = "distance_km")]
    pub distance: f64,
    #[serde(default = "default_kilometers")]
    pub unit: Unit,
    pub vehicle_type: RoadVehicle,
}

/// Common view over records whose emissions scale with one measured quantity.
pub trait Measured {
    const CATEGORY: Category;

    fn label(&self) -> &str;
    fn quantity(&self) -> (f64, Unit);
}

macro_rules! measured {
    ($record:ty, $category:expr, $field:ident) => {
        impl Measured for $record {
            const CATEGORY: Category = $category;

            fn label(&self) -> &str {
                &self.source
            }

            fn quantity(&self) -> (f64, Unit) {
                (self.$field, self.unit)
            }
        }
    };
}

measured!(CombustionRecord, Category::Combustion, amount);
measured!(FugitiveRecord, Category::Fugitive, amount);
measured!(ElectricityRecord, Category::Electricity, amount);
measured!(HeatingRecord, Category::DistrictHeating, amount);
measured!(WaterRecord, Category::Water, volume);
measured!(PaperRecord, Category::Paper, mass);
measured!(SolidWasteRecord, Category::SolidWaste, mass);
measured!(WastewaterRecord, Category::Wastewater, volume);
measured!(AirTravelRecord, Category::AirTravel, distance);
measured!(RailTravelRecord, Category::RailTravel, distance);
measured!(RoadTravelRecord, Category::RoadTravel, distance);

/// A single submitted activity, tagged by its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ActivityRecord {
    Combustion(CombustionRecord),
    Fugitive(FugitiveRecord),
    Electricity(ElectricityRecord),
    DistrictHeating(HeatingRecord),
    Water(WaterRecord),
    Paper(PaperRecord),
    SolidWaste(SolidWasteRecord),
    Wastewater(WastewaterRecord),
    AirTravel(AirTravelRecord),
    RailTravel(RailTravelRecord),
    RoadTravel(RoadTravelRecord),
}

impl ActivityRecord {
    pub const fn category(&self) -> Category {
        match self {
            Self::Combustion(_) => Category::Combustion,
            Self::Fugitive(_) => Category::Fugitive,
            Self::Electricity(_) => Category::Electricity,
            Self::DistrictHeating(_) => Category::DistrictHeating,
            Self::Water(_) => Category::Water,
            Self::Paper(_) => Category::Paper,
            Self::SolidWaste(_) => Category::SolidWaste,
            Self::Wastewater(_) => Category::Wastewater,
            Self::AirTravel(_) => Category::AirTravel,
            Self::RailTravel(_) => Category::RailTravel,
            Self::RoadTravel(_) => Category::RoadTravel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_enums_parse_loose_spellings() {
        assert_eq!("Natural Gas".parse::<FuelType>(), Ok(FuelType::NaturalGas));
        assert_eq!("heating-oil".parse::<FuelType>(), Ok(FuelType::HeatingOil));
        assert_eq!("r410a".parse::<RefrigerantType>(), Ok(RefrigerantType::R410A));
        assert_eq!("BUS".parse::<RoadVehicle>(), Ok(RoadVehicle::Bus));
        assert_eq!(
            "district heating".parse::<Category>(),
            Ok(Category::DistrictHeating)
        );
    }

    #[test]
    fn closed_enums_reject_unknown_values() {
        let error = "scooter".parse::<RoadVehicle>().expect_err("unknown vehicle");
        assert_eq!(error.kind, "vehicle type");
        assert_eq!(error.to_string(), "unsupported vehicle type 'scooter'");
        assert!("hydrogen".parse::<FuelType>().is_err());
    }

    #[test]
    fn haul_band_boundaries_follow_mileage() {
        assert_eq!(HaulBand::from_miles(299.9), HaulBand::Short);
        assert_eq!(HaulBand::from_miles(300.0), HaulBand::Medium);
        assert_eq!(HaulBand::from_miles(2299.0), HaulBand::Medium);
        assert_eq!(HaulBand::from_miles(2300.0), HaulBand::Long);
    }

    #[test]
    fn activity_records_use_category_tag_and_legacy_field_names() {
        let record: ActivityRecord = serde_json::from_value(serde_json::json!({
            "category": "fugitive",
            "source": "Rooftop chiller",
            "refrigerant_type": "R32",
            "amount_kg": 2.5
        }))
        .expect("record parses");

        match record {
            ActivityRecord::Fugitive(fugitive) => {
                assert_eq!(fugitive.refrigerant_type, RefrigerantType::R32);
                assert_eq!(fugitive.amount, 2.5);
                assert_eq!(fugitive.unit, Unit::Kilograms);
                assert!(fugitive.gwp_factor.is_none());
            }
            other => panic!("expected fugitive record, got {other:?}"),
        }
    }

    #[test]
    fn unknown_fuel_strings_fail_deserialization() {
        let parsed = serde_json::from_value::<CombustionRecord>(serde_json::json!({
            "source": "Boiler",
            "fuel_type": "Biomass",
            "unit": "t",
            "amount": 1.0
        }));
        assert!(parsed.is_err());
    }
}
