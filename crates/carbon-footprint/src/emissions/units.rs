//! Unit normalization.
//!
//! Every quantity is converted into its canonical unit before a factor is applied:
//! energy in gigajoules, mass in kilograms, volume in liters, distance in kilometers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::domain::{parse_choice, Category, FuelType, Measured, UnsupportedValue};
use super::error::EmissionError;
use super::factors::CalorificValue;

const LITERS_PER_CUBIC_METER: f64 = 1000.0;
const KILOGRAMS_PER_TONNE: f64 = 1000.0;
const GIGAJOULES_PER_KILOWATT_HOUR: f64 = 0.0036;
const GIGAJOULES_PER_MEGAWATT_HOUR: f64 = 3.6;
const MEGAJOULES_PER_GIGAJOULE: f64 = 1000.0;
const GIGAJOULES_PER_MEGAJOULE: f64 = 0.001;
const KILOMETERS_PER_MILE: f64 = 1.609344;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Energy,
    Mass,
    Volume,
    Distance,
}

impl Dimension {
    pub const fn canonical_unit(self) -> Unit {
        match self {
            Self::Energy => Unit::Gigajoules,
            Self::Mass => Unit::Kilograms,
            Self::Volume => Unit::Liters,
            Self::Distance => Unit::Kilometers,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "l", alias = "L", alias = "liters")]
    Liters,
    #[serde(rename = "m3")]
    CubicMeters,
    #[serde(rename = "kg")]
    Kilograms,
    #[serde(rename = "t", alias = "tonnes")]
    Tonnes,
    #[serde(rename = "kWh")]
    KilowattHours,
    #[serde(rename = "MWh")]
    MegawattHours,
    #[serde(rename = "MJ")]
    Megajoules,
    #[serde(rename = "GJ")]
    Gigajoules,
    #[serde(rename = "km")]
    Kilometers,
    #[serde(rename = "mi", alias = "miles")]
    Miles,
}

impl Unit {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::Liters,
            Self::CubicMeters,
            Self::Kilograms,
            Self::Tonnes,
            Self::KilowattHours,
            Self::MegawattHours,
            Self::Megajoules,
            Self::Gigajoules,
            Self::Kilometers,
            Self::Miles,
        ]
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Liters => "l",
            Self::CubicMeters => "m3",
            Self::Kilograms => "kg",
            Self::Tonnes => "t",
            Self::KilowattHours => "kWh",
            Self::MegawattHours => "MWh",
            Self::Megajoules => "MJ",
            Self::Gigajoules => "GJ",
            Self::Kilometers => "km",
            Self::Miles => "mi",
        }
    }

    pub const fn dimension(self) -> Dimension {
        match self {
            Self::Liters | Self::CubicMeters => Dimension::Volume,
            Self::Kilograms | Self::Tonnes => Dimension::Mass,
            Self::KilowattHours | Self::MegawattHours | Self::Megajoules | Self::Gigajoules => {
                Dimension::Energy
            }
            Self::Kilometers | Self::Miles => Dimension::Distance,
        }
    }

    /// How many canonical units one of `self` is worth.
    pub const fn canonical_factor(self) -> f64 {
        match self {
            Self::Liters | Self::Kilograms | Self::Gigajoules | Self::Kilometers => 1.0,
            Self::CubicMeters => LITERS_PER_CUBIC_METER,
            Self::Tonnes => KILOGRAMS_PER_TONNE,
            Self::KilowattHours => GIGAJOULES_PER_KILOWATT_HOUR,
            Self::MegawattHours => GIGAJOULES_PER_MEGAWATT_HOUR,
            Self::Megajoules => GIGAJOULES_PER_MEGAJOULE,
            Self::Miles => KILOMETERS_PER_MILE,
        }
    }

    pub fn to_canonical(self, amount: f64) -> f64 {
        amount * self.canonical_factor()
    }

    pub fn from_canonical(self, canonical: f64) -> f64 {
        canonical / self.canonical_factor()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Unit {
    type Err = UnsupportedValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let by_symbol = Self::ordered()
            .into_iter()
            .find(|unit| unit.symbol().eq_ignore_ascii_case(trimmed));
        match by_symbol {
            Some(unit) => Ok(unit),
            None => parse_choice("unit", trimmed, &Self::ordered(), long_name),
        }
    }
}

fn long_name(unit: Unit) -> &'static str {
    match unit {
        Unit::Liters => "liters",
        Unit::CubicMeters => "cubic meters",
        Unit::Kilograms => "kilograms",
        Unit::Tonnes => "tonnes",
        Unit::KilowattHours => "kilowatt hours",
        Unit::MegawattHours => "megawatt hours",
        Unit::Megajoules => "megajoules",
        Unit::Gigajoules => "gigajoules",
        Unit::Kilometers => "kilometers",
        Unit::Miles => "miles",
    }
}

impl Category {
    /// Dimension a record of this category must be measured in; combustion accepts any.
    pub const fn measured_in(self) -> Option<Dimension> {
        match self {
            Self::Combustion => None,
            Self::Fugitive | Self::Paper | Self::SolidWaste => Some(Dimension::Mass),
            Self::Electricity | Self::DistrictHeating => Some(Dimension::Energy),
            Self::Water | Self::Wastewater => Some(Dimension::Volume),
            Self::AirTravel | Self::RailTravel | Self::RoadTravel => Some(Dimension::Distance),
        }
    }
}

/// Rejects negative and non-finite quantities.
pub fn ensure_amount(label: &str, quantity: &'static str, value: f64) -> Result<f64, EmissionError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(EmissionError::InvalidAmount {
            label: label.to_string(),
            quantity,
            value,
        })
    }
}

/// Rejects results that overflowed while converting or weighting a finite input.
pub fn ensure_finite(label: &str, quantity: &'static str, value: f64) -> Result<f64, EmissionError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EmissionError::Overflow {
            label: label.to_string(),
            quantity,
        })
    }
}

/// Caller-supplied overrides must be strictly positive when present.
pub fn ensure_override(
    label: &str,
    quantity: &'static str,
    value: Option<f64>,
) -> Result<Option<f64>, EmissionError> {
    match value {
        Some(value) if !(value.is_finite() && value > 0.0) => Err(EmissionError::InvalidAmount {
            label: label.to_string(),
            quantity,
            value,
        }),
        other => Ok(other),
    }
}

/// Converts `amount` of `unit` into the canonical unit of `category`.
pub fn normalize(
    label: &str,
    amount: f64,
    unit: Unit,
    category: Category,
) -> Result<f64, EmissionError> {
    let amount = ensure_amount(label, "amount", amount)?;
    match category.measured_in() {
        Some(dimension) if dimension != unit.dimension() => {
            Err(EmissionError::InvalidUnit { category, unit })
        }
        _ => ensure_finite(label, "amount", unit.to_canonical(amount)),
    }
}

/// Canonical quantity of a record, or `None` when nothing was consumed.
pub(crate) fn canonical_quantity<M: Measured>(record: &M) -> Result<Option<f64>, EmissionError> {
    let (amount, unit) = record.quantity();
    let canonical = normalize(record.label(), amount, unit, M::CATEGORY)?;
    Ok((canonical > 0.0).then_some(canonical))
}

/// Conversion parameters for one fuel, already resolved from overrides and defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FuelConversion {
    pub calorific_value: Option<CalorificValue>,
    pub density_kg_l: Option<f64>,
    pub fleet_kg_per_km: Option<f64>,
}

/// Energy content in gigajoules of a fuel quantity already expressed in the canonical
/// unit of `unit`'s dimension.
pub fn fuel_energy_gj(
    fuel: FuelType,
    canonical: f64,
    unit: Unit,
    conversion: &FuelConversion,
) -> Result<f64, EmissionError> {
    let missing = || EmissionError::UnknownFactor {
        category: Category::Combustion,
        subtype: fuel.key().to_string(),
    };

    match unit.dimension() {
        Dimension::Energy => Ok(canonical),
        Dimension::Mass => match conversion.calorific_value.ok_or_else(missing)? {
            CalorificValue::MassBased { mj_per_kg } => {
                Ok(canonical * mj_per_kg / MEGAJOULES_PER_GIGAJOULE)
            }
            CalorificValue::VolumeBased { .. } => Err(EmissionError::InvalidUnit {
                category: Category::Combustion,
                unit,
            }),
        },
        Dimension::Volume => match conversion.calorific_value.ok_or_else(missing)? {
            CalorificValue::VolumeBased { mj_per_m3 } => {
                let cubic_meters = Unit::CubicMeters.from_canonical(canonical);
                Ok(cubic_meters * mj_per_m3 / MEGAJOULES_PER_GIGAJOULE)
            }
            CalorificValue::MassBased { mj_per_kg } => {
                let density = conversion.density_kg_l.ok_or_else(missing)?;
                Ok(canonical * density * mj_per_kg / MEGAJOULES_PER_GIGAJOULE)
            }
        },
        Dimension::Distance => {
            let kg_per_km = conversion.fleet_kg_per_km.ok_or(EmissionError::InvalidUnit {
                category: Category::Combustion,
                unit,
            })?;
            fuel_energy_gj(fuel, canonical * kg_per_km, Unit::Kilograms, conversion)
        }
    }
}
