use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::domain::{ElectricityRecord, HeatingRecord, Measured};
use super::error::EmissionError;
use super::factors::{FactorRegistry, Subtype};
use super::units;

pub const ELECTRICITY_KEY: &str = "electricity";
pub const DISTRICT_HEATING_KEY: &str = "district_heating";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scope2Output {
    pub total_co2_emissions: f64,
    /// Only categories that were supplied with a non-zero amount appear here.
    pub breakdown: BTreeMap<String, f64>,
}

pub(crate) fn calculate(
    registry: &FactorRegistry,
    electricity: Option<&ElectricityRecord>,
    district_heating: Option<&HeatingRecord>,
) -> Result<Scope2Output, EmissionError> {
    let mut breakdown = BTreeMap::new();

    if let Some(record) = electricity {
        if let Some(co2) = purchased_energy(registry, record, Subtype::GridAverage)? {
            breakdown.insert(ELECTRICITY_KEY.to_string(), co2);
        }
    }

    if let Some(record) = district_heating {
        if let Some(co2) = purchased_energy(registry, record, Subtype::DistrictHeat)? {
            breakdown.insert(DISTRICT_HEATING_KEY.to_string(), co2);
        }
    }

    let total_co2_emissions =
        units::ensure_finite("scope2", "total CO2", breakdown.values().sum())?;
    Ok(Scope2Output {
        total_co2_emissions,
        breakdown,
    })
}

fn purchased_energy<M: Measured>(
    registry: &FactorRegistry,
    record: &M,
    subtype: Subtype,
) -> Result<Option<f64>, EmissionError> {
    let Some(energy_gj) = units::canonical_quantity(record)? else {
        return Ok(None);
    };
    let factor = registry.intensity(M::CATEGORY, subtype)?;
    units::ensure_finite(record.label(), "CO2", factor.apply(energy_gj)).map(Some)
}
