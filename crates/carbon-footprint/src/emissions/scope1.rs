use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::domain::{Category, CombustionRecord, FugitiveRecord, FuelType, RefrigerantType};
use super::error::EmissionError;
use super::factors::{CalorificValue, FactorRegistry, GwpConstants};
use super::units::{self, Dimension, FuelConversion};

/// CO2e of one scope 1 source together with its per-gas contributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionResult {
    pub source: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<FuelType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refrigerant_type: Option<RefrigerantType>,
    pub co2e: f64,
    /// Contribution name to kg CO2e; entries sum to `co2e`.
    pub details: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_gj: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gwp_factor: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scope1Output {
    pub total_co2e: f64,
    pub breakdown: Vec<EmissionResult>,
}

pub(crate) fn calculate(
    registry: &FactorRegistry,
    gwp: &GwpConstants,
    combustion: &[CombustionRecord],
    fugitive: &[FugitiveRecord],
) -> Result<Scope1Output, EmissionError> {
    let mut breakdown = Vec::with_capacity(combustion.len() + fugitive.len());

    for record in combustion {
        if let Some(result) = combustion_emissions(registry, gwp, record)? {
            breakdown.push(result);
        }
    }

    for record in fugitive {
        if let Some(result) = fugitive_emissions(registry, record)? {
            breakdown.push(result);
        }
    }

    let total_co2e = units::ensure_finite(
        "scope1",
        "total CO2e",
        breakdown.iter().map(|result| result.co2e).sum(),
    )?;
    Ok(Scope1Output {
        total_co2e,
        breakdown,
    })
}

fn combustion_emissions(
    registry: &FactorRegistry,
    gwp: &GwpConstants,
    record: &CombustionRecord,
) -> Result<Option<EmissionResult>, EmissionError> {
    let Some(canonical) = units::canonical_quantity(record)? else {
        return Ok(None);
    };

    let label = record.source.as_str();
    let fuel = record.fuel_type;
    let profile = registry.fuel(fuel);

    let calorific_override =
        units::ensure_override(label, "calorific value", record.calorific_value_mj)?;
    let calorific_value = match (calorific_override, profile) {
        (Some(value), Some(profile)) => Some(match profile.calorific_value {
            CalorificValue::VolumeBased { .. } => CalorificValue::VolumeBased { mj_per_m3: value },
            CalorificValue::MassBased { .. } => CalorificValue::MassBased { mj_per_kg: value },
        }),
        (Some(value), None) => Some(CalorificValue::MassBased { mj_per_kg: value }),
        (None, profile) => profile.map(|profile| profile.calorific_value),
    };
    let density_kg_l = units::ensure_override(label, "density", record.density_kg_l)?
        .or_else(|| profile.and_then(|profile| profile.density_kg_l));
    let fleet_kg_per_km = match record.vehicle {
        Some(vehicle) if record.unit.dimension() == Dimension::Distance => {
            let consumption = registry.fleet_consumption(vehicle).ok_or_else(|| {
                EmissionError::UnknownFactor {
                    category: Category::Combustion,
                    subtype: vehicle.key().to_string(),
                }
            })?;
            Some(consumption)
        }
        _ => None,
    };

    let conversion = FuelConversion {
        calorific_value,
        density_kg_l,
        fleet_kg_per_km,
    };
    let energy_gj = units::ensure_finite(
        label,
        "energy",
        units::fuel_energy_gj(fuel, canonical, record.unit, &conversion)?,
    )?;

    let factor = |value: Option<f64>,
                  quantity: &'static str,
                  default: Option<f64>|
     -> Result<f64, EmissionError> {
        units::ensure_override(label, quantity, value)?
            .or(default)
            .ok_or_else(|| EmissionError::UnknownFactor {
                category: Category::Combustion,
                subtype: fuel.key().to_string(),
            })
    };
    let co2 = factor(
        record.emission_factor_co2_kg_gj,
        "CO2 emission factor",
        profile.map(|profile| profile.co2_kg_per_gj),
    )?;
    let ch4 = factor(
        record.emission_factor_ch4_kg_gj,
        "CH4 emission factor",
        profile.map(|profile| profile.ch4_kg_per_gj),
    )?;
    let n2o = factor(
        record.emission_factor_n2o_kg_gj,
        "N2O emission factor",
        profile.map(|profile| profile.n2o_kg_per_gj),
    )?;

    let contribution = gwp.weigh(energy_gj * co2, energy_gj * ch4, energy_gj * n2o);
    let co2e = units::ensure_finite(label, "CO2e", contribution.total())?;
    let details = BTreeMap::from([
        ("co2".to_string(), contribution.co2),
        ("ch4".to_string(), contribution.ch4),
        ("n2o".to_string(), contribution.n2o),
    ]);

    Ok(Some(EmissionResult {
        source: record.source.clone(),
        category: Category::Combustion,
        fuel_type: Some(fuel),
        refrigerant_type: None,
        co2e,
        details,
        energy_gj: Some(energy_gj),
        gwp_factor: None,
    }))
}

fn fugitive_emissions(
    registry: &FactorRegistry,
    record: &FugitiveRecord,
) -> Result<Option<EmissionResult>, EmissionError> {
    let Some(amount_kg) = units::canonical_quantity(record)? else {
        return Ok(None);
    };

    let refrigerant = record.refrigerant_type;
    let gwp_factor = units::ensure_override(&record.source, "GWP factor", record.gwp_factor)?
        .or_else(|| registry.refrigerant_gwp(refrigerant))
        .ok_or_else(|| EmissionError::UnknownFactor {
            category: Category::Fugitive,
            subtype: refrigerant.key().to_string(),
        })?;

    let co2e = units::ensure_finite(&record.source, "CO2e", amount_kg * gwp_factor)?;

    Ok(Some(EmissionResult {
        source: record.source.clone(),
        category: Category::Fugitive,
        fuel_type: None,
        refrigerant_type: Some(refrigerant),
        co2e,
        details: BTreeMap::from([("leak".to_string(), co2e)]),
        energy_gj: None,
        gwp_factor: Some(gwp_factor),
    }))
}
