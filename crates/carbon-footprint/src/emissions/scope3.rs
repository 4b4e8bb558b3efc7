use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::domain::{
    AirTravelRecord, Category, HaulBand, Measured, PaperRecord, RailTravelRecord,
    RoadTravelRecord,
};
use super::error::EmissionError;
use super::factors::{FactorRegistry, GwpConstants, Subtype};
use super::inputs::{PurchasedGoodsRecord, TravelRecord, WasteRecord};
use super::units::{self, Unit};

pub const PURCHASED_GOODS_KEY: &str = "purchased_goods_services";
pub const WASTE_GENERATED_KEY: &str = "waste_generated";
pub const BUSINESS_TRAVEL_KEY: &str = "business_travel";

pub type CategoryBreakdown = BTreeMap<String, f64>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scope3Output {
    pub total_co2e_emissions: f64,
    pub breakdown: BTreeMap<String, CategoryBreakdown>,
}

impl Scope3Output {
    fn record(&mut self, category: &str, subtype: &str, co2e: f64) {
        *self
            .breakdown
            .entry(category.to_string())
            .or_default()
            .entry(subtype.to_string())
            .or_insert(0.0) += co2e;
    }
}

pub(crate) fn calculate(
    registry: &FactorRegistry,
    gwp: &GwpConstants,
    purchased_goods: &[PurchasedGoodsRecord],
    waste_generated: &[WasteRecord],
    business_travel: &[TravelRecord],
) -> Result<Scope3Output, EmissionError> {
    let mut output = Scope3Output::default();

    for record in purchased_goods {
        let emission = match record {
            PurchasedGoodsRecord::Water(water) => {
                intensity(registry, water, Subtype::WaterSupply)?.map(|co2e| ("water_supply", co2e))
            }
            PurchasedGoodsRecord::Paper(paper) => {
                paper_usage(registry, paper)?.map(|co2e| ("paper_usage", co2e))
            }
        };
        if let Some((subtype, co2e)) = emission {
            output.record(PURCHASED_GOODS_KEY, subtype, co2e);
        }
    }

    for record in waste_generated {
        let emission = match record {
            WasteRecord::SolidWaste(waste) => intensity(registry, waste, Subtype::Landfill)?
                .map(|co2e| ("solid_waste_disposal", co2e)),
            WasteRecord::Wastewater(wastewater) => {
                intensity(registry, wastewater, Subtype::WastewaterTreatment)?
                    .map(|co2e| ("wastewater_treatment", co2e))
            }
        };
        if let Some((subtype, co2e)) = emission {
            output.record(WASTE_GENERATED_KEY, subtype, co2e);
        }
    }

    for record in business_travel {
        let emission = match record {
            TravelRecord::AirTravel(flight) => {
                air_travel(registry, gwp, flight)?.map(|co2e| ("air_travel", co2e))
            }
            TravelRecord::RailTravel(trip) => {
                rail_travel(registry, gwp, trip)?.map(|co2e| ("rail_travel", co2e))
            }
            TravelRecord::RoadTravel(trip) => {
                road_travel(registry, trip)?.map(|co2e| (trip.vehicle_type.key(), co2e))
            }
        };
        if let Some((subtype, co2e)) = emission {
            output.record(BUSINESS_TRAVEL_KEY, subtype, co2e);
        }
    }

    output.total_co2e_emissions = units::ensure_finite(
        "scope3",
        "total CO2e",
        output
            .breakdown
            .values()
            .flat_map(|category| category.values())
            .sum(),
    )?;

    Ok(output)
}

fn intensity<M: Measured>(
    registry: &FactorRegistry,
    record: &M,
    subtype: Subtype,
) -> Result<Option<f64>, EmissionError> {
    let Some(canonical) = units::canonical_quantity(record)? else {
        return Ok(None);
    };
    let factor = registry.intensity(M::CATEGORY, subtype)?;
    units::ensure_finite(record.label(), "CO2e", factor.apply(canonical)).map(Some)
}

fn paper_usage(registry: &FactorRegistry, paper: &PaperRecord) -> Result<Option<f64>, EmissionError> {
    let Some(standard) = intensity(registry, paper, Subtype::StandardPaper)? else {
        return Ok(None);
    };
    if !paper.eco_labeled {
        return Ok(Some(standard));
    }
    let multiplier = registry.multiplier(Category::Paper, Subtype::EcoLabel)?;
    units::ensure_finite(&paper.source, "CO2e", standard * multiplier).map(Some)
}

fn air_travel(
    registry: &FactorRegistry,
    gwp: &GwpConstants,
    flight: &AirTravelRecord,
) -> Result<Option<f64>, EmissionError> {
    let Some(kilometers) = units::canonical_quantity(flight)? else {
        return Ok(None);
    };
    let band = HaulBand::from_miles(Unit::Miles.from_canonical(kilometers));
    let factors = registry.gases(Category::AirTravel, Subtype::Haul(band))?;
    let multiplier = registry.multiplier(
        Category::AirTravel,
        Subtype::FlightClass(flight.flight_class),
    )?;
    let co2e = factors
        .contribution(kilometers, gwp)
        .scaled(multiplier)
        .total();
    units::ensure_finite(&flight.source, "CO2e", co2e).map(Some)
}

fn rail_travel(
    registry: &FactorRegistry,
    gwp: &GwpConstants,
    trip: &RailTravelRecord,
) -> Result<Option<f64>, EmissionError> {
    let Some(kilometers) = units::canonical_quantity(trip)? else {
        return Ok(None);
    };
    let factors = registry.gases(Category::RailTravel, Subtype::Rail)?;
    let co2e = factors.contribution(kilometers, gwp).total();
    units::ensure_finite(&trip.source, "CO2e", co2e).map(Some)
}

fn road_travel(
    registry: &FactorRegistry,
    trip: &RoadTravelRecord,
) -> Result<Option<f64>, EmissionError> {
    intensity(registry, trip, Subtype::Road(trip.vehicle_type))
}
