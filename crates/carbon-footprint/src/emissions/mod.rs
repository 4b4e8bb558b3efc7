//! Emissions calculation engine.
//!
//! Activity records flow one way: unit normalization, factor lookup, per-scope formulas,
//! then aggregation into a [`CarbonFootprintReport`]. Nothing here performs I/O or keeps
//! state between calls.

pub mod domain;
mod engine;
mod error;
pub mod factors;
mod inputs;
mod report;
pub mod router;
mod scope1;
mod scope2;
mod scope3;
pub mod units;

#[cfg(test)]
mod tests;

pub use domain::{
    ActivityRecord, AirTravelRecord, Category, CombustionRecord, ElectricityRecord,
    FleetVehicle, FlightClass, FuelType, FugitiveRecord, HaulBand, HeatingRecord, PaperRecord,
    RailTravelRecord, RefrigerantType, RoadTravelRecord, RoadVehicle, SolidWasteRecord,
    UnsupportedValue, WastewaterRecord, WaterRecord,
};
pub use engine::EmissionsEngine;
pub use error::{EmissionError, EmissionScope, FootprintError};
pub use factors::{FactorRegistry, GwpConstants};
pub use inputs::{
    FootprintInputs, PurchasedGoodsRecord, ReportingPeriod, Scope1Input, Scope2Input,
    Scope3Input, TravelRecord, WasteRecord,
};
pub use report::{CarbonFootprintReport, ScopeShare};
pub use router::{emissions_router, ActivitySubmission};
pub use scope1::{EmissionResult, Scope1Output};
pub use scope2::{Scope2Output, DISTRICT_HEATING_KEY, ELECTRICITY_KEY};
pub use scope3::{
    CategoryBreakdown, Scope3Output, BUSINESS_TRAVEL_KEY, PURCHASED_GOODS_KEY,
    WASTE_GENERATED_KEY,
};
pub use units::Unit;
