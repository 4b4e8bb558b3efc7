use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    ActivityRecord, AirTravelRecord, Category, CombustionRecord, ElectricityRecord,
    FugitiveRecord, HeatingRecord, PaperRecord, RailTravelRecord, RoadTravelRecord,
    SolidWasteRecord, WastewaterRecord, WaterRecord,
};
use super::error::EmissionError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scope1Input {
    #[serde(default)]
    pub combustion_emissions: Vec<CombustionRecord>,
    #[serde(default)]
    pub fugitive_emissions: Vec<FugitiveRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scope2Input {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electricity: Option<ElectricityRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district_heating: Option<HeatingRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum PurchasedGoodsRecord {
    Water(WaterRecord),
    Paper(PaperRecord),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum WasteRecord {
    SolidWaste(SolidWasteRecord),
    Wastewater(WastewaterRecord),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum TravelRecord {
    AirTravel(AirTravelRecord),
    RailTravel(RailTravelRecord),
    RoadTravel(RoadTravelRecord),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scope3Input {
    #[serde(default)]
    pub purchased_goods_services: Vec<PurchasedGoodsRecord>,
    #[serde(default)]
    pub waste_generated: Vec<WasteRecord>,
    #[serde(default)]
    pub business_travel: Vec<TravelRecord>,
}

/// Inclusive date range the submitted activity covers; carried through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Everything needed for one footprint report, grouped by scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FootprintInputs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting_period: Option<ReportingPeriod>,
    #[serde(default)]
    pub scope1: Scope1Input,
    #[serde(default)]
    pub scope2: Scope2Input,
    #[serde(default)]
    pub scope3: Scope3Input,
}

impl FootprintInputs {
    /// Groups a flat list of activity records into scope inputs, preserving order.
    pub fn from_records<I>(records: I) -> Result<Self, EmissionError>
    where
        I: IntoIterator<Item = ActivityRecord>,
    {
        let mut inputs = Self::default();

        for record in records {
            match record {
                ActivityRecord::Combustion(record) => {
                    inputs.scope1.combustion_emissions.push(record)
                }
                ActivityRecord::Fugitive(record) => inputs.scope1.fugitive_emissions.push(record),
                ActivityRecord::Electricity(record) => {
                    set_once(&mut inputs.scope2.electricity, record, Category::Electricity)?
                }
                ActivityRecord::DistrictHeating(record) => set_once(
                    &mut inputs.scope2.district_heating,
                    record,
                    Category::DistrictHeating,
                )?,
                ActivityRecord::Water(record) => inputs
                    .scope3
                    .purchased_goods_services
                    .push(PurchasedGoodsRecord::Water(record)),
                ActivityRecord::Paper(record) => inputs
                    .scope3
                    .purchased_goods_services
                    .push(PurchasedGoodsRecord::Paper(record)),
                ActivityRecord::SolidWaste(record) => inputs
                    .scope3
                    .waste_generated
                    .push(WasteRecord::SolidWaste(record)),
                ActivityRecord::Wastewater(record) => inputs
                    .scope3
                    .waste_generated
                    .push(WasteRecord::Wastewater(record)),
                ActivityRecord::AirTravel(record) => inputs
                    .scope3
                    .business_travel
                    .push(TravelRecord::AirTravel(record)),
                ActivityRecord::RailTravel(record) => inputs
                    .scope3
                    .business_travel
                    .push(TravelRecord::RailTravel(record)),
                ActivityRecord::RoadTravel(record) => inputs
                    .scope3
                    .business_travel
                    .push(TravelRecord::RoadTravel(record)),
            }
        }

        Ok(inputs)
    }

    pub fn with_reporting_period(mut self, period: Option<ReportingPeriod>) -> Self {
        self.reporting_period = period;
        self
    }
}

fn set_once<T>(slot: &mut Option<T>, record: T, category: Category) -> Result<(), EmissionError> {
    if slot.is_some() {
        return Err(EmissionError::DuplicateRecord { category });
    }
    *slot = Some(record);
    Ok(())
}
