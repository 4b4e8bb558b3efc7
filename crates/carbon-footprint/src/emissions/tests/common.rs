use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::emissions::{
    AirTravelRecord, CombustionRecord, ElectricityRecord, EmissionsEngine, FlightClass,
    FootprintInputs, FuelType, FugitiveRecord, HeatingRecord, PaperRecord, PurchasedGoodsRecord,
    RailTravelRecord, RefrigerantType, ReportingPeriod, RoadTravelRecord, RoadVehicle,
    Scope1Input, Scope2Input, Scope3Input, SolidWasteRecord, TravelRecord, Unit, WasteRecord,
    WastewaterRecord, WaterRecord,
};

pub(super) const TOLERANCE: f64 = 1e-6;

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "expected {expected}, got {actual}"
    );
}

pub(super) fn engine() -> EmissionsEngine {
    EmissionsEngine::standard()
}

pub(super) fn diesel_generator() -> CombustionRecord {
    CombustionRecord::new("Backup generator", FuelType::Diesel, 1000.0, Unit::Liters)
}

pub(super) fn gas_boiler() -> CombustionRecord {
    CombustionRecord::new("Main boiler", FuelType::NaturalGas, 1000.0, Unit::CubicMeters)
}

pub(super) fn refrigerant(refrigerant_type: RefrigerantType, amount: f64) -> FugitiveRecord {
    FugitiveRecord {
        source: "Server room AC".to_string(),
        refrigerant_type,
        amount,
        unit: Unit::Kilograms,
        gwp_factor: None,
    }
}

pub(super) fn electricity(amount: f64, unit: Unit) -> ElectricityRecord {
    ElectricityRecord {
        source: "Head office".to_string(),
        amount,
        unit,
    }
}

pub(super) fn district_heating(amount: f64) -> HeatingRecord {
    HeatingRecord {
        source: "Head office".to_string(),
        amount,
        unit: Unit::Gigajoules,
    }
}

pub(super) fn water(volume: f64) -> PurchasedGoodsRecord {
    PurchasedGoodsRecord::Water(WaterRecord {
        source: "Mains supply".to_string(),
        volume,
        unit: Unit::CubicMeters,
    })
}

pub(super) fn paper(mass: f64, eco_labeled: bool) -> PurchasedGoodsRecord {
    PurchasedGoodsRecord::Paper(PaperRecord {
        source: "Copier paper".to_string(),
        mass,
        unit: Unit::Kilograms,
        eco_labeled,
    })
}

pub(super) fn solid_waste(mass: f64, unit: Unit) -> WasteRecord {
    WasteRecord::SolidWaste(SolidWasteRecord {
        source: "General waste".to_string(),
        mass,
        unit,
    })
}

pub(super) fn wastewater(volume: f64) -> WasteRecord {
    WasteRecord::Wastewater(WastewaterRecord {
        source: "Sewer".to_string(),
        volume,
        unit: Unit::CubicMeters,
    })
}

pub(super) fn flight(distance: f64, flight_class: FlightClass) -> TravelRecord {
    TravelRecord::AirTravel(AirTravelRecord {
        source: "Conference trip".to_string(),
        distance,
        unit: Unit::Kilometers,
        flight_class,
    })
}

pub(super) fn train(distance: f64, unit: Unit) -> TravelRecord {
    TravelRecord::RailTravel(RailTravelRecord {
        source: "Client visit".to_string(),
        distance,
        unit,
    })
}

pub(super) fn road(distance: f64, vehicle_type: RoadVehicle) -> TravelRecord {
    TravelRecord::RoadTravel(RoadTravelRecord {
        source: "Airport transfer".to_string(),
        distance,
        unit: Unit::Kilometers,
        vehicle_type,
    })
}

pub(super) fn reporting_period() -> ReportingPeriod {
    ReportingPeriod {
        start: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
        end: NaiveDate::from_ymd_opt(2024, 12, 31).expect("valid date"),
    }
}

/// A small office with activity in every scope.
pub(super) fn office_inputs() -> FootprintInputs {
    FootprintInputs {
        reporting_period: Some(reporting_period()),
        scope1: Scope1Input {
            combustion_emissions: vec![gas_boiler(), diesel_generator()],
            fugitive_emissions: vec![refrigerant(RefrigerantType::R410A, 2.0)],
        },
        scope2: Scope2Input {
            electricity: Some(electricity(10_000.0, Unit::KilowattHours)),
            district_heating: Some(district_heating(100.0)),
        },
        scope3: Scope3Input {
            purchased_goods_services: vec![water(100.0), paper(500.0, true)],
            waste_generated: vec![solid_waste(2.0, Unit::Tonnes), wastewater(50.0)],
            business_travel: vec![
                flight(1000.0, FlightClass::Economy),
                train(100.0, Unit::Kilometers),
                road(10.0, RoadVehicle::Taxi),
            ],
        },
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
