use std::sync::Arc;

use super::common::*;

use crate::config::EngineConfig;
use crate::emissions::{
    ActivityRecord, Category, CombustionRecord, EmissionError, EmissionScope, EmissionsEngine,
    FactorRegistry, FootprintInputs, FuelType, GwpConstants, RefrigerantType, Unit,
};

#[test]
fn grand_total_is_the_exact_sum_of_scope_totals() {
    let report = engine()
        .calculate_footprint(&office_inputs())
        .expect("office footprint");

    assert_eq!(
        report.grand_total_co2e,
        report.scope1.total_co2e + report.scope2.total_co2_emissions
            + report.scope3.total_co2e_emissions
    );
    assert_eq!(report.reporting_period, Some(reporting_period()));
    assert_eq!(report.scope1.breakdown.len(), 3);
    assert_eq!(report.scope2.breakdown.len(), 2);
    assert_eq!(report.scope3.breakdown.len(), 3);
}

#[test]
fn empty_inputs_give_an_empty_report() {
    let report = engine()
        .calculate_footprint(&FootprintInputs::default())
        .expect("empty footprint");
    assert_eq!(report.grand_total_co2e, 0.0);
    assert!(report.scope1.breakdown.is_empty());
    assert!(report.scope2.breakdown.is_empty());
    assert!(report.scope3.breakdown.is_empty());
    assert!(report.reporting_period.is_none());
}

#[test]
fn identical_inputs_give_identical_reports() {
    let engine = engine();
    let first = engine
        .calculate_footprint(&office_inputs())
        .expect("first run");
    let second = engine
        .calculate_footprint(&office_inputs())
        .expect("second run");
    assert_eq!(first, second);
}

#[test]
fn failing_scope_is_named() {
    let mut inputs = office_inputs();
    inputs
        .scope1
        .fugitive_emissions
        .push(refrigerant(RefrigerantType::Custom, 1.0));

    let error = engine()
        .calculate_footprint(&inputs)
        .expect_err("custom refrigerant without gwp");
    assert_eq!(error.scope, EmissionScope::Scope1);
    assert_eq!(
        error.source,
        EmissionError::UnknownFactor {
            category: Category::Fugitive,
            subtype: "custom".to_string(),
        }
    );
    assert!(error.to_string().starts_with("scope1 calculation failed"));

    let mut inputs = office_inputs();
    inputs.scope3.waste_generated.push(solid_waste(1.0, Unit::Liters));
    let error = engine()
        .calculate_footprint(&inputs)
        .expect_err("waste by volume");
    assert_eq!(error.scope, EmissionScope::Scope3);
}

#[test]
fn overflow_fails_the_footprint_instead_of_reporting_infinity() {
    let mut inputs = FootprintInputs::default();
    inputs.scope1.combustion_emissions.push(CombustionRecord::new(
        "Generator",
        FuelType::Diesel,
        1e305,
        Unit::CubicMeters,
    ));
    let error = engine()
        .calculate_footprint(&inputs)
        .expect_err("diesel energy overflows");
    assert_eq!(error.scope, EmissionScope::Scope1);
    assert!(matches!(error.source, EmissionError::Overflow { .. }));

    let mut inputs = FootprintInputs::default();
    inputs
        .scope1
        .fugitive_emissions
        .push(refrigerant(RefrigerantType::R410A, 9e304));
    inputs.scope2.electricity = Some(electricity(1e308, Unit::KilowattHours));
    let error = engine()
        .calculate_footprint(&inputs)
        .expect_err("scope totals are finite but their sum is not");
    assert_eq!(error.scope, EmissionScope::Scope2);
    assert_eq!(
        error.source,
        EmissionError::Overflow {
            label: "footprint".to_string(),
            quantity: "grand total CO2e",
        }
    );
}

#[test]
fn configured_gwp_changes_non_co2_contributions() {
    let config = EngineConfig {
        gwp: GwpConstants {
            ch4: 25.0,
            n2o: 298.0,
        },
    };
    let engine = EmissionsEngine::from_config(&config);
    let output = engine
        .calculate_scope1(&[diesel_generator()], &[])
        .expect("diesel calculates");

    let expected = 35.342 * (74.1 + 0.00003 * 25.0 + 0.00006 * 298.0);
    assert_close(output.total_co2e, expected);
    assert_eq!(engine.gwp(), config.gwp);
}

#[test]
fn custom_registry_replaces_standard_factors() {
    let registry = FactorRegistry::from_entries(Vec::new());
    let engine = EmissionsEngine::new(Arc::new(registry), GwpConstants::default());
    let error = engine
        .calculate_scope1(&[diesel_generator()], &[])
        .expect_err("empty registry has no diesel");
    assert_eq!(
        error,
        EmissionError::UnknownFactor {
            category: Category::Combustion,
            subtype: "diesel".to_string(),
        }
    );
}

#[test]
fn activity_records_group_into_scopes() {
    let records = vec![
        ActivityRecord::Combustion(CombustionRecord::new(
            "Van",
            FuelType::Petrol,
            40.0,
            Unit::Liters,
        )),
        ActivityRecord::Electricity(electricity(500.0, Unit::KilowattHours)),
        ActivityRecord::Fugitive(refrigerant(RefrigerantType::R32, 1.0)),
    ];

    let inputs = FootprintInputs::from_records(records).expect("records group");
    assert_eq!(inputs.scope1.combustion_emissions.len(), 1);
    assert_eq!(inputs.scope1.fugitive_emissions.len(), 1);
    assert!(inputs.scope2.electricity.is_some());
    assert!(inputs.scope2.district_heating.is_none());
}

#[test]
fn second_electricity_record_is_rejected() {
    let records = vec![
        ActivityRecord::Electricity(electricity(500.0, Unit::KilowattHours)),
        ActivityRecord::Electricity(electricity(700.0, Unit::KilowattHours)),
    ];
    let error = FootprintInputs::from_records(records).expect_err("duplicate electricity");
    assert_eq!(
        error,
        EmissionError::DuplicateRecord {
            category: Category::Electricity,
        }
    );
}

#[test]
fn footprint_inputs_deserialize_from_json() {
    let payload = serde_json::json!({
        "reporting_period": {"start": "2024-01-01", "end": "2024-12-31"},
        "scope1": {
            "combustion_emissions": [
                {"source": "Generator", "fuel_type": "diesel", "unit": "l", "amount": 1000}
            ],
            "fugitive_emissions": [
                {"source": "AC", "refrigerant_type": "R410A", "amount_kg": 2}
            ]
        },
        "scope2": {"electricity": {"amount_kwh": 10000}},
        "scope3": {
            "purchased_goods_services": [
                {"category": "paper", "mass": 500, "eco_labeled": true}
            ],
            "business_travel": [
                {"category": "air_travel", "distance_km": 1000, "flight_class": "business"},
                {"category": "road_travel", "distance": 10, "vehicle_type": "taxi"}
            ]
        }
    });

    let inputs: FootprintInputs = serde_json::from_value(payload).expect("valid inputs");
    assert_eq!(inputs.reporting_period, Some(reporting_period()));
    assert_eq!(inputs.scope1.fugitive_emissions[0].unit, Unit::Kilograms);
    assert!(inputs.scope3.waste_generated.is_empty());

    let report = engine().calculate_footprint(&inputs).expect("json footprint");
    assert_close(report.scope1.breakdown[0].co2e, 2619.43382508);
    assert_close(report.scope2.total_co2_emissions, 6980.0);
}

#[test]
fn unknown_fuel_names_are_rejected_by_serde() {
    let payload = serde_json::json!({
        "source": "Generator",
        "fuel_type": "kerosene",
        "unit": "l",
        "amount": 10
    });
    let result: Result<CombustionRecord, _> = serde_json::from_value(payload);
    assert!(result.is_err());
}
