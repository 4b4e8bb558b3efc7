use super::common::*;

use crate::emissions::{
    EmissionError, FlightClass, RoadVehicle, Unit, BUSINESS_TRAVEL_KEY, PURCHASED_GOODS_KEY,
    WASTE_GENERATED_KEY,
};

#[test]
fn purchased_goods_and_waste_use_intensity_factors() {
    let output = engine()
        .calculate_scope3(
            &[water(100.0), paper(500.0, false)],
            &[solid_waste(2.0, Unit::Tonnes), wastewater(50.0)],
            &[],
        )
        .expect("scope 3 calculates");

    let goods = &output.breakdown[PURCHASED_GOODS_KEY];
    assert_close(goods["water_supply"], 14.9);
    assert_close(goods["paper_usage"], 459.7);

    let waste = &output.breakdown[WASTE_GENERATED_KEY];
    assert_close(waste["solid_waste_disposal"], 42.58);
    assert_close(waste["wastewater_treatment"], 13.6);

    assert!(!output.breakdown.contains_key(BUSINESS_TRAVEL_KEY));
    assert_close(output.total_co2e_emissions, 14.9 + 459.7 + 42.58 + 13.6);
}

#[test]
fn eco_labeled_paper_is_cheaper_than_standard() {
    let standard = engine()
        .calculate_scope3(&[paper(500.0, false)], &[], &[])
        .expect("standard paper");
    let eco = engine()
        .calculate_scope3(&[paper(500.0, true)], &[], &[])
        .expect("eco paper");

    assert!(eco.total_co2e_emissions < standard.total_co2e_emissions);
    assert_close(eco.total_co2e_emissions, 367.76);
}

#[test]
fn business_class_flights_cost_more_than_economy() {
    let economy = engine()
        .calculate_scope3(&[], &[], &[flight(1000.0, FlightClass::Economy)])
        .expect("economy flight");
    let business = engine()
        .calculate_scope3(&[], &[], &[flight(1000.0, FlightClass::Business)])
        .expect("business flight");

    assert_close(
        economy.breakdown[BUSINESS_TRAVEL_KEY]["air_travel"],
        74.7101924759405,
    );
    assert!(business.total_co2e_emissions > economy.total_co2e_emissions);
    assert_close(
        business.total_co2e_emissions,
        economy.total_co2e_emissions * 1.5,
    );
}

#[test]
fn short_flights_use_the_short_haul_band() {
    let output = engine()
        .calculate_scope3(&[], &[], &[flight(200.0, FlightClass::Economy)])
        .expect("short flight");
    assert_close(output.total_co2e_emissions, 18.677548118985122);
}

#[test]
fn rail_mixes_kilometer_and_mile_factors() {
    let output = engine()
        .calculate_scope3(&[], &[], &[train(100.0, Unit::Kilometers)])
        .expect("rail trip");
    assert_close(
        output.breakdown[BUSINESS_TRAVEL_KEY]["rail_travel"],
        2.8588189970571856,
    );
}

#[test]
fn road_travel_is_keyed_by_vehicle_and_accumulates() {
    let output = engine()
        .calculate_scope3(
            &[],
            &[],
            &[
                road(10.0, RoadVehicle::Taxi),
                road(20.0, RoadVehicle::Bus),
                road(5.0, RoadVehicle::Taxi),
            ],
        )
        .expect("road trips");

    let travel = &output.breakdown[BUSINESS_TRAVEL_KEY];
    assert_eq!(travel.len(), 2);
    assert_close(travel["taxi"], 3.0);
    assert_close(travel["bus"], 2.0);
    assert_close(output.total_co2e_emissions, 5.0);
}

#[test]
fn empty_and_zero_inputs_leave_no_categories() {
    let output = engine()
        .calculate_scope3(&[], &[], &[])
        .expect("empty scope 3");
    assert!(output.breakdown.is_empty());
    assert_eq!(output.total_co2e_emissions, 0.0);

    let output = engine()
        .calculate_scope3(&[water(0.0)], &[wastewater(0.0)], &[flight(0.0, FlightClass::Business)])
        .expect("zero scope 3");
    assert!(output.breakdown.is_empty());
}

#[test]
fn total_matches_nested_breakdown() {
    let inputs = office_inputs();
    let output = engine()
        .calculate_scope3(
            &inputs.scope3.purchased_goods_services,
            &inputs.scope3.waste_generated,
            &inputs.scope3.business_travel,
        )
        .expect("office scope 3");

    let sum: f64 = output
        .breakdown
        .values()
        .flat_map(|category| category.values())
        .sum();
    assert_close(output.total_co2e_emissions, sum);
    assert_eq!(output.breakdown.len(), 3);
}

#[test]
fn overflowing_amounts_and_totals_are_rejected() {
    let error = engine()
        .calculate_scope3(&[], &[solid_waste(1e306, Unit::Tonnes)], &[])
        .expect_err("kilograms overflow");
    assert_eq!(
        error,
        EmissionError::Overflow {
            label: "General waste".to_string(),
            quantity: "amount",
        }
    );

    let trips = vec![road(1.7e308, RoadVehicle::Taxi); 6];
    let error = engine()
        .calculate_scope3(&[], &[], &trips)
        .expect_err("accumulated taxi emissions overflow");
    assert_eq!(
        error,
        EmissionError::Overflow {
            label: "scope3".to_string(),
            quantity: "total CO2e",
        }
    );
}
