use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::ActivityRecord;
use super::engine::EmissionsEngine;
use super::error::{EmissionError, EmissionScope, FootprintError};
use super::factors::FactorEntryView;
use super::inputs::{FootprintInputs, ReportingPeriod, Scope1Input, Scope2Input, Scope3Input};

/// Flat activity submission, grouped into scopes before calculation.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivitySubmission {
    #[serde(default)]
    pub reporting_period: Option<ReportingPeriod>,
    pub records: Vec<ActivityRecord>,
}

/// Router builder exposing the calculation endpoints.
pub fn emissions_router(engine: Arc<EmissionsEngine>) -> Router {
    Router::new()
        .route("/api/v1/emissions/scope1", post(scope1_handler))
        .route("/api/v1/emissions/scope2", post(scope2_handler))
        .route("/api/v1/emissions/scope3", post(scope3_handler))
        .route("/api/v1/emissions/footprint", post(footprint_handler))
        .route("/api/v1/emissions/activities", post(activities_handler))
        .route("/api/v1/emissions/factors", get(factors_handler))
        .with_state(engine)
}

pub(crate) async fn scope1_handler(
    State(engine): State<Arc<EmissionsEngine>>,
    axum::Json(input): axum::Json<Scope1Input>,
) -> Response {
    match engine.calculate_scope1(&input.combustion_emissions, &input.fugitive_emissions) {
        Ok(output) => (StatusCode::OK, axum::Json(output)).into_response(),
        Err(error) => unprocessable(&error, Some(EmissionScope::Scope1)),
    }
}

pub(crate) async fn scope2_handler(
    State(engine): State<Arc<EmissionsEngine>>,
    axum::Json(input): axum::Json<Scope2Input>,
) -> Response {
    match engine.calculate_scope2(input.electricity.as_ref(), input.district_heating.as_ref()) {
        Ok(output) => (StatusCode::OK, axum::Json(output)).into_response(),
        Err(error) => unprocessable(&error, Some(EmissionScope::Scope2)),
    }
}

pub(crate) async fn scope3_handler(
    State(engine): State<Arc<EmissionsEngine>>,
    axum::Json(input): axum::Json<Scope3Input>,
) -> Response {
    match engine.calculate_scope3(
        &input.purchased_goods_services,
        &input.waste_generated,
        &input.business_travel,
    ) {
        Ok(output) => (StatusCode::OK, axum::Json(output)).into_response(),
        Err(error) => unprocessable(&error, Some(EmissionScope::Scope3)),
    }
}

pub(crate) async fn footprint_handler(
    State(engine): State<Arc<EmissionsEngine>>,
    axum::Json(inputs): axum::Json<FootprintInputs>,
) -> Response {
    footprint_response(&engine, &inputs)
}

pub(crate) async fn activities_handler(
    State(engine): State<Arc<EmissionsEngine>>,
    axum::Json(submission): axum::Json<ActivitySubmission>,
) -> Response {
    match FootprintInputs::from_records(submission.records) {
        Ok(inputs) => {
            let inputs = inputs.with_reporting_period(submission.reporting_period);
            footprint_response(&engine, &inputs)
        }
        Err(error) => unprocessable(&error, None),
    }
}

pub(crate) async fn factors_handler(State(engine): State<Arc<EmissionsEngine>>) -> Response {
    let gwp = engine.gwp();
    let factors: Vec<FactorEntryView> = engine.registry().entries().collect();
    let payload = json!({
        "gwp": gwp,
        "factors": factors,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

fn footprint_response(engine: &EmissionsEngine, inputs: &FootprintInputs) -> Response {
    match engine.calculate_footprint(inputs) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(FootprintError { scope, source }) => unprocessable(&source, Some(scope)),
    }
}

fn unprocessable(error: &EmissionError, scope: Option<EmissionScope>) -> Response {
    let payload = match scope {
        Some(scope) => json!({
            "error": error.to_string(),
            "scope": scope.key(),
        }),
        None => json!({
            "error": error.to_string(),
        }),
    };
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
}
