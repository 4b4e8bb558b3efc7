use std::sync::Arc;

use tracing::debug;

use super::domain::{CombustionRecord, ElectricityRecord, FugitiveRecord, HeatingRecord};
use super::error::{EmissionError, EmissionScope, FootprintError};
use super::factors::{FactorRegistry, GwpConstants};
use super::inputs::{FootprintInputs, PurchasedGoodsRecord, TravelRecord, WasteRecord};
use super::report::CarbonFootprintReport;
use super::scope1::{self, Scope1Output};
use super::scope2::{self, Scope2Output};
use super::scope3::{self, Scope3Output};
use crate::config::EngineConfig;

/// Stateless calculator over a shared factor registry.
///
/// Every call works on its own inputs only, so one engine can serve any number of
/// concurrent requests behind an `Arc`.
#[derive(Debug, Clone)]
pub struct EmissionsEngine {
    registry: Arc<FactorRegistry>,
    gwp: GwpConstants,
}

impl Default for EmissionsEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl EmissionsEngine {
    pub fn new(registry: Arc<FactorRegistry>, gwp: GwpConstants) -> Self {
        Self { registry, gwp }
    }

    pub fn standard() -> Self {
        Self::new(FactorRegistry::standard(), GwpConstants::default())
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(FactorRegistry::standard(), config.gwp)
    }

    pub fn registry(&self) -> &FactorRegistry {
        &self.registry
    }

    pub fn gwp(&self) -> GwpConstants {
        self.gwp
    }

    pub fn calculate_scope1(
        &self,
        combustion: &[CombustionRecord],
        fugitive: &[FugitiveRecord],
    ) -> Result<Scope1Output, EmissionError> {
        let output = scope1::calculate(&self.registry, &self.gwp, combustion, fugitive)?;
        debug!(
            combustion = combustion.len(),
            fugitive = fugitive.len(),
            entries = output.breakdown.len(),
            total_co2e = output.total_co2e,
            "scope 1 calculated"
        );
        Ok(output)
    }

    pub fn calculate_scope2(
        &self,
        electricity: Option<&ElectricityRecord>,
        district_heating: Option<&HeatingRecord>,
    ) -> Result<Scope2Output, EmissionError> {
        let output = scope2::calculate(&self.registry, electricity, district_heating)?;
        debug!(
            entries = output.breakdown.len(),
            total_co2_emissions = output.total_co2_emissions,
            "scope 2 calculated"
        );
        Ok(output)
    }

    pub fn calculate_scope3(
        &self,
        purchased_goods: &[PurchasedGoodsRecord],
        waste_generated: &[WasteRecord],
        business_travel: &[TravelRecord],
    ) -> Result<Scope3Output, EmissionError> {
        let output = scope3::calculate(
            &self.registry,
            &self.gwp,
            purchased_goods,
            waste_generated,
            business_travel,
        )?;
        debug!(
            categories = output.breakdown.len(),
            total_co2e_emissions = output.total_co2e_emissions,
            "scope 3 calculated"
        );
        Ok(output)
    }

    /// Runs all three scopes and assembles the report; the first failing scope aborts it.
    pub fn calculate_footprint(
        &self,
        inputs: &FootprintInputs,
    ) -> Result<CarbonFootprintReport, FootprintError> {
        let scope1 = self
            .calculate_scope1(
                &inputs.scope1.combustion_emissions,
                &inputs.scope1.fugitive_emissions,
            )
            .map_err(|err| FootprintError::new(EmissionScope::Scope1, err))?;
        let scope2 = self
            .calculate_scope2(
                inputs.scope2.electricity.as_ref(),
                inputs.scope2.district_heating.as_ref(),
            )
            .map_err(|err| FootprintError::new(EmissionScope::Scope2, err))?;
        let scope3 = self
            .calculate_scope3(
                &inputs.scope3.purchased_goods_services,
                &inputs.scope3.waste_generated,
                &inputs.scope3.business_travel,
            )
            .map_err(|err| FootprintError::new(EmissionScope::Scope3, err))?;

        let report = CarbonFootprintReport::assemble(inputs.reporting_period, scope1, scope2, scope3);
        if !report.grand_total_co2e.is_finite() {
            return Err(FootprintError::new(
                overflowing_scope(&report),
                EmissionError::Overflow {
                    label: "footprint".to_string(),
                    quantity: "grand total CO2e",
                },
            ));
        }
        debug!(
            grand_total_co2e = report.grand_total_co2e,
            "footprint assembled"
        );
        Ok(report)
    }
}

/// Scope whose total pushed the running grand total out of range.
fn overflowing_scope(report: &CarbonFootprintReport) -> EmissionScope {
    let mut running = 0.0_f64;
    for scope in EmissionScope::ordered() {
        running += report.scope_total(scope);
        if !running.is_finite() {
            return scope;
        }
    }
    EmissionScope::Scope3
}
