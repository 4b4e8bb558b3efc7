use serde::{Deserialize, Serialize};

use super::error::EmissionScope;
use super::inputs::ReportingPeriod;
use super::scope1::Scope1Output;
use super::scope2::Scope2Output;
use super::scope3::Scope3Output;

/// Complete footprint: the three scope outputs verbatim plus their exact sum.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarbonFootprintReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting_period: Option<ReportingPeriod>,
    pub scope1: Scope1Output,
    pub scope2: Scope2Output,
    pub scope3: Scope3Output,
    pub grand_total_co2e: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScopeShare {
    pub scope: EmissionScope,
    pub label: &'static str,
    pub total_co2e: f64,
    /// Percentage of the grand total; zero when the footprint itself is zero.
    pub share_percent: f64,
}

impl CarbonFootprintReport {
    pub fn assemble(
        reporting_period: Option<ReportingPeriod>,
        scope1: Scope1Output,
        scope2: Scope2Output,
        scope3: Scope3Output,
    ) -> Self {
        let grand_total_co2e =
            scope1.total_co2e + scope2.total_co2_emissions + scope3.total_co2e_emissions;
        Self {
            reporting_period,
            scope1,
            scope2,
            scope3,
            grand_total_co2e,
        }
    }

    pub fn scope_total(&self, scope: EmissionScope) -> f64 {
        match scope {
            EmissionScope::Scope1 => self.scope1.total_co2e,
            EmissionScope::Scope2 => self.scope2.total_co2_emissions,
            EmissionScope::Scope3 => self.scope3.total_co2e_emissions,
        }
    }

    pub fn scope_shares(&self) -> Vec<ScopeShare> {
        EmissionScope::ordered()
            .into_iter()
            .map(|scope| {
                let total_co2e = self.scope_total(scope);
                let share_percent = if self.grand_total_co2e > 0.0 {
                    total_co2e / self.grand_total_co2e * 100.0
                } else {
                    0.0
                };
                ScopeShare {
                    scope,
                    label: scope.label(),
                    total_co2e,
                    share_percent,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn grand_total_is_the_sum_of_scope_totals() {
        let report = CarbonFootprintReport::assemble(
            None,
            Scope1Output {
                total_co2e: 10.5,
                breakdown: Vec::new(),
            },
            Scope2Output {
                total_co2_emissions: 20.25,
                breakdown: BTreeMap::new(),
            },
            Scope3Output {
                total_co2e_emissions: 0.125,
                breakdown: BTreeMap::new(),
            },
        );
        assert_eq!(report.grand_total_co2e, 10.5 + 20.25 + 0.125);
    }

    #[test]
    fn shares_are_zero_for_an_empty_footprint() {
        let report = CarbonFootprintReport::default();
        let shares = report.scope_shares();
        assert_eq!(shares.len(), 3);
        assert!(shares.iter().all(|share| share.share_percent == 0.0));
    }

    #[test]
    fn shares_add_up_to_one_hundred_percent() {
        let report = CarbonFootprintReport::assemble(
            None,
            Scope1Output {
                total_co2e: 25.0,
                breakdown: Vec::new(),
            },
            Scope2Output {
                total_co2_emissions: 75.0,
                breakdown: BTreeMap::new(),
            },
            Scope3Output::default(),
        );
        let shares = report.scope_shares();
        assert_eq!(shares[0].share_percent, 25.0);
        assert_eq!(shares[1].share_percent, 75.0);
        assert_eq!(shares[2].share_percent, 0.0);
    }
}
