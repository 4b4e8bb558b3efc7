//! Emission factor registry.
//!
//! The registry is the single source of truth for "how much CO2e per unit of activity".
//! The standard table is built once per process and shared read-only afterwards, so any
//! number of calculations may consult it concurrently.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use super::domain::{
    Category, FleetVehicle, FlightClass, FuelType, HaulBand, RefrigerantType, RoadVehicle,
};
use super::error::EmissionError;
use super::units::Unit;

static STANDARD_REGISTRY: OnceLock<Arc<FactorRegistry>> = OnceLock::new();

/// 100-year global warming potentials applied to methane and nitrous oxide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GwpConstants {
    pub ch4: f64,
    pub n2o: f64,
}

impl Default for GwpConstants {
    fn default() -> Self {
        Self {
            ch4: 28.0,
            n2o: 265.0,
        }
    }
}

impl GwpConstants {
    /// Weighs kilograms of each gas into kilograms of CO2e.
    pub fn weigh(&self, co2_kg: f64, ch4_kg: f64, n2o_kg: f64) -> GasContribution {
        GasContribution {
            co2: co2_kg,
            ch4: ch4_kg * self.ch4,
            n2o: n2o_kg * self.n2o,
        }
    }
}

/// Per-gas share of an emission, already expressed in kg CO2e.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GasContribution {
    pub co2: f64,
    pub ch4: f64,
    pub n2o: f64,
}

impl GasContribution {
    pub fn total(&self) -> f64 {
        self.co2 + self.ch4 + self.n2o
    }

    pub fn scaled(&self, multiplier: f64) -> Self {
        Self {
            co2: self.co2 * multiplier,
            ch4: self.ch4 * multiplier,
            n2o: self.n2o * multiplier,
        }
    }
}

/// A coefficient in kilograms per `per` unit of activity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionFactor {
    pub value: f64,
    pub per: Unit,
}

impl EmissionFactor {
    pub const fn new(value: f64, per: Unit) -> Self {
        Self { value, per }
    }

    /// Applies the factor to a quantity expressed in the canonical unit of `per`.
    pub fn apply(&self, canonical_amount: f64) -> f64 {
        self.per.from_canonical(canonical_amount) * self.value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "basis", rename_all = "snake_case")]
pub enum CalorificValue {
    MassBased { mj_per_kg: f64 },
    VolumeBased { mj_per_m3: f64 },
}

/// Combustion defaults for one fuel: kg of each gas per GJ plus conversion constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelProfile {
    pub co2_kg_per_gj: f64,
    pub ch4_kg_per_gj: f64,
    pub n2o_kg_per_gj: f64,
    pub calorific_value: CalorificValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density_kg_l: Option<f64>,
}

/// Kilograms of each gas emitted per unit of activity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasFactors {
    pub co2: EmissionFactor,
    pub ch4: EmissionFactor,
    pub n2o: EmissionFactor,
}

impl GasFactors {
    pub fn contribution(&self, canonical_amount: f64, gwp: &GwpConstants) -> GasContribution {
        gwp.weigh(
            self.co2.apply(canonical_amount),
            self.ch4.apply(canonical_amount),
            self.n2o.apply(canonical_amount),
        )
    }
}

/// The coefficients stored under one registry key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FactorSet {
    Fuel(FuelProfile),
    GlobalWarmingPotential { gwp: f64 },
    Intensity(EmissionFactor),
    Gases(GasFactors),
    Multiplier { multiplier: f64 },
    FuelConsumption { kg_per_km: f64 },
}

/// Second half of a registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subtype {
    Fuel(FuelType),
    Refrigerant(RefrigerantType),
    FleetVehicle(FleetVehicle),
    GridAverage,
    DistrictHeat,
    WaterSupply,
    StandardPaper,
    EcoLabel,
    Landfill,
    WastewaterTreatment,
    Haul(HaulBand),
    FlightClass(FlightClass),
    Rail,
    Road(RoadVehicle),
}

impl Subtype {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Fuel(fuel) => fuel.key(),
            Self::Refrigerant(refrigerant) => refrigerant.key(),
            Self::FleetVehicle(vehicle) => vehicle.key(),
            Self::GridAverage => "grid_average",
            Self::DistrictHeat => "district_heat",
            Self::WaterSupply => "water_supply",
            Self::StandardPaper => "standard",
            Self::EcoLabel => "eco_labeled",
            Self::Landfill => "landfill",
            Self::WastewaterTreatment => "treatment",
            Self::Haul(band) => band.key(),
            Self::FlightClass(class) => class.key(),
            Self::Rail => "rail",
            Self::Road(vehicle) => vehicle.key(),
        }
    }
}

impl fmt::Display for Subtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FactorKey {
    pub category: Category,
    pub subtype: Subtype,
}

impl FactorKey {
    pub const fn new(category: Category, subtype: Subtype) -> Self {
        Self { category, subtype }
    }
}

/// Serializable row used when listing the registry.
#[derive(Debug, Clone, Serialize)]
pub struct FactorEntryView {
    pub category: Category,
    pub subtype: &'static str,
    pub factors: FactorSet,
}

/// Immutable lookup table keyed by (category, subtype).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactorRegistry {
    entries: BTreeMap<FactorKey, FactorSet>,
}

impl FactorRegistry {
    /// Process-wide standard table, built on first use.
    pub fn standard() -> Arc<Self> {
        STANDARD_REGISTRY
            .get_or_init(|| Arc::new(Self::from_entries(standard_entries())))
            .clone()
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (FactorKey, FactorSet)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = FactorEntryView> + '_ {
        self.entries.iter().map(|(key, factors)| FactorEntryView {
            category: key.category,
            subtype: key.subtype.key(),
            factors: *factors,
        })
    }

    pub fn factors_for(
        &self,
        category: Category,
        subtype: Subtype,
    ) -> Result<&FactorSet, EmissionError> {
        self.entries
            .get(&FactorKey::new(category, subtype))
            .ok_or_else(|| unknown(category, subtype))
    }

    /// Fuel defaults, if the fuel is registered. Callers may still succeed with overrides.
    pub fn fuel(&self, fuel: FuelType) -> Option<&FuelProfile> {
        match self.entries.get(&FactorKey::new(
            Category::Combustion,
            Subtype::Fuel(fuel),
        )) {
            Some(FactorSet::Fuel(profile)) => Some(profile),
            _ => None,
        }
    }

    pub fn fleet_consumption(&self, vehicle: FleetVehicle) -> Option<f64> {
        match self.entries.get(&FactorKey::new(
            Category::Combustion,
            Subtype::FleetVehicle(vehicle),
        )) {
            Some(FactorSet::FuelConsumption { kg_per_km }) => Some(*kg_per_km),
            _ => None,
        }
    }

    pub fn refrigerant_gwp(&self, refrigerant: RefrigerantType) -> Option<f64> {
        match self.entries.get(&FactorKey::new(
            Category::Fugitive,
            Subtype::Refrigerant(refrigerant),
        )) {
            Some(FactorSet::GlobalWarmingPotential { gwp }) => Some(*gwp),
            _ => None,
        }
    }

    pub fn intensity(
        &self,
        category: Category,
        subtype: Subtype,
    ) -> Result<EmissionFactor, EmissionError> {
        match self.factors_for(category, subtype)? {
            FactorSet::Intensity(factor) => Ok(*factor),
            _ => Err(unknown(category, subtype)),
        }
    }

    pub fn gases(&self, category: Category, subtype: Subtype) -> Result<GasFactors, EmissionError> {
        match self.factors_for(category, subtype)? {
            FactorSet::Gases(factors) => Ok(*factors),
            _ => Err(unknown(category, subtype)),
        }
    }

    pub fn multiplier(&self, category: Category, subtype: Subtype) -> Result<f64, EmissionError> {
        match self.factors_for(category, subtype)? {
            FactorSet::Multiplier { multiplier } => Ok(*multiplier),
            _ => Err(unknown(category, subtype)),
        }
    }
}

fn unknown(category: Category, subtype: Subtype) -> EmissionError {
    EmissionError::UnknownFactor {
        category,
        subtype: subtype.key().to_string(),
    }
}

const GRAMS_PER_KILOGRAM: f64 = 1000.0;

fn fuel(
    fuel: FuelType,
    co2: f64,
    ch4: f64,
    n2o: f64,
    calorific_value: CalorificValue,
    density_kg_l: Option<f64>,
) -> (FactorKey, FactorSet) {
    (
        FactorKey::new(Category::Combustion, Subtype::Fuel(fuel)),
        FactorSet::Fuel(FuelProfile {
            co2_kg_per_gj: co2,
            ch4_kg_per_gj: ch4,
            n2o_kg_per_gj: n2o,
            calorific_value,
            density_kg_l,
        }),
    )
}

fn intensity(category: Category, subtype: Subtype, value: f64, per: Unit) -> (FactorKey, FactorSet) {
    (
        FactorKey::new(category, subtype),
        FactorSet::Intensity(EmissionFactor::new(value, per)),
    )
}

fn multiplier(category: Category, subtype: Subtype, multiplier: f64) -> (FactorKey, FactorSet) {
    (
        FactorKey::new(category, subtype),
        FactorSet::Multiplier { multiplier },
    )
}

fn refrigerant(refrigerant: RefrigerantType, gwp: f64) -> (FactorKey, FactorSet) {
    (
        FactorKey::new(Category::Fugitive, Subtype::Refrigerant(refrigerant)),
        FactorSet::GlobalWarmingPotential { gwp },
    )
}

/// Air factors: CO2 in kg per mile, CH4 and N2O in g per mile.
fn air_band(band: HaulBand, co2_kg: f64, ch4_g: f64, n2o_g: f64) -> (FactorKey, FactorSet) {
    (
        FactorKey::new(Category::AirTravel, Subtype::Haul(band)),
        FactorSet::Gases(GasFactors {
            co2: EmissionFactor::new(co2_kg, Unit::Miles),
            ch4: EmissionFactor::new(ch4_g / GRAMS_PER_KILOGRAM, Unit::Miles),
            n2o: EmissionFactor::new(n2o_g / GRAMS_PER_KILOGRAM, Unit::Miles),
        }),
    )
}

fn standard_entries() -> Vec<(FactorKey, FactorSet)> {
    use CalorificValue::{MassBased, VolumeBased};

    vec![
        // Combustion (kg per GJ, calorific value, density)
        fuel(
            FuelType::NaturalGas,
            56.1,
            0.0001,
            0.00002,
            VolumeBased { mj_per_m3: 38.0 },
            None,
        ),
        fuel(
            FuelType::HeatingOil,
            74.1,
            0.00003,
            0.00006,
            MassBased { mj_per_kg: 42.6 },
            Some(0.82),
        ),
        fuel(
            FuelType::Diesel,
            74.1,
            0.00003,
            0.00006,
            MassBased { mj_per_kg: 43.1 },
            Some(0.82),
        ),
        fuel(
            FuelType::Petrol,
            69.3,
            0.00003,
            0.00005,
            MassBased { mj_per_kg: 44.3 },
            Some(0.72),
        ),
        fuel(
            FuelType::Coal,
            94.6,
            0.001,
            0.0001,
            MassBased { mj_per_kg: 24.0 },
            None,
        ),
        (
            FactorKey::new(
                Category::Combustion,
                Subtype::FleetVehicle(FleetVehicle::PassengerCarDiesel),
            ),
            FactorSet::FuelConsumption { kg_per_km: 0.06 },
        ),
        // Fugitive
        refrigerant(RefrigerantType::R407C, 1624.0),
        refrigerant(RefrigerantType::R32, 677.0),
        refrigerant(RefrigerantType::R410A, 1924.0),
        // Purchased energy
        intensity(
            Category::Electricity,
            Subtype::GridAverage,
            0.698,
            Unit::KilowattHours,
        ),
        intensity(
            Category::DistrictHeating,
            Subtype::DistrictHeat,
            95.05,
            Unit::Gigajoules,
        ),
        // Purchased goods and services
        intensity(
            Category::Water,
            Subtype::WaterSupply,
            0.149,
            Unit::CubicMeters,
        ),
        intensity(
            Category::Paper,
            Subtype::StandardPaper,
            919.4,
            Unit::Tonnes,
        ),
        multiplier(Category::Paper, Subtype::EcoLabel, 0.8),
        // Waste generated in operations
        intensity(Category::SolidWaste, Subtype::Landfill, 21.29, Unit::Tonnes),
        intensity(
            Category::Wastewater,
            Subtype::WastewaterTreatment,
            0.272,
            Unit::CubicMeters,
        ),
        // Business travel
        air_band(HaulBand::Short, 0.15, 0.001, 0.001),
        air_band(HaulBand::Medium, 0.12, 0.0008, 0.0008),
        air_band(HaulBand::Long, 0.10, 0.0005, 0.0005),
        multiplier(
            Category::AirTravel,
            Subtype::FlightClass(FlightClass::Economy),
            1.0,
        ),
        multiplier(
            Category::AirTravel,
            Subtype::FlightClass(FlightClass::Business),
            1.5,
        ),
        (
            FactorKey::new(Category::RailTravel, Subtype::Rail),
            FactorSet::Gases(GasFactors {
                co2: EmissionFactor::new(0.028, Unit::Kilometers),
                ch4: EmissionFactor::new(0.000_009_2, Unit::Miles),
                n2o: EmissionFactor::new(0.000_002_6, Unit::Miles),
            }),
        ),
        intensity(
            Category::RoadTravel,
            Subtype::Road(RoadVehicle::Taxi),
            0.2,
            Unit::Kilometers,
        ),
        intensity(
            Category::RoadTravel,
            Subtype::Road(RoadVehicle::Bus),
            0.1,
            Unit::Kilometers,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_is_shared() {
        let first = FactorRegistry::standard();
        let second = FactorRegistry::standard();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 24);
    }

    #[test]
    fn lookups_are_keyed_by_category_and_subtype() {
        let registry = FactorRegistry::standard();
        let electricity = registry
            .intensity(Category::Electricity, Subtype::GridAverage)
            .expect("grid factor");
        assert_eq!(electricity, EmissionFactor::new(0.698, Unit::KilowattHours));

        let error = registry
            .intensity(Category::Water, Subtype::GridAverage)
            .expect_err("grid factor is not a water factor");
        assert_eq!(
            error,
            EmissionError::UnknownFactor {
                category: Category::Water,
                subtype: "grid_average".to_string(),
            }
        );
    }

    #[test]
    fn custom_refrigerant_has_no_default() {
        let registry = FactorRegistry::standard();
        assert_eq!(registry.refrigerant_gwp(RefrigerantType::R410A), Some(1924.0));
        assert_eq!(registry.refrigerant_gwp(RefrigerantType::Custom), None);
        assert!(registry
            .factors_for(
                Category::Fugitive,
                Subtype::Refrigerant(RefrigerantType::Custom)
            )
            .is_err());
    }

    #[test]
    fn factors_apply_to_canonical_quantities() {
        let per_tonne = EmissionFactor::new(919.4, Unit::Tonnes);
        assert!((per_tonne.apply(500.0) - 459.7).abs() < 1e-9);

        let per_kwh = EmissionFactor::new(0.698, Unit::KilowattHours);
        assert!((per_kwh.apply(Unit::KilowattHours.to_canonical(1000.0)) - 698.0).abs() < 1e-9);
    }

    #[test]
    fn mixed_unit_gas_factors_convert_each_gas_separately() {
        let registry = FactorRegistry::standard();
        let rail = registry
            .gases(Category::RailTravel, Subtype::Rail)
            .expect("rail factors");
        let gwp = GwpConstants::default();
        let contribution = rail.contribution(Unit::Miles.to_canonical(100.0), &gwp);
        assert!((contribution.co2 - 160.9344 * 0.028).abs() < 1e-9);
        assert!((contribution.ch4 - 100.0 * 0.000_009_2 * 28.0).abs() < 1e-9);
        assert!((contribution.n2o - 100.0 * 0.000_002_6 * 265.0).abs() < 1e-9);
    }

    #[test]
    fn entries_list_every_factor_in_key_order() {
        let registry = FactorRegistry::standard();
        let views: Vec<_> = registry.entries().collect();
        assert_eq!(views.len(), registry.len());
        assert_eq!(views[0].category, Category::Combustion);
        assert_eq!(views.last().map(|view| view.category), Some(Category::RoadTravel));
    }
}
