use carbon_footprint::activity_import::ActivityImporter;
use carbon_footprint::config::AppConfig;
use carbon_footprint::emissions::factors::{CalorificValue, FactorSet};
use carbon_footprint::emissions::{
    AirTravelRecord, CarbonFootprintReport, CombustionRecord, ElectricityRecord, EmissionsEngine,
    FleetVehicle, FlightClass, FootprintInputs, FuelType, FugitiveRecord, HeatingRecord,
    PaperRecord, PurchasedGoodsRecord, RailTravelRecord, RefrigerantType, ReportingPeriod,
    RoadTravelRecord, RoadVehicle, Scope1Input, Scope2Input, Scope3Input, SolidWasteRecord,
    TravelRecord, Unit, WasteRecord, WastewaterRecord, WaterRecord,
};
use carbon_footprint::error::AppError;
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum InputFormat {
    /// Footprint inputs grouped by scope
    Json,
    /// One activity record per row
    Csv,
}

#[derive(Args, Debug)]
pub(crate) struct FootprintArgs {
    /// Activity file to calculate
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Input format; inferred from the file extension when omitted
    #[arg(long, value_enum)]
    pub(crate) input_format: Option<InputFormat>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
    /// Reporting period start (YYYY-MM-DD); overrides any period in the input
    #[arg(long, value_parser = crate::infra::parse_date, requires = "end")]
    pub(crate) start: Option<NaiveDate>,
    /// Reporting period end (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date, requires = "start")]
    pub(crate) end: Option<NaiveDate>,
}

impl FootprintArgs {
    pub(crate) fn resolved_input_format(&self) -> InputFormat {
        self.input_format
            .unwrap_or_else(|| infer_input_format(&self.input))
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct FactorsArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
}

fn infer_input_format(path: &Path) -> InputFormat {
    match path.extension().and_then(|extension| extension.to_str()) {
        Some(extension) if extension.eq_ignore_ascii_case("csv") => InputFormat::Csv,
        _ => InputFormat::Json,
    }
}

fn configured_engine() -> Result<EmissionsEngine, AppError> {
    let config = AppConfig::load()?;
    Ok(EmissionsEngine::from_config(&config.engine))
}

pub(crate) fn load_inputs(path: &Path, format: InputFormat) -> Result<FootprintInputs, AppError> {
    match format {
        InputFormat::Csv => Ok(ActivityImporter::inputs_from_path(path)?),
        InputFormat::Json => {
            let file = std::fs::File::open(path)?;
            Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
        }
    }
}

pub(crate) fn run_footprint_report(args: FootprintArgs) -> Result<(), AppError> {
    let format = args.resolved_input_format();
    let FootprintArgs {
        input,
        format: output,
        start,
        end,
        ..
    } = args;

    let mut inputs = load_inputs(&input, format)?;
    if let (Some(start), Some(end)) = (start, end) {
        inputs.reporting_period = Some(ReportingPeriod { start, end });
    }

    let engine = configured_engine()?;
    let report = engine.calculate_footprint(&inputs)?;
    print_report(&report, output)
}

pub(crate) fn run_factor_listing(args: FactorsArgs) -> Result<(), AppError> {
    let engine = configured_engine()?;

    match args.format {
        OutputFormat::Json => {
            let factors: Vec<_> = engine.registry().entries().collect();
            let payload = serde_json::json!({
                "gwp": engine.gwp(),
                "factors": factors,
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        OutputFormat::Text => {
            let gwp = engine.gwp();
            println!("Emission factor registry");
            println!("GWP constants: CH4 {} | N2O {}", gwp.ch4, gwp.n2o);
            for entry in engine.registry().entries() {
                println!(
                    "- {} / {}: {}",
                    entry.category.label(),
                    entry.subtype,
                    describe_factors(&entry.factors)
                );
            }
        }
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let engine = configured_engine()?;
    let inputs = sample_organization();

    if args.format == OutputFormat::Text {
        println!("Carbon footprint demo: sample head office");
    }
    let report = engine.calculate_footprint(&inputs)?;
    print_report(&report, args.format)
}

fn print_report(report: &CarbonFootprintReport, format: OutputFormat) -> Result<(), AppError> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Text => render_footprint_report(report),
    }
    Ok(())
}

pub(crate) fn render_footprint_report(report: &CarbonFootprintReport) {
    println!("Carbon footprint report");
    match &report.reporting_period {
        Some(period) => println!("Reporting period: {} -> {}", period.start, period.end),
        None => println!("Reporting period: not specified"),
    }
    println!("Grand total: {:.2} kg CO2e", report.grand_total_co2e);

    println!("\nScope shares");
    for share in report.scope_shares() {
        println!(
            "- {}: {:.2} kg CO2e ({:.1}%)",
            share.label, share.total_co2e, share.share_percent
        );
    }

    println!("\nScope 1 sources");
    if report.scope1.breakdown.is_empty() {
        println!("- none");
    }
    for result in &report.scope1.breakdown {
        let subtype = match (result.fuel_type, result.refrigerant_type) {
            (Some(fuel), _) => fuel.label().to_string(),
            (None, Some(refrigerant)) => refrigerant.key().to_string(),
            (None, None) => result.category.label().to_string(),
        };
        println!(
            "- {} ({}): {:.2} kg CO2e",
            result.source, subtype, result.co2e
        );
        if let Some(energy_gj) = result.energy_gj {
            println!("    energy {:.3} GJ", energy_gj);
        }
        for (contribution, co2e) in &result.details {
            println!("    {}: {:.4}", contribution, co2e);
        }
    }

    println!("\nScope 2 purchased energy");
    if report.scope2.breakdown.is_empty() {
        println!("- none");
    }
    for (category, co2e) in &report.scope2.breakdown {
        println!("- {}: {:.2} kg CO2", category, co2e);
    }

    println!("\nScope 3 value chain");
    if report.scope3.breakdown.is_empty() {
        println!("- none");
    }
    for (category, subtypes) in &report.scope3.breakdown {
        println!("- {}", category);
        for (subtype, co2e) in subtypes {
            println!("    {}: {:.2} kg CO2e", subtype, co2e);
        }
    }
}

fn describe_factors(factors: &FactorSet) -> String {
    match factors {
        FactorSet::Fuel(profile) => {
            let calorific = match profile.calorific_value {
                CalorificValue::MassBased { mj_per_kg } => format!("{mj_per_kg} MJ/kg"),
                CalorificValue::VolumeBased { mj_per_m3 } => format!("{mj_per_m3} MJ/m3"),
            };
            let density = profile
                .density_kg_l
                .map(|density| format!(", {density} kg/l"))
                .unwrap_or_default();
            format!(
                "CO2 {} | CH4 {} | N2O {} kg/GJ, {}{}",
                profile.co2_kg_per_gj,
                profile.ch4_kg_per_gj,
                profile.n2o_kg_per_gj,
                calorific,
                density
            )
        }
        FactorSet::GlobalWarmingPotential { gwp } => format!("GWP {gwp}"),
        FactorSet::Intensity(factor) => format!("{} kg CO2e per {}", factor.value, factor.per),
        FactorSet::Gases(gases) => format!(
            "CO2 {} kg/{} | CH4 {} kg/{} | N2O {} kg/{}",
            gases.co2.value,
            gases.co2.per,
            gases.ch4.value,
            gases.ch4.per,
            gases.n2o.value,
            gases.n2o.per
        ),
        FactorSet::Multiplier { multiplier } => format!("x{multiplier}"),
        FactorSet::FuelConsumption { kg_per_km } => format!("{kg_per_km} kg fuel per km"),
    }
}

/// A head office with a boiler, a pool car, one chiller and a year of travel.
pub(crate) fn sample_organization() -> FootprintInputs {
    let mut pool_car =
        CombustionRecord::new("Pool car", FuelType::Diesel, 8_500.0, Unit::Kilometers);
    pool_car.vehicle = Some(FleetVehicle::PassengerCarDiesel);

    FootprintInputs {
        reporting_period: NaiveDate::from_ymd_opt(2024, 1, 1)
            .zip(NaiveDate::from_ymd_opt(2024, 12, 31))
            .map(|(start, end)| ReportingPeriod { start, end }),
        scope1: Scope1Input {
            combustion_emissions: vec![
                CombustionRecord::new(
                    "Main boiler",
                    FuelType::NaturalGas,
                    12_000.0,
                    Unit::CubicMeters,
                ),
                CombustionRecord::new("Backup generator", FuelType::Diesel, 400.0, Unit::Liters),
                pool_car,
            ],
            fugitive_emissions: vec![FugitiveRecord {
                source: "Server room AC".to_string(),
                refrigerant_type: RefrigerantType::R410A,
                amount: 1.2,
                unit: Unit::Kilograms,
                gwp_factor: None,
            }],
        },
        scope2: Scope2Input {
            electricity: Some(ElectricityRecord {
                source: "Head office".to_string(),
                amount: 85.0,
                unit: Unit::MegawattHours,
            }),
            district_heating: Some(HeatingRecord {
                source: "Head office".to_string(),
                amount: 120.0,
                unit: Unit::Gigajoules,
            }),
        },
        scope3: Scope3Input {
            purchased_goods_services: vec![
                PurchasedGoodsRecord::Water(WaterRecord {
                    source: "Mains supply".to_string(),
                    volume: 640.0,
                    unit: Unit::CubicMeters,
                }),
                PurchasedGoodsRecord::Paper(PaperRecord {
                    source: "Copier paper".to_string(),
                    mass: 0.75,
                    unit: Unit::Tonnes,
                    eco_labeled: true,
                }),
            ],
            waste_generated: vec![
                WasteRecord::SolidWaste(SolidWasteRecord {
                    source: "General waste".to_string(),
                    mass: 3.2,
                    unit: Unit::Tonnes,
                }),
                WasteRecord::Wastewater(WastewaterRecord {
                    source: "Sewer".to_string(),
                    volume: 610.0,
                    unit: Unit::CubicMeters,
                }),
            ],
            business_travel: vec![
                TravelRecord::AirTravel(AirTravelRecord {
                    source: "Annual conference".to_string(),
                    distance: 2_900.0,
                    unit: Unit::Miles,
                    flight_class: FlightClass::Business,
                }),
                TravelRecord::AirTravel(AirTravelRecord {
                    source: "Regional sales visits".to_string(),
                    distance: 420.0,
                    unit: Unit::Kilometers,
                    flight_class: FlightClass::Economy,
                }),
                TravelRecord::RailTravel(RailTravelRecord {
                    source: "Client visits".to_string(),
                    distance: 3_400.0,
                    unit: Unit::Kilometers,
                }),
                TravelRecord::RoadTravel(RoadTravelRecord {
                    source: "Airport transfers".to_string(),
                    distance: 260.0,
                    unit: Unit::Kilometers,
                    vehicle_type: RoadVehicle::Taxi,
                }),
                TravelRecord::RoadTravel(RoadTravelRecord {
                    source: "Commuter shuttle".to_string(),
                    distance: 1_150.0,
                    unit: Unit::Kilometers,
                    vehicle_type: RoadVehicle::Bus,
                }),
            ],
        },
    }
}
