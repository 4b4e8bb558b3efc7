use crate::demo::{
    run_demo, run_factor_listing, run_footprint_report, DemoArgs, FactorsArgs, FootprintArgs,
};
use crate::server;
use carbon_footprint::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Carbon Footprint Engine",
    about = "Calculate scope 1, 2 and 3 greenhouse-gas footprints from activity data",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Calculate a footprint report from a JSON or CSV activity file
    Footprint(FootprintArgs),
    /// List the emission factors and GWP constants in use
    Factors(FactorsArgs),
    /// Calculate the footprint of a sample office organization
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Footprint(args) => run_footprint_report(args),
        Command::Factors(args) => run_factor_listing(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::{InputFormat, OutputFormat};

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["carbon-footprint-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn footprint_command_parses_formats_and_period() {
        let cli = Cli::try_parse_from([
            "carbon-footprint-api",
            "footprint",
            "--input",
            "activities.csv",
            "--format",
            "json",
            "--start",
            "2024-01-01",
            "--end",
            "2024-12-31",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Footprint(args)) => {
                assert_eq!(args.format, OutputFormat::Json);
                assert_eq!(args.input_format, None);
                assert_eq!(args.resolved_input_format(), InputFormat::Csv);
                assert!(args.start.is_some());
                assert!(args.end.is_some());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn invalid_dates_are_rejected() {
        let result = Cli::try_parse_from([
            "carbon-footprint-api",
            "footprint",
            "--input",
            "activities.json",
            "--start",
            "01/01/2024",
        ]);
        assert!(result.is_err());
    }
}
