//! hindcast CLI binary.
//!
//! Volatility, Value-at-Risk and VaR backtests on one column of a CSV file.

mod input;
mod report;

use clap::{Args, Parser, Subcommand, ValueEnum};
use hindcast::backtest::backtest;
use hindcast::data::{Estimate, EstimateSeries, ReturnKind, ReturnSeries, RiskError};
use hindcast::var::{
    HistoricalSimConfig, MonteCarloConfig, ParametricConfig, RiskMeasureEstimate,
    SimulationSource, VarMethod, estimate_es, estimate_var,
};
use hindcast::vol::{
    EwmaConfig, GarchConfig, HistoricalConfig, VolatilityEstimate, VolatilityEstimator,
    VolatilityModel,
};
use input::Column;
use log::info;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "hindcast")]
#[command(about = "hindcast: volatility, Value-at-Risk and VaR backtesting", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// CSV file with a header row
    #[arg(long)]
    file: PathBuf,

    /// Column holding returns (or prices, with --prices)
    #[arg(long)]
    column: String,

    /// Column holding YYYY-MM-DD dates (period index when omitted)
    #[arg(long)]
    date_column: Option<String>,

    /// Treat the column as prices and convert to log or simple returns
    #[arg(long, value_enum)]
    prices: Option<PriceArg>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Clone, Copy, ValueEnum)]
enum PriceArg {
    Log,
    Simple,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModelArg {
    Historical,
    Ewma,
    Garch,
}

#[derive(Clone, Copy, ValueEnum)]
enum MethodArg {
    Parametric,
    Historical,
    MonteCarlo,
}

#[derive(Clone, Copy, ValueEnum)]
enum BacktestArg {
    Historical,
    Ewma,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate volatility
    Vol {
        #[command(flatten)]
        input: InputArgs,

        /// Volatility model
        #[arg(long, value_enum)]
        model: ModelArg,

        /// Window length for the historical model
        #[arg(long, default_value = "21")]
        window: usize,

        /// Decay factor for the EWMA model
        #[arg(long, default_value = "0.94")]
        lambda: f64,
    },

    /// Estimate Value-at-Risk or Expected Shortfall
    Var {
        #[command(flatten)]
        input: InputArgs,

        /// Estimation method
        #[arg(long, value_enum)]
        method: MethodArg,

        /// Confidence level in (0, 1)
        #[arg(long, default_value = "0.99")]
        confidence: f64,

        /// Trailing window for historical simulation (full series when omitted)
        #[arg(long)]
        window: Option<usize>,

        /// Use EWMA volatility with this decay instead of the sample σ
        #[arg(long)]
        lambda: Option<f64>,

        /// Monte Carlo paths
        #[arg(long, default_value = "10000")]
        simulations: usize,

        /// Monte Carlo seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Resample observed returns instead of drawing Gaussian returns
        #[arg(long)]
        bootstrap: bool,

        /// Horizon in periods
        #[arg(long, default_value = "1")]
        horizon: usize,

        /// Report Expected Shortfall instead of VaR
        #[arg(long)]
        es: bool,
    },

    /// Backtest rolling VaR forecasts against realized returns
    Backtest {
        #[command(flatten)]
        input: InputArgs,

        /// Confidence level in (0, 1)
        #[arg(long, default_value = "0.99")]
        confidence: f64,

        /// Estimation window (historical) or EWMA seed window
        #[arg(long)]
        window: usize,

        /// Forecasting method
        #[arg(long, value_enum, default_value_t = BacktestArg::Historical)]
        method: BacktestArg,

        /// Decay factor for the EWMA method
        #[arg(long, default_value = "0.94")]
        lambda: f64,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Vol {
            input,
            model,
            window,
            lambda,
        } => {
            let series = load(&input)?;
            let model = match model {
                ModelArg::Historical => VolatilityModel::Historical(HistoricalConfig {
                    window,
                    rolling: true,
                }),
                ModelArg::Ewma => VolatilityModel::Ewma(EwmaConfig {
                    decay: lambda,
                    seed_window: None,
                }),
                ModelArg::Garch => VolatilityModel::Garch(GarchConfig::default()),
            };
            let estimate = model.estimate(&series)?;
            report::volatility(&series, &estimate, input.format == Format::Json)?;
        }
        Commands::Var {
            input,
            method,
            confidence,
            window,
            lambda,
            simulations,
            seed,
            bootstrap,
            horizon,
            es,
        } => {
            let series = load(&input)?;
            let volatility = lambda.map(|decay| ewma(&series, decay, None)).transpose()?;
            let method = match method {
                MethodArg::Parametric => VarMethod::Parametric(ParametricConfig {
                    zero_mean: false,
                    horizon,
                }),
                MethodArg::Historical => VarMethod::Historical(HistoricalSimConfig {
                    window,
                    rolling: false,
                }),
                MethodArg::MonteCarlo => VarMethod::MonteCarlo(MonteCarloConfig {
                    simulations,
                    seed,
                    horizon,
                    source: if bootstrap {
                        SimulationSource::Bootstrap
                    } else {
                        SimulationSource::Gaussian
                    },
                    ..Default::default()
                }),
            };
            let estimate = if es {
                estimate_es(&series, confidence, &method, volatility.as_ref())?
            } else {
                estimate_var(&series, confidence, &method, volatility.as_ref())?
            };
            report::risk(&series, &estimate, input.format == Format::Json)?;
        }
        Commands::Backtest {
            input,
            confidence,
            window,
            method,
            lambda,
        } => {
            let series = load(&input)?;
            let forecast = match method {
                BacktestArg::Historical => estimate_var(
                    &series,
                    confidence,
                    &VarMethod::Historical(HistoricalSimConfig {
                        window: Some(window),
                        rolling: true,
                    }),
                    None,
                )?,
                BacktestArg::Ewma => {
                    let volatility = ewma(&series, lambda, Some(window))?;
                    let forecast = estimate_var(
                        &series,
                        confidence,
                        &VarMethod::Parametric(ParametricConfig {
                            zero_mean: true,
                            horizon: 1,
                        }),
                        Some(&volatility),
                    )?;
                    // The seed variance has seen the first `window` returns
                    without_warm_up(forecast, window)?
                }
            };
            let result = backtest(&series, &forecast, confidence)?;
            report::backtest(&series, &result, input.format == Format::Json)?;
        }
    }

    Ok(())
}

fn load(input: &InputArgs) -> Result<ReturnSeries, input::InputError> {
    let column = Column::from_path(&input.file, &input.column, input.date_column.as_deref())?;
    let series = match input.prices {
        None => column.into_returns()?,
        Some(PriceArg::Log) => column.into_returns_from_prices(ReturnKind::Log)?,
        Some(PriceArg::Simple) => column.into_returns_from_prices(ReturnKind::Simple)?,
    };
    info!(
        "loaded {} returns ({} missing) from {}",
        series.len(),
        series.missing_count(),
        input.file.display()
    );
    Ok(series)
}

fn ewma(
    series: &ReturnSeries,
    decay: f64,
    seed_window: Option<usize>,
) -> Result<VolatilityEstimate, RiskError> {
    VolatilityModel::Ewma(EwmaConfig { decay, seed_window }).estimate(series)
}

/// Drop the first `window` forecasts of a time-indexed estimate.
fn without_warm_up(
    forecast: RiskMeasureEstimate,
    window: usize,
) -> Result<RiskMeasureEstimate, RiskError> {
    let value = match &forecast.value {
        Estimate::Series(path) => {
            let values = path
                .values()
                .iter()
                .enumerate()
                .map(|(t, v)| if t < window { None } else { *v })
                .collect();
            Estimate::Series(EstimateSeries::new(path.index().clone(), values)?)
        }
        Estimate::Scalar(v) => Estimate::Scalar(*v),
    };
    Ok(RiskMeasureEstimate { value, ..forecast })
}
