//! Text and JSON rendering of estimates and backtests.

use hindcast::backtest::BacktestResult;
use hindcast::data::{Estimate, ReturnSeries, SeriesIndex};
use hindcast::var::RiskMeasureEstimate;
use hindcast::vol::{VolatilityEstimate, VolatilityModel};
use serde_json::{Value, json};
use std::error::Error;

/// Entries shown at the end of a text series listing
const TAIL_ROWS: usize = 10;

fn banner(title: &str) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║{title:^62}║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");
}

fn section(title: &str) {
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{title}");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
}

fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.4}%", v * 100.0))
}

/// `[{ "period": label, key: value }]` for every index entry.
fn entries(index: &SeriesIndex, values: &[Option<f64>], key: &str) -> Value {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let mut entry = json!({ "period": index.label(i) });
            entry[key] = json!(v);
            entry
        })
        .collect()
}

fn print_tail(estimate: &Estimate, heading: &str) {
    let Some(path) = estimate.as_series() else {
        return;
    };
    println!("\nLast {TAIL_ROWS} entries:");
    println!("─────────────────────────────────────────────────────────────");
    println!("  {:<14} {:>14}", "Period", heading);
    let start = path.len().saturating_sub(TAIL_ROWS);
    for i in start..path.len() {
        println!(
            "  {:<14} {:>14}",
            path.index().label(i).unwrap_or_default(),
            percent(path.get(i))
        );
    }
}

fn print_input(series: &ReturnSeries) {
    println!("Observations:     {}", series.len());
    println!("Missing:          {}", series.missing_count());
    println!("Return kind:      {:?}", series.kind());
}

pub(crate) fn volatility(
    series: &ReturnSeries,
    estimate: &VolatilityEstimate,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    if json {
        let mut output = json!({
            "analysis_type": "volatility",
            "observations": series.len(),
            "missing": series.missing_count(),
            "model": estimate.model,
            "latest": estimate.latest(),
        });
        if let Some(path) = estimate.as_series() {
            output["series"] = entries(path.index(), path.values(), "volatility");
        }
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    banner("VOLATILITY ESTIMATE");
    print_input(series);
    println!("Model:            {}", estimate.model.name());

    match &estimate.model {
        VolatilityModel::Historical(config) => {
            println!("Window:           {}", config.window);
        }
        VolatilityModel::Ewma(config) => {
            println!("Decay (λ):        {}", config.decay);
        }
        VolatilityModel::Garch(config) => {
            if let Some(p) = &config.params {
                println!();
                section("GARCH(1,1) PARAMETERS");
                println!("  ω                {:.6e}", p.omega);
                println!("  α                {:.4}", p.alpha);
                println!("  β                {:.4}", p.beta);
                println!("  Persistence      {:.4}", p.persistence());
                println!(
                    "  Long-run vol     {}",
                    percent(Some(p.long_run_variance().sqrt()))
                );
            }
        }
    }

    println!("\nLatest volatility: {}", percent(estimate.latest()));
    print_tail(&estimate.volatility, "Volatility");
    println!();
    Ok(())
}

pub(crate) fn risk(
    series: &ReturnSeries,
    estimate: &RiskMeasureEstimate,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    if json {
        let mut output = json!({
            "analysis_type": "risk",
            "observations": series.len(),
            "measure": estimate.measure,
            "confidence": estimate.confidence,
            "method": estimate.method,
            "volatility_model": estimate.volatility_model,
            "latest": estimate.latest(),
        });
        if let Some(path) = estimate.as_series() {
            output["series"] = entries(path.index(), path.values(), "value");
        }
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    banner(&format!(
        "{} AT {:.2}% CONFIDENCE",
        estimate.measure,
        estimate.confidence * 100.0
    ));
    print_input(series);
    println!("Method:           {}", estimate.method.name());
    if let Some(model) = &estimate.volatility_model {
        println!("Volatility model: {}", model.name());
    }
    println!(
        "\n{} (loss, latest): {}",
        estimate.measure,
        percent(estimate.latest())
    );
    print_tail(&estimate.value, &estimate.measure.to_string());
    println!();
    Ok(())
}

pub(crate) fn backtest(
    series: &ReturnSeries,
    result: &BacktestResult,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    if json {
        let violation_periods: Vec<_> = result
            .violation_positions
            .iter()
            .map(|&t| series.index().label(t))
            .collect();
        let output = json!({
            "analysis_type": "backtest",
            "result": result,
            "violation_periods": violation_periods,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    banner(&format!(
        "VaR BACKTEST AT {:.2}% CONFIDENCE",
        result.confidence * 100.0
    ));
    println!("Counted observations: {}", result.observations);
    println!("Violations:           {}", result.violations);
    println!("Expected violations:  {:.2}", result.expected_violations);
    println!("Violation rate:       {:.4}%\n", result.violation_rate * 100.0);

    section("COVERAGE TESTS");
    println!(
        "  Kupiec POF            LR = {:>8.4}   p = {:.4}",
        result.kupiec.lr_statistic, result.kupiec.p_value
    );
    println!(
        "  Independence          LR = {:>8.4}   p = {:.4}",
        result.christoffersen.lr_independence, result.christoffersen.p_value_independence
    );
    println!(
        "  Conditional coverage  LR = {:>8.4}   p = {:.4}",
        result.christoffersen.lr_conditional_coverage,
        result.christoffersen.p_value_conditional_coverage
    );
    println!("\nTraffic light zone: {}", result.traffic_light);

    if !result.violation_positions.is_empty() {
        println!("\nViolations:");
        for &t in &result.violation_positions {
            println!(
                "  {:<14} {:>10}",
                series.index().label(t).unwrap_or_default(),
                percent(series.get(t))
            );
        }
    }
    println!();
    Ok(())
}
