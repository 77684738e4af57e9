use approx::assert_relative_eq;
use hindcast_core::{Estimate, EstimateSeries, ReturnSeries, RiskError, SeriesIndex};
use hindcast_var::{
    HistoricalSimConfig, MonteCarloConfig, ParametricConfig, RiskMeasure, SimulationSource,
    VarMethod, estimate_es, estimate_var,
};
use hindcast_vol::{EwmaConfig, VolatilityEstimate, VolatilityEstimator, VolatilityModel};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, StandardNormal};
use rstest::rstest;

fn gaussian_returns(n: usize, sigma: f64, seed: u64) -> ReturnSeries {
    let mut rng = StdRng::seed_from_u64(seed);
    let values = (0..n)
        .map(|_| {
            let z: f64 = StandardNormal.sample(&mut rng);
            sigma * z
        })
        .collect();
    ReturnSeries::from_values(values).unwrap()
}

fn scalar_vol(sigma: f64) -> VolatilityEstimate {
    VolatilityEstimate {
        model: VolatilityModel::Ewma(EwmaConfig::default()),
        volatility: Estimate::Scalar(sigma),
    }
}

#[test]
fn parametric_closed_form() {
    let series = gaussian_returns(50, 0.02, 1);
    let method = VarMethod::Parametric(ParametricConfig {
        zero_mean: true,
        horizon: 1,
    });
    let var = estimate_var(&series, 0.99, &method, Some(&scalar_vol(0.02))).unwrap();

    // 0.02 * Φ⁻¹(0.99)
    assert_relative_eq!(var.latest().unwrap(), 0.02 * 2.3263478740408408, epsilon = 1e-10);
    assert_relative_eq!(var.latest().unwrap(), 0.04653, epsilon = 1e-5);
    assert_eq!(var.measure, RiskMeasure::ValueAtRisk);
    assert_eq!(var.method, method);
    assert_eq!(var.confidence, 0.99);
    assert!(var.volatility_model.is_some());
}

#[test]
fn parametric_shortfall_closed_form() {
    let series = gaussian_returns(50, 0.02, 1);
    let method = VarMethod::Parametric(ParametricConfig {
        zero_mean: true,
        horizon: 1,
    });
    let es = estimate_es(&series, 0.975, &method, Some(&scalar_vol(0.01))).unwrap();
    // φ(1.959964) / 0.025 = 2.337803
    assert_relative_eq!(es.latest().unwrap(), 0.01 * 2.3378027922014173, epsilon = 1e-9);
    assert_eq!(es.measure, RiskMeasure::ExpectedShortfall);
}

#[test]
fn historical_uniform_grid() {
    let values = (0..100).map(|i| -0.05 + 0.1 * i as f64 / 99.0).collect();
    let series = ReturnSeries::from_values(values).unwrap();
    let var = estimate_var(
        &series,
        0.95,
        &VarMethod::Historical(HistoricalSimConfig::default()),
        None,
    )
    .unwrap();
    assert_relative_eq!(var.value.as_scalar().unwrap(), 0.045, epsilon = 1e-12);
}

#[test]
fn monte_carlo_too_few_paths() {
    let series = gaussian_returns(250, 0.01, 2);
    let method = VarMethod::MonteCarlo(MonteCarloConfig {
        simulations: 10,
        ..Default::default()
    });
    assert!(matches!(
        estimate_var(&series, 0.99, &method, None),
        Err(RiskError::Parameter { name: "simulations", .. })
    ));
}

#[rstest]
#[case(SimulationSource::Gaussian)]
#[case(SimulationSource::Bootstrap)]
fn monte_carlo_is_reproducible(#[case] source: SimulationSource) {
    let series = gaussian_returns(250, 0.01, 3);
    let method = |seed| {
        VarMethod::MonteCarlo(MonteCarloConfig {
            seed,
            source,
            ..Default::default()
        })
    };
    let a = estimate_var(&series, 0.99, &method(7), None).unwrap();
    let b = estimate_var(&series, 0.99, &method(7), None).unwrap();
    let c = estimate_var(&series, 0.99, &method(8), None).unwrap();
    assert_eq!(a.latest(), b.latest());
    if source == SimulationSource::Gaussian {
        assert_ne!(a.latest(), c.latest());
    }
}

#[test]
fn monte_carlo_gaussian_agrees_with_closed_form() {
    let series = gaussian_returns(500, 0.015, 4);
    let parametric = estimate_var(
        &series,
        0.99,
        &VarMethod::Parametric(ParametricConfig::default()),
        None,
    )
    .unwrap();
    let simulated = estimate_var(
        &series,
        0.99,
        &VarMethod::MonteCarlo(MonteCarloConfig {
            simulations: 200_000,
            ..Default::default()
        }),
        None,
    )
    .unwrap();
    // Standard error of the simulated 1% quantile is about 1% of σ·z
    assert_relative_eq!(
        simulated.latest().unwrap(),
        parametric.latest().unwrap(),
        max_relative = 0.03
    );
}

#[rstest]
#[case(VarMethod::Parametric(ParametricConfig::default()))]
#[case(VarMethod::Historical(HistoricalSimConfig::default()))]
#[case(VarMethod::MonteCarlo(MonteCarloConfig::default()))]
fn shortfall_dominates_var(#[case] method: VarMethod) {
    let series = gaussian_returns(1000, 0.01, 5);
    let var = estimate_var(&series, 0.99, &method, None).unwrap();
    let es = estimate_es(&series, 0.99, &method, None).unwrap();
    assert!(var.latest().unwrap() > 0.0);
    assert!(es.latest().unwrap() >= var.latest().unwrap());
}

#[test]
fn parametric_follows_volatility_path() {
    let series = gaussian_returns(300, 0.01, 6);
    let ewma = VolatilityModel::Ewma(EwmaConfig::default())
        .estimate(&series)
        .unwrap();
    let var = estimate_var(
        &series,
        0.99,
        &VarMethod::Parametric(ParametricConfig {
            zero_mean: true,
            horizon: 1,
        }),
        Some(&ewma),
    )
    .unwrap();

    let var_path = var.as_series().unwrap();
    let vol_path = ewma.as_series().unwrap();
    assert_eq!(var_path.index(), series.index());
    for (t, sigma) in vol_path.defined() {
        assert_relative_eq!(
            var_path.get(t).unwrap(),
            sigma * 2.3263478740408408,
            epsilon = 1e-10
        );
    }
}

#[test]
fn misaligned_volatility_rejected() {
    let series = gaussian_returns(100, 0.01, 7);
    let other = EstimateSeries::new(SeriesIndex::periods(99), vec![Some(0.01); 99]).unwrap();
    let vol = VolatilityEstimate {
        model: VolatilityModel::Ewma(EwmaConfig::default()),
        volatility: Estimate::Series(other),
    };
    assert!(matches!(
        estimate_var(
            &series,
            0.99,
            &VarMethod::Parametric(ParametricConfig::default()),
            Some(&vol)
        ),
        Err(RiskError::Alignment(_))
    ));
}

#[test]
fn rolling_historical_series_shape() {
    let _ = env_logger::builder().is_test(true).try_init();
    let series = gaussian_returns(400, 0.01, 8);
    let var = estimate_var(
        &series,
        0.99,
        &VarMethod::Historical(HistoricalSimConfig {
            window: Some(250),
            rolling: true,
        }),
        None,
    )
    .unwrap();
    let path = var.as_series().unwrap();
    assert_eq!(path.len(), 400);
    assert_eq!(path.defined_count(), 150);
    assert!(path.defined().all(|(_, v)| v >= 0.0));
}
