#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/hindcast-rs/hindcast/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod historical;
pub mod measure;
pub mod monte_carlo;
pub mod parametric;
mod tail;

pub use historical::{HistoricalSimConfig, HistoricalSimulation};
pub use measure::{
    RiskEstimator, RiskMeasure, RiskMeasureEstimate, VarMethod, estimate_es, estimate_var,
};
pub use monte_carlo::{MonteCarloConfig, MonteCarloSimulation, SimulationSource};
pub use parametric::{ParametricConfig, ParametricVar};
