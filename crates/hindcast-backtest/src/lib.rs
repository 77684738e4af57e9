#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/hindcast-rs/hindcast/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod backtest;
pub mod coverage;
pub mod traffic_light;

pub use backtest::{BacktestResult, MIN_OBSERVATIONS, backtest};
pub use coverage::{
    ChristoffersenTest, KupiecTest, christoffersen_test, kupiec_test, violation_indicators,
};
pub use traffic_light::TrafficLight;
