#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/hindcast-rs/hindcast/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod ewma;
pub mod garch;
pub mod historical;
pub mod model;

// Re-export main types
pub use ewma::{EwmaConfig, EwmaVolatility};
pub use garch::{Garch11, GarchConfig, GarchFit, GarchParams};
pub use historical::{HistoricalConfig, HistoricalVolatility};
pub use model::{VolatilityEstimate, VolatilityEstimator, VolatilityModel};
