#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/hindcast-rs/hindcast/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod estimate;
pub mod index;
pub mod returns;
pub mod series;
pub mod stats;

pub use error::{Result, RiskError, validate_confidence};
pub use estimate::{Estimate, EstimateSeries};
pub use index::SeriesIndex;
pub use returns::{log_returns, simple_returns};
pub use series::{MissingPolicy, ReturnKind, ReturnSeries};
