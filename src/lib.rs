//! Emission risk service.
//!
//! Serves pre-trained emission regressors (transport, explosives, fuel,
//! electricity) over HTTP. Each request carries days of activity records;
//! every record is run through its domain's model and each predicted
//! quantity is graded against fixed risk thresholds.

pub mod aggregate;
pub mod config;
pub mod domain;
pub mod encoding;
pub mod error;
pub mod handlers;
pub mod model;
pub mod predictor;
pub mod request;
pub mod risk;
pub mod thresholds;
pub mod types;

pub use aggregate::Engine;
pub use error::{ApiError, ApiResult};
pub use handlers::{router, AppState};
pub use risk::{classify, RiskTier, ThresholdSet, ThresholdTable};
