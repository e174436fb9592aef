pub mod comment;
pub mod config;
pub mod error;
pub mod parsers;
pub mod report;
pub mod trigger;
pub mod wrk;

pub mod prelude {
    pub use crate::error::*;
    pub use tracing::{debug, error, info, trace, warn};
}

pub use report::{
    LatencyStats, ParsedResult, PercentileBreakdown, StatusBreakdown, ThroughputSummary,
};
pub use wrk::parse_wrk_output;
