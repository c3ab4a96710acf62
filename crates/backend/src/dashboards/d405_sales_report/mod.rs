pub mod error;
pub mod service;
pub mod upstream;

pub use error::GatewayError;
pub use upstream::{HttpReportUpstream, ReportUpstream};
