pub mod charts;
pub mod dashboard;
pub mod filter_panel;
pub mod report_view;
pub mod table_view;

pub use dashboard::SalesReportDashboard;
