pub mod d405_sales_report;

pub use d405_sales_report::ui::SalesReportDashboard;
