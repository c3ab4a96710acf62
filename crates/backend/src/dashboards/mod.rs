pub mod d405_sales_report;
