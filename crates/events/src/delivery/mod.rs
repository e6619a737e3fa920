pub mod error_report;
