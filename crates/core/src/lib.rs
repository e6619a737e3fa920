//! Domain types and pure logic shared by the database, delivery and API crates.

pub mod board;
pub mod connection;
pub mod error;
pub mod report;
pub mod types;
