//! PostgreSQL catalog database integration
//!
//! Reads record sets, holdings and stored MARC from an Evergreen database.

pub mod adapter;
pub mod client;
pub mod queries;

pub use adapter::PostgreSQLAdapter;
pub use client::PostgreSQLClient;
