//! Database abstraction layer
//!
//! The export engine talks to the catalog through the traits in [`traits`];
//! [`factory`] wires them to PostgreSQL.

pub mod factory;
pub mod traits;

pub use factory::connect_catalog;
pub use traits::{HoldingsSource, RawHoldings, RecordSetSource, RecordStore};
