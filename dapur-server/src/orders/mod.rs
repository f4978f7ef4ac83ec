//! Orders
//!
//! - [`engine`]: order creation, reads, status updates, dashboard rollups
//! - [`traits`]: store capabilities the engine is built on
//! - [`memory`]: in-memory store
//! - [`money`]: decimal arithmetic and minor-unit conversion
//! - [`error`]: engine error taxonomy and its mapping to API errors

pub mod engine;
pub mod error;
pub mod memory;
pub mod money;
pub mod traits;

pub use engine::OrderEngine;
pub use error::{OrderError, OrderResult, RefEntity};
pub use memory::MemoryStore;
pub use traits::{
    MenuCatalog, OrderFilter, OrderLedger, OrderTransaction, StatusChange, StockDecrement,
    StoreError, StoreResult, UserDirectory,
};
