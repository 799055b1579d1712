//! inventory-api - REST service for inventory items and clock-in records
//!
//! Records live in a [`store::DocumentStore`]; ids come from per-sequence
//! counters in the same store via [`allocator::IdAllocator`].

pub mod allocator;
pub mod cli;
pub mod config;
pub mod errors;
pub mod filter;
pub mod http_server;
pub mod logging;
pub mod records;
pub mod store;
