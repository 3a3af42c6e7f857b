//! Redis Objects - An HTTP gateway over typed Redis-backed distributed objects
//!
//! Buckets, bit sets, atomic counters, maps, sets, sorted sets, lists, queues
//! and client-side adders, each exposed through a thin typed façade.

pub mod api;
pub mod config;
pub mod error;
pub mod facade;
pub mod models;
pub mod provider;
pub mod service;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use facade::{ObjectFacade, SetOptions, TtlUnit};
pub use provider::{connect, Connection};
