//! Catalog Module
//!
//! The remote catalog service the harness probes: wire types and the
//! `Catalog` seam with its reqwest-backed implementation.

mod client;
mod product;

pub use client::{Catalog, CatalogResponse, HttpCatalog};
pub use product::{CacheSignal, ProductList, ProductRecord, ProductUpdate};

// == Public Constants ==
/// Response header a catalog may use to report its own cache outcome
pub const CACHE_STATUS_HEADER: &str = "x-cache";
