//! Enrichment crate for the movie catalog.
//!
//! This crate contains the orchestrator that fills the recommendation
//! columns of a catalog and writes it back to disk.

pub mod orchestrator;

pub use orchestrator::{
    EnrichmentColumns, EnrichmentConfig, EnrichmentError, EnrichmentOrchestrator,
    EnrichmentReport,
};
