//! Data core for Karma Aligns.
//!
//! Turns loosely shaped compute-service responses into a typed [`Norm`],
//! classifies strength scores into buckets, and carries the supporting
//! pieces the result views need (Shadbala extraction, achievements, ACG city
//! filters, a session cache, preferences and configuration).

pub mod achievements;
pub mod acg;
pub mod cache;
pub mod coerce;
pub mod collection;
pub mod config;
pub mod error;
pub mod norm;
pub mod normalize;
pub mod preferences;
pub mod scales;
pub mod shadbala;

pub use cache::{ComputeCache, ComputeParams};
pub use collection::Collection;
pub use config::KarmaConfig;
pub use error::{KarmaError, Result};
pub use norm::Norm;
pub use normalize::{normalize, normalize_opt};
pub use preferences::{FileStore, MemoryStore, PreferenceStore, UserPreferences};
pub use scales::{bucket, ScoreBucket, THRESHOLDS};
pub use shadbala::{extract_shadbala, ExtractedShadbala, PillarKey, PlanetId};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
