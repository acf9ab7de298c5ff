// src/availability/mod.rs
//! Upstream room availability: wire client plus the record/error types the
//! monitor consumes.

pub mod client;
pub mod types;

pub use client::{parse_rooms, BookOdishaClient};
pub use types::{AvailabilityRecord, AvailabilitySource, FetchError};
