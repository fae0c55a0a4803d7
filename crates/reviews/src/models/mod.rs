//! Domain models for the reviews service.

pub mod review;

pub use review::Review;
