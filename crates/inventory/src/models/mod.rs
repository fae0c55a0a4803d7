//! Domain models for the inventory service.

pub mod good;

pub use good::Good;
