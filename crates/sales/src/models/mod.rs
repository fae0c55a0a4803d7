//! Domain models for the sales service.

pub mod sale;

pub use sale::Sale;
