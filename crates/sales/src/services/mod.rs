//! Business logic for the sales service.

pub mod sale;
