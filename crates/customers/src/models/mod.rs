//! Domain models for the customers service.

pub mod customer;

pub use customer::Customer;
