//! Souk Core - Shared types library.
//!
//! This crate provides common types used across all Souk services:
//! - `customers` - Customer accounts and wallets
//! - `inventory` - Goods catalog and stock
//! - `sales` - Sale transactions
//! - `reviews` - Product reviews and moderation
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, usernames, money, and
//!   domain enums
//! - [`password`] - Argon2id password hashing and verification

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod password;
pub mod types;

pub use password::{MIN_PASSWORD_LENGTH, PasswordError, hash_password, validate_password, verify_password};
pub use types::*;
