//! Core types for Souk.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod id;
pub mod moderation;
pub mod money;
pub mod rating;
pub mod role;
pub mod username;

pub use category::{Category, CategoryError};
pub use id::*;
pub use moderation::ModerationStatus;
pub use money::{MoneyError, cents_to_decimal, decimal_to_cents};
pub use rating::{Rating, RatingError};
pub use role::Role;
pub use username::{Username, UsernameError};
