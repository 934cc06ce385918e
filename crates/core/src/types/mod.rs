//! Core types for Guildhall.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod identity;
pub mod price;

pub use id::*;
pub use identity::{OwnershipKey, Requester};
pub use price::{CurrencyCode, CurrencyCodeError, Price};
