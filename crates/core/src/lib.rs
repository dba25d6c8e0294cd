//! YelpCamp Core - Shared domain types.
//!
//! This crate provides the types used across all YelpCamp components:
//! - `web` - The server-rendered campground site
//! - `cli` - Command-line tools for migrations, seeding, and user management
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP clients. Database encoding is available behind the
//! `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, usernames, prices, ratings,
//!   and geographic points

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
