//! # Providers
//!
//! Concrete data-access backends used by the recommendation engine and the server.

pub mod db;
