//! # Authentication
//!
//! Bearer-token authentication for the `/api` routes.

pub mod middleware;
