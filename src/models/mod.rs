//! Database models and configuration shared across the CRM.

#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod config;
pub mod customer;
pub mod user;
