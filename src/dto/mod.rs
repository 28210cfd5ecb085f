//! DTO modules that bridge services with templates.

pub mod customers;
pub mod home;
pub mod reports;
