//! Domain aggregates exposed by the CRM service layer.

pub mod customer;
pub mod module;
pub mod report;
pub mod types;
pub mod user;
