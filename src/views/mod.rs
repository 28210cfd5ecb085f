//! Server-side state of interactive list views.

pub mod customer_list;
pub mod registry;
