//! Shared building blocks for every Vaulto crate: errors, domain types,
//! constants, and the traits data sources implement.

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;
