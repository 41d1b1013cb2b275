//! DTO modules that bridge services with templates.

pub mod base_master;
pub mod invoice;
pub mod ledger;
pub mod product;
