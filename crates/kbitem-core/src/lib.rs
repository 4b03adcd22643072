//! Core data model for knowledge-base items.
//!
//! Provides statement value types ([`model::Statement`], [`model::Snak`]),
//! grouping by property ([`grouper::ByPropertyIdGrouper`]), two
//! group-contiguous ordered sequences ([`order::RebuildingPropertyOrder`],
//! [`order::IncrementalPropertyOrder`]), the rank order ([`rank::RankScale`])
//! and best-statement selection ([`selector`]).

pub mod config;
pub mod error;
pub mod grouper;
pub mod model;
pub mod order;
pub mod rank;
pub mod selector;
pub mod statement_list;

pub use error::{DataModelError, Result};
