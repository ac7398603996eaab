//! Application layer: services and use cases
//!
//! This layer turns textual queries into walker calls over a loaded tree.

pub mod error;
pub mod query;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use query::{NodeFilter, Selector};
