//! Data normalization and tabular presentation engine. Everything here is
//! pure and platform-agnostic; views only call into it.

pub mod columns;
pub mod format;
pub mod keys;
pub mod limits;
pub mod range;
pub mod record;
pub mod sanitize;
pub mod table;
