//! Service layer providing subscription CRUD on top of models.
//! - Separates validation and wire/storage translation from data access.
//! - Reuses entity definitions and the month codec from the `models` crate.
//! - Classifies every failure as invalid input, not found or storage.

pub mod errors;
pub mod subscription;
#[cfg(test)]
pub mod test_support;
