//! Subscription module: domain inputs, filter/predicate builder, repository, service.

pub mod domain;
pub mod filter;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::SubscriptionService;
