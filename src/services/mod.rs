//! External service interactions
//!
//! This module contains services for talking to the dataset backend:
//! - REST client for the list/data/query/upload/remove endpoints
//! - Background request execution

pub mod api;
pub mod runner;

pub use api::{ApiClient, ApiError, QueryReply};
pub use runner::{ApiCompletion, ApiRequest, RequestRunner};
