//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login and bearer-token resolution live here; password
//! hashing and token encoding are split out so other services can reuse them.

pub mod domain;
pub mod errors;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;
pub mod repo;

pub use service::AuthService;
