//! Business operations for the job tracker, layered over the `models` entities.
//! - HTTP-agnostic: handlers in `server` call these functions and map `ServiceError`.
//! - Validation lives in `models`; scoping (current user, superuser) lives here.

pub mod errors;
pub mod pagination;
pub mod query;
pub mod auth;
pub mod profile_service;
pub mod job_service;
pub mod application_service;
pub mod automation_service;
pub mod dashboard_service;
pub mod setup_service;
pub mod settings_service;
pub mod site_settings_service;
pub mod admin_service;
pub mod seed;
#[cfg(test)]
pub mod test_support;
