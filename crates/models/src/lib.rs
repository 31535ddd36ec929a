pub mod errors;
pub mod db;
pub mod user;
pub mod profile;
pub mod job;
pub mod user_setup;
pub mod automation;
pub mod user_job;
pub mod site_settings;
