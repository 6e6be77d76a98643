//! Applicant registry service.
//!
//! Backs the public internship/volunteer application form and the admin
//! dashboard: durable applicant storage with validation and email
//! uniqueness, plus the HTTP contract the front-end consumes.

pub mod config;
pub mod error;
pub mod registry;
pub mod telemetry;
