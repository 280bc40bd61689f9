//! Core library for the bookwell booking API.
//!
//! The crate is split the same way on every path through it:
//!
//! - [`domain`] holds the plain data types (jobs, distances, callers, history).
//! - [`ports`] declares the collaborator traits the services depend on.
//! - [`application`] contains the request-scoped services. Every public
//!   operation returns an [`application::Outcome`] and never an error, so the
//!   HTTP layer only has to map outcome kinds onto the response envelope.
//! - [`infrastructure`] provides Postgres, in-memory and notification adapters.

pub mod application;
pub mod domain;
pub mod error;
pub mod i18n;
pub mod infrastructure;
pub mod ports;

pub use error::{BookingError, Result};

/// Embedded schema migrations for the Postgres adapter.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
