//! Sign-up service for the cafe storefront.
//!
//! Accepts registration requests from the storefront's sign-up form,
//! validates them, hashes the password with bcrypt and stores the account.
//! A request carrying the server's admin registration key creates an ADMIN
//! account instead of a GENERAL one.

pub mod api;
pub mod config;
pub mod credentials;
pub mod error;
pub mod registration;

pub use config::Config;
pub use error::RegistrationError;
pub use registration::{RegisterRequest, Registration, RegistrationService};
