//! # CZP bridge server
//! This crate hosts the HTTP surface of the CZP bridge. It is responsible for:
//! Exchanging a client-supplied one-time mobile token for a citizen profile.
//! Parking that profile in a cookie-keyed server-side session.
//! Relaying push notifications to the upstream provider with a cached access token.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/validate`: Echo a currently-valid upstream access token.
//! * `/api/login`: The mToken exchange; establishes the session.
//! * `/api/get-user-data`: The profile bound to the caller's session.
//! * `/api/notification`, `/api/notifications`: Push relay (single / batch).
//! * `/api/logout`: Session teardown.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod expiry_worker;
pub mod integrations;
pub mod routes;
pub mod server;
