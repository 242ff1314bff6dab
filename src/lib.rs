//!
//! # tasklane
//!
//! Task-tracking backend with JWT access/refresh authentication and per-user
//! task isolation. The library crate holds the auth subsystem (password
//! hashing, token issuance/verification, the auth service, bearer middleware,
//! ownership checks), the domain models, the storage interface with its
//! Postgres and in-memory backends, and the HTTP route handlers. The binary
//! (`main.rs`) wires them together.

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;
