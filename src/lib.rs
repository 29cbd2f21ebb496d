//! Insurance Administration API Library
//!
//! This library provides the core functionality for the insurance
//! administration backend: database schema management, data models, dynamic
//! filter queries, record-number generation, status validators, seed data
//! and the HTTP handlers.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `db`: Database connection, pool management and schema creation.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers and the API router.
//! - `ids`: Record-number and broker-code generation.
//! - `models`: Core data models, request payloads and filter parameters.
//! - `password`: Argon2 password hashing and verification.
//! - `query`: Dynamic SQL filter builder.
//! - `seed`: Demo fixtures and the reset operation.
//! - `validators`: Status-enum and email validation.

pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod ids;
pub mod models;
pub mod password;
pub mod query;
pub mod seed;
pub mod validators;
