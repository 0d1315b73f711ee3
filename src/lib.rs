//! rowguard - row-level permissions and generated CRUD routes for Axum.
//!
//! The permission engine ([`policy`]) decides per record whether the current
//! actor may read, write or create it. CRUD blueprints ([`crud`]) turn a
//! model and a method specification into routes that consult the engine on
//! every request.

#![allow(missing_docs)]

pub mod api;
pub mod app;
pub mod app_info;
pub mod auth;
pub mod boot;
pub mod cli;
pub mod commands;
pub mod config;
pub mod crud;
pub mod environment;
pub mod models;
pub mod password;
pub mod policy;
pub mod roles;
pub mod router;
pub mod setup_tracing;
pub mod token;
pub mod utils;
