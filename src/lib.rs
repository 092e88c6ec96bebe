//! ecsdeploy: deployment tool for services on a managed container cluster.
//!
//! The command line is described by a static option registry; parsing,
//! defaulting, and validation run before any handler is dispatched.

pub mod app;
pub mod cli;
pub mod config;
pub mod definition;
pub mod envfile;
pub mod error;
pub mod logging;
pub mod register;
pub mod render;
