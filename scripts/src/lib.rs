//! Scripts for deploying the Moloch DAO smart contracts.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod artifacts;
pub mod chain;
pub mod cli;
mod commands;
pub mod config;
pub mod constants;
pub mod deployments;
pub mod errors;
pub mod orchestrator;
mod targets;
