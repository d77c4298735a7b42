//! voflow Core
//!
//! Core types and abstractions for the voflow archive-query and
//! VOSpace-transfer clients.
//!
//! This crate contains:
//! - Domain types: job phases and handles, query and transfer specs,
//!   credentials, upload payloads
//! - UWS parsing: extraction of phase and job id from the XML job summary
//!   both remote services return

pub mod domain;
pub mod uws;
