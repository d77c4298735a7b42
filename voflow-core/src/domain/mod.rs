//! Core domain types
//!
//! This module contains the domain structures shared by the TAP query client
//! and the VOSpace transfer client. These types represent the asynchronous
//! job model both remote services expose.

pub mod credentials;
pub mod job;
pub mod payload;
pub mod query;
pub mod transfer;
