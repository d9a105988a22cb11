//! Core components, types, and utilities for the relay.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - Default reply texts posted into threads.
//! - Common types and result handling.

pub mod config;
pub mod replies;
pub mod types;
