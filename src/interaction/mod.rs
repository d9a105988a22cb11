//! Event handling for the relay.
//!
//! This module provides functionality for handling inbound webhook deliveries:
//! - Classifying deliveries and answering the URL verification handshake
//! - Acknowledging qualifying mentions immediately
//! - Relaying the mention to the backend and writing the answer back to the thread

pub mod relay;
pub mod webhook;
