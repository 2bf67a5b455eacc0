//! Core traits for the SchlundTech authenticator
//!
//! This module defines the seams between the authenticator, the gateway
//! client and the network.
//!
//! - [`Transport`]: Send one XML request, receive one XML response
//! - [`TxtRecordClient`]: Add and remove TXT records in a zone
//! - [`TxtRecordClientFactory`]: Build record clients from gateway settings
//! - [`Authenticator`]: The capability the challenge framework invokes

pub mod transport;
pub mod record_client;
pub mod authenticator;

pub use transport::Transport;
pub use record_client::{TxtRecordClient, TxtRecordClientFactory};
pub use authenticator::{Authenticator, Challenge, ACME_CHALLENGE_PREFIX};
