//! Chat gateway and conversation sessions for a museum visitor guide.
//!
//! The gateway forwards visitor questions to an answering service and always
//! hands back something displayable; sessions keep the visitor's transcript
//! and serialize their round trips to the gateway.

pub mod config;
pub mod copy;
pub mod error;
pub mod gateway;
pub mod language;
pub mod model;
pub mod session;
pub mod web;
