//! portwatch: a supply-chain risk dashboard over a remote AI agent service.
//!
//! The [`agent`] client is the only component that talks to the service.
//! [`session`] holds per-user conversation state, [`views`] turn session
//! state and client results into renderable models, and the [`web`] and
//! [`cli`] surfaces drive them.

pub mod agent;
pub mod analytics;
pub mod cli;
pub mod config;
pub mod session;
pub mod views;
pub mod web;
