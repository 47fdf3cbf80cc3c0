//! # admin-console
//!
//! Core of the Kwacha Tracker admin console: the operator's session
//! lifecycle and the async data loading every protected view depends on.
//!
//! This crate contains the session store and its storage backends, the login
//! flow, the page guard, the generic view data loader, the stats dashboard
//! view, and the HTTP client for the admin API. The `admin-console` binary
//! drives them from the command line.

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod guard;
pub mod net;
pub mod session;
pub mod state;
