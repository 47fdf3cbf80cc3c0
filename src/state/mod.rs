//! View state shared by protected views.
//!
//! DESIGN
//! ======
//! `loader` is the generic fetch state machine; `stats` holds the dashboard
//! data it loads. Views depend on the resolved types only.

pub mod loader;
pub mod stats;
