//! Cascading country → state → city picker with current weather lookup.
//!
//! The library exposes the model, reducer and components so they can be
//! driven from tests without a terminal.

pub mod action;
pub mod api;
pub mod components;
pub mod config;
pub mod effect;
pub mod locations;
pub mod reducer;
pub mod state;
