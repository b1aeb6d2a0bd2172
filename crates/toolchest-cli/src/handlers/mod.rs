//! Command handlers, one module per surface.

pub mod entities;
pub mod network;
