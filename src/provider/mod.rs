//! Search provider module
//!
//! Defines the Provider trait, the client that executes provider requests,
//! and the Brave Search binding.

mod client;
mod traits;

pub mod brave;

pub use brave::Brave;
pub use client::ProviderClient;
pub use traits::*;
