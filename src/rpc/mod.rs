//! Remote call between the crawler and the parser service
//!
//! The single operation is `Parse(data) -> message`, carried as JSON over HTTP.

mod client;
mod server;
pub mod wire;

pub use client::ParserClient;
pub use server::{serve, serve_on, ParserService};
pub use wire::{ParseRequest, ParseResponse};
