//! # ticketd
//!
//! A small support-ticket service: create, list, read, update and delete
//! tickets over HTTP, stored in a document database.
//!
//! ## Layout
//!
//! - [`ticket`]: the record, request shapes, and validation
//! - [`store`]: the [`TicketStore`](store::TicketStore) gateway with MongoDB,
//!   in-memory, and unavailable implementations
//! - [`api`]: handlers and the route table
//! - the HTTP layer: [`Router`], [`Server`], [`Request`], [`Response`]
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ticketd::{Server, api, store::MemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ticketd::Error> {
//!     let app = api::router(Arc::new(MemoryStore::new()));
//!     Server::bind("127.0.0.1:3000".parse().unwrap()).serve(app).await
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod api;
pub mod config;
pub mod health;
pub mod store;
pub mod ticket;

pub use config::Config;
pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use request::Request;
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
