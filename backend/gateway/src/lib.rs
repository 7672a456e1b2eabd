//! linestash gateway
//!
//! The webhook dispatcher, per-kind reply handlers and the HTTP server that
//! fronts them.

pub mod dispatcher;
pub mod handlers;
pub mod model;
pub mod replies;
pub mod server;

#[cfg(test)]
mod testing;

pub use dispatcher::{Dispatcher, DispatcherDeps, WebhookRequest, WebhookResponse};
pub use model::EchoModel;
pub use server::{router, start_server};
