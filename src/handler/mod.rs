// src/handler/mod.rs
//! Request handling for upload and delete.

mod request;
mod sync;

pub use request::{HandlerResponse, InboundRequest, Operation, ResponseBody};
pub use sync::PostSync;
