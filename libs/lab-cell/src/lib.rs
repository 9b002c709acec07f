// libs/lab-cell/src/lib.rs
pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use router::*;
