// libs/consultation-cell/src/services/mod.rs
pub mod consultation;
pub mod lab_client;
