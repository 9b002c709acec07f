// libs/billing-cell/src/services/mod.rs
pub mod billing;
pub mod clients;
