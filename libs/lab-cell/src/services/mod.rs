// libs/lab-cell/src/services/mod.rs
pub mod catalog;
pub mod orders;
