pub mod assignment;
pub mod directory;
