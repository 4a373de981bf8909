pub mod classifier;
pub mod clock;
pub mod code;
pub mod repository;
pub mod types;
