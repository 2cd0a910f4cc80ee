pub mod engine;
pub mod wrap;
