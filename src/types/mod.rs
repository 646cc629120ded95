pub mod errors;
pub mod holder;
pub mod platform;
pub mod pool;
pub mod project;
pub mod relation;
pub mod store;
pub mod strategy;
