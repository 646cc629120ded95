pub mod augmenter;
pub mod cascade;
pub mod holder_migrator;
pub mod profit;
pub mod resolver;
