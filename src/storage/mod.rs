pub mod cache;
#[cfg(test)]
pub mod memory;
pub mod persistent;
