pub mod notifications;
pub mod service;
