pub mod redis;
pub mod store;
