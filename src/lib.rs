pub mod allocator;
pub mod config;
pub mod data;
pub mod error;
pub mod grid;
pub mod ranking;
pub mod scheduler;
pub mod search;
pub mod server;
pub mod store;
