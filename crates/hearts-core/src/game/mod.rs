pub mod config;
pub mod report;
pub mod shared;
pub mod state;
