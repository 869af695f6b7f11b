// Library for tests to access modules

pub mod cloudwatch_repo;
pub mod config;
pub mod error;
pub mod handler;
pub mod mode;
pub mod models;
pub mod orchestrator;
pub mod pipeline;
pub mod reducer;
pub mod version;
