pub mod book;
pub mod cli;
pub mod config;
pub mod mongo;
pub mod query;
pub mod report;
pub mod runner;
pub mod seed;
pub mod step;
