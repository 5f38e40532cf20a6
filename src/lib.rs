pub mod assertions;
pub mod config;
pub mod env;
pub mod extract;
pub mod http;
pub mod report;
pub mod runner;
pub mod suites;
