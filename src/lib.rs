pub mod audit;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod envfile;
pub mod errors;
pub mod model;
pub mod ratelimit;
pub mod store;
pub mod sync;
