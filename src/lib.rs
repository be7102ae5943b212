pub mod allocator;
pub mod config;
pub mod db;
pub mod environment;
pub mod errors;
pub mod log;
pub mod routes;
pub mod talker;
pub mod token;
pub mod validation;
