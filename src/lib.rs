pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod review;
pub mod routes;
pub mod storage;
pub mod templates_structs;
