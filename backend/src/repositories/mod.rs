//! Persistence layer: repository structs wrapping the connection pool.

pub mod user_repository;
