// Allow dead code for items that are part of the public API but only used in tests
#![allow(dead_code)]

pub mod db;
pub mod error;
pub mod extract;
pub mod query;
pub mod render;
pub mod schema;
