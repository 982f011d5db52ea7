//! HTTP request handlers for the RAOB tool service.

pub mod health;
pub mod tools;
