#![forbid(unsafe_code)]

pub mod catalog;
pub mod json;
pub mod repository;
