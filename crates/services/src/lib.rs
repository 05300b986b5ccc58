pub mod evaluation;
pub mod questions;
pub mod records;
pub mod scoring;
pub mod session;
pub mod upload;
