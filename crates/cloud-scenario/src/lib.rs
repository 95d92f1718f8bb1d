#![doc = include_str!("../readme.md")]

pub mod batch;
pub mod core;
pub mod engine;
pub mod report;
pub mod simulation;
