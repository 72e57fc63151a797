pub mod ai;
pub mod cards;
pub mod config;
pub mod stats;
pub mod task;
pub mod timer;
