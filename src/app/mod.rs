//! Application module

pub mod cli;
pub mod pipeline;
pub mod startup;
