mod common;
mod online;

pub use online::run_online;
