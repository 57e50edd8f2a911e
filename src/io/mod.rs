/// CSV persistence for run artifacts.
pub mod export;
