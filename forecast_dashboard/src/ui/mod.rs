pub mod app;
pub mod charts;
pub mod tables;
