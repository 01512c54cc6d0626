pub mod packages;
pub mod remove;
pub mod scan;
