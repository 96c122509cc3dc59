pub mod config;
pub mod controller;
pub mod filters;
pub mod format;
pub mod pagination;
pub mod platform;
pub mod qc;
pub mod refresh;
pub mod sequence;
pub mod surface;
pub mod timing;
