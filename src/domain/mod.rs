// Domain layer: table/document models and ports. No network or file access here.

pub mod model;
pub mod ports;
