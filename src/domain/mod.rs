// Domain layer: recommendation model, view states and ports. No HTTP or CLI here.

pub mod model;
pub mod ports;
