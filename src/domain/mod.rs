// Domain layer: recipe entities, presentation services and ports. No I/O here.

pub mod model;
pub mod ports;
pub mod services;
