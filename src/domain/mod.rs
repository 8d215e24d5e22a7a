// Domain layer: calendar value types and ports (interfaces). No algorithms here.

pub mod model;
pub mod ports;
