// Domain layer: content and routing models plus the ports the adapters implement.

pub mod model;
pub mod ports;
