// Domain layer: backend DTOs and the ports the session layer depends on.

pub mod model;
pub mod ports;
