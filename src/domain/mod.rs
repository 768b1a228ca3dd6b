// Domain layer: records handled by the stores and the ports they are built around.

pub mod model;
pub mod ports;
