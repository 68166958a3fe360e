// Domain layer: TODO models and the ports the action talks through.

pub mod model;
pub mod ports;
