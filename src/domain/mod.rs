// Domain layer: records, diagnostics and the ports the pipelines plug into.

pub mod model;
pub mod ports;
