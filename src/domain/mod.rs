// Domain layer: records, postal codes, statuses and the ports the pipeline talks through.

pub mod model;
pub mod ports;
