// Domain layer: entities, the resource wrapper, wire records and ports (interfaces).

pub mod model;
pub mod ports;
pub mod record;
pub mod resource;
