// Domain layer: models, ports (interfaces) and the advertisement policies.
// Nothing in here knows about HTTP or the concrete store.

pub mod model;
pub mod policy;
pub mod ports;
