// Domain layer: firewall rule model and the ports the sync engine talks to.
// No HTTP or runtime types here beyond serde.

pub mod model;
pub mod ports;
