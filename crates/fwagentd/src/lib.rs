//! fwagentd library: the firmware update/rollback engine and the daemon
//! plumbing around it (HTTP surface, media discovery, power control).

pub mod media;
pub mod power;
pub mod routes;
pub mod server;
pub mod update;
