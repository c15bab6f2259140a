//! Daemon internals for the `ledcoord` binary: the coordinator worker loop
//! and the unix-socket IPC server. Split out as a library so the end-to-end
//! tests can drive a real daemon (real socket, real threads) with a mock
//! panel.

pub mod coordinator;
pub mod server;
