//! Machine config distribution to lab agents.
//!
//! Each agent is tried against an ordered list of transports; the first
//! transport that delivers wins.

pub mod distributor;
pub mod pusher;

pub use distributor::{AgentFilter, ConfigDistributor};
pub use pusher::{ConfigPusher, HttpAgentPusher};
