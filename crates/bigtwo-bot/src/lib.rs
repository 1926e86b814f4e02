pub mod agent;
pub mod policy;

pub use agent::CpuAgent;
pub use policy::{GreedyPolicy, Policy, PolicyContext};
