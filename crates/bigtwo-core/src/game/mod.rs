pub mod agent;
pub mod engine;
pub mod interactive;
pub mod observer;
pub mod rendezvous;
pub mod serialization;
pub mod state;
