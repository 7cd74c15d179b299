//! Rollout of a registered workload spec

pub mod controller;
pub mod diagnostics;
pub mod direct;
pub mod events;
pub mod fsm;
pub mod strategy;
