pub mod effective_rate;
pub mod pricing;
pub mod schedule;
pub mod simulation;
