// Application layer: squad selection use case and input/output mapping

pub mod mappers;
pub mod squad_optimizer;

pub use mappers::{Cell, SquadRequest};
pub use squad_optimizer::{SquadError, SquadModel, SquadOptimizer};
