// Domain layer: LP model types, squad types and the solver contract
pub mod domain;

// Application layer: squad selection use case
pub mod application;

// Configuration loaded from TOML
pub mod config;

// Solver adapters: Concrete implementations of SolverService
pub mod solver;

// Re-export commonly used types
pub use domain::{
    Candidate, Position, PositionQuotas, RosterEntry, SolutionStatus, SolverBackend,
    SolverConfig, SolverError, SolverService, SquadResult, SquadRules, SquadStatistics,
};

pub use application::{Cell, SquadError, SquadOptimizer, SquadRequest};

pub use config::{ConfigError, OptimizerConfig};

#[cfg(feature = "coin_cbc")]
pub use solver::CoinCbcSolver;
#[cfg(feature = "highs")]
pub use solver::HighsSolver;
pub use solver::SolverFactory;
