// Domain module: Business logic and models

pub mod models;
pub mod solver_service;
pub mod squad;
pub mod value_objects;

pub use models::*;
pub use solver_service::*;
pub use squad::*;
pub use value_objects::*;
