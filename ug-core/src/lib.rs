pub mod calculations;
pub mod models;
pub mod validation;

pub use calculations::{calculate_liquidity, generate_bwa};
pub use models::*;
pub use validation::PlanValidationError;
