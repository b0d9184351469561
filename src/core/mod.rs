mod engine;
mod presets;
mod projection;
mod types;

pub use engine::{monthly_passive_income, run_simulation, run_yearly_cashflow_trace, simulate};
pub use presets::StrategyMode;
pub use projection::{Projection, compare_modes, project};
pub use types::{
    DEFAULT_MONTHLY_LIVING_COST, DISCRETIONARY_SAVINGS_RATE, HouseholdProfile, PASSIVE_INCOME_YIELD,
    ParameterError, SimulationParameters, SimulationResult, StrategyLevers, YearBreakdown,
};
