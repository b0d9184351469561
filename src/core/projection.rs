use serde::Serialize;

use super::engine::{monthly_passive_income, run_simulation};
use super::presets::StrategyMode;
use super::types::{HouseholdProfile, ParameterError, SimulationParameters, SimulationResult};

/// One strategy's trajectory with the user's existing savings folded back in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub mode: StrategyMode,
    pub parameters: SimulationParameters,
    pub result: SimulationResult,
    /// Asset path plus current savings. Savings are added flat, not compounded.
    pub total_wealth_path: Vec<f64>,
    pub final_age: u32,
    pub final_total_wealth: f64,
    pub final_monthly_passive_income: f64,
    pub final_monthly_salary: f64,
    /// `None` when the starting salary is zero.
    pub salary_growth_percent: Option<f64>,
}

pub fn project(
    profile: &HouseholdProfile,
    mode: StrategyMode,
) -> Result<Projection, ParameterError> {
    profile.validate()?;
    let final_age = profile.final_age()?;
    let parameters = mode.parameters(profile);
    let result = run_simulation(&parameters)?;

    let total_wealth_path = result
        .asset_path
        .iter()
        .map(|assets| assets + profile.current_savings)
        .collect::<Vec<_>>();

    // horizon >= 1 was checked by run_simulation, so the paths are non-empty
    let final_total_wealth = total_wealth_path
        .last()
        .copied()
        .unwrap_or(profile.current_savings);
    let final_monthly_passive_income = result.final_passive_income().unwrap_or(0.0)
        + monthly_passive_income(profile.current_savings);
    let final_monthly_salary = result.final_salary().unwrap_or(profile.monthly_salary);
    let salary_growth_percent = (profile.monthly_salary > 0.0)
        .then(|| (final_monthly_salary / profile.monthly_salary - 1.0) * 100.0);

    Ok(Projection {
        mode,
        parameters,
        result,
        total_wealth_path,
        final_age,
        final_total_wealth,
        final_monthly_passive_income,
        final_monthly_salary,
        salary_growth_percent,
    })
}

pub fn compare_modes(profile: &HouseholdProfile) -> Result<Vec<Projection>, ParameterError> {
    StrategyMode::ALL
        .iter()
        .map(|mode| project(profile, *mode))
        .collect()
}
