use serde::Serialize;
use thiserror::Error;

/// Share of positive leftover cash flow that is saved on top of forced savings.
pub const DISCRETIONARY_SAVINGS_RATE: f64 = 0.10;

/// Annual yield used to turn an asset balance into a passive income estimate.
pub const PASSIVE_INCOME_YIELD: f64 = 0.04;

/// Monthly living cost applied uniformly across every strategy preset.
pub const DEFAULT_MONTHLY_LIVING_COST: f64 = 20_000.0;

pub const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationParameters {
    pub horizon_years: u32,
    pub starting_monthly_salary: f64,
    pub monthly_living_cost: f64,
    /// "Shadow rent": paid every month straight into the investment account.
    pub monthly_forced_savings: f64,
    /// Spent on capability growth; consumed, never invested.
    pub monthly_skill_investment: f64,
    pub annual_investment_return_rate: f64,
    pub annual_salary_growth_rate: f64,
}

impl SimulationParameters {
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.horizon_years == 0 {
            return Err(ParameterError::NonPositiveHorizon);
        }

        for (field, value) in [
            ("starting_monthly_salary", self.starting_monthly_salary),
            ("monthly_living_cost", self.monthly_living_cost),
            ("monthly_forced_savings", self.monthly_forced_savings),
            ("monthly_skill_investment", self.monthly_skill_investment),
        ] {
            if !value.is_finite() {
                return Err(ParameterError::NonFiniteValue { field });
            }
            if value < 0.0 {
                return Err(ParameterError::NegativeAmount { field, value });
            }
        }

        for (field, rate) in [
            (
                "annual_investment_return_rate",
                self.annual_investment_return_rate,
            ),
            ("annual_salary_growth_rate", self.annual_salary_growth_rate),
        ] {
            if !rate.is_finite() {
                return Err(ParameterError::NonFiniteValue { field });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("horizon must be at least one year")]
    NonPositiveHorizon,
    #[error("{field} must be >= 0, got {value}")]
    NegativeAmount { field: &'static str, value: f64 },
    #[error("{field} must be a finite number")]
    NonFiniteValue { field: &'static str },
    #[error("age {current_age} plus {horizon_years} years does not fit in a u32")]
    AgeOverflow {
        current_age: u32,
        horizon_years: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// End-of-year balance, excluding any savings held before the run.
    pub asset_path: Vec<f64>,
    /// Monthly salary in effect during each year.
    pub salary_path: Vec<f64>,
    /// Monthly passive income implied by each year's balance.
    pub passive_income_path: Vec<f64>,
}

impl SimulationResult {
    pub(crate) fn with_capacity(years: usize) -> Self {
        Self {
            asset_path: Vec::with_capacity(years),
            salary_path: Vec::with_capacity(years),
            passive_income_path: Vec::with_capacity(years),
        }
    }

    pub fn len(&self) -> usize {
        self.asset_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.asset_path.is_empty()
    }

    pub fn final_assets(&self) -> Option<f64> {
        self.asset_path.last().copied()
    }

    pub fn final_salary(&self) -> Option<f64> {
        self.salary_path.last().copied()
    }

    pub fn final_passive_income(&self) -> Option<f64> {
        self.passive_income_path.last().copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearBreakdown {
    pub year: u32,
    pub monthly_salary: f64,
    pub annual_income: f64,
    pub annual_living_cost: f64,
    pub annual_skill_cost: f64,
    pub annual_forced_savings: f64,
    /// May be negative; a shortfall is never drawn from assets.
    pub disposable: f64,
    pub extra_savings: f64,
    pub annual_contribution: f64,
    pub end_assets: f64,
    pub monthly_passive_income: f64,
}

/// Where the user stands today, as collected by the CLI or the HTTP payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdProfile {
    pub current_age: u32,
    pub monthly_salary: f64,
    pub current_savings: f64,
    pub horizon_years: u32,
    /// Market rent for comparable housing; used as the shadow-rent amount.
    pub market_rent: f64,
    pub monthly_living_cost: f64,
}

impl HouseholdProfile {
    /// Checks the fields the engine never sees; the rest is validated through
    /// [`SimulationParameters::validate`].
    pub fn validate(&self) -> Result<(), ParameterError> {
        let field = "current_savings";
        if !self.current_savings.is_finite() {
            return Err(ParameterError::NonFiniteValue { field });
        }
        if self.current_savings < 0.0 {
            return Err(ParameterError::NegativeAmount {
                field,
                value: self.current_savings,
            });
        }
        self.final_age().map(|_| ())
    }

    pub fn final_age(&self) -> Result<u32, ParameterError> {
        self.current_age
            .checked_add(self.horizon_years)
            .ok_or(ParameterError::AgeOverflow {
                current_age: self.current_age,
                horizon_years: self.horizon_years,
            })
    }
}

/// The four levers a strategy preset pins down for a given market rent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyLevers {
    pub monthly_forced_savings: f64,
    pub monthly_skill_investment: f64,
    pub annual_investment_return_rate: f64,
    pub annual_salary_growth_rate: f64,
}
