use super::types::{
    DISCRETIONARY_SAVINGS_RATE, MONTHS_PER_YEAR, PASSIVE_INCOME_YIELD, ParameterError,
    SimulationParameters, SimulationResult, YearBreakdown,
};

#[derive(Debug, Clone, Copy)]
struct RunningState {
    assets: f64,
    monthly_salary: f64,
}

impl RunningState {
    fn new(params: &SimulationParameters) -> Self {
        Self {
            assets: 0.0,
            monthly_salary: params.starting_monthly_salary,
        }
    }
}

/// Projects asset balance, salary and passive income year by year.
///
/// Callers are expected to have validated `params`; use [`run_simulation`]
/// when the input comes from outside the crate.
pub fn simulate(params: &SimulationParameters) -> SimulationResult {
    let years = params.horizon_years as usize;
    let mut result = SimulationResult::with_capacity(years);
    let mut state = RunningState::new(params);

    for year in 1..=params.horizon_years {
        let step = advance_year(params, &mut state, year);
        result.salary_path.push(step.monthly_salary);
        result.asset_path.push(step.end_assets);
        result.passive_income_path.push(step.monthly_passive_income);
    }

    result
}

pub fn run_simulation(params: &SimulationParameters) -> Result<SimulationResult, ParameterError> {
    params.validate()?;
    Ok(simulate(params))
}

pub fn run_yearly_cashflow_trace(params: &SimulationParameters) -> Vec<YearBreakdown> {
    let mut state = RunningState::new(params);
    (1..=params.horizon_years)
        .map(|year| advance_year(params, &mut state, year))
        .collect()
}

fn advance_year(
    params: &SimulationParameters,
    state: &mut RunningState,
    year: u32,
) -> YearBreakdown {
    // Growth lands before the year's cash flow is split.
    state.monthly_salary *= 1.0 + params.annual_salary_growth_rate;

    let annual_income = state.monthly_salary * MONTHS_PER_YEAR;
    let annual_living_cost = params.monthly_living_cost * MONTHS_PER_YEAR;
    let annual_skill_cost = params.monthly_skill_investment * MONTHS_PER_YEAR;
    let annual_forced_savings = params.monthly_forced_savings * MONTHS_PER_YEAR;

    let committed = annual_living_cost + annual_skill_cost + annual_forced_savings;
    let disposable = annual_income - committed;
    let extra_savings = discretionary_savings(disposable);
    let annual_contribution = annual_forced_savings + extra_savings;

    let growth = 1.0 + params.annual_investment_return_rate;
    state.assets = state.assets * growth + annual_contribution;

    YearBreakdown {
        year,
        monthly_salary: state.monthly_salary,
        annual_income,
        annual_living_cost,
        annual_skill_cost,
        annual_forced_savings,
        disposable,
        extra_savings,
        annual_contribution,
        end_assets: state.assets,
        monthly_passive_income: monthly_passive_income(state.assets),
    }
}

fn discretionary_savings(disposable: f64) -> f64 {
    if disposable > 0.0 {
        disposable * DISCRETIONARY_SAVINGS_RATE
    } else {
        0.0
    }
}

pub fn monthly_passive_income(balance: f64) -> f64 {
    (balance * PASSIVE_INCOME_YIELD) / MONTHS_PER_YEAR
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{any, prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_relative(actual: f64, expected: f64, rel: f64) {
        let tol = rel * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn zero_params(horizon_years: u32) -> SimulationParameters {
        SimulationParameters {
            horizon_years,
            starting_monthly_salary: 0.0,
            monthly_living_cost: 0.0,
            monthly_forced_savings: 0.0,
            monthly_skill_investment: 0.0,
            annual_investment_return_rate: 0.0,
            annual_salary_growth_rate: 0.0,
        }
    }

    fn sample_params() -> SimulationParameters {
        SimulationParameters {
            horizon_years: 15,
            starting_monthly_salary: 55_000.0,
            monthly_living_cost: 20_000.0,
            monthly_forced_savings: 15_000.0,
            monthly_skill_investment: 3_000.0,
            annual_investment_return_rate: 0.06,
            annual_salary_growth_rate: 0.035,
        }
    }

    #[test]
    fn zero_inputs_yield_all_zero_paths() {
        let result = simulate(&zero_params(5));
        assert_eq!(result.asset_path, vec![0.0; 5]);
        assert_eq!(result.salary_path, vec![0.0; 5]);
        assert_eq!(result.passive_income_path, vec![0.0; 5]);
    }

    #[test]
    fn forced_savings_plus_ten_percent_of_leftover() {
        let params = SimulationParameters {
            horizon_years: 1,
            starting_monthly_salary: 50_000.0,
            monthly_living_cost: 20_000.0,
            monthly_forced_savings: 15_000.0,
            ..zero_params(1)
        };

        let trace = run_yearly_cashflow_trace(&params);
        assert_approx(trace[0].disposable, 180_000.0);
        assert_approx(trace[0].extra_savings, 18_000.0);

        let result = simulate(&params);
        assert_eq!(result.len(), 1);
        assert_approx(result.asset_path[0], 198_000.0);
        assert_approx(result.passive_income_path[0], 198_000.0 * 0.04 / 12.0);
    }

    #[test]
    fn salary_grows_before_cash_flow_is_split() {
        let params = SimulationParameters {
            horizon_years: 2,
            starting_monthly_salary: 50_000.0,
            monthly_living_cost: 20_000.0,
            annual_salary_growth_rate: 0.10,
            ..zero_params(2)
        };

        let result = simulate(&params);
        assert_approx(result.salary_path[0], 55_000.0);
        assert_approx(result.salary_path[1], 60_500.0);
        // (55_000 * 12 - 240_000) * 0.1, then (60_500 * 12 - 240_000) * 0.1 on top
        assert_approx(result.asset_path[0], 42_000.0);
        assert_approx(result.asset_path[1], 90_600.0);
    }

    #[test]
    fn balance_compounds_before_contribution_is_added() {
        let params = SimulationParameters {
            horizon_years: 3,
            monthly_forced_savings: 1_000.0,
            annual_investment_return_rate: 0.10,
            ..zero_params(3)
        };

        let result = simulate(&params);
        assert_approx(result.asset_path[0], 12_000.0);
        assert_approx(result.asset_path[1], 12_000.0 * 1.1 + 12_000.0);
        assert_approx(result.asset_path[2], (12_000.0 * 1.1 + 12_000.0) * 1.1 + 12_000.0);
    }

    #[test]
    fn shortfall_contributes_only_forced_savings() {
        let params = SimulationParameters {
            horizon_years: 4,
            starting_monthly_salary: 10_000.0,
            monthly_living_cost: 20_000.0,
            monthly_forced_savings: 2_000.0,
            monthly_skill_investment: 5_000.0,
            ..zero_params(4)
        };

        for row in run_yearly_cashflow_trace(&params) {
            assert!(row.disposable < 0.0);
            assert_eq!(row.extra_savings, 0.0);
            assert_eq!(row.annual_contribution, row.annual_forced_savings);
        }
        assert_approx(simulate(&params).asset_path[3], 4.0 * 24_000.0);
    }

    #[test]
    fn negative_rates_shrink_without_panicking() {
        let params = SimulationParameters {
            horizon_years: 30,
            starting_monthly_salary: 40_000.0,
            monthly_living_cost: 20_000.0,
            monthly_forced_savings: 5_000.0,
            annual_investment_return_rate: -0.5,
            annual_salary_growth_rate: -0.2,
            ..zero_params(30)
        };

        let result = simulate(&params);
        assert_eq!(result.len(), 30);
        assert!(result.salary_path.windows(2).all(|w| w[1] < w[0]));
        assert!(result.asset_path.iter().all(|v| v.is_finite() && *v >= 0.0));
    }

    #[test]
    fn trace_agrees_with_simulate() {
        let params = sample_params();
        let result = simulate(&params);
        let trace = run_yearly_cashflow_trace(&params);

        assert_eq!(trace.len(), result.len());
        for (idx, row) in trace.iter().enumerate() {
            assert_eq!(row.year, idx as u32 + 1);
            assert_eq!(row.monthly_salary, result.salary_path[idx]);
            assert_eq!(row.end_assets, result.asset_path[idx]);
            assert_eq!(row.monthly_passive_income, result.passive_income_path[idx]);
            assert_approx(
                row.annual_contribution,
                row.annual_forced_savings + row.extra_savings,
            );
        }
    }

    #[test]
    fn final_accessors_report_last_year() {
        let result = simulate(&sample_params());
        assert_eq!(result.final_assets(), result.asset_path.last().copied());
        assert_eq!(result.final_salary(), result.salary_path.last().copied());
        assert_eq!(
            result.final_passive_income(),
            result.passive_income_path.last().copied()
        );
        assert!(!result.is_empty());
    }

    #[test]
    fn run_simulation_rejects_zero_horizon() {
        let err = run_simulation(&zero_params(0)).expect_err("zero horizon must fail");
        assert_eq!(err, ParameterError::NonPositiveHorizon);
    }

    #[test]
    fn run_simulation_rejects_negative_amounts() {
        let mut params = sample_params();
        params.monthly_skill_investment = -1.0;
        let err = run_simulation(&params).expect_err("negative spend must fail");
        assert_eq!(
            err,
            ParameterError::NegativeAmount {
                field: "monthly_skill_investment",
                value: -1.0,
            }
        );
        assert!(err.to_string().contains("monthly_skill_investment"));
    }

    #[test]
    fn run_simulation_rejects_non_finite_rates() {
        let mut params = sample_params();
        params.annual_investment_return_rate = f64::NAN;
        let err = run_simulation(&params).expect_err("NaN rate must fail");
        assert_eq!(
            err,
            ParameterError::NonFiniteValue {
                field: "annual_investment_return_rate",
            }
        );
    }

    #[test]
    fn run_simulation_accepts_negative_rates() {
        let mut params = sample_params();
        params.annual_investment_return_rate = -0.05;
        params.annual_salary_growth_rate = -0.01;
        let result = run_simulation(&params).expect("negative rates are valid");
        assert_eq!(result, simulate(&params));
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_paths_share_horizon_length_and_passive_identity(
            horizon in 1u32..60,
            salary in 0u32..300_000,
            living in 0u32..100_000,
            forced in 0u32..50_000,
            skill in 0u32..20_000,
            return_bp in -5_000i32..3_000,
            growth_bp in -5_000i32..3_000
        ) {
            let params = SimulationParameters {
                horizon_years: horizon,
                starting_monthly_salary: salary as f64,
                monthly_living_cost: living as f64,
                monthly_forced_savings: forced as f64,
                monthly_skill_investment: skill as f64,
                annual_investment_return_rate: return_bp as f64 / 10_000.0,
                annual_salary_growth_rate: growth_bp as f64 / 10_000.0,
            };

            let result = simulate(&params);
            prop_assert_eq!(result.asset_path.len(), horizon as usize);
            prop_assert_eq!(result.salary_path.len(), horizon as usize);
            prop_assert_eq!(result.passive_income_path.len(), horizon as usize);

            for (asset, passive) in result.asset_path.iter().zip(&result.passive_income_path) {
                prop_assert_eq!(*passive, (*asset * PASSIVE_INCOME_YIELD) / 12.0);
            }
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_assets_never_decrease_with_non_negative_return(
            horizon in 1u32..50,
            salary in 0u32..300_000,
            living in 0u32..100_000,
            forced in 0u32..50_000,
            skill in 0u32..20_000,
            return_bp in 0u32..2_000,
            growth_bp in -2_000i32..2_000
        ) {
            let params = SimulationParameters {
                horizon_years: horizon,
                starting_monthly_salary: salary as f64,
                monthly_living_cost: living as f64,
                monthly_forced_savings: forced as f64,
                monthly_skill_investment: skill as f64,
                annual_investment_return_rate: return_bp as f64 / 10_000.0,
                annual_salary_growth_rate: growth_bp as f64 / 10_000.0,
            };

            let result = simulate(&params);
            prop_assert!(result.asset_path[0] >= 0.0);
            for pair in result.asset_path.windows(2) {
                prop_assert!(pair[1] >= pair[0], "assets fell from {} to {}", pair[0], pair[1]);
            }
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_salary_compounds_from_starting_salary(
            horizon in 1u32..40,
            salary in 0u32..300_000,
            growth_bp in -3_000i32..3_000
        ) {
            let growth = growth_bp as f64 / 10_000.0;
            let params = SimulationParameters {
                horizon_years: horizon,
                starting_monthly_salary: salary as f64,
                annual_salary_growth_rate: growth,
                ..zero_params(horizon)
            };

            let result = simulate(&params);
            for (idx, actual) in result.salary_path.iter().enumerate() {
                let expected = salary as f64 * (1.0 + growth).powi(idx as i32 + 1);
                assert_relative(*actual, expected, 1e-9);
            }
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(32))]

        #[test]
        fn prop_identical_inputs_give_identical_outputs(
            horizon in 1u32..40,
            salary in 0u32..300_000,
            forced in 0u32..50_000,
            return_bits in any::<u16>(),
            growth_bits in any::<u16>()
        ) {
            let params = SimulationParameters {
                horizon_years: horizon,
                starting_monthly_salary: salary as f64,
                monthly_living_cost: 20_000.0,
                monthly_forced_savings: forced as f64,
                monthly_skill_investment: 1_000.0,
                annual_investment_return_rate: return_bits as f64 / 200_000.0,
                annual_salary_growth_rate: growth_bits as f64 / 200_000.0,
            };

            prop_assert_eq!(simulate(&params), simulate(&params));
            prop_assert_eq!(
                run_yearly_cashflow_trace(&params),
                run_yearly_cashflow_trace(&params)
            );
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_shortfall_years_add_exactly_forced_savings(
            horizon in 1u32..30,
            salary in 0u32..20_000,
            forced in 0u32..10_000,
            skill in 0u32..10_000
        ) {
            let params = SimulationParameters {
                horizon_years: horizon,
                starting_monthly_salary: salary as f64,
                monthly_living_cost: 40_000.0,
                monthly_forced_savings: forced as f64,
                monthly_skill_investment: skill as f64,
                ..zero_params(horizon)
            };

            for row in run_yearly_cashflow_trace(&params) {
                if row.disposable < 0.0 {
                    prop_assert_eq!(row.extra_savings, 0.0);
                    prop_assert_eq!(row.annual_contribution, row.annual_forced_savings);
                }
            }
        }
    }
}
