use serde::Serialize;

use super::types::{HouseholdProfile, SimulationParameters, StrategyLevers};

const SKILL_BUILDER_MONTHLY_SPEND: f64 = 5_000.0;
const BALANCED_MONTHLY_SKILL_SPEND: f64 = 3_000.0;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyMode {
    /// Mode A: no shadow rent, no skill spend, cash sits in a bank account.
    Comfort,
    /// Mode B: market rent is "paid" into an index fund every month.
    ShadowLandlord,
    /// Mode C: spend on courses and certificates instead of investing.
    SkillBuilder,
    /// Mode D: shadow rent plus a modest skill budget.
    #[default]
    Balanced,
}

impl StrategyMode {
    pub const ALL: [StrategyMode; 4] = [
        StrategyMode::Comfort,
        StrategyMode::ShadowLandlord,
        StrategyMode::SkillBuilder,
        StrategyMode::Balanced,
    ];

    pub fn key(self) -> &'static str {
        match self {
            StrategyMode::Comfort => "comfort",
            StrategyMode::ShadowLandlord => "shadow-landlord",
            StrategyMode::SkillBuilder => "skill-builder",
            StrategyMode::Balanced => "balanced",
        }
    }

    pub fn letter(self) -> char {
        match self {
            StrategyMode::Comfort => 'A',
            StrategyMode::ShadowLandlord => 'B',
            StrategyMode::SkillBuilder => 'C',
            StrategyMode::Balanced => 'D',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StrategyMode::Comfort => "Easy comfort (status quo)",
            StrategyMode::ShadowLandlord => "Shadow landlord (forced rent savings)",
            StrategyMode::SkillBuilder => "Skill builder (invest in yourself)",
            StrategyMode::Balanced => "Balanced mix (recommended)",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            StrategyMode::Comfort => {
                "Live rent-free and spend freely. Comfortable, but assets build very slowly."
            }
            StrategyMode::ShadowLandlord => {
                "Pretend to pay market rent and invest it instead. Assets grow fast, but the salary ceiling stays low."
            }
            StrategyMode::SkillBuilder => {
                "Put money into your own skills and certificates. Few assets early on, strong income growth later."
            }
            StrategyMode::Balanced => {
                "Run shadow rent and a moderate skill budget together, balancing risk and growth."
            }
        }
    }

    pub fn levers(self, market_rent: f64) -> StrategyLevers {
        match self {
            StrategyMode::Comfort => StrategyLevers {
                monthly_forced_savings: 0.0,
                monthly_skill_investment: 0.0,
                annual_investment_return_rate: 0.01,
                annual_salary_growth_rate: 0.01,
            },
            StrategyMode::ShadowLandlord => StrategyLevers {
                monthly_forced_savings: market_rent,
                monthly_skill_investment: 0.0,
                annual_investment_return_rate: 0.06,
                annual_salary_growth_rate: 0.015,
            },
            StrategyMode::SkillBuilder => StrategyLevers {
                monthly_forced_savings: 0.0,
                monthly_skill_investment: SKILL_BUILDER_MONTHLY_SPEND,
                annual_investment_return_rate: 0.03,
                annual_salary_growth_rate: 0.05,
            },
            StrategyMode::Balanced => StrategyLevers {
                monthly_forced_savings: market_rent,
                monthly_skill_investment: BALANCED_MONTHLY_SKILL_SPEND,
                annual_investment_return_rate: 0.06,
                annual_salary_growth_rate: 0.035,
            },
        }
    }

    pub fn parameters(self, profile: &HouseholdProfile) -> SimulationParameters {
        let levers = self.levers(profile.market_rent);
        SimulationParameters {
            horizon_years: profile.horizon_years,
            starting_monthly_salary: profile.monthly_salary,
            monthly_living_cost: profile.monthly_living_cost,
            monthly_forced_savings: levers.monthly_forced_savings,
            monthly_skill_investment: levers.monthly_skill_investment,
            annual_investment_return_rate: levers.annual_investment_return_rate,
            annual_salary_growth_rate: levers.annual_salary_growth_rate,
        }
    }
}
