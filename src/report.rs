use std::fmt::Write;

use crate::core::{HouseholdProfile, Projection, YearBreakdown};

/// Whole currency units with thousands separators. Fractions are truncated
/// toward zero, so `1999.99` renders as `$1,999`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return format!("${value}");
    }

    let truncated = value.trunc();
    let digits = format!("{:.0}", truncated.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if truncated < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:+.1}%"),
        None => "n/a".to_string(),
    }
}

pub fn render_report(
    profile: &HouseholdProfile,
    selected: &Projection,
    trace: &[YearBreakdown],
    comparison: &[Projection],
) -> String {
    let mut out = String::new();
    render_summary(&mut out, selected);
    out.push('\n');
    render_yearly_table(&mut out, profile, trace);
    out.push('\n');
    render_comparison(&mut out, comparison);
    out.push('\n');
    render_action_plan(&mut out, profile.market_rent);
    out
}

fn render_summary(out: &mut String, projection: &Projection) {
    let mode = projection.mode;
    let _ = writeln!(out, "Mode {}: {}", mode.letter(), mode.label());
    let _ = writeln!(out, "  {}", mode.description());
    out.push('\n');
    let _ = writeln!(
        out,
        "Total assets at age {:<4} {:>16}",
        projection.final_age,
        format_currency(projection.final_total_wealth)
    );
    let _ = writeln!(
        out,
        "Monthly passive income   {:>16}",
        format_currency(projection.final_monthly_passive_income)
    );
    let _ = writeln!(
        out,
        "Projected monthly salary {:>16}  ({} vs today)",
        format_currency(projection.final_monthly_salary),
        format_percent(projection.salary_growth_percent)
    );
}

fn render_yearly_table(out: &mut String, profile: &HouseholdProfile, trace: &[YearBreakdown]) {
    let _ = writeln!(
        out,
        "{:>4} {:>4} {:>12} {:>14} {:>14} {:>16} {:>12}",
        "Year", "Age", "Salary/mo", "Leftover/yr", "Invested/yr", "Total assets", "Passive/mo"
    );
    for row in trace {
        let _ = writeln!(
            out,
            "{:>4} {:>4} {:>12} {:>14} {:>14} {:>16} {:>12}",
            row.year,
            profile.current_age.saturating_add(row.year),
            format_currency(row.monthly_salary),
            format_currency(row.disposable),
            format_currency(row.annual_contribution),
            format_currency(row.end_assets + profile.current_savings),
            format_currency(row.monthly_passive_income),
        );
    }
}

fn render_comparison(out: &mut String, comparison: &[Projection]) {
    let _ = writeln!(out, "All modes, total assets at the end of the horizon:");
    for projection in comparison {
        let _ = writeln!(
            out,
            "  {} {:<40} {:>16}  passive {:>10}/mo",
            projection.mode.letter(),
            projection.mode.label(),
            format_currency(projection.final_total_wealth),
            format_currency(projection.final_monthly_passive_income),
        );
    }
}

/// The three steps of the shadow-rent action plan, with the transfer amount
/// already filled in.
pub fn action_plan_steps(monthly_transfer: f64) -> [String; 3] {
    [
        "Open two accounts: one for salary and living costs, one brokerage account for shadow rent."
            .to_string(),
        format!(
            "Schedule an automatic transfer of {} to the brokerage account on payday.",
            format_currency(monthly_transfer)
        ),
        "Never withdraw from the brokerage account; treat the money as rent that is gone."
            .to_string(),
    ]
}

fn render_action_plan(out: &mut String, monthly_transfer: f64) {
    let _ = writeln!(out, "Action plan");
    for (idx, step) in action_plan_steps(monthly_transfer).iter().enumerate() {
        let _ = writeln!(out, "  {}. {step}", idx + 1);
    }
}
