//! Reduces a statement set to scalar profitability metrics for
//! cross-project comparison.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::project::ProjectInstance;
use crate::statements::{rows, Statement, StatementError};

#[cfg(test)]
mod tests;

pub const TOTAL_BTC_EARNED: &str = "Total BTC Earned";
pub const TOTAL_REVENUE: &str = "Total Revenue";
pub const TOTAL_POWER_COST: &str = "Total Power Cost";
pub const TOTAL_OPERATING_COST: &str = "Total Operating Cost";
pub const NET_INCOME: &str = "Net Income";
pub const CAPITAL_EXPENDITURE: &str = "Capital Expenditure";
pub const PAYBACK_PERIOD_MONTHS: &str = "Payback Period (Months)";
pub const RETURN_ON_INVESTMENT: &str = "Return on Investment";
pub const ANNUALIZED_ROI: &str = "Annualized ROI";
pub const BREAK_EVEN_ENERGY_PRICE: &str = "Break-even Energy Price";

/// Scalar metrics of one project under one environment. Values are always
/// finite: NaN and infinities normalize to 0 on the way in, so downstream
/// consumers never see an undefined metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfitabilitySummary {
    metrics: BTreeMap<String, f64>,
}

impl ProfitabilitySummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a metric, normalizing non-finite values to 0.
    pub fn set(&mut self, name: &str, value: f64) {
        let value = if value.is_finite() { value } else { 0.0 };
        self.metrics.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.metrics.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Computes the profitability summary from the base income statement, the
/// monthly ROI statement and the implemented project. Pure function of its
/// inputs.
pub fn summarize(
    income: &Statement,
    roi: &Statement,
    instance: &ProjectInstance,
) -> Result<ProfitabilitySummary, StatementError> {
    let total = |name: &str| -> Result<f64, StatementError> {
        Ok(income.values(name)?.iter().sum())
    };

    let total_revenue = total(rows::GROSS_REVENUE)?;
    let total_power = total(rows::POWER_COST)?;
    let total_opex = total(rows::OPEX)?;
    let total_property_taxes = total(rows::PROPERTY_TAXES)?;
    let total_taxes = total(rows::TAXES)?;
    let net_income = total(rows::NET_INCOME)?;

    let cumulative = roi.values(rows::CUMULATIVE_CASH_FLOW)?;
    let payback_months = cumulative
        .iter()
        .position(|v| *v >= 0.0)
        .map(|i| (i + 1) as f64)
        .unwrap_or(f64::NAN);

    let roi_total = roi
        .values(rows::ROI)?
        .last()
        .copied()
        .unwrap_or(f64::NAN);
    let horizon_months = roi.columns.len() as f64;
    let annualized = (1.0 + roi_total).powf(12.0 / horizon_months) - 1.0;

    let break_even = instance.energy_price * (total_revenue - total_opex - total_property_taxes)
        / total_power;

    let mut summary = ProfitabilitySummary::new();
    summary.set(TOTAL_BTC_EARNED, total(rows::BTC_EARNED)?);
    summary.set(TOTAL_REVENUE, total_revenue);
    summary.set(TOTAL_POWER_COST, total_power);
    summary.set(
        TOTAL_OPERATING_COST,
        total_power + total_opex + total_property_taxes + total_taxes,
    );
    summary.set(NET_INCOME, net_income);
    summary.set(CAPITAL_EXPENDITURE, instance.capital_cost);
    summary.set(PAYBACK_PERIOD_MONTHS, payback_months);
    summary.set(RETURN_ON_INVESTMENT, roi_total);
    summary.set(ANNUALIZED_ROI, annualized);
    summary.set(BREAK_EVEN_ENERGY_PRICE, break_even);

    Ok(summary)
}

/// Tabulates summaries across projects: metric name -> project name -> value.
pub fn compare<'a, I>(entries: I) -> BTreeMap<String, BTreeMap<String, f64>>
where
    I: IntoIterator<Item = (&'a str, &'a ProfitabilitySummary)>,
{
    let mut table: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
    for (project, summary) in entries {
        for (metric, value) in summary.iter() {
            table
                .entry(metric.to_string())
                .or_default()
                .insert(project.to_string(), value);
        }
    }
    table
}
