//! Builds the three statements at the base 10-minute resolution and derives
//! coarser-frequency sets from them.

use crate::forecast::Environment;
use crate::project::ProjectInstance;
use crate::resample::{days_in_month, resample};
use crate::schedule::block_subsidy;
use crate::summary;
use crate::types::constants::{HASH_RATE_WIRE_TO_HS, HASHES_PER_DIFFICULTY, PERIODS_PER_HOUR};
use crate::types::Frequency;
use crate::utils::logging;

use chrono::Datelike;

use super::{rows, Aggregation, Statement, StatementError, StatementKind, StatementSet};

/// Derived network quantities per period. The hash-rate forecast arrives in
/// M TH/s and is converted to H/s here, before any downstream math.
pub fn environment_statement(environment: &Environment) -> Statement {
    let schedule = environment.schedule.as_ref();
    let forecast = &environment.forecast;
    let n = schedule.len();

    let columns = schedule
        .periods()
        .iter()
        .map(|p| Frequency::TenMinute.format_label(p.timestamp))
        .collect();

    let mut difficulty = Vec::with_capacity(n);
    let mut subsidy = Vec::with_capacity(n);
    let mut reward = Vec::with_capacity(n);
    let mut network_hash_rate = Vec::with_capacity(n);
    for (i, period) in schedule.periods().iter().enumerate() {
        let hash_rate = forecast.hash_rate.values[i] * HASH_RATE_WIRE_TO_HS;
        network_hash_rate.push(hash_rate);
        difficulty.push(hash_rate * 600.0 / HASHES_PER_DIFFICULTY);
        subsidy.push(block_subsidy(period.epoch));
        reward.push(block_subsidy(period.epoch) + forecast.fees.values[i]);
    }

    let mut statement = Statement::new(StatementKind::Environment, Frequency::TenMinute, columns);
    statement.push_row(rows::BITCOIN_PRICE, Aggregation::Mean, forecast.price.values.clone());
    statement.push_row(rows::TRANSACTION_FEES, Aggregation::Sum, forecast.fees.values.clone());
    statement.push_row(rows::NETWORK_HASH_RATE, Aggregation::Mean, network_hash_rate);
    statement.push_row(rows::DIFFICULTY, Aggregation::Mean, difficulty);
    statement.push_row(rows::BLOCK_SUBSIDY, Aggregation::Sum, subsidy);
    statement.push_row(rows::BLOCK_REWARD, Aggregation::Sum, reward);
    statement
}

/// Revenue, costs and margins per period.
pub fn income_statement(
    environment: &Environment,
    instance: &ProjectInstance,
) -> Result<Statement, StatementError> {
    let schedule = environment.schedule.as_ref();
    let forecast = &environment.forecast;
    let n = schedule.len();
    if instance.utilization.len() != n {
        return Err(StatementError::Misaligned {
            len: instance.utilization.len(),
            expected: n,
        });
    }

    let columns = schedule
        .periods()
        .iter()
        .map(|p| Frequency::TenMinute.format_label(p.timestamp))
        .collect();

    let mut number_of_rigs = Vec::with_capacity(n);
    let mut hash_rate = Vec::with_capacity(n);
    let mut hash_share = Vec::with_capacity(n);
    let mut btc_earned = Vec::with_capacity(n);
    let mut pool_fees = Vec::with_capacity(n);
    let mut net_btc = Vec::with_capacity(n);
    let mut gross_revenue = Vec::with_capacity(n);
    let mut power_cost = Vec::with_capacity(n);
    let mut opex = Vec::with_capacity(n);
    let mut property_taxes = Vec::with_capacity(n);
    let mut gross_profit = Vec::with_capacity(n);
    let mut taxes = Vec::with_capacity(n);
    let mut net_income = Vec::with_capacity(n);

    for (i, period) in schedule.periods().iter().enumerate() {
        let utilization = instance.utilization[i];
        let network = forecast.hash_rate.values[i] * HASH_RATE_WIRE_TO_HS;
        let fleet = instance.hash_rate * utilization;
        let share = if network > 0.0 { fleet / network } else { 0.0 };

        let reward = block_subsidy(period.epoch) + forecast.fees.values[i];
        let btc = share * reward;
        let pool = btc * instance.pool_fees;
        let net = btc - pool;
        let revenue = net * forecast.price.values[i];

        // Facility energy for one 10-minute period, in kWh.
        let energy =
            instance.power_draw * instance.pue * utilization / 1000.0 / PERIODS_PER_HOUR as f64;
        let power = energy * instance.energy_price;

        // Monthly fixed costs spread evenly over the month's periods.
        let periods_in_month =
            days_in_month(period.timestamp.year(), period.timestamp.month()) * 144.0;
        let opex_share = instance.opex / periods_in_month;
        let property_tax_share = instance.property_taxes / periods_in_month;

        let profit = revenue - power - opex_share - property_tax_share;
        let tax = instance.tax_rate * profit.max(0.0);

        number_of_rigs.push(instance.quantity);
        hash_rate.push(fleet);
        hash_share.push(share);
        btc_earned.push(btc);
        pool_fees.push(pool);
        net_btc.push(net);
        gross_revenue.push(revenue);
        power_cost.push(power);
        opex.push(opex_share);
        property_taxes.push(property_tax_share);
        gross_profit.push(profit);
        taxes.push(tax);
        net_income.push(profit - tax);
    }

    let mut statement = Statement::new(StatementKind::Income, Frequency::TenMinute, columns);
    statement.push_row(rows::NUMBER_OF_RIGS, Aggregation::Last, number_of_rigs);
    statement.push_row(rows::HASH_RATE, Aggregation::Mean, hash_rate);
    statement.push_row(rows::HASH_SHARE, Aggregation::Mean, hash_share);
    statement.push_row(rows::BTC_EARNED, Aggregation::Sum, btc_earned);
    statement.push_row(rows::POOL_FEES, Aggregation::Sum, pool_fees);
    statement.push_row(rows::NET_BTC_EARNED, Aggregation::Sum, net_btc);
    statement.push_row(rows::GROSS_REVENUE, Aggregation::Sum, gross_revenue);
    statement.push_row(rows::POWER_COST, Aggregation::Sum, power_cost);
    statement.push_row(rows::OPEX, Aggregation::Sum, opex);
    statement.push_row(rows::PROPERTY_TAXES, Aggregation::Sum, property_taxes);
    statement.push_row(rows::GROSS_PROFIT, Aggregation::Sum, gross_profit);
    statement.push_row(rows::TAXES, Aggregation::Sum, taxes);
    statement.push_row(rows::NET_INCOME, Aggregation::Sum, net_income);
    Ok(statement)
}

/// Cumulative return and payback tracking. Only defined at monthly or
/// coarser granularity; finer frequencies are rejected outright.
pub fn roi_statement(
    income: &Statement,
    instance: &ProjectInstance,
    frequency: Frequency,
) -> Result<Statement, StatementError> {
    if frequency.is_finer_than(Frequency::Monthly) {
        return Err(StatementError::UnsupportedFrequency {
            requested: frequency,
            minimum: Frequency::Monthly,
        });
    }

    let income = resample(income, frequency)?;
    let net_income = income.values(rows::NET_INCOME)?;
    let n = net_income.len();

    // All capital is deployed in the first bucket.
    let mut capex = vec![0.0; n];
    if n > 0 {
        capex[0] = instance.capital_cost;
    }

    let mut cumulative = Vec::with_capacity(n);
    let mut roi = Vec::with_capacity(n);
    let mut payback = Vec::with_capacity(n);
    let mut running = 0.0;
    for i in 0..n {
        running += net_income[i] - capex[i];
        cumulative.push(running);
        roi.push(if instance.capital_cost > 0.0 {
            running / instance.capital_cost
        } else {
            0.0
        });
        payback.push(if running >= 0.0 { 1.0 } else { 0.0 });
    }

    let mut statement = Statement::new(StatementKind::Roi, frequency, income.columns.clone());
    statement.push_row(rows::CAPITAL_EXPENDITURE, Aggregation::Sum, capex);
    statement.push_row(rows::NET_INCOME, Aggregation::Sum, net_income.to_vec());
    statement.push_row(rows::CUMULATIVE_CASH_FLOW, Aggregation::Last, cumulative);
    statement.push_row(rows::ROI, Aggregation::Last, roi);
    statement.push_row(rows::PAYBACK, Aggregation::Last, payback);
    Ok(statement)
}

/// Computes the full base (10-minute) statement set for a key: environment
/// and income statements at block resolution, ROI at its monthly floor, and
/// the profitability summary.
pub fn base_statement_set(
    environment: &Environment,
    instance: &ProjectInstance,
) -> Result<StatementSet, StatementError> {
    logging::log(
        "STATEMENTS",
        &format!(
            "Computing base statements for '{}' on '{}' ({} periods)",
            instance.name,
            environment.name,
            environment.schedule.len()
        ),
    );

    let env = environment_statement(environment);
    let income = income_statement(environment, instance)?;
    let roi = roi_statement(&income, instance, Frequency::Monthly)?;
    let summary = summary::summarize(&income, &roi, instance)?;

    Ok(StatementSet {
        environment: environment.name.clone(),
        project: instance.name.clone(),
        frequency: Frequency::TenMinute,
        env,
        income,
        roi,
        summary,
    })
}

/// Derives a coarser-frequency set from the base set by resampling. The ROI
/// statement never goes below its monthly floor: for hourly and daily sets
/// it is carried at monthly granularity unchanged.
pub fn derived_statement_set(
    base: &StatementSet,
    frequency: Frequency,
) -> Result<StatementSet, StatementError> {
    let env = resample(&base.env, frequency)?;
    let income = resample(&base.income, frequency)?;
    let roi = if frequency.is_finer_than(Frequency::Monthly) {
        base.roi.clone()
    } else {
        resample(&base.roi, frequency)?
    };

    Ok(StatementSet {
        environment: base.environment.clone(),
        project: base.project.clone(),
        frequency,
        env,
        income,
        roi,
        summary: base.summary.clone(),
    })
}
