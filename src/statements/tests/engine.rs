use super::common::{
    environment, instance, BITCOIN_PRICE, FEES_PER_BLOCK, NETWORK_HASH_RATE_WIRE,
};
use crate::statements::{
    base_statement_set, derived_statement_set, environment_statement, income_statement, rows,
    StatementKind,
};
use crate::summary;
use crate::types::constants::{HASHES_PER_DIFFICULTY, HASH_RATE_WIRE_TO_HS};
use crate::types::Frequency;

fn close(a: f64, b: f64) {
    assert!(
        (a - b).abs() <= 1e-9 * b.abs().max(1.0),
        "{} != {}",
        a,
        b
    );
}

#[test]
fn test_environment_statement_derives_network_quantities() {
    let env = environment();
    let statement = environment_statement(&env);

    assert_eq!(statement.kind, StatementKind::Environment);
    assert_eq!(statement.frequency, Frequency::TenMinute);
    assert_eq!(statement.columns.len(), env.schedule.len());
    assert_eq!(statement.columns[0], "2009-01-03 00:00");

    let network = statement.values(rows::NETWORK_HASH_RATE).unwrap();
    close(network[0], NETWORK_HASH_RATE_WIRE * HASH_RATE_WIRE_TO_HS);

    let difficulty = statement.values(rows::DIFFICULTY).unwrap();
    close(
        difficulty[0],
        NETWORK_HASH_RATE_WIRE * HASH_RATE_WIRE_TO_HS * 600.0 / HASHES_PER_DIFFICULTY,
    );

    // Epoch 0 pays the full subsidy; the reward adds fees on top.
    let subsidy = statement.values(rows::BLOCK_SUBSIDY).unwrap();
    assert!(subsidy.iter().all(|v| *v == 50.0));
    let reward = statement.values(rows::BLOCK_REWARD).unwrap();
    close(reward[0], 50.0 + FEES_PER_BLOCK);
}

#[test]
fn test_income_statement_first_period() {
    let env = environment();
    let inst = instance(&env);
    let statement = income_statement(&env, &inst).unwrap();

    assert_eq!(statement.frequency, Frequency::TenMinute);
    assert_eq!(statement.columns.len(), env.schedule.len());

    let share = inst.hash_rate / (NETWORK_HASH_RATE_WIRE * HASH_RATE_WIRE_TO_HS);
    close(statement.values(rows::HASH_SHARE).unwrap()[0], share);
    close(statement.values(rows::HASH_RATE).unwrap()[0], inst.hash_rate);
    assert_eq!(statement.values(rows::NUMBER_OF_RIGS).unwrap()[0], 300.0);

    let btc = share * (50.0 + FEES_PER_BLOCK);
    close(statement.values(rows::BTC_EARNED).unwrap()[0], btc);
    let pool = btc * inst.pool_fees;
    close(statement.values(rows::POOL_FEES).unwrap()[0], pool);
    let revenue = (btc - pool) * BITCOIN_PRICE;
    close(statement.values(rows::GROSS_REVENUE).unwrap()[0], revenue);

    // 10 minutes of facility power at the energy price.
    let power = inst.power_draw * inst.pue / 1000.0 / 6.0 * inst.energy_price;
    close(statement.values(rows::POWER_COST).unwrap()[0], power);

    // January 2009 has 31 days of 144 periods.
    let opex = inst.opex / (31.0 * 144.0);
    close(statement.values(rows::OPEX).unwrap()[0], opex);
    let property_tax = inst.property_taxes / (31.0 * 144.0);
    close(statement.values(rows::PROPERTY_TAXES).unwrap()[0], property_tax);

    let profit = revenue - power - opex - property_tax;
    close(statement.values(rows::GROSS_PROFIT).unwrap()[0], profit);
    let tax = 0.21 * profit;
    close(statement.values(rows::TAXES).unwrap()[0], tax);
    close(statement.values(rows::NET_INCOME).unwrap()[0], profit - tax);
}

#[test]
fn test_losses_are_not_taxed() {
    let env = environment();
    let mut project = super::common::project();
    // Price the power so high every period loses money.
    project.energy_price = 1_000.0;
    let inst = project.implement(&env.schedule).unwrap();
    let statement = income_statement(&env, &inst).unwrap();

    let profit = statement.values(rows::GROSS_PROFIT).unwrap();
    let taxes = statement.values(rows::TAXES).unwrap();
    assert!(profit[0] < 0.0);
    assert!(taxes.iter().all(|v| *v == 0.0));
}

#[test]
fn test_base_set_carries_monthly_roi_and_summary() {
    let env = environment();
    let inst = instance(&env);
    let set = base_statement_set(&env, &inst).unwrap();

    assert_eq!(set.frequency, Frequency::TenMinute);
    assert_eq!(set.env.frequency, Frequency::TenMinute);
    assert_eq!(set.income.frequency, Frequency::TenMinute);
    assert_eq!(set.roi.frequency, Frequency::Monthly);

    // Capital goes out in the first month and the fleet earns it back.
    let capex = set.roi.values(rows::CAPITAL_EXPENDITURE).unwrap();
    close(capex[0], inst.capital_cost);
    assert!(capex[1..].iter().all(|v| *v == 0.0));

    let cumulative = set.roi.values(rows::CUMULATIVE_CASH_FLOW).unwrap();
    assert!(cumulative[0] < cumulative[cumulative.len() - 1]);

    let payback = set.roi.values(rows::PAYBACK).unwrap();
    assert_eq!(payback[0], 0.0, "capex should not pay back immediately");
    assert_eq!(*payback.last().unwrap(), 1.0, "fleet should eventually pay back");

    assert!(set.summary.get(summary::PAYBACK_PERIOD_MONTHS).unwrap() >= 1.0);
    assert!(set.summary.get(summary::TOTAL_REVENUE).unwrap() > 0.0);
}

#[test]
fn test_roi_cumulates_monthly_net_income() {
    let env = environment();
    let inst = instance(&env);
    let set = base_statement_set(&env, &inst).unwrap();

    let net = set.roi.values(rows::NET_INCOME).unwrap();
    let cumulative = set.roi.values(rows::CUMULATIVE_CASH_FLOW).unwrap();
    let roi = set.roi.values(rows::ROI).unwrap();

    let mut running = 0.0;
    for i in 0..net.len() {
        running += net[i];
        if i == 0 {
            running -= inst.capital_cost;
        }
        close(cumulative[i], running);
        close(roi[i], running / inst.capital_cost);
    }
}

#[test]
fn test_derived_sets_resample_and_keep_roi_floor() {
    let env = environment();
    let inst = instance(&env);
    let base = base_statement_set(&env, &inst).unwrap();

    let hourly = derived_statement_set(&base, Frequency::Hourly).unwrap();
    assert_eq!(hourly.frequency, Frequency::Hourly);
    assert_eq!(hourly.env.frequency, Frequency::Hourly);
    assert_eq!(hourly.income.frequency, Frequency::Hourly);
    // ROI cannot go below monthly; hourly sets carry it unchanged.
    assert_eq!(hourly.roi, base.roi);
    assert_eq!(hourly.summary, base.summary);

    let quarterly = derived_statement_set(&base, Frequency::Quarterly).unwrap();
    assert_eq!(quarterly.roi.frequency, Frequency::Quarterly);

    // Revenue is a flow: annual buckets must preserve the total.
    let annual = derived_statement_set(&base, Frequency::Annual).unwrap();
    let base_total: f64 = base.income.values(rows::GROSS_REVENUE).unwrap().iter().sum();
    let annual_total: f64 = annual.income.values(rows::GROSS_REVENUE).unwrap().iter().sum();
    close(annual_total, base_total);
}
