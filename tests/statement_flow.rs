//! End-to-end flow: schedule -> forecasts -> project -> statements at every
//! frequency, through the same stores the task layer uses.

use chrono::NaiveDate;

use hashplan::forecast::{ForecastModel, ForecastParams};
use hashplan::products::{Cooling, HeatRejection, Infrastructure, RejectionCurve, Rig};
use hashplan::project::{Project, TempProfile};
use hashplan::statements::rows;
use hashplan::store::{EnvironmentParams, EnvironmentStore, ScheduleStore, StatementStore};
use hashplan::types::Frequency;

fn project() -> Project {
    let mut project = Project::new(
        "Permian Basin",
        2_000_000.0,
        TempProfile::Single(80.0),
        1.0,
        0.045,
    );
    project.pool_fees = 0.02;
    project.tax_rate = 0.21;
    project.opex = 30_000.0;
    project.property_taxes = 8_000.0;
    project.add_rig(
        Rig {
            make: "Bitmain".to_string(),
            model: "S19".to_string(),
            generation: Some("XP".to_string()),
            manufacturer: "Bitmain".to_string(),
            hash_rate: 140.0,
            power: 3010.0,
            buffer: 0.05,
            price: 4000.0,
        },
        500.0,
    );
    project.add_infra(
        Infrastructure::Cooling(Cooling {
            name: "Immersion Tank".to_string(),
            capacity: 400_000.0,
            pue: 1.05,
            price: 60_000.0,
            number_of_rigs: None,
        }),
        4.0,
    );
    project.add_infra(
        Infrastructure::HeatRejection(HeatRejection {
            name: "Dry Cooler".to_string(),
            capacity: 250_000.0,
            pue: 1.02,
            price: 90_000.0,
            curve: RejectionCurve::new(-1000.0, 330_000.0),
            design_dry_bulb: 95.0,
        }),
        7.0,
    );
    project
}

fn environment_params() -> EnvironmentParams {
    EnvironmentParams {
        name: "Drawdown".to_string(),
        price: ForecastParams {
            model: ForecastModel::Gbm,
            initial: 30_000.0,
            mean: 0.0,
            volatility: 0.0005,
            seed: 7,
        },
        fees: ForecastParams::constant(0.1),
        hash_rate: ForecastParams {
            model: ForecastModel::Cgr,
            initial: 200.0,
            mean: 0.000001,
            volatility: 0.0,
            seed: 0,
        },
    }
}

#[test]
fn test_full_pipeline_across_frequencies() {
    let schedules = ScheduleStore::new();
    let environments = EnvironmentStore::new();
    let statements = StatementStore::new();

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let (schedule, _) = schedules.get_or_create(start, 4).unwrap();
    let params = environment_params();
    let (environment, _) = environments.get_or_create(schedule.clone(), &params).unwrap();
    let environment_id = EnvironmentStore::fingerprint(&schedule, &params);

    let project = project();
    let (base, created) = statements
        .get_or_create_base(environment_id, &environment, &project)
        .unwrap();
    assert!(created);

    // Three statements, aligned to the schedule, ROI at its monthly floor.
    assert_eq!(base.env.columns.len(), schedule.len());
    assert_eq!(base.income.columns.len(), schedule.len());
    assert_eq!(base.roi.frequency, Frequency::Monthly);

    for frequency in Frequency::DERIVED {
        let (derived, _) = statements
            .get_or_create_derived(environment_id, &project, frequency)
            .unwrap();
        assert_eq!(derived.frequency, frequency);
        assert_eq!(derived.summary, base.summary);

        // Flows survive resampling; a year of BTC at any frequency adds up
        // to the same total as the base statement.
        let base_total: f64 = base.income.values(rows::BTC_EARNED).unwrap().iter().sum();
        let derived_total: f64 = derived
            .income
            .values(rows::BTC_EARNED)
            .unwrap()
            .iter()
            .sum();
        assert!(
            (base_total - derived_total).abs() < 1e-9 * base_total,
            "{}: {} != {}",
            frequency,
            derived_total,
            base_total
        );
    }
}

#[test]
fn test_global_stores_share_process_state() {
    let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let (first, created) = hashplan::store::schedules().get_or_create(start, 4).unwrap();
    let (second, cached) = hashplan::store::schedules().get_or_create(start, 4).unwrap();

    assert!(created);
    assert!(!cached);
    assert!(std::sync::Arc::ptr_eq(&first, &second));
}
