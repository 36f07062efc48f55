use chrono::NaiveDate;

use super::basic::{project, s19};
use crate::products::{HeatRejection, Infrastructure, RejectionCurve};
use crate::project::{Project, ProjectError, TempProfile};
use crate::schedule::generate_block_schedule;
use crate::types::BlockSchedule;

fn schedule() -> BlockSchedule {
    generate_block_schedule(NaiveDate::from_ymd_opt(2009, 1, 3).unwrap(), 0).unwrap()
}

#[test]
fn test_implement_resolves_per_period_utilization() {
    let schedule = schedule();
    let project = project();
    let instance = project.implement(&schedule).unwrap();

    assert_eq!(instance.utilization.len(), schedule.len());
    assert!(instance.utilization.iter().all(|u| (0.0..=1.0).contains(u)));
    assert_eq!(instance.quantity, 300.0);
    assert!((instance.capital_cost - project.capital_cost()).abs() < 1e-9);
}

#[test]
fn test_hot_ambient_derates_the_fleet() {
    let schedule = schedule();
    let mut cool = project();
    let mut hot = project();
    cool.target_ambient_temp = TempProfile::Single(60.0);
    hot.target_ambient_temp = TempProfile::Single(115.0);

    let cool_instance = cool.implement(&schedule).unwrap();
    let hot_instance = hot.implement(&schedule).unwrap();

    assert_eq!(cool_instance.utilization[0], 1.0);
    assert!(hot_instance.utilization[0] < 1.0);
    assert!(hot_instance.utilization[0] > 0.0);
}

#[test]
fn test_extreme_heat_shuts_the_fleet_down() {
    let schedule = schedule();
    let mut project = Project::new("Furnace", 1_000_000.0, TempProfile::Single(400.0), 1.0, 0.05);
    project.add_rig(s19(), 10.0);
    project.add_infra(
        Infrastructure::HeatRejection(HeatRejection {
            name: "Dry Cooler".to_string(),
            capacity: 250_000.0,
            pue: 1.02,
            price: 90_000.0,
            curve: RejectionCurve::new(-1000.0, 330_000.0),
            design_dry_bulb: 95.0,
        }),
        1.0,
    );

    let instance = project.implement(&schedule).unwrap();
    assert!(instance.utilization.iter().all(|u| *u == 0.0));
}

#[test]
fn test_no_infrastructure_means_full_utilization() {
    let schedule = schedule();
    let mut project = Project::new("Bare", 1_000_000.0, TempProfile::Single(95.0), 1.0, 0.05);
    project.add_rig(s19(), 10.0);

    let instance = project.implement(&schedule).unwrap();
    assert!(instance.utilization.iter().all(|u| *u == 1.0));
    assert_eq!(instance.pue, 1.0);
}

#[test]
fn test_hourly_profile_is_forward_filled() {
    let schedule = schedule();
    let mut profile = vec![70.0; 8760];
    // The schedule starts January 3, hour-of-year 48. Heat up its second
    // hour far enough to choke the dry cooler.
    profile[49] = 320.0;
    let mut project = project();
    project.target_ambient_temp = TempProfile::HourOfYear(profile);

    let instance = project.implement(&schedule).unwrap();
    // Schedule starts at midnight: periods 0-5 are hour 0, periods 6-11 hour 1.
    assert_eq!(instance.utilization[0], 1.0);
    assert!(instance.utilization[6] < 1.0);
    assert_eq!(instance.utilization[6], instance.utilization[11]);
    assert_eq!(instance.utilization[12], 1.0);
}

#[test]
fn test_bad_profile_length_is_rejected() {
    let schedule = schedule();
    let mut project = project();
    project.target_ambient_temp = TempProfile::HourOfYear(vec![70.0; 24]);
    assert!(matches!(
        project.implement(&schedule),
        Err(ProjectError::InvalidTempProfile(24))
    ));
}
