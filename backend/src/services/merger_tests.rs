use super::*;
use crate::models::StopReason;

fn pi() -> ProgramIncrement {
    ProgramIncrement::new("26_04").unwrap()
}

fn probe() -> ProbeSummary {
    ProbeSummary {
        probed: 3,
        stop_reason: StopReason::Exhausted,
        detail: None,
    }
}

fn planned(entries: &[(&str, &str, u64)]) -> PlannedWork {
    let mut planned = PlannedWork::default();
    for (member, iteration, seconds) in entries {
        planned.add(member, iteration, *seconds);
    }
    planned
}

fn baseline(entries: &[(&str, &str, u64)]) -> BaselineCapacity {
    let mut baseline = BaselineCapacity {
        source: "PI_CAPA_2026_04.xlsx".into(),
        ..Default::default()
    };
    for (member, iteration, seconds) in entries {
        if !baseline.members.iter().any(|m| m == member) {
            baseline.members.push(member.to_string());
        }
        baseline
            .capacity
            .entry(member.to_string())
            .or_default()
            .insert(iteration.to_string(), *seconds);
    }
    baseline
}

#[test]
fn test_bands_against_declared_baseline() {
    let planned = planned(&[
        ("Ada", "26_04_01", 28_800),
        ("Bob", "26_04_01", 30_500),
        ("Cy", "26_04_01", 29_500),
    ]);
    let baseline = baseline(&[
        ("Ada", "26_04_01", 28_800),
        ("Bob", "26_04_01", 28_800),
        ("Cy", "26_04_01", 28_800),
    ]);

    let report = merge_capacity(&pi(), &planned, Some(baseline), probe());

    let band = |name: &str| report.member(name).unwrap().allocation["26_04_01"].band;
    assert_eq!(band("Ada"), CapacityBand::Normal);
    assert_eq!(band("Bob"), CapacityBand::Red);
    assert_eq!(band("Cy"), CapacityBand::Yellow);

    let ada = &report.member("Ada").unwrap().allocation["26_04_01"];
    assert_eq!(ada.ratio, 1.0);
    assert!(!ada.defaulted);
}

#[test]
fn test_missing_baseline_pair_gets_default() {
    let planned = planned(&[("Ada", "26_04_01", 3600), ("Ada", "26_04_02", 3600)]);
    let baseline = baseline(&[("Ada", "26_04_01", 28_800)]);

    let report = merge_capacity(&pi(), &planned, Some(baseline), probe());
    let ada = report.member("Ada").unwrap();

    assert_eq!(ada.allocation["26_04_01"].baseline, 28_800);
    assert_eq!(ada.allocation["26_04_02"].baseline, 288_000);
    assert!(ada.allocation["26_04_02"].defaulted);
}

#[test]
fn test_no_spreadsheet_keeps_every_planned_pair() {
    let planned = planned(&[
        ("Zoe", "26_04_02", 100),
        ("Ada", "26_04_01", 200),
        ("Ada", "26_04_02", 300),
    ]);

    let report = merge_capacity(&pi(), &planned, None, probe());

    assert!(report.baseline_capacity.is_none());
    let names: Vec<&str> = report.members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Ada", "Zoe"]);
    assert_eq!(report.iterations, vec!["26_04_01", "26_04_02"]);

    let cells: usize = report.members.iter().map(|m| m.allocation.len()).sum();
    assert_eq!(cells, 3);
    assert!(report
        .members
        .iter()
        .flat_map(|m| m.allocation.values())
        .all(|c| c.baseline == DEFAULT_BASELINE_SECONDS && c.defaulted));
}

#[test]
fn test_zero_baseline() {
    let cell = allocation_cell(60, Some(0));
    assert_eq!(cell.band, CapacityBand::Red);
    assert_eq!(cell.ratio, 0.0);

    let idle = allocation_cell(0, Some(0));
    assert_eq!(idle.band, CapacityBand::Normal);
}

#[test]
fn test_capacity_map_carries_planned_seconds() {
    let planned = planned(&[("Ada", "26_04_01", 12_345)]);
    let report = merge_capacity(&pi(), &planned, None, probe());
    assert_eq!(report.member("Ada").unwrap().capacity["26_04_01"], 12_345);
}

#[test]
fn test_baseline_only_members_stay_in_baseline_block() {
    let planned = planned(&[("Ada", "26_04_01", 100)]);
    let baseline = baseline(&[("Ada", "26_04_01", 100), ("Eve", "26_04_01", 100)]);

    let report = merge_capacity(&pi(), &planned, Some(baseline), probe());

    assert_eq!(report.members.len(), 1);
    assert_eq!(
        report.baseline_capacity.as_ref().unwrap().members,
        vec!["Ada", "Eve"]
    );
}

#[test]
fn test_report_json_shape() {
    let planned = planned(&[("Ada", "26_04_01", 28_800)]);
    let baseline = baseline(&[("Ada", "26_04_01", 28_800)]);
    let report = merge_capacity(&pi(), &planned, Some(baseline), probe());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["pi"], "26_04");
    assert_eq!(json["iterations"][0], "26_04_01");
    assert_eq!(json["members"][0]["name"], "Ada");
    assert_eq!(json["members"][0]["capacity"]["26_04_01"], 28_800);
    assert_eq!(json["members"][0]["allocation"]["26_04_01"]["band"], "normal");
    assert_eq!(json["baselineCapacity"]["capacity"]["Ada"]["26_04_01"], 28_800);
    assert_eq!(json["probe"]["stopReason"], "exhausted");

    let without = merge_capacity(&pi(), &planned, None, probe());
    assert!(serde_json::to_value(&without).unwrap()["baselineCapacity"].is_null());
}
