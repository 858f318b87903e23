use std::fs;
use std::path::Path;

use chrono::TimeDelta;
use menu_rater::aggregate::AggregateOptions;
use menu_rater::config::ReportConfig;
use menu_rater::error::ReportError;
use menu_rater::output::write_report;
use menu_rater::report::{Report, build_report};
use menu_rater::stats::WeekTally;

#[test]
fn test_full_pipeline() {
    let report = fixture_report(AggregateOptions::default());

    let numbers: Vec<_> = report.items.iter().map(|i| i.number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 5]);
    assert_eq!(
        report.stats.keys().collect::<Vec<_>>(),
        vec!["Alice", "Bob Smith"]
    );

    let alice = &report.stats["Alice"];
    assert!(alice.has_date);
    assert_eq!(alice.max_per_week, 2);
    assert_eq!(alice.longest, TimeDelta::days(9));
    assert_eq!(alice.longest_after.as_deref(), Some("Fried Rice"));
    assert_eq!(alice.weekdays, vec![0, 0, 0, 0, 2, 0, 1]);
    // The undated rating still counts towards the denominator
    assert_eq!(alice.weekday_ratios.iter().sum::<f64>(), 75.0);
    assert_eq!(alice.rating_ratios.iter().sum::<f64>(), 100.0);
}

#[test]
fn test_later_rating_replaces_earlier() {
    let report = fixture_report(AggregateOptions::default());

    let spring_rolls = &report.items[1];
    assert_eq!(spring_rolls.ratings["Bob Smith"].value, 2.0);
    assert_eq!(spring_rolls.ratings["Alice"].value, 8.0);

    // Both of Bob's Spring Rolls ratings still count in his histogram
    assert_eq!(report.stats["Bob Smith"].ratings, vec![0, 0, 1, 1, 1, 1]);
}

#[test]
fn test_final_week_tally() {
    let report = fixture_report(AggregateOptions::default());
    assert_eq!(report.stats["Bob Smith"].max_per_week, 1);

    let report = fixture_report(AggregateOptions {
        week_tally: WeekTally::FlushFinal,
    });
    assert_eq!(report.stats["Bob Smith"].max_per_week, 4);
}

#[test]
fn test_rendered_report() {
    let report = fixture_report(AggregateOptions::default());
    let mut out = Vec::new();
    write_report(&report, &mut out).unwrap();
    let html = String::from_utf8(out).unwrap();

    assert!(html.contains("<h3>#5: Mapo Tofu</h3>"));
    assert!(html.contains(r#"<img src="img/05.jpg""#));
    assert!(html.contains("<li>Alice: 6/10</li>"));
    assert!(html.contains("<li>Bob Smith: 2/5 on Wed Jan 7 2015</li>"));
    assert!(html.contains("Longest time between YYLs: 9 days after Fried Rice"));
    assert!(html.contains("Longest time between YYLs: 1 days after Spring Rolls"));
}

#[test]
fn test_rerun_is_identical() {
    let first = fixture_report(AggregateOptions::default());
    let second = fixture_report(AggregateOptions::default());

    assert_eq!(first.stats, second.stats);
    assert_eq!(render(&first), render(&second));
}

#[test]
fn test_malformed_menu_produces_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let menu = dir.path().join("menu.csv");
    fs::write(&menu, "number,name\n1,Wonton Soup,extra\n").unwrap();

    let config = ReportConfig::new(&menu, fixtures().join("ratings"));
    let mut out = Vec::new();
    let result =
        build_report(&config, AggregateOptions::default()).map(|r| write_report(&r, &mut out));

    assert!(matches!(
        result,
        Err(ReportError::MalformedRecord {
            expected: 2,
            found: 3,
            ..
        })
    ));
    assert!(out.is_empty());
}

#[test]
fn test_bad_date_in_any_series_fails_run() {
    let dir = tempfile::tempdir().unwrap();
    let ratings = dir.path().join("ratings");
    fs::create_dir(&ratings).unwrap();
    fs::copy(
        fixtures().join("ratings/alice.csv"),
        ratings.join("alice.csv"),
    )
    .unwrap();
    fs::write(ratings.join("zed.csv"), "item,date,rating,max\n1,2015-01-01,7,10\n").unwrap();

    let config = ReportConfig::new(fixtures().join("menu.csv"), &ratings);
    let err = build_report(&config, AggregateOptions::default()).unwrap_err();

    assert!(matches!(err, ReportError::InvalidField { field: "date", .. }));
}

#[test]
fn test_oversized_scale_fails_run_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let ratings = dir.path().join("ratings");
    fs::create_dir(&ratings).unwrap();
    fs::write(ratings.join("alice.csv"), "item,date,rating,max\n1,20150101,5,1e18\n").unwrap();

    let config = ReportConfig::new(fixtures().join("menu.csv"), &ratings);
    let mut out = Vec::new();
    let result =
        build_report(&config, AggregateOptions::default()).map(|r| write_report(&r, &mut out));

    assert!(matches!(
        result,
        Err(ReportError::InvalidField { field: "max", .. })
    ));
    assert!(out.is_empty());
}

#[test]
fn test_missing_ratings_dir() {
    let config = ReportConfig::new(fixtures().join("menu.csv"), fixtures().join("nope"));
    let err = build_report(&config, AggregateOptions::default()).unwrap_err();

    assert!(matches!(err, ReportError::Io { .. }));
}

fn fixtures() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures"))
}

fn fixture_report(options: AggregateOptions) -> Report {
    let config = ReportConfig::new(fixtures().join("menu.csv"), fixtures().join("ratings"));
    build_report(&config, options).expect("fixture report should build")
}

fn render(report: &Report) -> String {
    let mut out = Vec::new();
    write_report(report, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}
