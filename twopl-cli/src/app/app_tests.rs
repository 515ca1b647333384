use super::{CliArgs, SimulatorApp, bootstrap};
use crate::ingress::ScheduleSource;
use clap::Parser;
use googletest::prelude::*;
use rstest::rstest;
use twopl_common::config::SimulationConfig;

fn parse(argv: &[&str]) -> CliArgs {
    CliArgs::try_parse_from(argv).expect("arguments must parse")
}

#[rstest]
fn defaults_map_to_default_config_and_stdin() {
    let args = parse(&["twopl"]);
    assert_eq!(bootstrap::config_from_args(&args), SimulationConfig::default());
    assert_eq!(bootstrap::source_from_args(&args), ScheduleSource::Stdin);
    assert_that!(args.verbose, eq(0_u8));
}

#[rstest]
fn flags_map_onto_simulation_config() {
    let args = parse(&[
        "twopl",
        "--no-waiters",
        "--max-passes",
        "50",
        "--separator",
        ",",
        "-vv",
        "R1(X)",
    ]);
    let config = bootstrap::config_from_args(&args);
    assert_that!(config.track_waiters, eq(false));
    assert_that!(config.max_passes, eq(Some(50_usize)));
    assert_that!(config.separator.as_str(), eq(","));
    assert_that!(args.verbose, eq(2_u8));
    assert_eq!(
        bootstrap::source_from_args(&args),
        ScheduleSource::Inline("R1(X)".to_owned())
    );
}

#[rstest]
fn file_flag_selects_file_source() {
    let args = parse(&["twopl", "--file", "schedules.txt"]);
    assert_eq!(
        bootstrap::source_from_args(&args),
        ScheduleSource::File("schedules.txt".into())
    );
}

#[rstest]
fn inline_schedule_conflicts_with_file() {
    let result = CliArgs::try_parse_from(["twopl", "--file", "a.txt", "R1(X)"]);
    assert_that!(result.is_err(), eq(true));
}

#[rstest]
fn app_renders_trace_line() {
    let app = SimulatorApp::new(SimulationConfig::default(), false).expect("valid config");
    let output = app.execute("R1(X) W1(X)").expect("schedule simulates");
    assert_that!(output.as_str(), eq("wl1(X) R1(X) W1(X) ul1(X)"));
}

#[rstest]
fn app_appends_report_when_requested() {
    let app = SimulatorApp::new(SimulationConfig::default(), true).expect("valid config");
    let output = app.execute("R1(X)").expect("schedule simulates");
    let expected = "\
rl1(X) R1(X) ul1(X)
transaction 1: phase=shrinking blocked=false
  held: -
  footprint: X
  remaining: -
  history: R1(X)
passes: 2";
    assert_that!(output.as_str(), eq(expected));
}

#[rstest]
fn app_surfaces_decode_errors() {
    let app = SimulatorApp::new(SimulationConfig::default(), false).expect("valid config");
    assert_that!(app.execute("R1(X) Z9(Q)").is_err(), eq(true));
}

#[rstest]
fn app_rejects_invalid_config() {
    let config = SimulationConfig {
        max_passes: Some(0),
        ..SimulationConfig::default()
    };
    assert_that!(SimulatorApp::new(config, false).is_err(), eq(true));
}
