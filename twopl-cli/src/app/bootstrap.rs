use std::io;

use tracing::Level;
use twopl_common::config::SimulationConfig;

use super::CliArgs;
use crate::ingress::ScheduleSource;

/// Installs the stderr log subscriber. Repeated calls are ignored.
pub(crate) fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_ansi(false)
        .try_init();
}

pub(crate) fn config_from_args(args: &CliArgs) -> SimulationConfig {
    SimulationConfig {
        track_waiters: !args.no_waiters,
        max_passes: args.max_passes,
        separator: args.separator.clone(),
    }
}

pub(crate) fn source_from_args(args: &CliArgs) -> ScheduleSource {
    match (&args.schedule, &args.file) {
        (Some(schedule), _) => ScheduleSource::Inline(schedule.clone()),
        (None, Some(path)) => ScheduleSource::File(path.clone()),
        (None, None) => ScheduleSource::Stdin,
    }
}
