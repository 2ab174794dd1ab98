use anyhow::{Context as _, Result};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::Context;
use crate::cli::RunArgs;
use crate::config::Config;
use crate::ui;
use crate::watch::{DispatchSummary, Dispatcher};

pub fn run(ctx: &Context, args: RunArgs) -> Result<()> {
    let config = Config::from_args(&args.connection)?;
    let reconciler = config.connect()?;
    let input = open_events(args.events.as_deref())?;

    log::info!("starting controller");
    let mut dispatcher = Dispatcher::new(&reconciler);
    let result = dispatcher.run(input);

    if !ctx.quiet {
        print_summary(&dispatcher.summary());
    }
    result.map(|_| ())
}

/// The event file, or stdin when none is given.
fn open_events(path: Option<&Path>) -> Result<Box<dyn Read>> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("could not open event stream {}", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

fn print_summary(summary: &DispatchSummary) {
    ui::header("Watch stream finished");
    ui::kv("events", summary.received);
    ui::kv("changed", summary.changed);
    ui::kv("unchanged", summary.unchanged);
    ui::kv("already absent", summary.absent);

    println!();
    if summary.dropped > 0 {
        ui::warn(format!("{} unusable events dropped", summary.dropped));
    }
    if summary.failed == 0 {
        ui::success("all events reconciled");
    } else {
        ui::error(format!(
            "{} {} failed, see the log for details",
            summary.failed,
            if summary.failed == 1 { "event" } else { "events" }
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_open_events_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();
        file.flush().unwrap();

        let mut content = String::new();
        open_events(Some(file.path()))
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "{}");
    }

    #[test]
    fn test_open_events_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        let err = open_events(Some(&path)).err().unwrap();
        assert!(err.to_string().contains("events.json"));
    }
}
