use anyhow::Result;
use colored::Colorize;

use crate::Context;
use crate::cli::ConnectionArgs;
use crate::config::Config;
use crate::ui;
use reconciler::OwnedCheck;

pub fn run(ctx: &Context, args: ConnectionArgs) -> Result<()> {
    let config = Config::from_args(&args)?;
    let reconciler = config.connect()?;
    let checks = reconciler.store().entries();

    if checks.is_empty() {
        ui::info(format!("no checks tagged {}", reconciler.tag()));
        return Ok(());
    }

    ui::header(&format!("Checks tagged {}", reconciler.tag()));
    for check in &checks {
        println!("{}", describe(check));
        if ctx.verbose > 0 {
            print_spec(check);
        }
    }

    if !ctx.quiet {
        println!();
        ui::info(format!(
            "{} owned {}, notifying user {}",
            checks.len(),
            if checks.len() == 1 { "check" } else { "checks" },
            reconciler.owner_id()
        ));
    }
    Ok(())
}

/// One-line summary: identity, remote id, host, interval
fn describe(check: &OwnedCheck) -> String {
    format!(
        "  {} {} {} every {}m",
        check.identity.bold(),
        format!("#{}", check.id).dimmed(),
        check.spec.hostname,
        check.spec.interval_minutes
    )
}

fn print_spec(check: &OwnedCheck) {
    let spec = &check.spec;
    ui::kv("tls", ui::yes_no(spec.enable_tls));
    ui::kv("trigger threshold", spec.trigger_threshold);
    ui::kv("retrigger threshold", spec.retrigger_threshold);
    ui::kv("notify when back up", ui::yes_no(spec.notify_when_backup));
    if !spec.integration_ids.is_empty() {
        let ids: Vec<String> = spec.integration_ids.iter().map(u64::to_string).collect();
        ui::kv("integrations", ids.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reconciler::HttpCheckSpec;

    #[test]
    fn test_describe() {
        colored::control::set_override(false);
        let check = OwnedCheck {
            id: 100,
            identity: "default/example".into(),
            spec: HttpCheckSpec {
                hostname: "example.com".into(),
                interval_minutes: 5,
                ..HttpCheckSpec::default()
            },
        };
        assert_eq!(describe(&check), "  default/example #100 example.com every 5m");
    }
}
