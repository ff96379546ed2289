use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Arg, ArgAction, Command};
use tracing::Level;

use demoplay::config::START_HINT;
use demoplay::scenario::ScenarioId;
use demoplay::{classify, ConfigOverrides, DemoConfig, DemoError, FailureClass, Orchestrator};

fn cli() -> Command {
    Command::new("demoplay - pane-patrol demo recorder")
        .version(env!("CARGO_PKG_VERSION"))
        .about("🎬 Records pane-patrol demo GIFs and screenshots through shellwright")
        .arg(
            Arg::new("demos")
                .help("Demos to record (default: all)")
                .value_name("DEMO")
                .num_args(0..),
        )
        .arg(
            Arg::new("list")
                .long("list")
                .help("List available demos")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("url")
                .long("url")
                .help("shellwright base URL (overrides SHELLWRIGHT_URL)")
                .value_name("URL"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .help("Directory for downloaded artifacts (overrides SHELLWRIGHT_OUTPUT)")
                .value_name("DIR")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("host")
                .long("host")
                .help("Host to ssh into before recording; empty to stay local (overrides DEMO_HOST)")
                .value_name("HOST"),
        )
        .arg(
            Arg::new("binary")
                .long("binary")
                .help("pane-patrol binary on the demo host (overrides PANE_PATROL)")
                .value_name("PATH"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(ArgAction::SetTrue),
        )
}

fn list_demos() {
    println!("Available demos:");
    for id in ScenarioId::all() {
        println!("  {} - {}", id.name(), id.scenario().description());
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let matches = cli().get_matches();

    let level = if matches.get_flag("verbose") {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    if matches.get_flag("list") {
        list_demos();
        return Ok(ExitCode::SUCCESS);
    }

    let overrides = ConfigOverrides {
        shellwright_url: matches.get_one::<String>("url").cloned(),
        output_dir: matches.get_one::<PathBuf>("output").cloned(),
        demo_host: matches.get_one::<String>("host").cloned(),
        pane_patrol: matches.get_one::<String>("binary").cloned(),
    };
    let config = DemoConfig::from_env().with_overrides(overrides);
    let demos: Vec<String> = matches
        .get_many::<String>("demos")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let orchestrator = Orchestrator::new(config);
    match orchestrator.run(&demos).await {
        Ok(report) => {
            println!();
            report.print();
            println!();
            println!(
                "✨ Done! Artifacts saved to {}",
                orchestrator.config().output_dir.display()
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => exit_for(error),
    }
}

/// Unknown demos and an unreachable service get a short message; anything else
/// surfaces with its full chain of causes.
fn exit_for(error: DemoError) -> anyhow::Result<ExitCode> {
    match classify(&error) {
        FailureClass::UnknownScenario => {
            eprintln!("❌ {error}");
        }
        FailureClass::Connectivity => {
            eprintln!("❌ {error}");
            eprintln!("💡 Is shellwright running? Start it with:");
            eprintln!("   {START_HINT}");
        }
        FailureClass::Fatal => {
            return Err(anyhow::Error::new(error).context("demo recording failed"));
        }
    }
    Ok(ExitCode::from(error.exit_code()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_accepts_overrides_and_many_demos() {
        let matches = cli()
            .try_get_matches_from([
                "demoplay", "scan", "supervisor", "--host", "", "--output", "/tmp/out", "-v",
            ])
            .unwrap();

        let demos: Vec<_> = matches.get_many::<String>("demos").unwrap().collect();
        assert_eq!(demos, ["scan", "supervisor"]);
        assert_eq!(matches.get_one::<String>("host").map(String::as_str), Some(""));
        assert_eq!(
            matches.get_one::<PathBuf>("output"),
            Some(&PathBuf::from("/tmp/out"))
        );
        assert!(matches.get_flag("verbose"));
    }

    #[test]
    fn fatal_errors_keep_their_cause_chain() {
        let error = DemoError::missing_field("shell_start", "shell_session_id");
        let report = exit_for(error).unwrap_err();
        assert_eq!(report.to_string(), "demo recording failed");
        assert_eq!(
            report.root_cause().to_string(),
            "shell_start response is missing `shell_session_id`"
        );
    }

    #[test]
    fn short_failures_exit_with_status_one() {
        let unknown = DemoError::UnknownScenario {
            name: "teaser".to_string(),
            available: ScenarioId::names(),
        };
        assert_eq!(unknown.exit_code(), 1);
        assert!(exit_for(unknown).is_ok());

        let refused = DemoError::Connect {
            url: "http://127.0.0.1:9/mcp".to_string(),
            message: "connection refused".to_string(),
        };
        assert!(exit_for(refused).is_ok());
    }

    #[test]
    fn cli_without_demos_means_all() {
        let matches = cli().try_get_matches_from(["demoplay"]).unwrap();
        assert!(matches.get_many::<String>("demos").is_none());
        assert!(!matches.get_flag("list"));
    }
}
