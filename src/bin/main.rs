use std::error::Error;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use svcctl::{
    cli::{Cli, Commands, parse_args},
    config::ClientConfig,
    status::StatusReporter,
};

fn main() {
    if let Err(err) = run() {
        eprintln!("svcctl: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = parse_args();
    init_logging(&args);

    let mut config = ClientConfig::load(args.config.as_deref())?;
    if let Some(service_dir) = args.service_dir.clone() {
        config.service_dir = service_dir;
    }
    if let Some(flavor) = args.flavor {
        config.flavor = flavor;
    }
    debug!(
        service_dir = %config.service_dir.display(),
        flavor = config.flavor.as_ref(),
        "resolved client configuration"
    );

    match args.command {
        Commands::Status {
            service,
            json,
            no_color,
        } => {
            let reporter = StatusReporter::new(!no_color);
            match service {
                Some(service) => {
                    let report = reporter.report(&config.handle(&service));
                    if json {
                        println!("{}", serde_json::to_string_pretty(&report)?);
                    } else {
                        reporter.print(&report);
                    }
                }
                None => {
                    if json {
                        let snapshot = reporter.snapshot(&config)?;
                        println!("{}", serde_json::to_string_pretty(&snapshot)?);
                    } else {
                        reporter.print_all(&config)?;
                    }
                }
            }
        }
        Commands::Up { service } => config.handle(&service).start()?,
        Commands::Down { service } => config.handle(&service).stop()?,
        Commands::Once { service } => config.handle(&service).once()?,
        Commands::Restart { service } => config.handle(&service).restart()?,
        Commands::Signal { action, service } => {
            config.handle(&service).send_named(&action)?
        }
    }

    Ok(())
}

fn init_logging(args: &Cli) {
    let filter = if let Some(level) = args.log_level {
        EnvFilter::new(level.as_str())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
