//! Heimdall - passive name-resolution leak listener.
//!
//! Prints LLMNR, mDNS, NetBIOS and WPAD requests seen on an interface.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use heimdall::reporter::{ConsoleReporter, EventReporter};
use heimdall::{
    check_elevated_privileges, list_interfaces, CaptureInterface, Listener, ListenerConfig,
    ProtocolFilter, SessionEnd,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Read timeout used when neither the config nor the command line sets one,
/// so that Ctrl+C is noticed on a quiet network.
const DEFAULT_CLI_READ_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(name = "heimdall")]
#[command(about = "Listens for LLMNR, mDNS, NetBIOS and WPAD name leaks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture on an interface and print detected requests
    Listen {
        /// Network interface to listen on (e.g., eth0)
        #[arg(short, long)]
        interface: Option<String>,

        /// Protocol to show: All, LLMNR, mDNS, NetBIOS or WPAD
        #[arg(short, long, default_value = "All", value_parser = parse_protocol)]
        protocol: ProtocolFilter,

        /// Events buffered before capture blocks
        #[arg(long)]
        capacity: Option<usize>,

        /// Capture read timeout in milliseconds (0 blocks until a packet arrives)
        #[arg(long)]
        read_timeout_ms: Option<u64>,

        /// Show the raw payload of each request
        #[arg(short, long)]
        verbose: bool,
    },
    /// List capturable network interfaces
    Interfaces {
        /// Include interfaces without a routable address
        #[arg(short, long)]
        all: bool,
    },
}

struct ListenArgs {
    interface: Option<String>,
    protocol: ProtocolFilter,
    capacity: Option<usize>,
    read_timeout_ms: Option<u64>,
    verbose: bool,
}

fn parse_protocol(s: &str) -> Result<ProtocolFilter, String> {
    s.parse().map_err(|_| {
        let choices: Vec<_> = ProtocolFilter::choices()
            .iter()
            .map(ToString::to_string)
            .collect();
        format!("expected one of {}", choices.join(", "))
    })
}

fn find_default_interface() -> Option<CaptureInterface> {
    // Prefer interfaces that are up, not loopback, and reachable
    list_interfaces()
        .into_iter()
        .find(|iface| iface.is_up && !iface.is_loopback && iface.has_routable_address())
}

fn run_listener(args: ListenArgs) -> Result<()> {
    let mut config = ListenerConfig::load().context("Failed to load configuration")?;

    if let Some(capacity) = args.capacity {
        if capacity == 0 {
            return Err(anyhow!("--capacity must be at least 1"));
        }
        config.channel_capacity = capacity;
    }
    config.read_timeout = match args.read_timeout_ms {
        Some(0) => None,
        Some(ms) => Some(Duration::from_millis(ms)),
        None => config.read_timeout.or(Some(DEFAULT_CLI_READ_TIMEOUT)),
    };

    let interface = match args.interface.or_else(|| config.interface.clone()) {
        Some(name) => name,
        None => {
            find_default_interface()
                .ok_or_else(|| anyhow!("No suitable network interface found"))?
                .name
        }
    };

    eprintln!("{}", check_elevated_privileges());

    let listener = Arc::new(Listener::with_pnet(&config));
    let events = listener
        .take_events()
        .context("Event stream already taken")?;
    let reporter = ConsoleReporter::new()
        .with_filter(args.protocol)
        .with_verbose(args.verbose);

    {
        let listener = Arc::clone(&listener);
        ctrlc::set_handler(move || {
            match listener.active_interface() {
                Some(interface) => info!("Received Ctrl+C, stopping capture on {}", interface),
                None => info!("Received Ctrl+C, stopping"),
            }
            listener.shutdown();
        })
        .context("Failed to install Ctrl+C handler")?;
    }

    // The stream closes once the session ends for any reason
    let worker = {
        let listener = Arc::clone(&listener);
        let interface = interface.clone();
        thread::spawn(move || {
            let result = listener.start(&interface);
            listener.shutdown();
            result
        })
    };

    reporter.on_start(&interface);
    while let Some(event) = events.blocking_recv() {
        reporter.report(&event);
    }
    reporter.on_stop();

    let end = worker
        .join()
        .map_err(|_| anyhow!("Capture thread panicked"))?
        .with_context(|| format!("Failed to capture on {}", interface))?;

    match end {
        SessionEnd::Stopped => info!("Listener stopped"),
        SessionEnd::ReadFailed(kind) => error!("Capture on {} ended: {:?}", interface, kind),
        SessionEnd::StreamClosed => info!("Event stream closed"),
    }

    Ok(())
}

fn print_interfaces(all: bool) {
    let interfaces: Vec<_> = list_interfaces()
        .into_iter()
        .filter(|iface| all || iface.has_routable_address())
        .collect();

    if interfaces.is_empty() {
        println!("No capturable interfaces found (try --all or elevated privileges).");
        return;
    }

    for iface in interfaces {
        println!("{}", iface);
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("heimdall=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Listen {
            interface,
            protocol,
            capacity,
            read_timeout_ms,
            verbose,
        } => run_listener(ListenArgs {
            interface,
            protocol,
            capacity,
            read_timeout_ms,
            verbose,
        })
        .context("Failed to run listener"),
        Commands::Interfaces { all } => {
            print_interfaces(all);
            Ok(())
        }
    }
}
