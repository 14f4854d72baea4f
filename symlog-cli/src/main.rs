//! `symlog`, the live log console for the firmware's binary telemetry
//! stream.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, bail};
use clap::Parser;
use env_logger::Env;

use symlog_cli::console::{self, ConsoleConfig};
use symlog_cli::device;
use symlog_cli::discovery;
use symlog_cli::render::RenderStyle;
use symlog_cli::transport::{self, SerialLogTransport};
use symlog_core::ByteOrder;

/// Decode the firmware's binary log stream into readable console lines.
#[derive(Parser, Debug)]
#[command(name = "symlog", version, about)]
struct Cli {
    /// Serial port to listen on (auto-detected when omitted)
    #[arg(long)]
    port: Option<String>,

    /// Serial baud rate
    #[arg(long, default_value_t = 115_200)]
    baud: u32,

    /// Firmware debug binary (auto-discovered when omitted)
    #[arg(long, visible_alias = "axf", value_name = "PATH")]
    out: Option<PathBuf>,

    /// Decode record fields big-endian
    #[arg(long)]
    big_endian: bool,

    /// Print format strings verbatim instead of substituting arguments
    #[arg(long)]
    no_arg_format: bool,

    /// Also print each frame as raw hex
    #[arg(long)]
    raw: bool,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,

    /// Skip the startup banner and configuration block
    #[arg(long)]
    no_banner: bool,

    /// Reset the device before listening
    #[arg(long)]
    reset: bool,

    /// List detected serial ports and exit
    #[arg(long)]
    list_ports: bool,

    /// Enable debug-level diagnostics
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    if cli.list_ports {
        transport::print_available_ports();
        return Ok(());
    }

    if !cli.no_banner {
        console::print_banner();
    }

    if cli.reset {
        device::reset_device();
    }

    let binary_path = resolve_binary(cli.out)?;
    let table = symlog_elf::load_format_table(&binary_path)
        .with_context(|| format!("loading format strings from {}", binary_path.display()))?;
    println!(
        "Loaded {} format strings from {} section",
        table.len(),
        symlog_elf::LOG_FMT_SECTION
    );

    let port_name = resolve_port(cli.port)?;

    let byte_order = if cli.big_endian {
        ByteOrder::Big
    } else {
        ByteOrder::Little
    };

    let mut serial = match SerialLogTransport::open(&port_name, cli.baud) {
        Ok(serial) => serial,
        Err(err) => {
            transport::print_available_ports();
            return Err(err.into());
        }
    };

    let config = ConsoleConfig {
        port_name,
        baud: cli.baud,
        binary_path,
        byte_order,
        substitute_args: !cli.no_arg_format,
        style: RenderStyle::detect(cli.no_color, cli.raw),
    };

    if !cli.no_banner {
        console::print_config(&config, table.len());
    }

    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))
        .context("installing the Ctrl+C handler")?;

    let mut stdout = std::io::stdout();
    let stats = console::run_session(&config, &mut serial, &table, &running, &mut stdout)
        .context("writing console output")?;
    console::print_summary(&stats);

    Ok(())
}

fn resolve_binary(explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(path) => {
            if !path.exists() {
                bail!("debug binary not found: {}", path.display());
            }
            Ok(path)
        }
        None => match discovery::find_debug_binary() {
            Some(path) => {
                log::debug!("auto-discovered debug binary {}", path.display());
                Ok(path)
            }
            None => bail!(
                "could not find a firmware debug binary automatically; \
                 use --out <path> to point at the .out/.axf/.elf file"
            ),
        },
    }
}

fn resolve_port(explicit: Option<String>) -> anyhow::Result<String> {
    match explicit {
        Some(port) => Ok(port),
        None => match transport::find_probe_port() {
            Some(port) => {
                println!("Auto-detected serial port: {port}");
                Ok(port)
            }
            None => {
                transport::print_available_ports();
                bail!(
                    "no J-Link CDC UART port detected; \
                     use --port <port> to specify the serial port manually"
                );
            }
        },
    }
}
