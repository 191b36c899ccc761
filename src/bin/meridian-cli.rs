//! Meridian CLI
//!
//! Command-line front end for the zone analyzer, configuration validator,
//! template generators, knowledge base, and DNS debugger.

use std::fs;
use std::path::PathBuf;
use std::process::exit;

use clap::{Args, Parser, Subcommand};
use colored::*;

use meridian::dns::config_generator::{
    generate_config, generate_zone_file, GenerateOptions, LogVerbosity,
};
use meridian::dns::config_validator::validate_dns_config;
use meridian::dns::debugger::{debug_dns_issue, StaticProbe};
use meridian::dns::errors::{AdvisorError, DnsResult};
use meridian::dns::knowledge;
use meridian::dns::zone_analyzer::analyze_zone_file;

/// Meridian - analyze zones, validate configurations, and debug DNS
#[derive(Parser)]
#[command(name = "meridian")]
#[command(version)]
#[command(about = "DNS zone and configuration advisor", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// No color output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a zone file
    Zone(ZoneArgs),

    /// Validate a server configuration file
    Config(ConfigArgs),

    /// Generate a server configuration template
    Generate(GenerateArgs),

    /// Generate a starter zone file
    InitZone(InitZoneArgs),

    /// Show knowledge base topics
    Knowledge {
        /// Topic id; omit to list available topics
        topic: Option<String>,
    },

    /// Run diagnostic checks for a domain
    Debug(DebugArgs),
}

#[derive(Args)]
struct ZoneArgs {
    /// Path to the zone file
    file: PathBuf,

    /// Zone name (e.g. example.com)
    #[arg(short, long)]
    name: String,
}

#[derive(Args)]
struct ConfigArgs {
    /// Server dialect: bind, nsd, unbound, powerdns, djbdns
    #[arg(short, long)]
    server: String,

    /// Path to the configuration file
    file: PathBuf,
}

#[derive(Args)]
struct GenerateArgs {
    /// Server dialect: bind, nsd, unbound, powerdns
    #[arg(short, long)]
    server: String,

    /// Role: authoritative, recursive, both
    #[arg(short, long, default_value = "authoritative")]
    role: String,

    /// Zones to declare in the configuration
    #[arg(short, long)]
    zone: Vec<String>,

    /// Include DNSSEC settings
    #[arg(long)]
    dnssec: bool,

    /// Include rate limiting settings
    #[arg(long)]
    ratelimit: bool,

    /// Logging verbosity: minimal, standard, verbose
    #[arg(long, default_value = "standard")]
    logging: String,
}

#[derive(Args)]
struct InitZoneArgs {
    /// Zone name (e.g. example.com)
    zone: String,

    /// Primary nameserver
    #[arg(long, default_value = "ns1.example.com")]
    ns: String,

    /// Administrative contact email
    #[arg(long, default_value = "admin@example.com")]
    email: String,

    /// Include DNSSEC-related records
    #[arg(long)]
    dnssec: bool,
}

#[derive(Args)]
struct DebugArgs {
    /// Domain to check
    domain: String,

    /// Description of the issue being investigated
    #[arg(short, long)]
    issue: Option<String>,

    /// Skip the DNSSEC check
    #[arg(long)]
    no_dnssec: bool,

    /// Skip the propagation check
    #[arg(long)]
    no_propagation: bool,
}

fn parse_verbosity(value: &str) -> DnsResult<LogVerbosity> {
    match value.to_lowercase().as_str() {
        "minimal" => Ok(LogVerbosity::Minimal),
        "standard" => Ok(LogVerbosity::Standard),
        "verbose" => Ok(LogVerbosity::Verbose),
        other => Err(AdvisorError::operation(
            "parse logging verbosity",
            &format!("expected minimal, standard, or verbose, got '{}'", other),
        )),
    }
}

fn run(cli: Cli) -> DnsResult<()> {
    match cli.command {
        Commands::Zone(args) => {
            let content = fs::read_to_string(&args.file)?;
            println!("{}", analyze_zone_file(&content, &args.name));
        }
        Commands::Config(args) => {
            let content = fs::read_to_string(&args.file)?;
            println!("{}", validate_dns_config(&args.server, &content));
        }
        Commands::Generate(args) => {
            let options = GenerateOptions {
                dnssec: args.dnssec,
                ratelimit: args.ratelimit,
                logging: parse_verbosity(&args.logging)?,
            };
            println!(
                "{}",
                generate_config(&args.server, &args.role, &args.zone, &options)
            );
        }
        Commands::InitZone(args) => {
            let options = GenerateOptions {
                dnssec: args.dnssec,
                ..GenerateOptions::default()
            };
            println!(
                "{}",
                generate_zone_file(&args.zone, &args.ns, &args.email, &options)
            );
        }
        Commands::Knowledge { topic } => match topic {
            Some(topic) => match knowledge::lookup(&topic) {
                Some(body) => println!("{}", body),
                None => {
                    return Err(AdvisorError::operation(
                        "knowledge lookup",
                        &format!("unknown topic '{}'", topic),
                    ));
                }
            },
            None => {
                println!("{}", "Available topics:".bold());
                for (id, name, description) in knowledge::topics() {
                    println!("  {} - {}", id.cyan(), name);
                    println!("      {}", description.dimmed());
                }
            }
        },
        Commands::Debug(args) => {
            // Checks run against an inert probe, so the report shows which
            // lookups an operator should perform rather than live answers.
            let probe = StaticProbe::new();
            println!(
                "{}",
                debug_dns_issue(
                    &args.domain,
                    args.issue.as_deref(),
                    !args.no_dnssec,
                    !args.no_propagation,
                    &probe,
                )
            );
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(err) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), err);
        exit(1);
    }
}
