//! snmpc-get: retrieve SNMP OID values.

use clap::Parser;
use snmp_client::{Oid, Session, Version};
use std::process::ExitCode;
use std::time::Duration;

/// Retrieve one or more SNMP OID values.
#[derive(Debug, Parser)]
#[command(name = "snmpc-get", version, about)]
struct Args {
    /// Agent host name or IP address.
    target: String,

    /// OIDs to retrieve (dotted notation).
    #[arg(required = true, value_name = "OID")]
    oids: Vec<String>,

    /// Agent UDP port.
    #[arg(short, long, default_value_t = 161)]
    port: u16,

    /// Community string.
    #[arg(short, long, default_value = "public")]
    community: String,

    /// Use SNMPv1 instead of v2c.
    #[arg(long)]
    v1: bool,

    /// Total request timeout in seconds.
    #[arg(short, long, default_value_t = 2)]
    timeout: u64,

    /// Retransmissions after the first attempt.
    #[arg(short, long, default_value_t = 3)]
    retries: u32,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let oids: Vec<Oid> = match args.oids.iter().map(|s| Oid::parse(s)).collect() {
        Ok(oids) => oids,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let version = if args.v1 { Version::V1 } else { Version::V2c };

    let session = match Session::builder(args.target)
        .port(args.port)
        .community(args.community.into_bytes())
        .version(version)
        .timeout(Duration::from_secs(args.timeout))
        .retries(args.retries)
        .connect()
        .await
    {
        Ok(session) => session,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match session.get(&oids).await {
        Ok(response) => {
            if response.is_error() {
                eprintln!(
                    "agent error: {} at index {}",
                    response.error_status_enum(),
                    response.error_index
                );
                return ExitCode::FAILURE;
            }
            for vb in &response.varbinds {
                println!("{}", vb);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
