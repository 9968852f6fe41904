//! snmpc-walk: walk an SNMP OID subtree.

use clap::Parser;
use snmp_client::{Oid, Session, Version, oid};
use std::process::ExitCode;
use std::time::Duration;

/// Walk an OID subtree, printing each varbind.
#[derive(Debug, Parser)]
#[command(name = "snmpc-walk", version, about)]
struct Args {
    /// Agent host name or IP address.
    target: String,

    /// Subtree root (default: MIB-2).
    #[arg(value_name = "OID")]
    root: Option<String>,

    /// Agent UDP port.
    #[arg(short, long, default_value_t = 161)]
    port: u16,

    /// Community string.
    #[arg(short, long, default_value = "public")]
    community: String,

    /// Use SNMPv1 instead of v2c.
    #[arg(long)]
    v1: bool,

    /// Use GETNEXT instead of GETBULK.
    #[arg(long)]
    getnext: bool,

    /// GETBULK max-repetitions.
    #[arg(long, default_value_t = 50)]
    max_repetitions: u8,

    /// Total per-request timeout in seconds.
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

    let root = match &args.root {
        Some(s) => match Oid::parse(s) {
            Ok(oid) => oid,
            Err(e) => {
                eprintln!("error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => oid!(1, 3, 6, 1, 2, 1),
    };

    let version = if args.v1 { Version::V1 } else { Version::V2c };
    // GETBULK does not exist in v1.
    let use_getnext = args.getnext || args.v1;

    let session = match Session::builder(args.target)
        .port(args.port)
        .community(args.community.into_bytes())
        .version(version)
        .timeout(Duration::from_secs(args.timeout))
        .retries(args.retries)
        .max_repetitions(args.max_repetitions)
        .connect()
        .await
    {
        Ok(session) => session,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut count: u64 = 0;
    let visit = |vb: snmp_client::VarBind| {
        count += 1;
        println!("{}", vb);
        Ok(())
    };

    let result = if use_getnext {
        session.walk(&root, visit).await
    } else {
        session.bulk_walk(&root, visit).await
    };

    match result {
        Ok(()) => {
            eprintln!("{} objects", count);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
