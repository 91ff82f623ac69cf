// urn-inspect - parse URNs from the command line and print what they are
//
// One JSON document per argument on stdout. Rejected URNs are reported in
// place and make the process exit non-zero once every argument is handled.

use anyhow::{bail, Result};
use clap::Parser;
use serde_json::json;

use shared_kernel::{inspect, UrnKind};

#[derive(Parser, Debug)]
#[command(name = "urn-inspect", version)]
#[command(about = "Parse shared-kernel URNs and print their canonical form and components")]
struct Args {
    /// Parser to use; auto tries each kind in turn
    #[arg(long, short = 'k', value_enum, default_value_t = UrnKind::Auto)]
    kind: UrnKind,

    /// Pretty-print each JSON document
    #[arg(long)]
    pretty: bool,

    /// URNs to inspect
    #[arg(required = true)]
    urns: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    tracing::debug!(kind = ?args.kind, count = args.urns.len(), "inspecting URNs");

    let mut failed = 0;
    for urn in &args.urns {
        let document = match inspect(args.kind, urn) {
            Ok(inspection) => serde_json::to_value(&inspection)?,
            Err(err) => {
                failed += 1;
                json!({ "urn": urn, "error": err.to_string() })
            }
        };

        let line = if args.pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        println!("{line}");
    }

    if failed > 0 {
        bail!("{failed} of {} URNs failed to parse", args.urns.len());
    }
    Ok(())
}
