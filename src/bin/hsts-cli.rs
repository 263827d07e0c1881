use std::path::PathBuf;

use axum::body::Body;
use axum::http::{header, Request};
use clap::{Parser, Subcommand};
use tower::ServiceExt;

use hsts_transport::config::{load_config, HstsConfig};
use hsts_transport::observability::logging;
use hsts_transport::policy::parse_header;
use hsts_transport::store::ForgetOutcome;
use hsts_transport::transport::NON_AUTHORITATIVE_REASON;
use hsts_transport::{HstsRuntime, PolicyRecord, PolicyStore};

#[derive(Parser)]
#[command(name = "hsts-cli")]
#[command(about = "Inspect and manage a persisted HSTS policy store", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Snapshot file (overrides `storage.snapshot_path`).
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report whether a host must be reached over HTTPS
    Check { host: String },
    /// Pin a host permanently
    Pin {
        host: String,
        #[arg(long)]
        include_subdomains: bool,
    },
    /// Apply a Strict-Transport-Security header value as if received over HTTPS
    Learn { host: String, header: String },
    /// Drop a learned (non-permanent) policy
    Forget { host: String },
    /// List stored policies
    List,
    /// Remove expired policies
    Purge,
    /// Send a GET through the enforcing client and print the response head
    Fetch { url: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => HstsConfig::default(),
    };
    if cli.snapshot.is_some() {
        config.storage.snapshot_path = cli.snapshot.clone();
    }
    // one-shot process, nothing to sweep
    config.storage.sweep_interval_secs = 0;

    logging::init(&config.observability.log_level);

    let runtime = HstsRuntime::start(config)?;
    let store = runtime.store().clone();
    let now = store.clock().now();

    match cli.command {
        Commands::Check { host } => {
            let required = store.contains(&host);
            println!("{}: {}", host, if required { "https required" } else { "no policy" });
        }
        Commands::Pin {
            host,
            include_subdomains,
        } => {
            store.pin(host.clone(), include_subdomains);
            println!("pinned {}", host);
        }
        Commands::Learn { host, header } => {
            let directives = parse_header(&header, runtime.config().policy.fallback_max_age_secs);
            store.add(PolicyRecord::learned(
                host.clone(),
                directives.include_subdomains,
                directives.max_age,
                now,
            ));
            println!(
                "{}: max-age={} includeSubDomains={}",
                host, directives.max_age, directives.include_subdomains
            );
        }
        Commands::Forget { host } => match store.forget(&host) {
            ForgetOutcome::Removed => println!("forgot {}", host),
            ForgetOutcome::Pinned => println!("{} is pinned, kept", host),
            ForgetOutcome::NoPolicy => println!("{}: no policy", host),
        },
        Commands::List => {
            for record in store.records() {
                let lifetime = if record.permanent {
                    "permanent".to_string()
                } else if record.is_expired(now) {
                    "expired".to_string()
                } else {
                    format!("{}s left", record.expires_at() - now)
                };
                println!(
                    "{}\tsubdomains={}\t{}",
                    record.host, record.include_subdomains, lifetime
                );
            }
        }
        Commands::Purge => {
            println!("purged {} expired policies", store.purge_expired());
        }
        Commands::Fetch { url } => {
            let request = Request::get(url.as_str())
                .header(header::USER_AGENT, "hsts-cli")
                .body(Body::empty())?;
            let response = runtime.client().oneshot(request).await?;

            println!("{:?} {}", response.version(), response.status());
            for (name, value) in response.headers() {
                println!("{}: {}", name, value.to_str().unwrap_or("<binary>"));
            }
            if response.headers().contains_key(NON_AUTHORITATIVE_REASON) {
                println!("(synthesized locally by HSTS policy)");
            }
        }
    }

    runtime.shutdown().await?;
    Ok(())
}
