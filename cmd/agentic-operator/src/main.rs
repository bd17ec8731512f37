use clap::{Parser, Subcommand};
use pkg_cluster::HttpSecretClient;
use pkg_credentials::{RetryPolicy, SecretReplicator, validate_credential_config};
use pkg_types::config::{OperatorConfig, OperatorConfigFile, load_config_file};
use pkg_types::session::SessionRef;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "agentic-operator", about = "Agentic session credential operator")]
struct Cli {
    /// Path to YAML config file
    #[arg(long, short, default_value = "/etc/agentic-operator/config.yaml")]
    config: String,

    /// Cluster API server endpoint
    #[arg(long, default_value = "https://127.0.0.1:6443")]
    server: String,

    /// Bearer token for the API server
    #[arg(long)]
    token: Option<String>,

    /// Operator home namespace (holds the source credential secret)
    #[arg(long)]
    namespace: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate credential configuration and serve until shutdown
    Run,
    /// Validate credential configuration and exit
    Preflight,
    /// Copy the credential secret into a tenant namespace for a session
    Replicate {
        /// Tenant namespace to copy into
        #[arg(long)]
        target: String,
        /// Name of the owning session
        #[arg(long)]
        session: String,
        /// Uid of the owning session
        #[arg(long)]
        uid: String,
    },
    /// Remove a replicated credential secret from a tenant namespace
    DeleteReplica {
        /// Tenant namespace to clean up
        #[arg(long)]
        target: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    // Load config file (returns defaults if file not found)
    let file_cfg: OperatorConfigFile = load_config_file(&cli.config)?;
    info!("Config file: {}", cli.config);

    // Merge: CLI args > config file > environment > defaults
    let mut config = OperatorConfig::resolve(file_cfg);
    if let Some(ns) = &cli.namespace {
        config.namespace = ns.clone();
    }

    let client = Arc::new(HttpSecretClient::new(&cli.server, cli.token.clone())?);
    let replicator = SecretReplicator::new(client.clone(), &config.namespace).with_retry(
        RetryPolicy {
            max_attempts: config.conflict_retries,
            backoff: Duration::from_millis(config.conflict_backoff_ms),
        },
    );

    match &cli.command {
        Commands::Run => {
            info!("Starting agentic-operator");
            info!("  Server:    {}", cli.server);
            info!("  Namespace: {}", config.namespace);

            // The credential gate: refuse to start when no session could
            // ever be provisioned against the configured credential.
            validate_credential_config(client.as_ref(), &config).await?;

            info!("agentic-operator ready, waiting for shutdown signal");
            tokio::signal::ctrl_c().await?;
            info!("Shutdown signal received, exiting");
        }
        Commands::Preflight => {
            validate_credential_config(client.as_ref(), &config).await?;
            println!("credential configuration OK");
        }
        Commands::Replicate {
            target,
            session,
            uid,
        } => {
            let owner = SessionRef {
                name: session.clone(),
                namespace: target.clone(),
                uid: uid.clone(),
            };
            replicator.replicate(target, &owner).await?;
            println!("replicated credential secret to namespace {}", target);
        }
        Commands::DeleteReplica { target } => {
            replicator.delete_replica(target).await?;
            println!("removed replicated credential secret from namespace {}", target);
        }
    }

    Ok(())
}
