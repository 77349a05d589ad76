use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use deploy_tools::config::{mask_secret, DEPLOYER_ROLE};
use deploy_tools::{
    env, logging, ConfigLoader, ConfigurationRecord, ProcessEnv, ResolvedAccount, Severity, Variant,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "deploy-tools")]
#[command(about = "Inspect the build/deploy configuration handed to the contract toolchain")]
struct Cli {
    /// Record variant to build (networked/minimal)
    #[arg(short, long, global = true, default_value = "networked")]
    variant: Variant,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a summary of the resolved configuration
    Show,
    /// Emit the record as JSON
    Json {
        /// Print credentials unmasked
        #[arg(long)]
        reveal: bool,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Emit the record as TOML
    Toml {
        /// Print credentials unmasked
        #[arg(long)]
        reveal: bool,
    },
    /// Check the record for problems the toolchain would reject
    Lint,
    /// Resolve a named account on a network
    Account {
        /// Role name
        #[arg(short, long, default_value = DEPLOYER_ROLE)]
        role: String,
        /// Network name (defaults to the record's default network)
        #[arg(short, long)]
        network: Option<String>,
        /// Print the credential unmasked
        #[arg(long)]
        reveal: bool,
    },
}

fn visible(record: ConfigurationRecord, reveal: bool) -> ConfigurationRecord {
    if reveal {
        record
    } else {
        record.redacted()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // .env may carry DEPLOY_TOOLS_LOG, so read it before the subscriber is built.
    let dotenv = env::read_dotenv();
    logging::init("warn").context("failed to initialize logging")?;
    dotenv.log();

    let record = ConfigLoader::new(cli.variant).from_env(&ProcessEnv);

    match cli.command {
        Commands::Show => {
            record.print_summary();
            Ok(())
        }
        Commands::Json { reveal, out } => {
            let record = visible(record, reveal);
            match out {
                Some(path) => {
                    record
                        .write_json(&path)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    tracing::info!(path = %path.display(), "configuration written");
                }
                None => println!("{}", record.to_json()?),
            }
            Ok(())
        }
        Commands::Toml { reveal } => {
            print!("{}", visible(record, reveal).to_toml()?);
            Ok(())
        }
        Commands::Lint => {
            let issues = record.lint();
            if issues.is_empty() {
                println!("Configuration OK ({} variant)", cli.variant);
                return Ok(());
            }
            for issue in &issues {
                println!("{issue}");
            }
            let errors = issues
                .iter()
                .filter(|i| i.severity == Severity::Error)
                .count();
            if errors > 0 {
                bail!("{errors} configuration error(s)");
            }
            Ok(())
        }
        Commands::Account {
            role,
            network,
            reveal,
        } => {
            let network_name = network
                .clone()
                .unwrap_or_else(|| record.effective_default_network().to_string());
            let resolved = record
                .resolve_account(&role, network.as_deref())
                .with_context(|| format!("failed to resolve '{role}' on '{network_name}'"))?;
            match resolved {
                ResolvedAccount::Configured { index, secret } => {
                    let shown = if reveal { secret } else { mask_secret(&secret) };
                    println!("{role} on {network_name}: account [{index}] {shown}");
                }
                ResolvedAccount::Framework { index } => {
                    println!("{role} on {network_name}: toolchain account [{index}]");
                }
            }
            Ok(())
        }
    }
}
