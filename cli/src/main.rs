//! agora: governance engine command line.

use agora_cli::{parse_action, simulate, AgoraConfig, Scenario};
use agora_utils::LogFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agora", about = "Proposal governance with linear and quadratic voting")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "AGORA_CONFIG")]
    config: Option<PathBuf>,

    /// Log level or filter directive, e.g. "info" or "debug,agora_governance=trace".
    #[arg(long, env = "AGORA_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "AGORA_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Word in a description that selects quadratic voting.
    #[arg(long, env = "AGORA_QUADRATIC_TAG")]
    quadratic_tag: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print the effective configuration as TOML.
    Config,

    /// Print the deterministic id of a proposal.
    #[command(name = "proposal-id")]
    ProposalId {
        #[arg(long)]
        description: String,

        /// Action as target:value[:hexpayload]; repeat for several.
        #[arg(long = "action")]
        actions: Vec<String>,
    },

    /// Run a scripted scenario against in-memory collaborators.
    Simulate {
        scenario: PathBuf,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AgoraConfig::from_toml_file(path)?,
        None => AgoraConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    if let Some(tag) = cli.quadratic_tag {
        config.governance.quadratic_tag = tag;
    }
    config
        .governance
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    agora_utils::init_logging(config.log_format, &config.log_level);
    if let Some(path) = &cli.config {
        tracing::info!("loaded config from {}", path.display());
    }

    match cli.command {
        Command::Config => {
            print!("{}", config.to_toml_string()?);
        }
        Command::ProposalId {
            description,
            actions,
        } => {
            let actions = actions
                .iter()
                .map(|a| parse_action(a))
                .collect::<Result<Vec<_>, _>>()?;
            let hash = agora_crypto::hash_description(&description);
            let id = agora_governance::proposal_id(&actions, &hash);
            let mode = agora_governance::VotingMode::from_description(
                &description,
                &config.governance.quadratic_tag,
            );
            println!("proposal_id      {id}");
            println!("description_hash {hash}");
            println!("mode             {mode}");
        }
        Command::Simulate { scenario, json } => {
            let parsed = Scenario::from_toml_file(&scenario)?;
            tracing::info!(
                scenario = %scenario.display(),
                steps = parsed.steps.len(),
                "running simulation"
            );
            let report = simulate(&parsed, &config.governance)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.to_text());
            }
            if !report.passed() {
                anyhow::bail!("{} expectation(s) failed", report.failed_expectations);
            }
        }
    }

    Ok(())
}
