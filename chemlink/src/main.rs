use std::path::PathBuf;

use anyhow::{bail, Context};
use chemlink::{Pipeline, PipelineConfig};
use chemlink_chem::{ChemToolkit, ToolkitConfig};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "chemlink",
    about = "Canonical compound integration across public sources",
    long_about = "Deduplicate compound tables by canonical identity, report which sources share each compound, and rank catalog compounds by structural similarity."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the whole pipeline from a JSON configuration.
    Run {
        #[arg(long, value_name = "PATH", help = "Pipeline configuration file")]
        config: PathBuf,
        #[arg(long, value_name = "SMILES", help = "Similarity query, overrides the configured one")]
        query: Option<String>,
        #[arg(long = "top-n", value_name = "N", help = "Number of similarity matches to keep")]
        top_n: Option<usize>,
        #[arg(long = "output-dir", value_name = "PATH", help = "Output directory override")]
        output_dir: Option<PathBuf>,
    },
    /// Print the canonical identity and key of one structure.
    Inchi {
        #[arg(value_name = "SMILES")]
        smiles: String,
    },
}

fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    match Cli::parse().command {
        Command::Run { config, query, top_n, output_dir } => {
            let mut settings = PipelineConfig::load(&config)
                .with_context(|| format!("loading configuration {}", config.display()))?;
            if query.is_some() {
                settings.ranking.query = query;
            }
            if let Some(n) = top_n {
                settings.ranking.top_n = n;
            }
            if let Some(dir) = output_dir {
                settings.output_dir = dir;
            }

            let pipeline = Pipeline::new(settings)?;
            let report = pipeline.run()?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Inchi { smiles } => {
            let toolkit = ChemToolkit::new(ToolkitConfig::default())?;
            let Some(identity) = toolkit.to_canonical_identity(Some(smiles.as_str())) else {
                bail!("could not canonicalize '{smiles}'");
            };
            println!("{identity}");
            if let Some(hash) = toolkit.to_identity_hash(&identity) {
                println!("{}", hash.prefixed());
            }
        }
    }
    Ok(())
}
