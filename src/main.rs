//! gencle: generate language bindings from annotated CLIc tier headers.
//!
//! - **generate**: `gencle generate clic/include -o out -s managed -s native`
//! - **bridge**: `gencle bridge --target CLIJ3.java --headers clic/include`
//! - **parse**: `gencle parse clic/include -o tiers.json`

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gencle::bridge::{self, BridgeMethod};
use gencle::pipeline::{parse_tiers, TierOutcome, TierSource};
use gencle::{io, Config, SurfaceKind, Tier};
use std::path::{Path, PathBuf};

/// Picked up from the working directory when `--config` is not given.
const DEFAULT_CONFIG: &str = "gencle.toml";

#[derive(Parser)]
#[command(
    name = "gencle",
    version,
    about = "Generate native, Python and Java bindings from annotated CLIc tier headers"
)]
struct Cli {
    /// More log output (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render tier units and umbrellas for the selected surfaces
    Generate {
        /// Tier headers, directories (searched for tier*.hpp) or glob patterns
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Output root; unit paths are relative to it
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Surface to render: native, binding, scripting, managed.
        /// Can be given multiple times; all surfaces when omitted.
        #[arg(short = 's', long = "surface")]
        surfaces: Vec<SurfaceKind>,

        /// Configuration file (default: ./gencle.toml when present)
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,

        /// Keep the previous version of overwritten files as <file>.backup
        #[arg(long)]
        backup: bool,
    },

    /// Splice delegating methods into a legacy class between its markers
    Bridge {
        /// Class holding the BEGIN/END AUTO-GENERATED FUNCTIONS markers
        #[arg(long)]
        target: PathBuf,

        /// Tier headers, directories or glob patterns
        #[arg(
            long,
            num_args = 1..,
            required_unless_present = "managed",
            conflicts_with = "managed"
        )]
        headers: Vec<String>,

        /// Generated TierN.java classes, directories or glob patterns
        #[arg(long, num_args = 1..)]
        managed: Vec<String>,

        /// Configuration file (default: ./gencle.toml when present)
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,

        /// Keep the previous target as <file>.backup
        #[arg(long)]
        backup: bool,

        /// Print the updated class to stdout instead of writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Dump the parsed function descriptors as JSON
    Parse {
        /// Tier headers, directories or glob patterns
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Write to this file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Configuration file (default: ./gencle.toml when present)
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    gencle::init_tracing(cli.verbose);

    match cli.command {
        Command::Generate {
            inputs,
            output,
            surfaces,
            config,
            backup,
        } => generate(&inputs, &output, surfaces, config.as_deref(), backup),
        Command::Bridge {
            target,
            headers,
            managed,
            config,
            backup,
            dry_run,
        } => run_bridge(&target, &headers, &managed, config.as_deref(), backup, dry_run),
        Command::Parse {
            inputs,
            output,
            config,
        } => run_parse(&inputs, output.as_deref(), config.as_deref()),
    }
}

fn generate(
    inputs: &[String],
    output: &Path,
    mut surfaces: Vec<SurfaceKind>,
    config_path: Option<&Path>,
    backup: bool,
) -> Result<()> {
    let config = resolve_config(config_path)?;
    if surfaces.is_empty() {
        surfaces = SurfaceKind::ALL.to_vec();
    }
    surfaces.sort();
    surfaces.dedup();

    let files = expand_inputs(inputs, io::list_tier_files)?;
    if files.is_empty() {
        anyhow::bail!("no tier headers found");
    }
    let sources = read_tier_sources(&files, io::tier_index_from_path)?;

    let generation = gencle::generate(sources, &config, &surfaces);

    for unit in generation.units() {
        let path = output.join(&unit.path);
        io::write_with_backup(&path, &unit.text, backup)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    let mut failed = 0;
    for outcome in &generation.tiers {
        match outcome {
            TierOutcome::Generated(out) => {
                tracing::info!(
                    tier = out.tier.index,
                    warnings = out.warnings.len(),
                    "{} done",
                    out.label
                );
            }
            TierOutcome::Failed { label, error, .. } => {
                eprintln!("error: {label}: {error}");
                failed += 1;
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} tier(s) failed, the others were written");
    }
    Ok(())
}

fn run_bridge(
    target: &Path,
    headers: &[String],
    managed: &[String],
    config_path: Option<&Path>,
    backup: bool,
    dry_run: bool,
) -> Result<()> {
    let config = resolve_config(config_path)?;

    let methods: Vec<BridgeMethod> = if headers.is_empty() {
        let files = expand_inputs(managed, io::list_managed_files)?;
        read_tier_sources(&files, io::managed_tier_index)?
            .iter()
            .flat_map(|s| bridge::scan::scan_managed(s.index, &s.text))
            .collect()
    } else {
        load_tiers(headers, &config)?
            .iter()
            .flat_map(|tier| bridge::from_descriptors(tier.index, &tier.functions, &config.managed))
            .collect()
    };
    if methods.is_empty() {
        eprintln!("warning: no methods found, the marked section will be emptied");
    }

    let block = bridge::render(&methods, &config.bridge);
    let content = io::read_text(target)?;
    let updated = bridge::splice(&content, &block, &config.bridge)
        .with_context(|| format!("cannot update {}", target.display()))?;

    if dry_run {
        print!("{updated}");
        return Ok(());
    }
    io::write_with_backup(target, &updated, backup)
        .with_context(|| format!("failed to write {}", target.display()))?;
    Ok(())
}

fn run_parse(
    inputs: &[String],
    output: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = resolve_config(config_path)?;
    let tiers = load_tiers(inputs, &config)?;
    let mut json = serde_json::to_string_pretty(&tiers).context("failed to encode descriptors")?;
    json.push('\n');

    match output {
        Some(path) => {
            io::write_with_backup(path, &json, false)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => print!("{json}"),
    }
    Ok(())
}

/// Parse every tier header behind `patterns`; the first failure aborts.
fn load_tiers(patterns: &[String], config: &Config) -> Result<Vec<Tier>> {
    let files = expand_inputs(patterns, io::list_tier_files)?;
    if files.is_empty() {
        anyhow::bail!("no tier headers found");
    }
    let sources = read_tier_sources(&files, io::tier_index_from_path)?;
    parse_tiers(&sources, &config.parse).map_err(|(source, error)| {
        anyhow::Error::new(error).context(format!("failed to parse {}", source.label))
    })
}

/// Load the explicit config, else `./gencle.toml` if present, else defaults.
fn resolve_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => Ok(gencle::load_config(p)?),
        None => {
            let candidate = Path::new(DEFAULT_CONFIG);
            if candidate.is_file() {
                Ok(gencle::load_config(candidate)?)
            } else {
                Ok(Config::default())
            }
        }
    }
}

/// Expand files, directories and glob patterns into a sorted file list.
fn expand_inputs(
    patterns: &[String],
    list_dir: fn(&Path) -> gencle::Result<Vec<PathBuf>>,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            files.extend(list_dir(path)?);
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            eprintln!("warning: no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn read_tier_sources(
    files: &[PathBuf],
    index_of: fn(&Path) -> Option<u32>,
) -> Result<Vec<TierSource>> {
    let mut sources: Vec<TierSource> = files
        .iter()
        .map(|path| -> Result<TierSource> {
            let index = index_of(path)
                .with_context(|| format!("cannot derive a tier index from {}", path.display()))?;
            let text = io::read_text(path)?;
            Ok(TierSource {
                index,
                label: path.display().to_string(),
                text,
            })
        })
        .collect::<Result<_>>()?;
    sources.sort_by_key(|s| s.index);
    Ok(sources)
}
