//! Tier-by-tier generation across surfaces.
//!
//! Every tier is parsed and rendered on its own: a broken header fails its
//! tier only, and umbrellas list the tiers that succeeded.

use crate::config::{Config, ParseConfig};
use crate::error::{Error, Result, Warning};
use crate::model::Tier;
use crate::parser::parse_header;
use crate::render::{create_surface, RenderedUnit, SurfaceKind};

/// Header text of one tier.
#[derive(Debug, Clone)]
pub struct TierSource {
    pub index: u32,
    /// Shown in diagnostics, usually the file path
    pub label: String,
    pub text: String,
}

#[derive(Debug)]
pub struct TierOutput {
    pub tier: Tier,
    pub label: String,
    pub units: Vec<RenderedUnit>,
    pub warnings: Vec<Warning>,
}

#[derive(Debug)]
pub enum TierOutcome {
    Generated(TierOutput),
    Failed { index: u32, label: String, error: Error },
}

impl TierOutcome {
    pub fn index(&self) -> u32 {
        match self {
            TierOutcome::Generated(out) => out.tier.index,
            TierOutcome::Failed { index, .. } => *index,
        }
    }
}

#[derive(Debug, Default)]
pub struct Generation {
    /// Ascending tier order
    pub tiers: Vec<TierOutcome>,
    pub umbrellas: Vec<RenderedUnit>,
}

impl Generation {
    /// Every unit to write: tier units first, then umbrellas.
    pub fn units(&self) -> impl Iterator<Item = &RenderedUnit> {
        self.tiers
            .iter()
            .filter_map(|t| match t {
                TierOutcome::Generated(out) => Some(out.units.iter()),
                TierOutcome::Failed { .. } => None,
            })
            .flatten()
            .chain(self.umbrellas.iter())
    }

    pub fn failures(&self) -> impl Iterator<Item = (u32, &str, &Error)> {
        self.tiers.iter().filter_map(|t| match t {
            TierOutcome::Failed { index, label, error } => Some((*index, label.as_str(), error)),
            TierOutcome::Generated(_) => None,
        })
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Parse one tier header.
pub fn parse_tier(source: &TierSource, config: &ParseConfig) -> Result<(Tier, Vec<Warning>)> {
    let mut warnings = Vec::new();
    let functions = parse_header(&source.text, config, &mut warnings)?;
    Ok((
        Tier {
            index: source.index,
            functions,
        },
        warnings,
    ))
}

/// Error for a tier index seen in more than one source.
pub fn duplicate_tier(index: u32) -> Error {
    Error::malformed(0, format!("tier {index} is given more than once"))
}

/// Parse every source, stopping at the first failure. A tier index given
/// twice is a failure of the later source.
pub fn parse_tiers<'a>(
    sources: &'a [TierSource],
    config: &ParseConfig,
) -> std::result::Result<Vec<Tier>, (&'a TierSource, Error)> {
    let mut tiers: Vec<Tier> = Vec::with_capacity(sources.len());
    for source in sources {
        if tiers.iter().any(|t| t.index == source.index) {
            return Err((source, duplicate_tier(source.index)));
        }
        let (tier, _) = parse_tier(source, config).map_err(|e| (source, e))?;
        tiers.push(tier);
    }
    Ok(tiers)
}

/// Parse and render every tier for every requested surface.
pub fn generate(
    mut sources: Vec<TierSource>,
    config: &Config,
    kinds: &[SurfaceKind],
) -> Generation {
    sources.sort_by_key(|s| s.index);
    let surfaces: Vec<_> = kinds.iter().map(|&k| create_surface(k, config)).collect();

    let mut tiers: Vec<TierOutcome> = Vec::new();
    for source in sources {
        if tiers.iter().any(|t| t.index() == source.index) {
            tiers.push(TierOutcome::Failed {
                index: source.index,
                label: source.label,
                error: duplicate_tier(source.index),
            });
            continue;
        }

        let outcome = match parse_tier(&source, &config.parse) {
            Ok((tier, mut warnings)) => {
                let units = surfaces
                    .iter()
                    .map(|s| s.render_tier(&tier, &mut warnings))
                    .collect();
                tracing::info!(
                    tier = tier.index,
                    functions = tier.functions.len(),
                    "tier generated"
                );
                TierOutcome::Generated(TierOutput {
                    tier,
                    label: source.label,
                    units,
                    warnings,
                })
            }
            Err(error) => {
                tracing::error!(tier = source.index, label = %source.label, %error, "tier failed");
                TierOutcome::Failed {
                    index: source.index,
                    label: source.label,
                    error,
                }
            }
        };
        tiers.push(outcome);
    }

    let parsed: Vec<Tier> = tiers
        .iter()
        .filter_map(|t| match t {
            TierOutcome::Generated(out) => Some(out.tier.clone()),
            TierOutcome::Failed { .. } => None,
        })
        .collect();
    let umbrellas = surfaces
        .iter()
        .filter_map(|s| s.render_umbrella(&parsed))
        .collect();

    Generation { tiers, umbrellas }
}
