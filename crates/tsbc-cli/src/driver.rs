//! Reads both surfaces, runs the detector and collects owned records.

use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::args::CliArgs;
use tsbc::{AssignDirection, AstContext, Detector, DetectorOptions, DiffRecord};

/// Everything one run found, keyed by declaration name.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub baseline: PathBuf,
    pub current: PathBuf,
    pub direction: AssignDirection,
    /// Functions and route tables ignore `direction` and use this one.
    pub fixed_direction: AssignDirection,
    pub declarations: IndexMap<String, Vec<DiffRecord>>,
}

impl Report {
    pub fn total(&self) -> usize {
        self.declarations.values().map(Vec::len).sum()
    }

    pub fn breaking_count(&self) -> usize {
        self.declarations
            .values()
            .flatten()
            .filter(|record| record.is_breaking())
            .count()
    }

    pub fn has_breaking(&self) -> bool {
        self.breaking_count() > 0
    }

    /// Path of the file a record's node came from.
    pub fn file_of(&self, side: tsbc::Side) -> &Path {
        match side {
            tsbc::Side::Baseline => &self.baseline,
            tsbc::Side::Current => &self.current,
        }
    }
}

/// Read a declaration file, dropping a leading byte order mark.
pub fn read_surface(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// Detector options from `--config`, or the defaults.
pub fn load_options(path: Option<&Path>) -> Result<DetectorOptions> {
    let Some(path) = path else {
        return Ok(DetectorOptions::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    DetectorOptions::from_json_str(&text)
        .with_context(|| format!("failed to load config {}", path.display()))
}

pub fn run(args: &CliArgs) -> Result<Report> {
    let options = load_options(args.config.as_deref())?;
    let baseline = read_surface(&args.baseline)?;
    let current = read_surface(&args.current)?;
    let direction = AssignDirection::from(args.direction);

    let baseline_name = args.baseline.display().to_string();
    let current_name = args.current.display().to_string();
    let ctx = match AstContext::from_sources(&baseline_name, &baseline, &current_name, &current) {
        Ok(ctx) => ctx,
        Err(err) => {
            let details: Vec<String> = err.diagnostics().iter().map(ToString::to_string).collect();
            bail!("{err}\n{}", details.join("\n"));
        }
    };

    let detector = Detector::new(&ctx, options);
    let pairs = if args.names.is_empty() {
        detector.detect_all_in(direction)
    } else {
        let mut selected = IndexMap::new();
        for name in &args.names {
            let known = ctx.baseline().index().find(name).is_some()
                || ctx.current().index().find(name).is_some();
            if !known {
                warn!(name = name.as_str(), "declaration not found on either surface");
                continue;
            }
            let pairs = detector.patch_declaration(name, direction);
            debug!(name = name.as_str(), pairs = pairs.len(), "patched declaration");
            if !pairs.is_empty() {
                selected.insert(name.clone(), pairs);
            }
        }
        selected
    };

    let declarations: IndexMap<String, Vec<DiffRecord>> = pairs
        .into_iter()
        .map(|(name, pairs)| {
            let records = pairs.iter().map(|pair| DiffRecord::new(&ctx, pair)).collect();
            (name, records)
        })
        .collect();
    info!(declarations = declarations.len(), "comparison finished");

    Ok(Report {
        baseline: args.baseline.clone(),
        current: args.current.clone(),
        direction,
        fixed_direction: Detector::FIXED_DIRECTION,
        declarations,
    })
}
