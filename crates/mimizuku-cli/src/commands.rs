//! CLI command definitions and handlers

use anyhow::{bail, Context, Result};
use clap::Parser;
use mimizuku_owl::loader::{OntologyLoader, TurtleLoader};
use mimizuku_owl::{AssertedReasoner, Ontology};
use mimizuku_uml::render;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use tracing::info;

/// Output target literal selecting standard output (matched
/// case-insensitively).
pub const SYSOUT: &str = "sysout";

/// Main CLI structure
#[derive(Parser)]
#[command(name = "mimizuku")]
#[command(about = "Project a classified OWL ontology into a PlantUML class diagram")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Output target: `sysout` for standard output, otherwise a file path
    /// that must not exist yet
    pub output: String,

    /// Input ontology documents (Turtle / N-Triples)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
}

/// Load and merge every input document, classify the asserted taxonomy and
/// write the diagram to the selected target.
pub fn run(cli: Cli) -> Result<()> {
    let loader = TurtleLoader;
    let mut merged = Ontology::new();
    for path in &cli.inputs {
        info!(document = %path.display(), "loading ontology document");
        let document = loader
            .load_document(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        merged.merge(document);
    }

    info!("classifying asserted taxonomy");
    let reasoner = AssertedReasoner::classify(&merged);

    if cli.output.eq_ignore_ascii_case(SYSOUT) {
        info!("writing diagram to standard output");
        let stdout = io::stdout();
        render(&reasoner, stdout.lock())?;
    } else {
        let path = Path::new(&cli.output);
        if path.exists() {
            bail!("Output file already exists: {}", path.display());
        }
        info!(output = %path.display(), "writing diagram");
        let file = File::create(path)
            .with_context(|| format!("cannot create {}", path.display()))?;
        render(&reasoner, BufWriter::new(file))?;
    }

    info!("done");
    Ok(())
}
