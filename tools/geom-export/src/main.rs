//! geom-export - Nethercore geometry export tool
//!
//! Generates the primitive shapes listed in a geometry.toml manifest and
//! writes them as OBJ files.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use geom_export::manifest;
use nether_geom::{ShapeKind, Topology};

#[derive(Parser)]
#[command(name = "geom-export")]
#[command(about = "Nethercore geometry export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate every shape in a manifest and write OBJ files
    Build {
        /// Path to geometry.toml manifest
        #[arg(default_value = "geometry.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate every shape and report counts without writing
    Check {
        /// Path to geometry.toml manifest
        #[arg(default_value = "geometry.toml")]
        manifest: PathBuf,
    },

    /// Print which topologies each shape can produce
    Matrix,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build { manifest, output } => {
            tracing::info!("Building geometry from {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            let written = manifest::build_all(&config, output.as_deref())?;
            tracing::info!("Build complete! {} meshes written", written.len());
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            let entries = manifest::check(&config)?;
            tracing::info!("Manifest is valid! {} shapes", entries.len());
        }

        Commands::Matrix => print_matrix(),
    }

    Ok(())
}

/// N = native, C = converted, P = planned, U = unsupported
fn print_matrix() {
    print!("{:<12}", "");
    for topology in Topology::ALL {
        print!(" {:>24}", topology.name());
    }
    println!();

    for kind in ShapeKind::ALL {
        print!("{:<12}", kind.name());
        for topology in Topology::ALL {
            print!(" {:>24}", kind.support(topology).code());
        }
        println!();
    }
}
