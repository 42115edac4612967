//! Normaliser CLI - convert customer claim exports to the normalised CSV
//!
//! ```bash
//! normaliser convert --source abc datafiles/ABC_2017_02_01.csv ABC-normalised
//! normaliser convert --profile acme.json acme.csv Acme-normalised
//! normaliser sources        # List built-in customer layouts
//! normaliser demo           # Convert the bundled sample files
//! ```

use clap::{Parser, Subcommand};
use normaliser::{convert, logging, sources, NormaliseOptions, SourceProfile};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Sample exports converted by `normaliser demo`.
const DEMO_FILES: [(&str, &str, &str); 2] = [
    ("abc", "datafiles/ABC_2017_02_01.csv", "ABC-normalised"),
    ("coverall", "datafiles/Coverall_2017_02_18.csv", "Coverall-normalised"),
];

#[derive(Parser)]
#[command(name = "normaliser")]
#[command(about = "Normalise health fund transaction exports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one customer CSV file
    Convert {
        /// Customer CSV file
        input: PathBuf,

        /// Output file name, without the .csv extension
        output_name: String,

        /// Built-in source layout (see `normaliser sources`)
        #[arg(short, long, conflicts_with = "profile", required_unless_present = "profile")]
        source: Option<String>,

        /// JSON source profile describing the layout
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Directory for the output file (default: working directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// List built-in source layouts
    Sources {
        /// Print each layout as a JSON profile
        #[arg(long)]
        json: bool,
    },

    /// Convert the bundled sample files
    Demo {
        /// Directory for the output files (default: working directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

fn main() {
    logging::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input,
            output_name,
            source,
            profile,
            output_dir,
        } => cmd_convert(&input, &output_name, source.as_deref(), profile.as_deref(), output_dir),

        Commands::Sources { json } => cmd_sources(json),

        Commands::Demo { output_dir } => cmd_demo(output_dir),
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn options(output_dir: Option<PathBuf>) -> NormaliseOptions {
    NormaliseOptions {
        output_dir: output_dir.unwrap_or_default(),
    }
}

fn cmd_convert(
    input: &Path,
    output_name: &str,
    source: Option<&str>,
    profile: Option<&Path>,
    output_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let profile = match (source, profile) {
        (_, Some(path)) => SourceProfile::from_path(path)?,
        (Some(name), None) => sources::find_source(name)?,
        (None, None) => return Err("either --source or --profile is required".into()),
    };

    info!("Converting {} as {}", input.display(), profile.name);
    let output = convert(&profile, input, output_name, &options(output_dir))?;
    info!("{} rows written, {} skipped", output.written, output.skipped);

    Ok(())
}

fn cmd_sources(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    for profile in sources::builtin_sources() {
        if json {
            println!("{}", profile.to_json()?);
        } else {
            println!("{:<10} {}", profile.name, profile.description);
        }
    }
    Ok(())
}

fn cmd_demo(output_dir: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let options = options(output_dir);

    for (source, input, output_name) in DEMO_FILES {
        let profile = sources::find_source(source)?;
        info!("Converting {} as {}", input, profile.name);
        convert(&profile, input, output_name, &options)?;
    }

    Ok(())
}
