use std::path::{Path, PathBuf};
use std::process::exit;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;

use usj_backend::converter::ConvertOptions;
use usj_backend::logger;
use usj_cli::commands::{
    build_filter, convert_one, prepare_output_dir, resolve_work_info, run_batch, select_presets, WorkOverrides,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert USFX bibles to USJ-rich JSON", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log level: silent, error, warn, info, debug
    #[arg(long, global = true, value_name = "LEVEL", env = "LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Exclude this book code in addition to the defaults (repeatable)
    #[arg(long = "exclude", value_name = "CODE")]
    exclude: Vec<String>,

    /// Convert this book code even if it is excluded by default (repeatable)
    #[arg(long = "include", value_name = "CODE")]
    include: Vec<String>,

    /// Fail if any malformed markup had to be skipped
    #[arg(long, default_value_t = false)]
    strict: bool,
}

impl FilterArgs {
    fn options(&self) -> ConvertOptions {
        ConvertOptions {
            filter: build_filter(&self.exclude, &self.include),
            strict: self.strict,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a single USFX file
    #[command(arg_required_else_help = true)]
    Convert {
        /// Path to the USFX source
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Path of the JSON file to write
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Work id, e.g. kjv. Defaults to the preset matching OUTPUT, or its file stem.
        #[arg(long)]
        work_id: Option<String>,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        language: Option<String>,

        /// Defaults to "Public Domain"
        #[arg(long)]
        license: Option<String>,

        /// Source description. Defaults to "Converted from USFX: INPUT".
        #[arg(long)]
        source: Option<String>,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Convert the built-in KJV and WEB sources
    Batch {
        /// Directory holding eng-kjv/ and eng-webu/
        #[arg(long, value_name = "DIRECTORY_PATH", env = "USJ_BIBLES_DIR", default_value = "../bibles")]
        bibles_dir: PathBuf,

        #[arg(long, value_name = "DIRECTORY_PATH", env = "USJ_OUTPUT_DIR", default_value = ".")]
        output_dir: PathBuf,

        /// Only convert these presets (repeatable)
        #[arg(long = "only", value_name = "WORK_ID")]
        only: Vec<String>,

        #[command(flatten)]
        filter: FilterArgs,
    },
}

fn batch(bibles_dir: &Path, output_dir: &Path, only: &[String], options: &ConvertOptions) -> Result<()> {
    let presets = select_presets(only)?;
    prepare_output_dir(output_dir)?;

    let report = run_batch(bibles_dir, output_dir, &presets, options);
    for path in &report.converted {
        println!("Wrote {}", path.display());
    }
    for (path, err) in &report.failed {
        eprintln!("Failed {}: {}", path.display(), err);
    }

    report.into_result().map(|_| ())
}

fn main() {
    // .env may set LOG_LEVEL, USJ_BIBLES_DIR, USJ_OUTPUT_DIR, LOG_FILE
    dotenv().ok();

    let cli = Cli::parse();

    if let Some(level) = &cli.log_level {
        if !logger::set_log_level_str(level) {
            eprintln!("Warning: Unknown log level '{}', using {}", level, logger::get_log_level().as_str());
        }
    }

    let command_result = match cli.command {
        Commands::Convert { input, output, work_id, title, language, license, source, filter } => {
            let overrides = WorkOverrides { work_id, title, language, license, source };
            let work = resolve_work_info(&input, &output, &overrides);
            convert_one(&input, &output, &work, &filter.options()).map(|stats| {
                println!("Wrote {}: {} books, {} verses", output.display(), stats.books_converted, stats.verses);
            })
        }

        Commands::Batch { bibles_dir, output_dir, only, filter } => {
            batch(&bibles_dir, &output_dir, &only, &filter.options())
        }
    };

    if let Err(e) = command_result {
        eprintln!("Error executing command: {:#}", e);
        exit(1);
    }
}
