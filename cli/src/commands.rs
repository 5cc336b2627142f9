use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use thiserror::Error;

use usj_backend::converter::{convert_file, ConversionStats, ConvertOptions};
use usj_backend::logger;
use usj_backend::works::{preset_by_id, work_info_for_output, WorkInfo, WorkPreset, DEFAULT_LANGUAGE, WORK_PRESETS};
use usj_backend::writer::write_document;
use usj_backend::BookFilter;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Input path does not exist: {0:?}")]
    MissingInput(PathBuf),

    #[error("Input path is a directory, expected a USFX file: {0:?}")]
    InputIsDirectory(PathBuf),

    #[error("Unknown work preset: {0}")]
    UnknownPreset(String),

    #[error("{failed} of {total} sources failed to convert")]
    BatchFailed { failed: usize, total: usize },
}

/// Work identity given on the command line. Unset fields fall back to a
/// preset or to the output file name.
#[derive(Debug, Clone, Default)]
pub struct WorkOverrides {
    pub work_id: Option<String>,
    pub title: Option<String>,
    pub language: Option<String>,
    pub license: Option<String>,
    pub source: Option<String>,
}

pub fn resolve_work_info(input: &Path, output: &Path, overrides: &WorkOverrides) -> WorkInfo {
    let mut work = match &overrides.work_id {
        Some(id) => match preset_by_id(id) {
            Some(preset) => preset.work_info(),
            None => WorkInfo::new(id, id, DEFAULT_LANGUAGE),
        },
        None => work_info_for_output(output),
    };

    if let Some(title) = &overrides.title {
        work.title = title.clone();
    }
    if let Some(language) = &overrides.language {
        work.language = language.clone();
    }
    if let Some(license) = &overrides.license {
        work = work.with_license(license);
    }

    match &overrides.source {
        Some(source) => work.with_source(source),
        None => work.with_source_path(input),
    }
}

/// The default exclusion set, adjusted by `--exclude` and `--include`.
pub fn build_filter(exclude: &[String], include: &[String]) -> BookFilter {
    let mut filter = BookFilter::default();
    for code in exclude {
        filter.exclude(code);
    }
    for code in include {
        filter.include(code);
    }
    filter
}

pub fn check_input(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        Err(CliError::MissingInput(input.to_path_buf()))
    } else if input.is_dir() {
        Err(CliError::InputIsDirectory(input.to_path_buf()))
    } else {
        Ok(())
    }
}

/// Convert one USFX file and write the JSON document.
pub fn convert_one(input: &Path, output: &Path, work: &WorkInfo, options: &ConvertOptions) -> Result<ConversionStats> {
    check_input(input)?;

    let start = Instant::now();
    let converted = convert_file(input, work, options)?;
    write_document(&converted.document, output)?;

    logger::info(&format!(
        "Wrote {} ({} books, {} verses, {} diagnostics) in {}",
        output.display(),
        converted.stats.books_converted,
        converted.stats.verses,
        converted.diagnostics.len(),
        logger::format_duration(start.elapsed())
    ));

    Ok(converted.stats)
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub converted: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.converted.len() + self.failed.len()
    }

    pub fn into_result(self) -> Result<Self> {
        if self.failed.is_empty() {
            Ok(self)
        } else {
            Err(CliError::BatchFailed { failed: self.failed.len(), total: self.total() }.into())
        }
    }
}

/// Presets selected by id, or all of them when `ids` is empty.
pub fn select_presets(ids: &[String]) -> Result<Vec<&'static WorkPreset>> {
    if ids.is_empty() {
        return Ok(WORK_PRESETS.iter().collect());
    }

    ids.iter()
        .map(|id| preset_by_id(id).ok_or_else(|| anyhow::Error::from(CliError::UnknownPreset(id.clone()))))
        .collect()
}

/// Convert each preset's source under `bibles_dir` into `output_dir`.
/// A failing source is logged and the rest still run.
pub fn run_batch(
    bibles_dir: &Path,
    output_dir: &Path,
    presets: &[&WorkPreset],
    options: &ConvertOptions,
) -> BatchReport {
    let mut report = BatchReport::default();

    for preset in presets {
        let input = bibles_dir.join(preset.source_path);
        let output = output_dir.join(preset.output_file);
        let work = preset.work_info().with_source_path(&input);

        match convert_one(&input, &output, &work, options) {
            Ok(_) => report.converted.push(output),
            Err(e) => {
                logger::error(&format!("{}: {:#}", input.display(), e));
                report.failed.push((input, format!("{:#}", e)));
            }
        }
    }

    report
}

/// Create the output directory for a batch run.
pub fn prepare_output_dir(output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))
}
