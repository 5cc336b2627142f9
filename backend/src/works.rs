//! Descriptions of the works being converted

use std::path::Path;

pub const DEFAULT_LICENSE: &str = "Public Domain";
pub const DEFAULT_LANGUAGE: &str = "en";

/// Identity of a work, supplied by the caller for each conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkInfo {
    pub id: String,
    pub title: String,
    pub language: String,
    pub license: String,
    pub source: String,
}

impl WorkInfo {
    pub fn new(id: &str, title: &str, language: &str) -> Self {
        WorkInfo {
            id: id.to_string(),
            title: title.to_string(),
            language: language.to_string(),
            license: DEFAULT_LICENSE.to_string(),
            source: String::new(),
        }
    }

    pub fn with_license(mut self, license: &str) -> Self {
        self.license = license.to_string();
        self
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    /// Describe where the text came from, e.g. `Converted from USFX: kjv.xml`.
    pub fn with_source_path(self, path: &Path) -> Self {
        let source = format!("Converted from USFX: {}", path.display());
        self.with_source(&source)
    }
}

/// A built-in work and where its USFX source and JSON output live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkPreset {
    pub id: &'static str,
    pub title: &'static str,
    pub language: &'static str,
    /// Relative to the bibles directory.
    pub source_path: &'static str,
    pub output_file: &'static str,
}

impl WorkPreset {
    pub fn work_info(&self) -> WorkInfo {
        WorkInfo::new(self.id, self.title, self.language)
    }
}

pub const WORK_PRESETS: &[WorkPreset] = &[
    WorkPreset {
        id: "kjv",
        title: "Holy Bible, King James Version",
        language: "en",
        source_path: "eng-kjv/bible_kjv_usfx.xml",
        output_file: "bible_kjv.json",
    },
    WorkPreset {
        id: "web",
        title: "World English Bible",
        language: "en",
        source_path: "eng-webu/bible_webu_usfx.xml",
        output_file: "bible_web.json",
    },
];

pub fn preset_by_id(id: &str) -> Option<&'static WorkPreset> {
    WORK_PRESETS.iter().find(|p| p.id.eq_ignore_ascii_case(id))
}

pub fn preset_by_output_file(file_name: &str) -> Option<&'static WorkPreset> {
    WORK_PRESETS.iter().find(|p| p.output_file == file_name)
}

/// Work identity for an output path: a preset if the file name matches one,
/// otherwise the file stem as id and title.
pub fn work_info_for_output(output: &Path) -> WorkInfo {
    let file_name = output.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    if let Some(preset) = preset_by_output_file(file_name) {
        return preset.work_info();
    }

    let stem = output.file_stem().and_then(|s| s.to_str()).unwrap_or("work");
    WorkInfo::new(stem, stem, DEFAULT_LANGUAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_lookup() {
        assert_eq!(preset_by_id("KJV").map(|p| p.output_file), Some("bible_kjv.json"));
        assert_eq!(preset_by_output_file("bible_web.json").map(|p| p.id), Some("web"));
        assert!(preset_by_id("nasb").is_none());
    }

    #[test]
    fn test_work_info_for_output() {
        let info = work_info_for_output(Path::new("out/bible_kjv.json"));
        assert_eq!(info.id, "kjv");
        assert_eq!(info.title, "Holy Bible, King James Version");
        assert_eq!(info.license, "Public Domain");

        let info = work_info_for_output(Path::new("out/asv.json"));
        assert_eq!(info.id, "asv");
        assert_eq!(info.title, "asv");
        assert_eq!(info.language, "en");
    }

    #[test]
    fn test_source_path_description() {
        let info = WorkInfo::new("kjv", "KJV", "en").with_source_path(Path::new("bibles/kjv.xml"));
        assert_eq!(info.source, "Converted from USFX: bibles/kjv.xml");
    }
}
