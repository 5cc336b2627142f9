use std::fs;
use std::path::Path;

use usj_backend::converter::ConvertOptions;
use usj_backend::works::WORK_PRESETS;
use usj_cli::commands::{convert_one, resolve_work_info, run_batch, select_presets, WorkOverrides};

const KJV_USFX: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<usfx>
<book id="FRT"><h>Preface</h></book>
<book id="GEN"><h>Genesis</h><c id="1"/>
<p sfm="p"><v id="1" bcv="GEN.1.1"/><w s="H7225">In the beginning</w> <w s="H430">God</w> created.<ve/></p>
</book>
</usfx>
"#;

fn write_source(dir: &Path, relative: &str, content: &str) {
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn test_convert_one_writes_json() {
    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path(), "kjv.xml", KJV_USFX);
    let input = dir.path().join("kjv.xml");
    let output = dir.path().join("out/bible_kjv.json");

    let work = resolve_work_info(&input, &output, &WorkOverrides::default());
    let stats = convert_one(&input, &output, &work, &ConvertOptions::default()).unwrap();
    assert_eq!(stats.books_converted, 1);
    assert_eq!(stats.books_excluded, 1);

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["id"], "kjv");
    assert_eq!(json["metadata"]["title"], "Holy Bible, King James Version");
    assert!(json["metadata"]["source"].as_str().unwrap().starts_with("Converted from USFX: "));
    assert!(json["books"].get("FRT").is_none());

    let verse = &json["books"]["GEN"]["chapters"]["1"]["verses"]["1"];
    assert_eq!(verse["text"], "In the beginning God created.");
    assert_eq!(verse["block"], "p");
    assert_eq!(verse["strongs"], serde_json::json!(["H7225", "H430"]));
}

#[test]
fn test_convert_one_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("missing.xml");
    let output = dir.path().join("out.json");
    let work = resolve_work_info(&input, &output, &WorkOverrides::default());

    let err = convert_one(&input, &output, &work, &ConvertOptions::default()).unwrap_err();
    assert!(err.to_string().contains("does not exist"));
    assert!(!output.exists());
}

#[test]
fn test_batch_continues_after_failed_source() {
    let bibles = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    write_source(bibles.path(), "eng-kjv/bible_kjv_usfx.xml", KJV_USFX);
    // Wrong dialect: must fail loudly instead of producing an empty document
    write_source(bibles.path(), "eng-webu/bible_webu_usfx.xml", "<osis><book id=\"GEN\"/></osis>");

    let presets = select_presets(&[]).unwrap();
    let report = run_batch(bibles.path(), out.path(), &presets, &ConvertOptions::default());

    assert_eq!(report.total(), WORK_PRESETS.len());
    assert_eq!(report.converted, vec![out.path().join("bible_kjv.json")]);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].1.contains("Not a USFX document"));
    assert!(!out.path().join("bible_web.json").exists());

    assert!(report.into_result().is_err());
}

#[test]
fn test_batch_only_selected_presets() {
    let bibles = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_source(bibles.path(), "eng-kjv/bible_kjv_usfx.xml", KJV_USFX);

    let presets = select_presets(&["kjv".to_string()]).unwrap();
    let report = run_batch(bibles.path(), out.path(), &presets, &ConvertOptions::default());

    assert!(report.failed.is_empty());
    assert!(report.into_result().is_ok());
}
