use std::fs;

use chrono::{FixedOffset, TimeZone};
use rcg_l10n::model::catalog::RecordState;
use rcg_l10n::model::config::{HeaderTemplate, ProjectConfig};
use rcg_l10n::model::document::Category;
use rcg_l10n::model::language::Language;
use rcg_l10n::services::{document, pipeline, storage, storage::CatalogLayout};

const SOURCE: &str = r#"{
  "Non_Dialog_Keys": [],
  "Useables_Keys": [],
  "Move_Keys": [],
  "Quest_Keys": [
    { "Key": "Q1", "English": "Go north", "French": "", "German": "Geh nach Norden" },
    { "Key": "Q2", "English": "Find the key", "French": "Trouve la clé", "German": "" },
    { "Key": "Q1", "English": "Go north!", "French": "", "German": "" },
    { "Key": "Q3", "English": "", "French": "Rien", "German": "" }
  ],
  "QuestItem_Keys": [],
  "Equip_Keys": [],
  "Store_Keys": [],
  "Dialog_Keys": [ { "Key": "D1", "English": "Hey!", "French": "Salut !", "German": "Hallo!" } ],
  "Tutorial_Keys": [],
  "MetaData_Keys": []
}"#;

fn header() -> HeaderTemplate {
    let ts = FixedOffset::east_opt(7200)
        .unwrap()
        .with_ymd_and_hms(2020, 6, 1, 8, 0, 0)
        .unwrap();
    HeaderTemplate::new(&ProjectConfig::default(), ts)
}

#[test]
fn untouched_catalogs_reproduce_the_document_byte_for_byte() {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("raw.json");
    fs::write(&raw, SOURCE).unwrap();

    // Normalize once: dedup, BOM, CRLF.
    let canonical = dir.path().join("RCG_LocalizationData.json");
    document::save(&document::load(&raw).unwrap(), &canonical).unwrap();

    let mut doc = document::load(&canonical).unwrap();
    let quest: Vec<&str> = doc.entries(Category::Quest).iter().map(|e| e.key()).collect();
    assert_eq!(quest, vec!["Q2", "Q1", "Q3"]);

    let layout = CatalogLayout::new(dir.path().join("translation"), "po");
    let langs = [Language::French, Language::German];
    let report = pipeline::run_extract(&doc, &layout, &header(), &langs, false);
    assert_eq!(report.failed, 0);

    let report = pipeline::run_pack(&mut doc, &layout, &langs);
    assert_eq!(report.applied, 0);

    let output = document::default_output_path(&canonical);
    document::save(&doc, &output).unwrap();
    assert_eq!(fs::read(&output).unwrap(), fs::read(&canonical).unwrap());
}

#[test]
fn reviewed_edit_survives_re_extract_and_reaches_the_document() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("RCG_LocalizationData.json");
    fs::write(&src, SOURCE).unwrap();
    let layout = CatalogLayout::new(dir.path().join("translation"), "po");
    let langs = [Language::French];

    let doc = document::load(&src).unwrap();
    pipeline::run_extract(&doc, &layout, &header(), &langs, false);

    // A translator fills Q1 and approves the seeded Q2.
    let path = layout.catalog_path(Category::Quest, Language::French);
    let mut cat = storage::load_catalog(&path).unwrap();
    for r in cat.records.iter_mut() {
        match r.context() {
            "Q1" => r.target = "Va vers le nord !".into(),
            "Q2" => r.set_fuzzy(false),
            _ => {}
        }
    }
    storage::save_catalog(&path, &cat).unwrap();

    // Running extract again must not undo that work.
    pipeline::run_extract(&doc, &layout, &header(), &langs, false);
    let cat = storage::load_catalog(&path).unwrap();
    let states: Vec<(&str, RecordState)> = cat.records.iter().map(|r| (r.context(), r.state())).collect();
    assert_eq!(states, vec![("Q2", RecordState::Reviewed), ("Q1", RecordState::Reviewed)]);

    let mut doc = document::load(&src).unwrap();
    let report = pipeline::run_pack(&mut doc, &layout, &langs);
    assert_eq!(report.applied, 1);
    assert_eq!(report.failed, 0);

    let q1 = doc.entry(Category::Quest, "Q1").unwrap();
    assert_eq!(q1.text(Language::French), "Va vers le nord !");
    let d1 = doc.entry(Category::Dialog, "D1").unwrap();
    assert_eq!(d1.text(Language::French), "Salut !");
}
