use std::fs;
use std::path::Path;

use chemlink::{Pipeline, PipelineConfig, APPROVED_COLUMN};
use chemlink_chem::identity_to_hash;
use chemlink_io::{read_csv, ReadOptions};

const ASPIRIN: &str = "CC(=O)Oc1ccccc1C(=O)O";
const ASPIRIN_INCHI: &str = "InChI=1S/C9H8O4/c1-6(10)13-8-5-3-2-4-7(8)9(11)12/h2-5H,1H3,(H,11,12)";
const ETHANOL_INCHI: &str = "InChI=1S/C2H6O/c1-2-3/h3H,2H2,1H3";
const PROPANOL_INCHI: &str = "InChI=1S/C3H8O/c1-2-3-4/h4H,2-3H2,1H3";

fn write(dir: &Path, name: &str, text: &str) {
    fs::write(dir.join(name), text).unwrap();
}

/// Lay out the default input files in `dir`. The catalog carries standard
/// InChI strings as an external registry would.
fn seed_inputs(dir: &Path) {
    write(dir, "DC_Compounds.csv", &format!("ID,INN,SMILES\n1,acetylsalicylic acid,{ASPIRIN}\n2,ethylamine,CCN\n"));
    write(dir, "FDA_Approved.csv", "1,ASPIRIN\n");
    write(
        dir,
        "Drug_Target.csv",
        "STRUCT_ID,DRUG_NAME,TARGET_NAME\n1,aspirin,COX-1\n1,aspirin,COX-2\n2,ethylamine,unknown\n",
    );
    write(
        dir,
        "SGC_Compounds.csv",
        "Donated chemical probes,,\nCompound name,SMILES (unique cis trans),Target\nEtOH-probe,CCO,X\npending,,Y\nbroken,C1CC,Z\n",
    );
    write(
        dir,
        "ChemicalProbesPortal.csv",
        &format!("Probe name,SMILES\naspirin probe,{ASPIRIN}\nethanol probe,OCC\nmethylamine,CN\n"),
    );
    write(
        dir,
        "compounds_cv.csv",
        &format!(
            "Compound InChi,Compound SMILES,Virtual Compound Preferred Name\n\"{ETHANOL_INCHI}\",CCO,ethanol\n\"{ASPIRIN_INCHI}\",{ASPIRIN},aspirin\n\"{PROPANOL_INCHI}\",CCCO,propanol\n",
        ),
    );
}

fn run_defaults(dir: &Path) -> chemlink::PipelineReport {
    run_with(dir, r#"{ "output_dir": "out" }"#)
}

fn run_with(dir: &Path, json: &str) -> chemlink::PipelineReport {
    seed_inputs(dir);
    let config_path = dir.join("pipeline.json");
    fs::write(&config_path, json).unwrap();
    let config = PipelineConfig::load(&config_path).unwrap();
    Pipeline::new(config).unwrap().run().unwrap()
}

#[test]
fn default_layout_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let report = run_defaults(dir.path());

    assert_eq!(report.approved, Some(1));
    let labels: Vec<&str> = report.sources.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, ["Drug Central", "SGC", "Chemical Probes"]);
    assert_eq!(report.sources[0].rows, 3);
    assert_eq!(report.sources[0].distinct, 2);
    assert_eq!(report.sources[1].unresolved, 1);
    // aspirin, ethylamine, ethanol, unresolved, methylamine
    assert_eq!(report.aggregated, 5);
    assert_eq!(report.selected, 2);
    assert_eq!(report.candidates, 2);
    assert_eq!(report.ranked, 2);
    assert_eq!(report.top_similarity, Some(1.0));

    let out = dir.path().join("out");
    let aggregated = read_csv(out.join("aggregated.csv"), &ReadOptions::default()).unwrap();
    assert_eq!(aggregated.columns(), ["InChI", "Compound", "Source"]);
    assert_eq!(
        aggregated.column("Source").unwrap(),
        vec![
            Some("Drug Central, Chemical Probes"),
            Some("Drug Central"),
            Some("SGC, Chemical Probes"),
            Some("SGC"),
            Some("Chemical Probes"),
        ]
    );
    assert_eq!(aggregated.get(0, "Compound").unwrap(), Some("aspirin, aspirin probe"));
    assert_eq!(aggregated.get(3, "InChI").unwrap(), None);

    let drug = read_csv(out.join("drug_central.csv"), &ReadOptions::default()).unwrap();
    assert!(drug.has_column(APPROVED_COLUMN));
    assert!(!drug.has_column("INN"));
    assert_eq!(drug.column(APPROVED_COLUMN).unwrap(), vec![Some("1"), Some("1"), Some("0")]);

    let selected = read_csv(out.join("selected_inchikey.csv"), &ReadOptions::default()).unwrap();
    assert_eq!(selected.columns(), ["InChI", "InChIKey"]);
    assert_eq!(selected.len(), 2);

    let adjusted = read_csv(out.join("adjusted_inchikey.csv"), &ReadOptions::default()).unwrap();
    assert!(adjusted.column("InChIKey").unwrap().iter().all(|k| k.is_some_and(|k| k.starts_with("ChemLinkKey="))));

    let all_keys = read_csv(out.join("all_inchikey.csv"), &ReadOptions::default()).unwrap();
    let keys = all_keys.column("InChIKey").unwrap();
    assert_eq!(keys.iter().flatten().count(), 4);

    let ranking = read_csv(out.join("ranking.csv"), &ReadOptions::default()).unwrap();
    assert_eq!(ranking.columns(), ["Name", "SMILES", "Similarity"]);
    assert_eq!(ranking.get(0, "Name").unwrap(), Some("ethanol"));
    assert_eq!(ranking.get(0, "Similarity").unwrap(), Some("1"));

    let report_json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("report.json")).unwrap()).unwrap();
    assert_eq!(report_json["selected"], 2);
}

#[test]
fn catalog_inchi_strings_are_standard() {
    assert_eq!(identity_to_hash(ASPIRIN_INCHI).unwrap().as_str(), "BSYNRYMUTXBXSQ-UHFFFAOYSA-N");
    assert_eq!(identity_to_hash(ETHANOL_INCHI).unwrap().prefixed(), "InChIKey=LFQSCWFLJHTTHZ-UHFFFAOYSA-N");
}

#[test]
fn literal_catalog_matching_finds_no_foreign_identities() {
    let dir = tempfile::tempdir().unwrap();
    let report = run_with(dir.path(), r#"{ "output_dir": "out", "catalog": { "match_structures": false } }"#);
    assert_eq!(report.candidates, 0);
    assert_eq!(report.ranked, 0);
    assert!(!dir.path().join("out").join("ranking.csv").exists());
}

#[test]
fn absolute_drug_source_path_writes_inside_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let elsewhere = tempfile::tempdir().unwrap();
    let target = elsewhere.path().join("drugs.csv");
    let json = format!(
        r#"{{ "output_dir": "out", "drug_source": {{ "source": {{ "label": "Drug Central", "name_column": "DRUG_NAME", "path": {} }} }} }}"#,
        serde_json::to_string(&target).unwrap()
    );
    run_with(dir.path(), &json);
    assert!(dir.path().join("out").join("drugs.csv").exists());
    assert!(!target.exists());
}

#[test]
fn missing_input_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("pipeline.json");
    fs::write(&config_path, "{}").unwrap();
    let pipeline = Pipeline::new(PipelineConfig::load(&config_path).unwrap()).unwrap();
    assert!(pipeline.run().is_err());
}

#[test]
fn missing_column_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    seed_inputs(dir.path());
    write(dir.path(), "ChemicalProbesPortal.csv", "Probe,Structure\nx,CCO\n");
    let config_path = dir.path().join("pipeline.json");
    fs::write(&config_path, "{}").unwrap();
    let pipeline = Pipeline::new(PipelineConfig::load(&config_path).unwrap()).unwrap();
    let err = pipeline.run().unwrap_err();
    assert!(matches!(err, chemlink_core::ChemlinkError::MissingColumn { .. }));
}
