use std::collections::BTreeSet;

use chemlink::{
    aggregate, normalize_records, rank_similar, select_overlap, select_overlap_with, CandidateRecord, CompoundRecord,
    LabeledSource, OverlapMode, SourceSpec,
};
use chemlink_chem::{ChemToolkit, ToolkitConfig};
use proptest::prelude::*;

const ASPIRIN: &str = "CC(=O)Oc1ccccc1C(=O)O";

fn toolkit() -> ChemToolkit {
    ChemToolkit::new(ToolkitConfig::default()).unwrap()
}

fn source(toolkit: &ChemToolkit, label: &str, rows: &[(Option<&str>, Option<&str>)]) -> LabeledSource {
    let records: Vec<CompoundRecord> = rows.iter().map(|&(smiles, name)| CompoundRecord::new(smiles, name)).collect();
    normalize_records(&records, &SourceSpec::new(label, "SMILES", "Name"), toolkit)
}

fn wanted(combos: &[&str]) -> BTreeSet<String> {
    combos.iter().map(|c| c.to_string()).collect()
}

#[test]
fn one_compound_in_two_of_three_sources() {
    let tk = toolkit();
    let a = source(&tk, "A", &[(Some(ASPIRIN), Some("aspirin"))]);
    let b = source(&tk, "B", &[(Some(ASPIRIN), Some("ASA"))]);
    let c = source(&tk, "C", &[]);

    let merged = aggregate(&[a, b, c]).unwrap();
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].source_labels(), "A, B");
    assert_eq!(merged[0].names(), ["aspirin", "ASA"]);
    assert_eq!(merged[0].first_name(), Some("aspirin"));
}

#[test]
fn overlap_is_order_sensitive() {
    let tk = toolkit();
    let a = source(&tk, "A", &[(Some("CCO"), Some("ethanol"))]);
    let b = source(&tk, "B", &[(Some("OCC"), Some("ethyl alcohol"))]);
    let merged = aggregate(&[a, b]).unwrap();

    assert_eq!(select_overlap(&merged, &wanted(&["A, B"])).len(), 1);
    assert!(select_overlap(&merged, &wanted(&["B, A"])).is_empty());
    assert_eq!(select_overlap_with(&merged, &wanted(&["B, A"]), OverlapMode::ContainsAll).len(), 1);
}

#[test]
fn three_way_compounds_are_not_two_way_overlap() {
    let tk = toolkit();
    let sources: Vec<LabeledSource> = ["A", "B", "C"]
        .iter()
        .map(|label| source(&tk, label, &[(Some("CCN"), Some("ethylamine"))]))
        .collect();
    let merged = aggregate(&sources).unwrap();
    assert_eq!(merged[0].source_labels(), "A, B, C");
    assert!(select_overlap(&merged, &wanted(&["A, B", "B, C"])).is_empty());
    assert_eq!(select_overlap_with(&merged, &wanted(&["A, C"]), OverlapMode::ContainsAll).len(), 1);
}

#[test]
fn unparsable_structures_never_overlap() {
    let tk = toolkit();
    let a = source(&tk, "A", &[(Some("not a molecule"), Some("junk")), (None, Some("nameless structure"))]);
    let b = source(&tk, "B", &[(Some("C1CC"), Some("broken ring"))]);
    let merged = aggregate(&[a, b]).unwrap();

    assert_eq!(merged.len(), 1);
    assert!(merged[0].identity.is_none());
    assert_eq!(merged[0].names(), ["junk", "broken ring"]);
    assert!(select_overlap(&merged, &wanted(&["A, B"])).is_empty());
}

#[test]
fn labels_and_names_stay_in_lock_step() {
    let tk = toolkit();
    let a = source(&tk, "A", &[(Some("CCO"), Some("ethanol")), (Some("C"), None)]);
    let b = source(&tk, "B", &[(Some("C"), Some("methane")), (Some("OCC"), Some("EtOH"))]);
    for compound in aggregate(&[a, b]).unwrap() {
        assert_eq!(compound.labels().len(), compound.names().len());
    }
}

#[test]
fn ethanol_query_finds_itself_first() {
    let pool: Vec<CandidateRecord> = [("aspirin", ASPIRIN), ("benzene", "c1ccccc1"), ("ethanol", "CCO"), ("butanol", "CCCCO")]
        .iter()
        .map(|&(name, smiles)| CandidateRecord { name: Some(name.into()), smiles: Some(smiles.into()) })
        .collect();
    let hits = rank_similar(&toolkit(), "CCO", &pool, 5).unwrap();
    assert_eq!(hits.len(), 4);
    assert_eq!(hits[0].name.as_deref(), Some("ethanol"));
    assert_eq!(hits[0].similarity, 1.0);
    assert!(hits.iter().all(|h| (0.0..=1.0).contains(&h.similarity)));
}

#[test]
fn similarity_is_symmetric() {
    let tk = toolkit();
    let pairs = [("CCO", "CCCO"), (ASPIRIN, "c1ccccc1"), ("CN", "CCN")];
    for (a, b) in pairs {
        let fa = tk.fingerprint_notation(a).unwrap();
        let fb = tk.fingerprint_notation(b).unwrap();
        assert_eq!(tk.similarity(&fa, &fb).unwrap(), tk.similarity(&fb, &fa).unwrap());
        assert_eq!(tk.similarity(&fa, &fa).unwrap(), 1.0);
    }
}

#[test]
fn kekule_and_aromatic_notations_are_one_compound() {
    let tk = toolkit();
    let a = source(&tk, "A", &[(Some(ASPIRIN), Some("aspirin")), (Some("c1ccncc1"), Some("pyridine"))]);
    let b = source(&tk, "B", &[(Some("CC(=O)OC1=CC=CC=C1C(=O)O"), Some("ASA")), (Some("C1=CC=NC=C1"), Some("azine"))]);
    let merged = aggregate(&[a, b]).unwrap();
    assert_eq!(merged.len(), 2);
    assert!(merged.iter().all(|c| c.source_labels() == "A, B"));

    let pool = vec![CandidateRecord { name: Some("benzene".into()), smiles: Some("C1=CC=CC=C1".into()) }];
    let hits = rank_similar(&tk, "c1ccccc1", &pool, 1).unwrap();
    assert_eq!(hits[0].similarity, 1.0);
}

proptest! {
    #[test]
    fn normalizing_twice_changes_nothing(picks in proptest::collection::vec(0usize..5, 0..20)) {
        let structures = ["CCO", "OCC", "C", "CCN", "C("];
        let tk = toolkit();
        let records: Vec<CompoundRecord> = picks
            .iter()
            .enumerate()
            .map(|(i, &p)| CompoundRecord::new(Some(structures[p]), Some(format!("n{i}").as_str())))
            .collect();
        let spec = SourceSpec::new("A", "SMILES", "Name");
        let once = normalize_records(&records, &spec, &tk);

        let identities: BTreeSet<_> = once.rows.iter().map(|r| r.identity.clone()).collect();
        prop_assert_eq!(identities.len(), once.rows.len());

        let mut doubled = records.clone();
        doubled.extend(records.iter().cloned());
        prop_assert_eq!(normalize_records(&doubled, &spec, &tk), once);
    }

    #[test]
    fn top_n_is_bounded(n in 0usize..10, size in 0usize..8) {
        let chains: Vec<String> = (1..=size).map(|k| "C".repeat(k)).collect();
        let pool: Vec<CandidateRecord> = chains
            .iter()
            .map(|s| CandidateRecord { name: None, smiles: Some(s.clone()) })
            .collect();
        let hits = rank_similar(&toolkit(), "CCO", &pool, n).unwrap();
        prop_assert_eq!(hits.len(), n.min(size));
    }
}
