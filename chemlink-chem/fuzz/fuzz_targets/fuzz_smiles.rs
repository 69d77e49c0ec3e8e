#![no_main]
use chemlink_chem::{identity_to_hash, molecule_to_identity, parse_smiles, InchiOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(mol) = parse_smiles(data) {
        if let Ok(id) = molecule_to_identity(&mol, &InchiOptions::default()) {
            let _ = identity_to_hash(id.as_str());
        }
    }
});
