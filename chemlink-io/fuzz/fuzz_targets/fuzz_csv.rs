#![no_main]
use chemlink_io::{read_csv_from, ReadOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = read_csv_from(data, "fuzz", &ReadOptions::default());
    let _ = read_csv_from(data, "fuzz", &ReadOptions { has_headers: false, ..ReadOptions::default() });
});
