#![no_main]

use fntrace::filter::NameFilter;
use fntrace::sanitize::{clean_name, MAX_NAME_LEN};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let name = clean_name(input);
        assert!(name.len() <= MAX_NAME_LEN);
        assert!(name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));

        // Filter expressions must never panic either
        let _ = NameFilter::from_expr(input);
    }
});
