#![no_main]

use libfuzzer_sys::fuzz_target;
use sentryedge_normalizer::{normalize_timestamp, parse_timestamp};

fuzz_target!(|data: &[u8]| {
    let Ok(candidate) = std::str::from_utf8(data) else {
        return;
    };

    // 정규 형식은 다시 정규화해도 바뀌지 않아야 함
    let canonical = normalize_timestamp(Some(candidate));
    assert!(parse_timestamp(&canonical).is_some());
    assert_eq!(normalize_timestamp(Some(&canonical)), canonical);
});
