#![no_main]

use libfuzzer_sys::fuzz_target;
use sentryedge_normalizer::{Normalizer, NormalizerConfig};

fuzz_target!(|data: &[u8]| {
    let normalizer = match Normalizer::new(NormalizerConfig::default()) {
        Ok(n) => n,
        Err(_) => return,
    };
    let body = String::from_utf8_lossy(data);

    // raw_b64 거부 외에는 항상 완전한 레코드여야 함
    if let Ok(entry) = normalizer.normalize(&body) {
        assert!(!entry.service.is_empty());
        assert!(!entry.level.is_empty());
        assert!(entry.timestamp.ends_with('Z'));
    }
});
