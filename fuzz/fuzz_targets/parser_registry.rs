#![no_main]

use libfuzzer_sys::fuzz_target;
use sentryedge_normalizer::ParserRegistry;
use sentryedge_normalizer::classifier::FALLBACK_FORMAT;

fuzz_target!(|data: &[u8]| {
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(registry) = ParserRegistry::with_defaults() else {
        return;
    };

    // 결과 형식은 detect가 고른 규칙(또는 fallback)과 같아야 함
    let parsed = registry.parse_line(content);
    let expected = registry.detect(content).unwrap_or(FALLBACK_FORMAT);
    assert_eq!(parsed.format, expected);
});
