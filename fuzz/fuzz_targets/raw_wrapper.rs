#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serde_json::json;

use sentryedge_normalizer::{Normalizer, NormalizerConfig};

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    /// raw 래퍼 중첩 수 (1..=64)
    depth: u8,
    /// 최종 라인
    line: String,
    /// 엔진 언랩 깊이 (1..=32로 보정)
    max_unwrap_depth: u8,
}

fuzz_target!(|input: FuzzInput| {
    let config = NormalizerConfig {
        max_unwrap_depth: usize::from(input.max_unwrap_depth % 32) + 1,
    };
    let Ok(normalizer) = Normalizer::new(config) else {
        return;
    };

    let mut body = input.line;
    for _ in 0..=(input.depth % 64) {
        body = json!({ "raw": body }).to_string();
    }

    // raw 래퍼는 어떤 깊이에서도 종료되고 실패하지 않아야 함
    assert!(normalizer.normalize(&body).is_ok());
});
