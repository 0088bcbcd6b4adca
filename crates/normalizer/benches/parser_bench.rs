//! 정규화 엔진 벤치마크
//!
//! 형식별 레지스트리 매칭 비용과 본문 전체 정규화 처리량을 측정합니다.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use sentryedge_normalizer::{Normalizer, NormalizerConfig, ParserRegistry};

const APACHE: &str =
    r#"127.0.0.1 - - [10/Oct/2023:13:55:36 +0000] "GET /index.html HTTP/1.1" 200 1024"#;
const SYSLOG: &str = "Oct 10 13:55:36 web-01 sshd: Accepted publickey for deploy from 10.0.0.4";
const DOCKER: &str =
    r#"{"log":"listening on :8080\n","stream":"stdout","time":"2024-01-15T12:00:00.123Z"}"#;
const CLOUDFLARE: &str = r#"{"RayID":"7d1a","EdgeStartTimestamp":1705320000000000000,"ClientRequestHost":"example.com","ClientRequestMethod":"GET","ClientRequestURI":"/login","EdgeResponseStatus":403,"WAFAction":"block"}"#;
const POSTGRES: &str = r#"2024-01-15 12:00:00.123 UTC [4242] ERROR:  relation "users" does not exist"#;
const PFSENSE: &str = "Oct 10 13:55:36 pfSense[1234]: block in on em0 from 10.0.0.9";
const UNMATCHED: &str = "payment-service: critical failure in charge processor";

/// 구조화 JSON 본문
const STRUCTURED_BODY: &str = r#"{"service":"api","level":"error","message":"timeout"}"#;

/// base64 래핑 본문
const RAW_B64_BODY: &str = r#"{"raw_b64":"aW5mbyB0ZXN0"}"#;

fn bench_registry_formats(c: &mut Criterion) {
    let registry = ParserRegistry::with_defaults().unwrap();
    let mut group = c.benchmark_group("registry");
    group.throughput(Throughput::Elements(1));

    for (name, line) in [
        ("apache", APACHE),
        ("syslog", SYSLOG),
        ("docker-json", DOCKER),
        ("cloudflare-logpush", CLOUDFLARE),
        ("postgresql", POSTGRES),
        ("pfsense", PFSENSE),
        ("fallback", UNMATCHED),
    ] {
        group.bench_with_input(BenchmarkId::new("parse_line", name), &line, |b, &line| {
            b.iter(|| registry.parse_line(black_box(line)))
        });
    }

    group.finish();
}

fn bench_normalize_bodies(c: &mut Criterion) {
    let normalizer = Normalizer::new(NormalizerConfig::default()).unwrap();
    let mut group = c.benchmark_group("normalize");

    group.throughput(Throughput::Elements(1));
    group.bench_function("structured", |b| {
        b.iter(|| normalizer.normalize(black_box(STRUCTURED_BODY)).unwrap())
    });
    group.bench_function("raw_b64", |b| {
        b.iter(|| normalizer.normalize(black_box(RAW_B64_BODY)).unwrap())
    });
    group.bench_function("plain_apache", |b| {
        b.iter(|| normalizer.normalize(black_box(APACHE)).unwrap())
    });

    // 1000건 반복 처리량
    group.throughput(Throughput::Elements(1000));
    group.bench_function("throughput_1000_mixed", |b| {
        let bodies = [STRUCTURED_BODY, RAW_B64_BODY, APACHE, SYSLOG, DOCKER];
        b.iter(|| {
            for i in 0..1000 {
                normalizer
                    .normalize(black_box(bodies[i % bodies.len()]))
                    .unwrap();
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_registry_formats, bench_normalize_bodies);
criterion_main!(benches);
