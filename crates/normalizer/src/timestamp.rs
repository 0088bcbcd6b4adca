//! 타임스탬프 정규화
//!
//! 후보 문자열을 해석해 정규 표현 (RFC 3339 UTC, 밀리초, `Z` 접미사)으로 변환합니다.
//! 해석할 수 없는 후보는 거부하지 않고 기준 시각(수집 시각)으로 대체합니다.
//!
//! # 지원 형식
//! - RFC 3339 / ISO 8601 (`T` 또는 공백 구분자, 선택적 소수부, 오프셋 또는 `Z`)
//! - 오프셋 없는 `YYYY-MM-DD HH:MM:SS[.f]` 및 날짜만 (`YYYY-MM-DD`): UTC로 간주
//! - 위 형식 + 시간대 약어 (`UTC`, `GMT`, 미국 표준 약어; 그 외 약어는 UTC로 간주)
//! - RFC 2822
//! - Common Log Format `DD/Mon/YYYY:HH:MM:SS [+zzzz]`
//! - BSD syslog `Mon DD HH:MM:SS` (연도는 기준 시각에서 추론)
//! - Windows `MM/DD/YYYY hh:mm:ss AM|PM`
//! - Unix epoch 정수 (자릿수로 단위 결정: 10자리 이하 초, 13자리 이하 밀리초,
//!   16자리 이하 마이크로초, 그 이상 나노초)
//!
//! 정규 표현은 고정 폭이어야 하므로 0000년부터 9999년 밖의 시각은 해석 실패로 취급합니다.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone,
    Utc,
};

/// 오프셋을 포함한 형식
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%d/%b/%Y:%H:%M:%S %z",
];

/// 오프셋이 없는 형식 (UTC로 간주)
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%d/%b/%Y:%H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
];

/// 정규 표현으로 변환합니다. (예: `2023-10-10T13:55:36.000Z`)
pub fn canonical(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// 후보 문자열을 현재 시각 기준으로 정규화합니다.
pub fn normalize_timestamp(candidate: Option<&str>) -> String {
    normalize_timestamp_at(candidate, Utc::now())
}

/// 후보 문자열을 주어진 기준 시각으로 정규화합니다.
///
/// 후보가 없거나 해석할 수 없으면 `now`가 사용됩니다.
pub fn normalize_timestamp_at(candidate: Option<&str>, now: DateTime<Utc>) -> String {
    let instant = candidate
        .and_then(|value| parse_timestamp_at(value, now))
        .unwrap_or(now);
    canonical(instant)
}

/// 문자열을 UTC 시각으로 해석합니다.
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    parse_timestamp_at(input, Utc::now())
}

/// 문자열을 UTC 시각으로 해석합니다.
///
/// `now`는 연도가 없는 syslog 형식의 연도 추론에만 쓰입니다.
pub fn parse_timestamp_at(input: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let text = input.trim();
    if text.is_empty() {
        return None;
    }

    parse_epoch(text)
        .or_else(|| parse_with_offset(text))
        .or_else(|| parse_naive(text))
        .or_else(|| parse_with_zone_abbreviation(text))
        .or_else(|| parse_syslog(text, now))
        .filter(|instant| has_four_digit_year(*instant))
}

/// 네 자리 연도인지 확인합니다. 범위 밖이면 정규 표현이 `+56009-...`처럼 부호와 확장 연도를 갖게 됩니다.
fn has_four_digit_year(instant: DateTime<Utc>) -> bool {
    (0..=9999).contains(&instant.year())
}

/// Unix epoch 정수를 UTC 시각으로 변환합니다. 단위는 자릿수로 정합니다.
pub fn from_epoch(value: i64) -> Option<DateTime<Utc>> {
    let digits = value.unsigned_abs().checked_ilog10().map_or(1, |log| log + 1);
    match digits {
        0..=10 => DateTime::from_timestamp(value, 0),
        11..=13 => DateTime::from_timestamp_millis(value),
        14..=16 => DateTime::from_timestamp_micros(value),
        _ => Some(DateTime::from_timestamp_nanos(value)),
    }
}

fn parse_epoch(text: &str) -> Option<DateTime<Utc>> {
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<i64>().ok().and_then(from_epoch)
}

fn parse_with_offset(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }
    OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_naive(text: &str) -> Option<DateTime<Utc>> {
    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `2024-01-15 12:00:00.123 UTC` 처럼 시간대 약어가 붙은 형식
fn parse_with_zone_abbreviation(text: &str) -> Option<DateTime<Utc>> {
    let (rest, zone) = text.rsplit_once(' ')?;
    if zone.is_empty() || zone.len() > 5 || !zone.bytes().all(|b| b.is_ascii_uppercase()) {
        return None;
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(rest.trim_end(), fmt).ok())?;

    let offset = FixedOffset::east_opt(zone_offset_hours(zone) * 3600)?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// 알려진 시간대 약어의 UTC 오프셋 (시간 단위). 모르는 약어는 UTC.
fn zone_offset_hours(zone: &str) -> i32 {
    match zone {
        "EST" => -5,
        "EDT" => -4,
        "CST" => -6,
        "CDT" => -5,
        "MST" => -7,
        "MDT" => -6,
        "PST" => -8,
        "PDT" => -7,
        _ => 0,
    }
}

/// RFC 3164 타임스탬프 (`Oct 10 13:55:36`)
///
/// 연도가 없으므로 기준 시각의 연도를 사용하고,
/// 결과가 기준 시각보다 하루 이상 미래이면 작년으로 간주합니다.
fn parse_syslog(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let parse_in = |year: i32| {
        NaiveDateTime::parse_from_str(&format!("{year} {collapsed}"), "%Y %b %d %H:%M:%S")
            .ok()
            .map(|naive| naive.and_utc())
    };

    let candidate = parse_in(now.year())?;
    if candidate > now + Duration::days(1) {
        return parse_in(now.year() - 1);
    }
    Some(candidate)
}
