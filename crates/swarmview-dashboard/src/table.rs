//! 통계/에러 테이블 정렬 및 렌더링 준비.
//!
//! 합성 total 행은 정렬 대상에서 분리되어 항상 마지막에 렌더링된다.
//! 비교는 필드명 + 내림차순 플래그로 매개화되며, 행에 없는 필드는
//! 동순위로 취급되어 안정 정렬이 원래 순서를 보존한다.

use std::cmp::Ordering;
use std::str::FromStr;
use swarmview_core::models::errors::ErrorRow;
use swarmview_core::models::stats::{EndpointStats, StatsReport};

/// 정렬 가능한 컬럼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatField {
    /// 요청 이름
    Name,
    /// HTTP 메서드
    Method,
    /// 총 요청 수
    NumRequests,
    /// 실패 수
    NumFailures,
    /// 응답 시간 중앙값
    MedianResponseTime,
    /// 평균 응답 시간
    AvgResponseTime,
    /// 최소 응답 시간
    MinResponseTime,
    /// 최대 응답 시간
    MaxResponseTime,
    /// 현재 초당 요청 수
    CurrentRps,
    /// 평균 응답 본문 크기
    AvgContentLength,
    /// 에러 메시지 (에러 테이블 전용)
    Error,
    /// 에러 발생 횟수 (에러 테이블 전용)
    Occurrences,
}

impl FromStr for StatField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(StatField::Name),
            "method" => Ok(StatField::Method),
            "num_requests" => Ok(StatField::NumRequests),
            "num_failures" => Ok(StatField::NumFailures),
            "median_response_time" => Ok(StatField::MedianResponseTime),
            "avg_response_time" => Ok(StatField::AvgResponseTime),
            "min_response_time" => Ok(StatField::MinResponseTime),
            "max_response_time" => Ok(StatField::MaxResponseTime),
            "current_rps" => Ok(StatField::CurrentRps),
            "avg_content_length" => Ok(StatField::AvgContentLength),
            "error" => Ok(StatField::Error),
            "occurences" | "occurrences" => Ok(StatField::Occurrences),
            other => Err(format!("알 수 없는 정렬 컬럼: {other}")),
        }
    }
}

/// 비교용 필드 값
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue<'a> {
    /// 문자열 필드
    Text(&'a str),
    /// 수치 필드
    Number(f64),
}

fn compare_values(a: &SortValue<'_>, b: &SortValue<'_>) -> Ordering {
    match (a, b) {
        (SortValue::Text(x), SortValue::Text(y)) => x.cmp(y),
        (SortValue::Number(x), SortValue::Number(y)) => {
            x.partial_cmp(y).unwrap_or(Ordering::Equal)
        }
        // 타입이 다른 비교는 동순위
        _ => Ordering::Equal,
    }
}

/// 정렬 가능한 테이블 행
pub trait SortableRow {
    /// 해당 필드의 비교 값 — 행에 없는 필드는 `None`
    fn sort_value(&self, field: StatField) -> Option<SortValue<'_>>;
}

impl SortableRow for EndpointStats {
    fn sort_value(&self, field: StatField) -> Option<SortValue<'_>> {
        match field {
            StatField::Name => Some(SortValue::Text(&self.name)),
            StatField::Method => Some(SortValue::Text(&self.method)),
            StatField::NumRequests => Some(SortValue::Number(self.num_requests as f64)),
            StatField::NumFailures => Some(SortValue::Number(self.num_failures as f64)),
            StatField::MedianResponseTime => Some(SortValue::Number(self.median_response_time)),
            StatField::AvgResponseTime => Some(SortValue::Number(self.avg_response_time)),
            StatField::MinResponseTime => Some(SortValue::Number(self.min_response_time)),
            StatField::MaxResponseTime => Some(SortValue::Number(self.max_response_time)),
            StatField::CurrentRps => Some(SortValue::Number(self.current_rps)),
            StatField::AvgContentLength => Some(SortValue::Number(self.avg_content_length)),
            StatField::Error | StatField::Occurrences => None,
        }
    }
}

impl SortableRow for ErrorRow {
    fn sort_value(&self, field: StatField) -> Option<SortValue<'_>> {
        match field {
            StatField::Name => Some(SortValue::Text(&self.name)),
            StatField::Method => Some(SortValue::Text(&self.method)),
            StatField::Error => Some(SortValue::Text(&self.error)),
            StatField::Occurrences => Some(SortValue::Number(self.occurrences as f64)),
            _ => None,
        }
    }
}

/// 정렬 사양 — 컬럼 + 내림차순 플래그
#[derive(Debug, Clone, Copy)]
pub struct SortSpec {
    /// 정렬 컬럼
    pub field: StatField,
    /// 내림차순 여부
    pub descending: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: StatField::Name,
            descending: false,
        }
    }
}

impl SortSpec {
    /// 헤더 클릭 — 정렬 컬럼을 지정하고 방향을 뒤집는다
    pub fn select(&mut self, field: StatField) {
        self.field = field;
        self.descending = !self.descending;
    }
}

/// 사양에 따라 행을 안정 정렬한다
pub fn sort_rows<T: SortableRow>(rows: &mut [T], spec: &SortSpec) {
    rows.sort_by(|a, b| {
        let ordering = match (a.sort_value(spec.field), b.sort_value(spec.field)) {
            (Some(x), Some(y)) => compare_values(&x, &y),
            _ => Ordering::Equal,
        };
        if spec.descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

/// 통계/에러 테이블 — 정렬 사양을 보관하고 렌더링할 행을 만든다
#[derive(Debug, Default)]
pub struct StatsTable {
    spec: SortSpec,
}

impl StatsTable {
    /// 기본 정렬(이름 오름차순)로 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 현재 정렬 사양
    pub fn spec(&self) -> &SortSpec {
        &self.spec
    }

    /// 정렬 사양 교체 (초기 설정용)
    pub fn set_spec(&mut self, spec: SortSpec) {
        self.spec = spec;
    }

    /// 헤더 클릭 처리
    pub fn select(&mut self, field: StatField) {
        self.spec.select(field);
    }

    /// 렌더링할 통계 행 — 정렬된 엔드포인트 행 뒤에 total 행
    pub fn sorted_stats(&self, report: &StatsReport) -> Vec<EndpointStats> {
        let mut rows = report.rows.clone();
        sort_rows(&mut rows, &self.spec);
        rows.push(report.total.clone());
        rows
    }

    /// 렌더링할 에러 행
    pub fn sorted_errors(&self, report: &StatsReport) -> Vec<ErrorRow> {
        let mut rows = report.errors.clone();
        sort_rows(&mut rows, &self.spec);
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarmview_core::models::stats::RunState;

    fn row(name: &str, rps: f64) -> EndpointStats {
        EndpointStats {
            name: name.to_string(),
            method: "GET".to_string(),
            current_rps: rps,
            ..EndpointStats::default()
        }
    }

    fn report() -> StatsReport {
        StatsReport {
            total_rps: 0.0,
            fail_ratio: 0.0,
            state: RunState::Running,
            user_count: 0,
            running_type: String::new(),
            host: None,
            slave_count: None,
            total_run_time: 0.0,
            rows: vec![row("/c", 3.0), row("/a", 1.0), row("/b", 2.0)],
            // total은 정렬상 맨 앞에 와야 할 이름이지만 항상 마지막이어야 한다
            total: row("/0total", 6.0),
            errors: vec![
                ErrorRow {
                    method: "GET".to_string(),
                    name: "/c".to_string(),
                    error: "500".to_string(),
                    occurrences: 5,
                },
                ErrorRow {
                    method: "GET".to_string(),
                    name: "/a".to_string(),
                    error: "404".to_string(),
                    occurrences: 2,
                },
            ],
        }
    }

    fn names(rows: &[EndpointStats]) -> Vec<&str> {
        rows.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn total_row_never_sorted_always_last() {
        let table = StatsTable::new();
        let rows = table.sorted_stats(&report());
        assert_eq!(names(&rows), vec!["/a", "/b", "/c", "/0total"]);
    }

    #[test]
    fn double_toggle_restores_rendered_order() {
        let mut table = StatsTable::new();
        let r = report();
        table.select(StatField::CurrentRps);
        table.select(StatField::CurrentRps);
        let before = names(&table.sorted_stats(&r))
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();

        // 같은 컬럼으로 방향을 두 번 더 뒤집으면 원래 순서로 돌아온다
        table.select(StatField::CurrentRps);
        let _ = table.sorted_stats(&r);
        table.select(StatField::CurrentRps);
        let after = names(&table.sorted_stats(&r))
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();

        assert_eq!(before, after);
    }

    #[test]
    fn select_sets_field_and_flips_direction() {
        let mut table = StatsTable::new();
        table.select(StatField::CurrentRps);
        assert_eq!(table.spec().field, StatField::CurrentRps);
        assert!(table.spec().descending);

        let rows = table.sorted_stats(&report());
        assert_eq!(names(&rows), vec!["/c", "/b", "/a", "/0total"]);
    }

    #[test]
    fn ties_keep_original_order() {
        let mut r = report();
        r.rows = vec![row("/x", 1.0), row("/y", 1.0), row("/z", 1.0)];
        let mut table = StatsTable::new();
        table.select(StatField::CurrentRps);

        let rows = table.sorted_stats(&r);
        assert_eq!(names(&rows), vec!["/x", "/y", "/z", "/0total"]);
    }

    #[test]
    fn errors_sorted_by_shared_field() {
        let mut table = StatsTable::new();
        table.select(StatField::Occurrences);
        let rows = table.sorted_errors(&report());
        assert_eq!(rows[0].occurrences, 5);
        assert_eq!(rows[1].occurrences, 2);
    }

    #[test]
    fn errors_untouched_by_missing_field() {
        let mut table = StatsTable::new();
        table.set_spec(SortSpec {
            field: StatField::CurrentRps,
            descending: false,
        });
        // 에러 행에 없는 필드로 정렬하면 원래 순서 유지
        let rows = table.sorted_errors(&report());
        assert_eq!(rows[0].name, "/c");
        assert_eq!(rows[1].name, "/a");
    }

    #[test]
    fn field_parse_accepts_wire_spelling() {
        assert_eq!(
            "occurences".parse::<StatField>().unwrap(),
            StatField::Occurrences
        );
        assert!("bogus".parse::<StatField>().is_err());
    }
}
