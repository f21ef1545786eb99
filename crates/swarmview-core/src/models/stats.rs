//! 통계 스냅샷 모델.
//!
//! `/stats/requests` 엔드포인트가 반환하는 스냅샷과 그 구성 요소.
//! 와이어 형식은 엔드포인트별 행 목록 끝에 합성 "total" 행을 덧붙이는데,
//! 그 pop/push 관례는 [`StatsPayload::into_report`] 디코드 경계 안에서만
//! 존재하고 이후 레이어는 `rows`/`total`이 분리된 [`StatsReport`]를 쓴다.

use crate::error::CoreError;
use crate::models::errors::ErrorRow;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 엔드포인트 복합 키 — `name.to_uppercase() + method.to_uppercase()`
///
/// 폴링 간에 안정적이어야 한다: 같은 엔드포인트는 항상 같은 키로
/// 귀결되어 한번 만든 차트 라인이 재사용된다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EndpointKey(String);

impl EndpointKey {
    /// 이름과 HTTP 메서드로 키 생성
    pub fn new(name: &str, method: &str) -> Self {
        Self(format!(
            "{}{}",
            name.to_uppercase(),
            method.to_uppercase()
        ))
    }

    /// 합성 total 행 전용 키
    pub fn total() -> Self {
        Self("TOTAL".to_string())
    }

    /// 키 문자열 반환
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 테스트 실행 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// 대기 중
    Ready,
    /// 사용자 생성 중
    Hatching,
    /// 실행 중
    Running,
    /// 정지됨
    Stopped,
    /// 알 수 없는 상태 (서버 버전 차이 허용)
    #[serde(other)]
    Unknown,
}

/// 엔드포인트별 통계 행 — (name, method) 쌍으로 식별
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointStats {
    /// 요청 이름 (URL 경로 등)
    pub name: String,
    /// HTTP 메서드
    pub method: String,
    /// 총 요청 수
    pub num_requests: u64,
    /// 실패 수
    pub num_failures: u64,
    /// 응답 시간 중앙값 (ms)
    pub median_response_time: f64,
    /// 평균 응답 시간 (ms)
    pub avg_response_time: f64,
    /// 최소 응답 시간 (ms)
    pub min_response_time: f64,
    /// 최대 응답 시간 (ms)
    pub max_response_time: f64,
    /// 현재 초당 요청 수
    pub current_rps: f64,
    /// 평균 응답 본문 크기 (bytes)
    pub avg_content_length: f64,
}

impl EndpointStats {
    /// 이 행의 복합 키
    pub fn key(&self) -> EndpointKey {
        EndpointKey::new(&self.name, &self.method)
    }
}

/// `/stats/requests` 와이어 페이로드
///
/// `stats` 배열의 마지막 원소는 항상 합성 total 행이다.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsPayload {
    /// 전체 초당 요청 수
    #[serde(default)]
    pub total_rps: f64,
    /// 실패 비율 (0.0 ~ 1.0)
    #[serde(default)]
    pub fail_ratio: f64,
    /// 실행 상태
    pub state: RunState,
    /// 현재 사용자 수
    #[serde(default)]
    pub user_count: u64,
    /// 실행 유형 ("Manual", "Auto" 등)
    #[serde(default)]
    pub running_type: String,
    /// 대상 호스트 URL
    #[serde(default)]
    pub host: Option<String>,
    /// 분산 실행 시 워커 수
    #[serde(default)]
    pub slave_count: Option<u64>,
    /// 누적 실행 시간 (초)
    #[serde(default)]
    pub total_run_time: f64,
    /// 엔드포인트별 행 + 마지막 total 행
    #[serde(default)]
    pub stats: Vec<EndpointStats>,
    /// 에러 행 목록
    #[serde(default)]
    pub errors: Vec<ErrorRow>,
}

impl StatsPayload {
    /// total 행을 분리한 리포트로 변환
    ///
    /// total 행은 필수다. `stats`가 비어 있으면 유효성 에러.
    pub fn into_report(mut self) -> Result<StatsReport, CoreError> {
        let total = self.stats.pop().ok_or_else(|| CoreError::Validation {
            field: "stats".to_string(),
            message: "합성 total 행이 없음".to_string(),
        })?;

        Ok(StatsReport {
            total_rps: self.total_rps,
            fail_ratio: self.fail_ratio,
            state: self.state,
            user_count: self.user_count,
            running_type: self.running_type,
            host: self.host,
            slave_count: self.slave_count,
            total_run_time: self.total_run_time,
            rows: self.stats,
            total,
            errors: self.errors,
        })
    }
}

/// 디코드 경계를 통과한 통계 리포트 — total 행이 분리된 형태
#[derive(Debug, Clone)]
pub struct StatsReport {
    /// 전체 초당 요청 수
    pub total_rps: f64,
    /// 실패 비율 (0.0 ~ 1.0)
    pub fail_ratio: f64,
    /// 실행 상태
    pub state: RunState,
    /// 현재 사용자 수
    pub user_count: u64,
    /// 실행 유형
    pub running_type: String,
    /// 대상 호스트 URL
    pub host: Option<String>,
    /// 분산 실행 시 워커 수
    pub slave_count: Option<u64>,
    /// 누적 실행 시간 (초)
    pub total_run_time: f64,
    /// 엔드포인트별 행 (total 제외)
    pub rows: Vec<EndpointStats>,
    /// 합성 total 행
    pub total: EndpointStats,
    /// 에러 행 목록
    pub errors: Vec<ErrorRow>,
}

/// 집계 헤더 — 폴링마다 갱신되는 대시보드 상단 표시 값
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateHeader {
    /// 전체 초당 요청 수 (소수 둘째 자리 반올림)
    pub total_rps: f64,
    /// 실패 비율 (% 정수 반올림)
    pub fail_percent: f64,
    /// 실행 상태
    pub state: RunState,
    /// 현재 사용자 수
    pub user_count: u64,
    /// 실행 유형
    pub running_type: String,
    /// 대상 호스트 URL
    pub host: Option<String>,
    /// 분산 실행 시 워커 수
    pub slave_count: Option<u64>,
    /// 누적 실행 시간 (초)
    pub run_time_secs: f64,
}
