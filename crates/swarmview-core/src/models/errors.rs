//! 에러/예외 테이블 행 모델.
//!
//! 엔드포인트 통계와 교차 참조 없이 각자 독립된 테이블로 렌더링된다.

use serde::{Deserialize, Serialize};

/// 요청 에러 행 — `/stats/requests` 응답의 `errors` 배열 원소
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorRow {
    /// HTTP 메서드
    pub method: String,
    /// 요청 이름
    pub name: String,
    /// 에러 메시지
    pub error: String,
    /// 발생 횟수 (와이어 철자 유지)
    #[serde(rename = "occurences")]
    pub occurrences: u64,
}

/// 예외 행 — `/exceptions` 엔드포인트 응답 원소
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExceptionRow {
    /// 발생 횟수
    pub count: u64,
    /// 예외 메시지
    pub msg: String,
    /// 트레이스백
    pub traceback: String,
    /// 발생 노드 목록 (쉼표 구분)
    pub nodes: String,
}

/// `/exceptions` 와이어 페이로드
#[derive(Debug, Clone, Deserialize)]
pub struct ExceptionsPayload {
    /// 예외 행 목록
    #[serde(default)]
    pub exceptions: Vec<ExceptionRow>,
}
