//! 대시보드 뷰 포트.
//!
//! 테이블/헤더 렌더링은 외부 협력자다 — 구현: `swarmview-app`의
//! 텍스트 뷰, 테스트의 기록용 스파이.

use crate::models::errors::{ErrorRow, ExceptionRow};
use crate::models::stats::{AggregateHeader, EndpointStats};

/// 대시보드 렌더링 싱크
///
/// 폴링마다 전체 재렌더링된다. 두 폴링 루프는 서로 겹치지 않는
/// 영역(통계/에러 vs 예외)만 갱신한다.
pub trait DashboardView: Send + Sync {
    /// 집계 헤더 갱신
    fn render_header(&self, header: &AggregateHeader);

    /// 통계 테이블 렌더링 — 행은 이미 정렬되어 있고 마지막이 total 행
    fn render_stats(&self, rows: &[EndpointStats]);

    /// 에러 테이블 렌더링
    fn render_errors(&self, rows: &[ErrorRow]);

    /// 예외 테이블 렌더링
    fn render_exceptions(&self, rows: &[ExceptionRow]);
}
