//! 터미널 텍스트 렌더러.
//!
//! `DashboardView` 포트의 기본 구현. 폴링마다 집계 헤더와
//! 통계/에러/예외 테이블을 고정 폭 컬럼으로 출력한다.

use swarmview_core::models::errors::{ErrorRow, ExceptionRow};
use swarmview_core::models::stats::{AggregateHeader, EndpointStats};
use swarmview_core::ports::view::DashboardView;
use swarmview_dashboard::state::format_hhmmss;

/// 표준 출력 텍스트 뷰
#[derive(Debug, Default)]
pub struct TextView;

impl TextView {
    /// 새 텍스트 뷰 생성
    pub fn new() -> Self {
        Self
    }
}

impl DashboardView for TextView {
    fn render_header(&self, header: &AggregateHeader) {
        let host = header.host.as_deref().unwrap_or("-");
        let slaves = header
            .slave_count
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!();
        println!(
            "[{:?}] 사용자 {}명 | RPS {:.2} | 실패율 {}% | 경과 {} | 대상 {host} | 워커 {slaves}",
            header.state,
            header.user_count,
            header.total_rps,
            header.fail_percent,
            format_hhmmss(header.run_time_secs),
        );
    }

    fn render_stats(&self, rows: &[EndpointStats]) {
        println!(
            "{:<8} {:<32} {:>10} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
            "Method", "Name", "Requests", "Fails", "Median", "Avg", "Min", "Max", "RPS"
        );
        for row in rows {
            println!(
                "{:<8} {:<32} {:>10} {:>8} {:>8.0} {:>8.0} {:>8.0} {:>8.0} {:>8.2}",
                row.method,
                row.name,
                row.num_requests,
                row.num_failures,
                row.median_response_time,
                row.avg_response_time,
                row.min_response_time,
                row.max_response_time,
                row.current_rps,
            );
        }
    }

    fn render_errors(&self, rows: &[ErrorRow]) {
        if rows.is_empty() {
            return;
        }
        println!();
        println!("{:<8} {:<32} {:<40} {:>8}", "Method", "Name", "Error", "Count");
        for row in rows {
            println!(
                "{:<8} {:<32} {:<40} {:>8}",
                row.method, row.name, row.error, row.occurrences
            );
        }
    }

    fn render_exceptions(&self, rows: &[ExceptionRow]) {
        if rows.is_empty() {
            return;
        }
        println!();
        println!("{:>6}  {:<48} {}", "Count", "Message", "Nodes");
        for row in rows {
            println!("{:>6}  {:<48} {}", row.count, row.msg, row.nodes);
        }
    }
}
