//! 대시보드 상태.
//!
//! 폴링 1회 분량의 처리 전체를 담당한다: 집계 헤더 갱신,
//! 경과 시간 기준선 재동기화, 테이블 재렌더링, 차트 업데이트.

use std::sync::Arc;
use swarmview_core::models::errors::ExceptionRow;
use swarmview_core::models::stats::{AggregateHeader, StatsReport};
use swarmview_core::models::stats::RunState;
use swarmview_core::ports::chart::ChartBackend;
use swarmview_core::ports::view::DashboardView;
use tracing::info;

use crate::registry::ChartRegistry;
use crate::table::{SortSpec, StatField, StatsTable};

/// 램프 실행 유형 — 이 유형일 때는 실행 중 수정이 비활성화된다
const RAMP_RUNNING_TYPE: &str = "Auto";

/// 초 단위 경과 시간을 HH:MM:SS로 포맷
pub fn format_hhmmss(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// 대시보드 상태 — 차트 레지스트리와 테이블, 폴링 간 추적 값을 소유
pub struct DashboardState {
    registry: ChartRegistry,
    table: StatsTable,
    /// 마지막으로 관측한 서버 경과 시간 (초)
    last_run_time: Option<f64>,
    /// 기준선 재동기화 횟수
    baseline_resets: u64,
    /// 정렬 변경 시 재렌더링에 쓰는 마지막 리포트
    last_report: Option<StatsReport>,
    header: Option<AggregateHeader>,
}

impl DashboardState {
    /// 새 대시보드 상태 생성
    pub fn new(backend: Arc<dyn ChartBackend>) -> Self {
        Self {
            registry: ChartRegistry::new(backend),
            table: StatsTable::new(),
            last_run_time: None,
            baseline_resets: 0,
            last_report: None,
            header: None,
        }
    }

    /// 통계 스냅샷 1개 처리
    ///
    /// 서버 경과 시간이 직전 값보다 작아지면 카운터 리셋으로 보고
    /// 로컬 기준선을 재동기화한다. 실행 상태가 `stopped`가 아닐
    /// 때만 차트를 갱신한다.
    pub fn apply_report(&mut self, report: StatsReport, view: &dyn DashboardView) {
        let header = AggregateHeader {
            total_rps: (report.total_rps * 100.0).round() / 100.0,
            fail_percent: (report.fail_ratio * 100.0).round(),
            state: report.state,
            user_count: report.user_count,
            running_type: report.running_type.clone(),
            host: report.host.clone(),
            slave_count: report.slave_count,
            run_time_secs: report.total_run_time,
        };

        if let Some(prev) = self.last_run_time {
            if report.total_run_time < prev {
                self.baseline_resets += 1;
                info!(
                    "경과 시간 카운터 리셋 감지: {} → {}",
                    format_hhmmss(prev),
                    format_hhmmss(report.total_run_time)
                );
            }
        }
        self.last_run_time = Some(report.total_run_time);

        view.render_header(&header);
        view.render_stats(&self.table.sorted_stats(&report));
        view.render_errors(&self.table.sorted_errors(&report));

        if report.state != RunState::Stopped {
            self.registry.update(&report);
        }

        self.header = Some(header);
        self.last_report = Some(report);
    }

    /// 예외 목록 1개 처리 — 통계와 독립된 영역만 갱신
    pub fn apply_exceptions(&self, rows: &[ExceptionRow], view: &dyn DashboardView) {
        view.render_exceptions(rows);
    }

    /// 정렬 컬럼 선택 — 마지막 리포트 기준으로 테이블만 재렌더링
    pub fn select_sort(&mut self, field: StatField, view: &dyn DashboardView) {
        self.table.select(field);
        if let Some(ref report) = self.last_report {
            view.render_stats(&self.table.sorted_stats(report));
            view.render_errors(&self.table.sorted_errors(report));
        }
    }

    /// 초기 정렬 사양 지정
    pub fn set_sort(&mut self, spec: SortSpec) {
        self.table.set_spec(spec);
    }

    /// 차트 전체 리셋 (새 실행 시작 시)
    pub fn reset_charts(&mut self) {
        self.registry.reset();
    }

    /// 차트 레이아웃 재계산 (차트 영역이 다시 보일 때)
    pub fn resize_charts(&mut self) {
        self.registry.resize_all();
    }

    /// 실행 중 수정 가능 여부 — 램프(Auto) 실행 중에는 불가
    pub fn edit_enabled(&self) -> bool {
        self.header
            .as_ref()
            .map(|h| h.running_type != RAMP_RUNNING_TYPE)
            .unwrap_or(true)
    }

    /// 차트 레지스트리 참조
    pub fn registry(&self) -> &ChartRegistry {
        &self.registry
    }

    /// 마지막 집계 헤더
    pub fn header(&self) -> Option<&AggregateHeader> {
        self.header.as_ref()
    }

    /// 기준선 재동기화 횟수
    pub fn baseline_resets(&self) -> u64 {
        self.baseline_resets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_chart::MemoryChartBackend;
    use parking_lot::Mutex;
    use swarmview_core::models::errors::ErrorRow;
    use swarmview_core::models::stats::EndpointStats;

    /// 렌더링 호출을 기록하는 뷰 스파이
    #[derive(Default)]
    struct RecordingView {
        headers: Mutex<Vec<AggregateHeader>>,
        stats: Mutex<Vec<Vec<String>>>,
        errors: Mutex<Vec<usize>>,
        exceptions: Mutex<Vec<usize>>,
    }

    impl DashboardView for RecordingView {
        fn render_header(&self, header: &AggregateHeader) {
            self.headers.lock().push(header.clone());
        }

        fn render_stats(&self, rows: &[EndpointStats]) {
            self.stats
                .lock()
                .push(rows.iter().map(|r| r.name.clone()).collect());
        }

        fn render_errors(&self, rows: &[ErrorRow]) {
            self.errors.lock().push(rows.len());
        }

        fn render_exceptions(&self, rows: &[ExceptionRow]) {
            self.exceptions.lock().push(rows.len());
        }
    }

    fn report(run_time: f64, state: RunState) -> StatsReport {
        StatsReport {
            total_rps: 7.456,
            fail_ratio: 0.128,
            state,
            user_count: 10,
            running_type: "Manual".to_string(),
            host: Some("http://target".to_string()),
            slave_count: None,
            total_run_time: run_time,
            rows: vec![EndpointStats {
                name: "/a".to_string(),
                method: "GET".to_string(),
                current_rps: 1.0,
                ..EndpointStats::default()
            }],
            total: EndpointStats {
                name: "Total".to_string(),
                ..EndpointStats::default()
            },
            errors: vec![],
        }
    }

    fn setup() -> (Arc<MemoryChartBackend>, DashboardState, RecordingView) {
        let backend = Arc::new(MemoryChartBackend::new());
        let state = DashboardState::new(backend.clone());
        (backend, state, RecordingView::default())
    }

    #[test]
    fn baseline_resets_exactly_once_on_decrease() {
        let (_, mut state, view) = setup();
        for run_time in [120.0, 125.0, 40.0, 45.0] {
            state.apply_report(report(run_time, RunState::Running), &view);
        }
        assert_eq!(state.baseline_resets(), 1);
        assert_eq!(view.headers.lock().len(), 4);
    }

    #[test]
    fn exceptions_render_independently() {
        let (_, state, view) = setup();
        let rows = vec![ExceptionRow {
            count: 1,
            msg: "boom".to_string(),
            traceback: String::new(),
            nodes: "w1".to_string(),
        }];
        state.apply_exceptions(&rows, &view);

        assert_eq!(*view.exceptions.lock(), vec![1]);
        // 통계/에러 테이블은 건드리지 않는다
        assert!(view.stats.lock().is_empty());
        assert!(view.errors.lock().is_empty());
    }

    #[test]
    fn stopped_state_skips_chart_update() {
        let (backend, mut state, view) = setup();
        state.apply_report(report(1.0, RunState::Stopped), &view);

        let rps = backend.live_chart("Requests per Second").unwrap();
        assert!(rps.lock().points.is_empty());
        // 테이블은 상태와 무관하게 렌더링된다
        assert_eq!(view.stats.lock().len(), 1);
    }

    #[test]
    fn running_state_updates_charts() {
        let (backend, mut state, view) = setup();
        state.apply_report(report(1.0, RunState::Running), &view);

        let rps = backend.live_chart("Requests per Second").unwrap();
        assert_eq!(rps.lock().points.len(), 1);
    }

    #[test]
    fn header_values_rounded() {
        let (_, mut state, view) = setup();
        state.apply_report(report(1.0, RunState::Running), &view);

        let header = state.header().unwrap();
        assert_eq!(header.total_rps, 7.46);
        assert_eq!(header.fail_percent, 13.0);
    }

    #[test]
    fn select_sort_rerenders_from_last_report() {
        let (_, mut state, view) = setup();
        state.apply_report(report(1.0, RunState::Running), &view);
        state.select_sort(StatField::CurrentRps, &view);

        // 폴링 1회 + 정렬 변경 1회
        assert_eq!(view.stats.lock().len(), 2);
    }

    #[test]
    fn edit_disabled_during_ramp() {
        let (_, mut state, view) = setup();
        let mut r = report(1.0, RunState::Running);
        r.running_type = "Auto".to_string();
        state.apply_report(r, &view);
        assert!(!state.edit_enabled());
    }

    #[test]
    fn format_hhmmss_rolls_over() {
        assert_eq!(format_hhmmss(0.0), "00:00:00");
        assert_eq!(format_hhmmss(61.0), "00:01:01");
        assert_eq!(format_hhmmss(3661.0), "01:01:01");
    }
}
