//! 차트 레지스트리.
//!
//! 4개 집계 차트(사용자/RPS/응답 시간/실패), 어드밴스 차트 1개,
//! 복합 키로 인덱싱되는 엔드포인트별 차트 컬렉션 3개를 소유하고
//! 폴링마다 스냅샷 데이터를 각 차트로 라우팅한다.
//!
//! 리셋 사이에서 라인 키 집합은 단조 증가한다 — 라인은 새 키를
//! 처음 볼 때 지연 생성되고, 새 실행이 시작되어 [`ChartRegistry::reset`]이
//! 호출될 때까지 제거되지 않는다.

use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use swarmview_core::models::stats::{EndpointKey, EndpointStats, StatsReport};
use swarmview_core::ports::chart::{
    AdvanceChart, AdvanceMetric, AdvanceSample, ChartBackend, ChartSpec, LineChart,
};
use tracing::debug;

use crate::filters::{FilterChange, FilterSet};

fn line_spec(title: &str, subtitle: &str, unit: &str, initial: &[&str]) -> ChartSpec {
    ChartSpec {
        title: title.to_string(),
        subtitle: subtitle.to_string(),
        unit: unit.to_string(),
        initial_lines: initial.iter().map(|s| s.to_string()).collect(),
    }
}

struct AggregateCharts {
    users: Box<dyn LineChart>,
    rps: Box<dyn LineChart>,
    response_time: Box<dyn LineChart>,
    failures: Box<dyn LineChart>,
    advance: Box<dyn AdvanceChart>,
}

/// 라이브 차트 소유자 — 리셋/라인 생성/업데이트/리사이즈 담당
pub struct ChartRegistry {
    backend: Arc<dyn ChartBackend>,
    aggregates: AggregateCharts,
    endpoint_response_time: BTreeMap<EndpointKey, Box<dyn LineChart>>,
    endpoint_rps: BTreeMap<EndpointKey, Box<dyn LineChart>>,
    endpoint_failures: BTreeMap<EndpointKey, Box<dyn LineChart>>,
    line_keys: BTreeSet<EndpointKey>,
    filters: FilterSet,
}

impl ChartRegistry {
    /// 새 레지스트리 생성 — 집계 차트와 total 차트를 즉시 만든다
    pub fn new(backend: Arc<dyn ChartBackend>) -> Self {
        let aggregates = Self::create_aggregates(backend.as_ref());
        let mut registry = Self {
            backend,
            aggregates,
            endpoint_response_time: BTreeMap::new(),
            endpoint_rps: BTreeMap::new(),
            endpoint_failures: BTreeMap::new(),
            line_keys: BTreeSet::new(),
            filters: FilterSet::default(),
        };
        registry.init_total_charts();
        registry
    }

    fn create_aggregates(backend: &dyn ChartBackend) -> AggregateCharts {
        let mut advance = backend.advance_chart("Advance Chart");
        advance.add_line(AdvanceMetric::Users, &EndpointKey::total(), "Total");
        // 기본 활성 필터는 응답 시간
        advance.add_filter(AdvanceMetric::ResponseTime);

        AggregateCharts {
            users: backend.line_chart(&line_spec("Number of Users", "", "users", &["Total"])),
            rps: backend.line_chart(&line_spec("Requests per Second", "", "reqs/s", &[])),
            response_time: backend.line_chart(&line_spec("Average Response Time", "", "ms", &[])),
            failures: backend.line_chart(&line_spec("Number of Failures", "", "failures", &[])),
            advance,
        }
    }

    /// total 행 전용 엔드포인트별 차트 생성
    fn init_total_charts(&mut self) {
        let key = EndpointKey::total();
        self.endpoint_response_time.insert(
            key.clone(),
            self.backend.line_chart(&line_spec(
                "Average Responses Time",
                key.as_str(),
                "ms",
                &["Average Responses Time"],
            )),
        );
        self.endpoint_rps.insert(
            key.clone(),
            self.backend.line_chart(&line_spec(
                "Requests Per Second",
                key.as_str(),
                "request",
                &["RPS"],
            )),
        );
        self.endpoint_failures.insert(
            key.clone(),
            self.backend
                .line_chart(&line_spec("Failure", key.as_str(), "failure", &["Failures"])),
        );
    }

    /// 모든 차트 폐기 후 빈 상태로 재생성
    ///
    /// 새 테스트 실행이 시작될 때 호출된다. 빈 상태에서 호출해도
    /// 안전하다 (멱등). 진행 중이던 폴링이 리셋 직후 도착해도
    /// [`ChartRegistry::ensure_line`]이 라인을 다시 만들기 때문에
    /// 그대로 수용된다.
    pub fn reset(&mut self) {
        self.aggregates.users.dispose();
        self.aggregates.rps.dispose();
        self.aggregates.response_time.dispose();
        self.aggregates.failures.dispose();
        self.aggregates.advance.dispose();
        for chart in self.endpoint_response_time.values_mut() {
            chart.dispose();
        }
        for chart in self.endpoint_rps.values_mut() {
            chart.dispose();
        }
        for chart in self.endpoint_failures.values_mut() {
            chart.dispose();
        }

        self.endpoint_response_time.clear();
        self.endpoint_rps.clear();
        self.endpoint_failures.clear();
        self.line_keys.clear();
        self.filters = FilterSet::default();

        self.aggregates = Self::create_aggregates(self.backend.as_ref());
        self.init_total_charts();
        debug!("차트 레지스트리 리셋");
    }

    /// 키에 해당하는 라인을 3개 지표 차트와 어드밴스 차트에 생성 (멱등)
    pub fn ensure_line(&mut self, key: &EndpointKey, label: &str) {
        if !self.aggregates.rps.has_line(key) {
            self.aggregates.rps.add_line(key, label);
        }
        if !self.aggregates.response_time.has_line(key) {
            self.aggregates.response_time.add_line(key, label);
        }
        if !self.aggregates.failures.has_line(key) {
            self.aggregates.failures.add_line(key, label);
        }
        for metric in AdvanceMetric::ENDPOINT_METRICS {
            if !self.aggregates.advance.has_line(metric, key) {
                self.aggregates.advance.add_line(metric, key, label);
            }
        }
        self.line_keys.insert(key.clone());
    }

    /// 스냅샷 1개 분량을 모든 차트에 반영
    ///
    /// 행은 복합 키 기준으로 안정 정렬되어 범례/라인 순서가
    /// 폴링 간에 결정적으로 유지된다.
    pub fn update(&mut self, report: &StatsReport) {
        let mut rows: Vec<&EndpointStats> = report.rows.iter().collect();
        rows.sort_by_key(|row| row.key());

        let now = Utc::now();
        let mut rps_values = Vec::with_capacity(rows.len());
        let mut response_values = Vec::with_capacity(rows.len());
        let mut failure_values = Vec::with_capacity(rows.len());

        for row in rows {
            self.ensure_line(&row.key(), &row.name);
            rps_values.push(row.current_rps);
            response_values.push(row.avg_response_time);
            failure_values.push(row.num_failures as f64);
        }

        // total 행은 전용 차트로만 라우팅된다
        let total_key = EndpointKey::total();
        if let Some(chart) = self.endpoint_response_time.get_mut(&total_key) {
            chart.append(now, &[report.total.avg_response_time]);
        }
        if let Some(chart) = self.endpoint_rps.get_mut(&total_key) {
            chart.append(now, &[report.total.current_rps]);
        }
        if let Some(chart) = self.endpoint_failures.get_mut(&total_key) {
            chart.append(now, &[report.total.num_failures as f64]);
        }

        self.aggregates.failures.append(now, &failure_values);
        self.aggregates.rps.append(now, &rps_values);
        self.aggregates.response_time.append(now, &response_values);
        self.aggregates.advance.append(
            now,
            &AdvanceSample {
                users: report.user_count as f64,
                rps: rps_values,
                response_times: response_values,
                failures: failure_values,
            },
        );
        self.aggregates
            .users
            .append(now, &[report.user_count as f64]);
    }

    /// 모든 차트 레이아웃 재계산 (차트 탭이 다시 보일 때)
    pub fn resize_all(&mut self) {
        self.aggregates.users.resize();
        self.aggregates.rps.resize();
        self.aggregates.response_time.resize();
        self.aggregates.failures.resize();
        self.aggregates.advance.resize();
        for chart in self.endpoint_response_time.values_mut() {
            chart.resize();
        }
        for chart in self.endpoint_rps.values_mut() {
            chart.resize();
        }
        for chart in self.endpoint_failures.values_mut() {
            chart.resize();
        }
    }

    /// 어드밴스 차트 필터 토글 — 한도(최대 2, 최소 1)를 넘는 요청은 무시
    pub fn toggle_filter(&mut self, metric: AdvanceMetric) {
        match self.filters.toggle(metric) {
            Some(FilterChange::Added) => self.aggregates.advance.add_filter(metric),
            Some(FilterChange::Removed) => self.aggregates.advance.remove_filter(metric),
            None => {}
        }
    }

    /// 현재 활성 필터
    pub fn active_filters(&self) -> &[AdvanceMetric] {
        self.filters.active()
    }

    /// 지금까지 만든 라인 키 집합 (리셋 시 비워진다)
    pub fn line_keys(&self) -> &BTreeSet<EndpointKey> {
        &self.line_keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_chart::MemoryChartBackend;
    use swarmview_core::models::stats::RunState;

    fn row(name: &str, method: &str, rps: f64) -> EndpointStats {
        EndpointStats {
            name: name.to_string(),
            method: method.to_string(),
            current_rps: rps,
            avg_response_time: 100.0,
            num_failures: 1,
            ..EndpointStats::default()
        }
    }

    fn report(rows: Vec<EndpointStats>) -> StatsReport {
        StatsReport {
            total_rps: 10.0,
            fail_ratio: 0.0,
            state: RunState::Running,
            user_count: 5,
            running_type: "Manual".to_string(),
            host: None,
            slave_count: None,
            total_run_time: 1.0,
            rows,
            total: row("Total", "", 10.0),
            errors: vec![],
        }
    }

    fn setup() -> (Arc<MemoryChartBackend>, ChartRegistry) {
        let backend = Arc::new(MemoryChartBackend::new());
        let registry = ChartRegistry::new(backend.clone());
        (backend, registry)
    }

    #[test]
    fn repeated_updates_never_duplicate_lines() {
        let (backend, mut registry) = setup();
        let r = report(vec![row("/a", "GET", 1.0), row("/b", "POST", 2.0)]);

        registry.update(&r);
        registry.update(&r);
        registry.update(&r);

        let rps = backend.live_chart("Requests per Second").unwrap();
        assert_eq!(rps.lock().lines.len(), 2);

        let advance = backend.live_advance_record().unwrap();
        let advance = advance.lock();
        for metric in AdvanceMetric::ENDPOINT_METRICS {
            assert_eq!(advance.lines[&metric].len(), 2);
        }
        assert_eq!(registry.line_keys().len(), 2);
    }

    #[test]
    fn case_variants_share_one_line() {
        let (backend, mut registry) = setup();
        // 대소문자만 다른 두 행은 같은 복합 키 "AGET"로 귀결된다
        let r = report(vec![row("a", "GET", 1.0), row("A", "get", 2.0)]);
        registry.update(&r);

        let rps = backend.live_chart("Requests per Second").unwrap();
        assert_eq!(rps.lock().lines.len(), 1);
        assert_eq!(rps.lock().lines[0].0, "AGET");
        assert_eq!(registry.line_keys().len(), 1);
    }

    #[test]
    fn legend_order_is_sorted_by_key() {
        let (backend, mut registry) = setup();
        let r = report(vec![
            row("/zebra", "GET", 1.0),
            row("/alpha", "GET", 2.0),
            row("/mid", "POST", 3.0),
        ]);
        registry.update(&r);

        let rps = backend.live_chart("Requests per Second").unwrap();
        let keys: Vec<String> = rps.lock().lines.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, vec!["/ALPHAGET", "/MIDPOST", "/ZEBRAGET"]);
    }

    #[test]
    fn total_row_routes_to_total_charts_only() {
        let (backend, mut registry) = setup();
        let r = report(vec![row("/a", "GET", 3.0)]);
        registry.update(&r);

        // 집계 RPS 차트 포인트는 엔드포인트 배열만 담는다
        let rps = backend.live_chart("Requests per Second").unwrap();
        assert_eq!(rps.lock().points[0].1, vec![3.0]);

        // total 전용 차트에는 total 행 값이 들어간다
        let total_rps = backend.live_chart("Requests Per Second").unwrap();
        assert_eq!(total_rps.lock().points[0].1, vec![10.0]);
        assert_eq!(total_rps.lock().subtitle, "TOTAL");
    }

    #[test]
    fn advance_sample_combines_users_and_metrics() {
        let (backend, mut registry) = setup();
        let r = report(vec![row("/a", "GET", 3.0), row("/b", "GET", 4.0)]);
        registry.update(&r);

        let advance = backend.live_advance_record().unwrap();
        let advance = advance.lock();
        let (_, sample) = &advance.samples[0];
        assert_eq!(sample.users, 5.0);
        assert_eq!(sample.rps, vec![3.0, 4.0]);
        assert_eq!(sample.response_times.len(), 2);
        assert_eq!(sample.failures, vec![1.0, 1.0]);
    }

    #[test]
    fn reset_then_update_equals_fresh_registry() {
        let r = report(vec![row("/a", "GET", 1.0), row("/b", "POST", 2.0)]);

        // 리셋을 거친 레지스트리
        let (_, mut reset_registry) = setup();
        reset_registry.update(&report(vec![row("/old", "GET", 1.0)]));
        reset_registry.reset();
        reset_registry.update(&r);

        // 새 레지스트리
        let (_, mut fresh_registry) = setup();
        fresh_registry.update(&r);

        assert_eq!(
            reset_registry.line_keys().iter().collect::<Vec<_>>(),
            fresh_registry.line_keys().iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn reset_disposes_every_chart() {
        let (backend, mut registry) = setup();
        registry.update(&report(vec![row("/a", "GET", 1.0)]));
        let created_before = backend.line_records().len();

        registry.reset();

        let disposed = backend
            .line_records()
            .iter()
            .take(created_before)
            .all(|r| r.lock().disposed);
        assert!(disposed);
        assert!(registry.line_keys().is_empty());
        // 집계 4 + total 3 차트가 다시 만들어진다
        assert_eq!(backend.live_line_records().len(), 7);
    }

    #[test]
    fn reset_idempotent_on_empty_state() {
        let (_, mut registry) = setup();
        registry.reset();
        registry.reset();
        assert!(registry.line_keys().is_empty());
    }

    #[test]
    fn update_after_reset_recreates_lines() {
        // 진행 중이던 폴링이 리셋 직후 도착하는 경우
        let (backend, mut registry) = setup();
        let r = report(vec![row("/a", "GET", 1.0)]);
        registry.update(&r);
        registry.reset();
        registry.update(&r);

        let rps = backend.live_chart("Requests per Second").unwrap();
        assert_eq!(rps.lock().lines.len(), 1);
        assert_eq!(rps.lock().points.len(), 1);
    }

    #[test]
    fn resize_all_touches_every_live_chart() {
        let (backend, mut registry) = setup();
        registry.resize_all();
        for record in backend.live_line_records() {
            assert_eq!(record.lock().resize_count, 1);
        }
    }

    #[test]
    fn filter_toggle_respects_limits() {
        let (backend, mut registry) = setup();
        registry.toggle_filter(AdvanceMetric::Rps);
        registry.toggle_filter(AdvanceMetric::Users); // 3번째 — 무시

        let advance = backend.live_advance_record().unwrap();
        assert_eq!(
            advance.lock().filters,
            vec![AdvanceMetric::ResponseTime, AdvanceMetric::Rps]
        );
    }
}
