//! 백그라운드 폴링 태스크.
//!
//! 응답 처리가 끝난 뒤 고정 지연 후 다음 요청을 보내는 순차 폴링.
//! 고정 주기(interval)가 아니므로 응답이 느려도 요청이 겹치지 않는다.
//! 종료는 watch 채널로 전파되며, 대기 중이어도 즉시 깨어난다.

use std::sync::Arc;
use std::time::Duration;
use swarmview_core::ports::swarm_api::SwarmApi;
use swarmview_core::ports::view::DashboardView;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::state::DashboardState;

/// 통계 폴러 시작
///
/// 즉시 1회 조회한 뒤, 각 응답 처리 완료 시점부터 `delay`를 기다려
/// 다음 조회를 보낸다. 조회 실패는 경고 로그만 남기고 계속한다.
pub fn spawn_stats_poller(
    api: Arc<dyn SwarmApi>,
    state: Arc<Mutex<DashboardState>>,
    view: Arc<dyn DashboardView>,
    delay: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match api.fetch_stats().await {
                Ok(report) => {
                    state.lock().await.apply_report(report, view.as_ref());
                }
                Err(e) => warn!("통계 조회 실패: {e}"),
            }

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown.changed() => {
                    debug!("통계 폴러 종료");
                    break;
                }
            }
        }
    })
}

/// 예외 폴러 시작 — 통계 폴러와 같은 순차 폴링, 주기만 다르다
pub fn spawn_exceptions_poller(
    api: Arc<dyn SwarmApi>,
    state: Arc<Mutex<DashboardState>>,
    view: Arc<dyn DashboardView>,
    delay: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match api.fetch_exceptions().await {
                Ok(rows) => {
                    state.lock().await.apply_exceptions(&rows, view.as_ref());
                }
                Err(e) => warn!("예외 목록 조회 실패: {e}"),
            }

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown.changed() => {
                    debug!("예외 폴러 종료");
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_chart::MemoryChartBackend;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use swarmview_core::error::CoreError;
    use swarmview_core::models::control::{
        ControlAck, CsvConvertRequest, CsvExport, RampParams, SwarmParams,
    };
    use swarmview_core::models::errors::ExceptionRow;
    use swarmview_core::models::stats::{
        AggregateHeader, EndpointStats, RunState, StatsReport,
    };
    use swarmview_core::models::errors::ErrorRow;

    /// 호출 횟수를 세는 스텁 API
    struct StubApi {
        stats_calls: AtomicUsize,
        exception_calls: AtomicUsize,
        fail: bool,
    }

    impl StubApi {
        fn new(fail: bool) -> Self {
            Self {
                stats_calls: AtomicUsize::new(0),
                exception_calls: AtomicUsize::new(0),
                fail,
            }
        }

        fn report() -> StatsReport {
            StatsReport {
                total_rps: 1.0,
                fail_ratio: 0.0,
                state: RunState::Running,
                user_count: 1,
                running_type: "Manual".to_string(),
                host: None,
                slave_count: None,
                total_run_time: 1.0,
                rows: vec![],
                total: EndpointStats::default(),
                errors: vec![],
            }
        }
    }

    #[async_trait]
    impl SwarmApi for StubApi {
        async fn fetch_stats(&self) -> Result<StatsReport, CoreError> {
            self.stats_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(CoreError::Network("연결 거부".to_string()))
            } else {
                Ok(Self::report())
            }
        }

        async fn fetch_exceptions(&self) -> Result<Vec<ExceptionRow>, CoreError> {
            self.exception_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![])
        }

        async fn start_swarm(&self, _: &SwarmParams) -> Result<ControlAck, CoreError> {
            unimplemented!()
        }

        async fn start_ramp(&self, _: &RampParams) -> Result<ControlAck, CoreError> {
            unimplemented!()
        }

        async fn stop(&self) -> Result<(), CoreError> {
            unimplemented!()
        }

        async fn reset_stats(&self) -> Result<(), CoreError> {
            unimplemented!()
        }

        async fn fetch_config(&self) -> Result<String, CoreError> {
            unimplemented!()
        }

        async fn save_config(&self, _: &str) -> Result<ControlAck, CoreError> {
            unimplemented!()
        }

        async fn csv_columns(&self, _: &str, _: Vec<u8>) -> Result<Vec<String>, CoreError> {
            unimplemented!()
        }

        async fn convert_csv(&self, _: &CsvConvertRequest) -> Result<ControlAck, CoreError> {
            unimplemented!()
        }

        async fn upload_test_file(
            &self,
            _: &str,
            _: &str,
            _: Vec<u8>,
        ) -> Result<ControlAck, CoreError> {
            unimplemented!()
        }

        async fn export_csv(&self, _: CsvExport) -> Result<String, CoreError> {
            unimplemented!()
        }
    }

    /// 아무것도 하지 않는 뷰
    struct NullView;

    impl DashboardView for NullView {
        fn render_header(&self, _: &AggregateHeader) {}
        fn render_stats(&self, _: &[EndpointStats]) {}
        fn render_errors(&self, _: &[ErrorRow]) {}
        fn render_exceptions(&self, _: &[ExceptionRow]) {}
    }

    fn state() -> Arc<Mutex<DashboardState>> {
        Arc::new(Mutex::new(DashboardState::new(Arc::new(
            MemoryChartBackend::new(),
        ))))
    }

    #[tokio::test(start_paused = true)]
    async fn stats_poller_polls_after_fixed_delay() {
        let api = Arc::new(StubApi::new(false));
        let (tx, rx) = watch::channel(false);

        let handle = spawn_stats_poller(
            api.clone(),
            state(),
            Arc::new(NullView),
            Duration::from_millis(2000),
            rx,
        );

        // 즉시 1회 + 지연 경과마다 1회씩
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(api.stats_calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(api.stats_calls.load(Ordering::SeqCst), 2);

        tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn stats_poller_survives_errors() {
        let api = Arc::new(StubApi::new(true));
        let (tx, rx) = watch::channel(false);

        let handle = spawn_stats_poller(
            api.clone(),
            state(),
            Arc::new(NullView),
            Duration::from_millis(2000),
            rx,
        );

        tokio::time::sleep(Duration::from_millis(4100)).await;
        assert!(api.stats_calls.load(Ordering::SeqCst) >= 3);

        tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_poller_mid_sleep() {
        let api = Arc::new(StubApi::new(false));
        let (tx, rx) = watch::channel(false);

        let handle = spawn_exceptions_poller(
            api.clone(),
            state(),
            Arc::new(NullView),
            Duration::from_secs(3600),
            rx,
        );

        tokio::time::sleep(Duration::from_millis(100)).await;
        tx.send(true).unwrap();
        handle.await.unwrap();
        assert_eq!(api.exception_calls.load(Ordering::SeqCst), 1);
    }
}
