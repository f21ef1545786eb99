//! 테스트 제어 패널.
//!
//! 시작/램프/수정/설정 패널의 열림 상태와 실행 단계를 추적하고,
//! 제어 요청을 서버 API로 전달한다. 새 테스트가 시작되면 차트를
//! 리셋하지만, 실행 중 변경(edit)은 차트를 유지한다.

use std::sync::Arc;
use swarmview_core::error::CoreError;
use swarmview_core::models::control::{
    ControlAck, CsvConvertRequest, RampParams, SwarmKind, SwarmParams,
};
use swarmview_core::ports::swarm_api::SwarmApi;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::state::DashboardState;

/// 열려 있는 제어 패널 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    /// 새 테스트 시작 폼
    Start,
    /// 램프 시작 폼
    Ramp,
    /// 실행 중 사용자 수 변경 폼
    Edit,
    /// 설정 JSON 편집기
    EditConfig,
}

/// 실행 단계 — 제어 버튼 표시를 결정한다
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// 테스트 시작 전
    Ready,
    /// 시작 요청이 수락되어 사용자 생성 중
    Hatching,
    /// 정지 요청 이후
    Stopped,
}

/// 제어 패널 상태 머신
pub struct ControlPanel {
    api: Arc<dyn SwarmApi>,
    state: Arc<Mutex<DashboardState>>,
    active_panel: Option<Panel>,
    phase: RunPhase,
    /// 마지막 CSV 업로드에서 감지된 컬럼 헤더
    csv_columns: Vec<String>,
}

impl ControlPanel {
    /// 새 제어 패널 생성
    pub fn new(api: Arc<dyn SwarmApi>, state: Arc<Mutex<DashboardState>>) -> Self {
        Self {
            api,
            state,
            active_panel: None,
            phase: RunPhase::Ready,
            csv_columns: Vec::new(),
        }
    }

    /// 패널 열기 — 이미 다른 패널이 열려 있으면 교체
    pub fn show(&mut self, panel: Panel) {
        self.active_panel = Some(panel);
    }

    /// 패널 닫기
    pub fn close(&mut self) {
        self.active_panel = None;
    }

    /// 새 테스트 시작
    ///
    /// 요청이 수락되면 패널을 닫고 차트를 리셋한다.
    pub async fn start_swarm(
        &mut self,
        user_count: u64,
        hatch_rate: f64,
        test_file: Option<String>,
    ) -> Result<ControlAck, CoreError> {
        let params = SwarmParams {
            user_count,
            hatch_rate,
            kind: SwarmKind::Start,
            test_file,
        };
        let ack = self.api.start_swarm(&params).await?;
        if ack.success {
            info!("스웜 시작 수락: 사용자 {user_count}명, 생성 속도 {hatch_rate}/s");
            self.phase = RunPhase::Hatching;
            self.close();
            self.state.lock().await.reset_charts();
        }
        Ok(ack)
    }

    /// 램프 시작 — 시작과 같은 전이, 파라미터만 다르다
    pub async fn start_ramp(&mut self, params: &RampParams) -> Result<ControlAck, CoreError> {
        let ack = self.api.start_ramp(params).await?;
        if ack.success {
            info!(
                "램프 시작 수락: {} → {}명",
                params.init_count, params.max_count
            );
            self.phase = RunPhase::Hatching;
            self.close();
            self.state.lock().await.reset_charts();
        }
        Ok(ack)
    }

    /// 실행 중 사용자 수 변경 — 진행 중인 차트는 유지한다
    pub async fn edit_swarm(
        &mut self,
        user_count: u64,
        hatch_rate: f64,
    ) -> Result<ControlAck, CoreError> {
        let params = SwarmParams {
            user_count,
            hatch_rate,
            kind: SwarmKind::Edit,
            test_file: None,
        };
        let ack = self.api.start_swarm(&params).await?;
        if ack.success {
            self.close();
        }
        Ok(ack)
    }

    /// 테스트 정지
    ///
    /// 서버 응답과 무관하게 로컬 단계는 즉시 Stopped로 전이한다.
    /// 다음 폴링이 서버 상태를 다시 반영한다.
    pub async fn stop(&mut self) {
        self.phase = RunPhase::Stopped;
        if let Err(e) = self.api.stop().await {
            warn!("정지 요청 실패: {e}");
        }
    }

    /// 서버측 통계 카운터 리셋
    pub async fn reset_stats(&self) -> Result<(), CoreError> {
        self.api.reset_stats().await
    }

    /// 현재 설정 JSON 조회 (설정 편집기 열기)
    pub async fn fetch_config(&mut self) -> Result<String, CoreError> {
        let body = self.api.fetch_config().await?;
        self.show(Panel::EditConfig);
        Ok(body)
    }

    /// 설정 JSON 저장
    pub async fn save_config(&mut self, config_json: &str) -> Result<ControlAck, CoreError> {
        let ack = self.api.save_config(config_json).await?;
        if ack.success {
            self.close();
        }
        Ok(ack)
    }

    /// CSV 업로드 후 컬럼 감지 — 실패는 로그 후 전파
    pub async fn upload_csv(
        &mut self,
        file_name: &str,
        content: Vec<u8>,
    ) -> Result<&[String], CoreError> {
        match self.api.csv_columns(file_name, content).await {
            Ok(columns) => {
                self.csv_columns = columns;
                Ok(&self.csv_columns)
            }
            Err(e) => {
                warn!("CSV 컬럼 감지 실패: {e}");
                Err(e)
            }
        }
    }

    /// 감지된 컬럼으로 CSV → JSON 변환
    ///
    /// 서버가 변환을 거부하면 메시지를 담아 오류로 돌려준다.
    pub async fn convert_csv(&self, request: &CsvConvertRequest) -> Result<(), CoreError> {
        let ack = self.api.convert_csv(request).await?;
        if !ack.success {
            return Err(CoreError::Rejected(
                ack.message.unwrap_or_else(|| "CSV 변환 거부".to_string()),
            ));
        }
        Ok(())
    }

    /// 테스트 스크립트 업로드
    pub async fn upload_test_file(
        &self,
        directory: &str,
        file_name: &str,
        content: Vec<u8>,
    ) -> Result<ControlAck, CoreError> {
        self.api.upload_test_file(directory, file_name, content).await
    }

    /// 현재 열린 패널
    pub fn active_panel(&self) -> Option<Panel> {
        self.active_panel
    }

    /// 현재 실행 단계
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// 마지막으로 감지된 CSV 컬럼 헤더
    pub fn csv_columns(&self) -> &[String] {
        &self.csv_columns
    }
}
