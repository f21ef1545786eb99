//! 로드 테스트 서버 API 포트.
//!
//! 구현: `swarmview-network` crate (reqwest)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::control::{
    ControlAck, CsvConvertRequest, CsvExport, RampParams, SwarmParams,
};
use crate::models::errors::ExceptionRow;
use crate::models::stats::StatsReport;

/// 로드 테스트 서버 클라이언트
///
/// 통계/예외 폴링과 테스트 제어(시작/정지/램프/설정)를 담당한다.
#[async_trait]
pub trait SwarmApi: Send + Sync {
    /// 현재 통계 스냅샷 조회 (`GET /stats/requests`)
    async fn fetch_stats(&self) -> Result<StatsReport, CoreError>;

    /// 예외 목록 조회 (`GET /exceptions`)
    async fn fetch_exceptions(&self) -> Result<Vec<ExceptionRow>, CoreError>;

    /// 스웜 시작 또는 실행 중 변경 (`POST /swarm`)
    async fn start_swarm(&self, params: &SwarmParams) -> Result<ControlAck, CoreError>;

    /// 램프 시작 (`POST /ramp`)
    async fn start_ramp(&self, params: &RampParams) -> Result<ControlAck, CoreError>;

    /// 테스트 정지 (`GET /stop`, fire-and-forget)
    async fn stop(&self) -> Result<(), CoreError>;

    /// 서버측 통계 카운터 리셋 (`GET /stats/reset`, fire-and-forget)
    async fn reset_stats(&self) -> Result<(), CoreError>;

    /// 현재 설정 JSON 본문 조회 (`GET /config/get_config_content`)
    async fn fetch_config(&self) -> Result<String, CoreError>;

    /// 설정 JSON 저장 (`POST /config/save_json`)
    async fn save_config(&self, config_json: &str) -> Result<ControlAck, CoreError>;

    /// CSV 파일 업로드 후 컬럼 헤더 감지 (`POST /config/get_csv_column`)
    async fn csv_columns(
        &self,
        file_name: &str,
        content: Vec<u8>,
    ) -> Result<Vec<String>, CoreError>;

    /// 감지된 컬럼 매핑으로 CSV → JSON 변환 (`POST /config/convert_csv`)
    async fn convert_csv(&self, request: &CsvConvertRequest) -> Result<ControlAck, CoreError>;

    /// 테스트 스크립트 업로드 (`POST /upload_file`)
    async fn upload_test_file(
        &self,
        directory: &str,
        file_name: &str,
        content: Vec<u8>,
    ) -> Result<ControlAck, CoreError>;

    /// CSV 내보내기 다운로드 (요청 통계/분포/예외)
    async fn export_csv(&self, kind: CsvExport) -> Result<String, CoreError>;
}
