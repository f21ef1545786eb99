//! 제어 요청/응답 모델.
//!
//! 테스트 시작/램프/설정 폼이 서버로 보내는 파라미터와
//! 서버가 돌려주는 성공 플래그 응답.

use serde::{Deserialize, Serialize};

/// 스웜 요청 종류 — 새 테스트 시작 또는 실행 중 사용자 수 변경
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SwarmKind {
    /// 새 테스트 시작
    Start,
    /// 실행 중 사용자 수/생성 속도 변경
    Edit,
}

/// 스웜 시작/변경 파라미터 (`POST /swarm` 폼)
#[derive(Debug, Clone, Serialize)]
pub struct SwarmParams {
    /// 시뮬레이션할 사용자 수
    #[serde(rename = "locust_count")]
    pub user_count: u64,
    /// 초당 사용자 생성 속도
    pub hatch_rate: f64,
    /// 요청 종류
    #[serde(rename = "type_swarm")]
    pub kind: SwarmKind,
    /// 실행할 테스트 파일 (시작 시에만 필요)
    #[serde(rename = "locustfile", skip_serializing_if = "Option::is_none")]
    pub test_file: Option<String>,
}

/// 램프 시작 파라미터 (`POST /ramp` 폼)
///
/// 서버가 단계적으로 사용자 수를 올리며 한계를 탐색한다.
#[derive(Debug, Clone, Serialize)]
pub struct RampParams {
    /// 시작 사용자 수
    pub init_count: u64,
    /// 최대 사용자 수
    pub max_count: u64,
    /// 초당 사용자 생성 속도
    pub hatch_rate: u64,
    /// 단계별 증가 폭
    pub hatch_stride: u64,
    /// 탐색 정밀도
    pub precision: u64,
    /// 허용 응답 시간 (ms)
    pub response_time: u64,
    /// 기준 백분위수 (% 정수)
    pub percentile: u8,
    /// 허용 실패율 (% 정수)
    pub fail_rate: u8,
    /// 단계별 보정 시간 (초)
    pub wait_time: u64,
}

/// 제어 응답 — 성공 플래그와 선택적 메시지
#[derive(Debug, Clone, Deserialize)]
pub struct ControlAck {
    /// 성공 여부
    pub success: bool,
    /// 추가 메시지 (실패 사유 등)
    #[serde(default)]
    pub message: Option<String>,
}

/// CSV 컬럼 감지 응답 (`POST /config/get_csv_column`)
#[derive(Debug, Clone, Deserialize)]
pub struct CsvColumns {
    /// 성공 여부
    pub success: bool,
    /// 감지된 컬럼 헤더 목록
    #[serde(default)]
    pub columns: Vec<String>,
}

/// CSV → JSON 변환 요청 (`POST /config/convert_csv` 폼)
#[derive(Debug, Clone)]
pub struct CsvConvertRequest {
    /// 선택된 컬럼 헤더 목록 (폼 키 `headers_checkbox` 반복)
    pub headers: Vec<String>,
    /// 값을 주입할 설정 JSON 경로
    pub json_path: String,
    /// 변환 옵션
    pub json_option: String,
    /// 현재 설정 JSON 본문
    pub config_text: String,
    /// 새 키 생성 시 마지막 변수 타입
    pub last_var_type: Option<String>,
}

/// 설정 본문 응답 (`GET /config/get_config_content`)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigContent {
    /// 설정 JSON 본문
    #[serde(default)]
    pub data: String,
}

/// CSV 내보내기 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvExport {
    /// 요청 통계
    Requests,
    /// 응답 시간 분포
    Distribution,
    /// 예외 목록
    Exceptions,
}

impl CsvExport {
    /// 내보내기 엔드포인트 경로
    pub fn path(&self) -> &'static str {
        match self {
            CsvExport::Requests => "/stats/requests/csv",
            CsvExport::Distribution => "/stats/distribution/csv",
            CsvExport::Exceptions => "/exceptions/csv",
        }
    }
}
