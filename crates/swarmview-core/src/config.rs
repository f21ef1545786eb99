//! 애플리케이션 설정 구조체.
//!
//! 서버 URL, 폴링 주기 등 런타임 설정을 정의한다.
//! [`crate::config_manager::ConfigManager`]를 통해 JSON 파일에서 로드/저장.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 서버 연결 설정
    pub server: ServerConfig,
    /// 폴링 설정
    #[serde(default)]
    pub poll: PollConfig,
}

/// 서버 연결 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 로드 테스트 서버 베이스 URL
    pub base_url: String,
    /// 요청 타임아웃 (밀리초)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8089".to_string(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// 폴링 설정
///
/// 두 폴링 루프는 서로 독립적이며, 각 주기는 이전 응답 수신 시점
/// 이후의 고정 지연이다 (고정 주기 타이머 아님).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// 통계 스냅샷 폴링 지연 (밀리초)
    pub stats_interval_ms: u64,
    /// 예외 목록 폴링 지연 (밀리초)
    pub exceptions_interval_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            stats_interval_ms: 2_000,
            exceptions_interval_ms: 5_000,
        }
    }
}

impl AppConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self {
            server: ServerConfig::default(),
            poll: PollConfig::default(),
        }
    }

    /// 요청 타임아웃
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.server.timeout_ms)
    }

    /// 통계 폴링 지연
    pub fn stats_interval(&self) -> Duration {
        Duration::from_millis(self.poll.stats_interval_ms)
    }

    /// 예외 폴링 지연
    pub fn exceptions_interval(&self) -> Duration {
        Duration::from_millis(self.poll.exceptions_interval_ms)
    }
}
