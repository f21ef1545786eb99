//! 로드 테스트 서버 HTTP 클라이언트.
//!
//! `SwarmApi` 포트 구현. 상태 코드별 에러 매핑 포함, 재시도 없음.

use async_trait::async_trait;
use std::time::Duration;
use swarmview_core::error::CoreError;
use swarmview_core::models::control::{
    ConfigContent, ControlAck, CsvColumns, CsvConvertRequest, CsvExport, RampParams, SwarmParams,
};
use swarmview_core::models::errors::{ExceptionRow, ExceptionsPayload};
use swarmview_core::models::stats::{StatsPayload, StatsReport};
use swarmview_core::ports::swarm_api::SwarmApi;
use tracing::{debug, warn};

/// reqwest 기반 서버 클라이언트 — `SwarmApi` 포트 구현
pub struct HttpSwarmClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSwarmClient {
    /// 새 클라이언트 생성
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 응답 상태 코드 확인 및 에러 매핑
    async fn check_response(
        &self,
        resp: reqwest::Response,
    ) -> Result<reqwest::Response, CoreError> {
        let status = resp.status();

        if status.is_success() {
            return Ok(resp);
        }

        let text = resp.text().await.unwrap_or_else(|e| {
            warn!("응답 본문 읽기 실패: {e}");
            String::new()
        });

        match status.as_u16() {
            404 => Err(CoreError::NotFound(text)),
            503 => Err(CoreError::ServiceUnavailable(text)),
            code => Err(CoreError::Server {
                status: code,
                message: text,
            }),
        }
    }

    /// GET 후 본문 텍스트 반환
    async fn get_text(&self, path: &str) -> Result<String, CoreError> {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("{path} 요청 실패: {e}")))?;

        let resp = self.check_response(resp).await?;
        resp.text()
            .await
            .map_err(|e| CoreError::Network(format!("{path} 본문 읽기 실패: {e}")))
    }

    /// 폼 POST 후 제어 응답 파싱
    async fn post_form_ack<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        form: &T,
    ) -> Result<ControlAck, CoreError> {
        let resp = self
            .client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("{path} 요청 실패: {e}")))?;

        let resp = self.check_response(resp).await?;
        let ack: ControlAck = resp
            .json()
            .await
            .map_err(|e| CoreError::Internal(format!("{path} 응답 파싱 실패: {e}")))?;
        Ok(ack)
    }
}

#[async_trait]
impl SwarmApi for HttpSwarmClient {
    async fn fetch_stats(&self) -> Result<StatsReport, CoreError> {
        // 서버가 content-type을 보장하지 않으므로 텍스트로 받아 직접 파싱
        let text = self.get_text("/stats/requests").await?;
        let payload: StatsPayload = serde_json::from_str(&text)?;
        payload.into_report()
    }

    async fn fetch_exceptions(&self) -> Result<Vec<ExceptionRow>, CoreError> {
        let text = self.get_text("/exceptions").await?;
        let payload: ExceptionsPayload = serde_json::from_str(&text)?;
        Ok(payload.exceptions)
    }

    async fn start_swarm(&self, params: &SwarmParams) -> Result<ControlAck, CoreError> {
        debug!(
            "스웜 요청: 사용자 {}명, 생성 속도 {}/s",
            params.user_count, params.hatch_rate
        );
        self.post_form_ack("/swarm", params).await
    }

    async fn start_ramp(&self, params: &RampParams) -> Result<ControlAck, CoreError> {
        debug!(
            "램프 요청: {} → {}명",
            params.init_count, params.max_count
        );
        self.post_form_ack("/ramp", params).await
    }

    async fn stop(&self) -> Result<(), CoreError> {
        self.get_text("/stop").await?;
        debug!("정지 요청 전송");
        Ok(())
    }

    async fn reset_stats(&self) -> Result<(), CoreError> {
        self.get_text("/stats/reset").await?;
        debug!("통계 리셋 요청 전송");
        Ok(())
    }

    async fn fetch_config(&self) -> Result<String, CoreError> {
        let text = self.get_text("/config/get_config_content").await?;
        let content: ConfigContent = serde_json::from_str(&text)?;
        Ok(content.data)
    }

    async fn save_config(&self, config_json: &str) -> Result<ControlAck, CoreError> {
        self.post_form_ack("/config/save_json", &[("final_json", config_json)])
            .await
    }

    async fn csv_columns(
        &self,
        file_name: &str,
        content: Vec<u8>,
    ) -> Result<Vec<String>, CoreError> {
        let part = reqwest::multipart::Part::bytes(content).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("csv_file", part);

        let resp = self
            .client
            .post(self.url("/config/get_csv_column"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("CSV 업로드 실패: {e}")))?;

        let resp = self.check_response(resp).await?;
        let columns: CsvColumns = resp
            .json()
            .await
            .map_err(|e| CoreError::Internal(format!("CSV 컬럼 응답 파싱 실패: {e}")))?;

        if !columns.success {
            return Err(CoreError::Rejected("CSV 컬럼 감지 실패".to_string()));
        }

        debug!("CSV 컬럼 {}개 감지", columns.columns.len());
        Ok(columns.columns)
    }

    async fn convert_csv(&self, request: &CsvConvertRequest) -> Result<ControlAck, CoreError> {
        // 컬럼 헤더는 같은 폼 키를 반복해서 전송한다
        let mut pairs: Vec<(&str, String)> = request
            .headers
            .iter()
            .map(|h| ("headers_checkbox", h.clone()))
            .collect();
        pairs.push(("jsonpath", request.json_path.clone()));
        pairs.push(("json_option", request.json_option.clone()));
        pairs.push(("multiple_form_final_json", request.config_text.clone()));
        if let Some(ref var_type) = request.last_var_type {
            pairs.push(("last_var_type", var_type.clone()));
        }

        self.post_form_ack("/config/convert_csv", &pairs).await
    }

    async fn upload_test_file(
        &self,
        directory: &str,
        file_name: &str,
        content: Vec<u8>,
    ) -> Result<ControlAck, CoreError> {
        let part = reqwest::multipart::Part::bytes(content).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .text("upload_directory", directory.to_string())
            .part("python_file", part);

        let resp = self
            .client
            .post(self.url("/upload_file"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("테스트 파일 업로드 실패: {e}")))?;

        let resp = self.check_response(resp).await?;
        let ack: ControlAck = resp
            .json()
            .await
            .map_err(|e| CoreError::Internal(format!("업로드 응답 파싱 실패: {e}")))?;
        Ok(ack)
    }

    async fn export_csv(&self, kind: CsvExport) -> Result<String, CoreError> {
        self.get_text(kind.path()).await
    }
}
