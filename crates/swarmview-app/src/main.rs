//! # swarmview-app
//!
//! SWARMVIEW 클라이언트 바이너리 진입점.
//! DI 컨테이너 역할: 서버 클라이언트, 대시보드 상태, 폴러를 묶는다.

mod text_view;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use swarmview_core::config_manager::ConfigManager;
use swarmview_core::models::control::{CsvConvertRequest, CsvExport, RampParams};
use swarmview_core::ports::swarm_api::SwarmApi;
use swarmview_core::ports::view::DashboardView;
use swarmview_dashboard::poller::{spawn_exceptions_poller, spawn_stats_poller};
use swarmview_dashboard::table::{SortSpec, StatField};
use swarmview_dashboard::{ControlPanel, DashboardState, MemoryChartBackend};
use swarmview_network::HttpSwarmClient;
use tokio::sync::{watch, Mutex};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::text_view::TextView;

/// SWARMVIEW 클라이언트
///
/// 로드 테스트 서버의 터미널 대시보드 및 제어 도구
#[derive(Parser, Debug)]
#[command(name = "swarmview")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 로드 테스트 서버 URL (기본: 저장된 설정 또는 http://localhost:8089)
    #[arg(long, short = 's')]
    server: Option<String>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 설정 파일 경로 (기본: 플랫폼별 설정 디렉토리)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 통계/예외를 폴링하며 대시보드 출력
    Watch {
        /// 초기 정렬 컬럼 (name, method, num_requests, current_rps, ...)
        #[arg(long)]
        sort: Option<String>,

        /// 내림차순 정렬
        #[arg(long)]
        descending: bool,

        /// 통계 폴링 지연 (밀리초, 기본: 저장된 설정)
        #[arg(long)]
        stats_interval_ms: Option<u64>,

        /// 예외 폴링 지연 (밀리초, 기본: 저장된 설정)
        #[arg(long)]
        exceptions_interval_ms: Option<u64>,
    },

    /// 새 테스트 시작
    Start {
        /// 시뮬레이션할 사용자 수
        #[arg(long, short = 'u')]
        users: u64,

        /// 초당 사용자 생성 속도
        #[arg(long, short = 'r')]
        hatch_rate: f64,

        /// 실행할 테스트 파일 이름
        #[arg(long)]
        test_file: Option<String>,
    },

    /// 실행 중 사용자 수 변경
    Edit {
        /// 변경할 사용자 수
        #[arg(long, short = 'u')]
        users: u64,

        /// 초당 사용자 생성 속도
        #[arg(long, short = 'r')]
        hatch_rate: f64,
    },

    /// 단계적 부하 증가(램프) 시작
    Ramp {
        /// 시작 사용자 수
        #[arg(long, default_value = "10")]
        init_count: u64,

        /// 최대 사용자 수
        #[arg(long, default_value = "1000")]
        max_count: u64,

        /// 초당 사용자 생성 속도
        #[arg(long, default_value = "10")]
        hatch_rate: u64,

        /// 단계별 증가 폭
        #[arg(long, default_value = "50")]
        hatch_stride: u64,

        /// 탐색 정밀도
        #[arg(long, default_value = "5")]
        precision: u64,

        /// 허용 응답 시간 (ms)
        #[arg(long, default_value = "1000")]
        response_time: u64,

        /// 기준 백분위수 (%)
        #[arg(long, default_value = "95")]
        percentile: u8,

        /// 허용 실패율 (%)
        #[arg(long, default_value = "5")]
        fail_rate: u8,

        /// 단계별 보정 시간 (초)
        #[arg(long, default_value = "60")]
        wait_time: u64,
    },

    /// 실행 중인 테스트 정지
    Stop,

    /// 서버측 통계 카운터 리셋
    Reset,

    /// 설정 JSON 조회/저장
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// CSV 데이터 도구
    Csv {
        #[command(subcommand)]
        action: CsvAction,
    },

    /// 통계 CSV 내보내기
    Export {
        /// 내보낼 데이터 종류
        #[arg(value_enum)]
        kind: ExportKind,

        /// 저장할 파일 경로 (생략하면 표준 출력)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// 테스트 스크립트 업로드
    Upload {
        /// 서버측 업로드 디렉토리
        #[arg(long, default_value = "locustfile")]
        directory: String,

        /// 업로드할 파일
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// 현재 설정 JSON 출력
    Get,
    /// 파일 내용을 설정 JSON으로 저장
    Push {
        /// 저장할 JSON 파일
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum CsvAction {
    /// CSV 업로드 후 컬럼 헤더 감지
    Columns {
        /// 업로드할 CSV 파일
        file: PathBuf,
    },
    /// 감지된 컬럼으로 설정 JSON에 데이터 주입
    Convert {
        /// 선택할 컬럼 헤더 (반복 지정)
        #[arg(long = "header", required = true)]
        headers: Vec<String>,

        /// 값을 주입할 JSON 경로
        #[arg(long)]
        json_path: String,

        /// 변환 옵션
        #[arg(long, default_value = "value")]
        json_option: String,

        /// 새 키 생성 시 마지막 변수 타입
        #[arg(long)]
        last_var_type: Option<String>,
    },
}

/// CSV 내보내기 종류 (CLI 표현)
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportKind {
    /// 요청 통계
    Requests,
    /// 응답 시간 분포
    Distribution,
    /// 예외 목록
    Exceptions,
}

impl From<ExportKind> for CsvExport {
    fn from(kind: ExportKind) -> Self {
        match kind {
            ExportKind::Requests => CsvExport::Requests,
            ExportKind::Distribution => CsvExport::Distribution,
            ExportKind::Exceptions => CsvExport::Exceptions,
        }
    }
}

/// 파일 이름 추출 — 경로에 이름이 없으면 오류
fn file_name_of(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(String::from)
        .ok_or_else(|| anyhow!("파일 이름을 읽을 수 없습니다: {}", path.display()))
}

/// 제어 응답 출력 — 거부되면 비정상 종료 코드 반환
fn report_ack(ack: &swarmview_core::models::control::ControlAck) -> Result<()> {
    if ack.success {
        println!("✅ 요청이 수락되었습니다.");
        Ok(())
    } else {
        let message = ack.message.as_deref().unwrap_or("사유 없음");
        Err(anyhow!("서버가 요청을 거부했습니다: {message}"))
    }
}

/// 대시보드 모드 — Ctrl+C까지 통계/예외를 폴링한다
async fn run_watch(
    api: Arc<dyn SwarmApi>,
    config: swarmview_core::config::AppConfig,
    sort: Option<String>,
    descending: bool,
) -> Result<()> {
    let backend = Arc::new(MemoryChartBackend::new());
    let mut dashboard = DashboardState::new(backend);
    if let Some(ref field) = sort {
        let field: StatField = field
            .parse()
            .map_err(|e: String| anyhow!("--sort 해석 실패: {e}"))?;
        dashboard.set_sort(SortSpec { field, descending });
    }
    let state = Arc::new(Mutex::new(dashboard));
    let view: Arc<dyn DashboardView> = Arc::new(TextView::new());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let stats_handle = spawn_stats_poller(
        api.clone(),
        state.clone(),
        view.clone(),
        config.stats_interval(),
        shutdown_rx.clone(),
    );
    let exceptions_handle = spawn_exceptions_poller(
        api,
        state,
        view,
        config.exceptions_interval(),
        shutdown_rx,
    );

    info!("대시보드 실행 중 (Ctrl+C로 종료)");
    tokio::signal::ctrl_c().await?;
    info!("종료 요청 수신");

    shutdown_tx.send(true)?;
    stats_handle.await?;
    exceptions_handle.await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "swarmview={level},swarmview_app={level},swarmview_core={level},swarmview_network={level},swarmview_dashboard={level}",
        level = args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    // 설정 로드 (CLI 인자가 저장된 설정을 오버라이드)
    let config_manager = match args.config {
        Some(path) => ConfigManager::with_path(path)?,
        None => ConfigManager::new()?,
    };
    let mut config = config_manager.get();
    if let Some(ref server_url) = args.server {
        config.server.base_url = server_url.clone();
    }
    info!("서버: {}", config.server.base_url);

    let api: Arc<dyn SwarmApi> =
        Arc::new(HttpSwarmClient::new(&config.server.base_url, config.timeout())?);

    match args.command {
        Command::Watch {
            sort,
            descending,
            stats_interval_ms,
            exceptions_interval_ms,
        } => {
            if let Some(ms) = stats_interval_ms {
                config.poll.stats_interval_ms = ms;
            }
            if let Some(ms) = exceptions_interval_ms {
                config.poll.exceptions_interval_ms = ms;
            }
            run_watch(api, config, sort, descending).await?;
        }

        Command::Start {
            users,
            hatch_rate,
            test_file,
        } => {
            let backend = Arc::new(MemoryChartBackend::new());
            let state = Arc::new(Mutex::new(DashboardState::new(backend)));
            let mut panel = ControlPanel::new(api, state);
            let ack = panel.start_swarm(users, hatch_rate, test_file).await?;
            report_ack(&ack)?;
        }

        Command::Edit { users, hatch_rate } => {
            let backend = Arc::new(MemoryChartBackend::new());
            let state = Arc::new(Mutex::new(DashboardState::new(backend)));
            let mut panel = ControlPanel::new(api, state);
            let ack = panel.edit_swarm(users, hatch_rate).await?;
            report_ack(&ack)?;
        }

        Command::Ramp {
            init_count,
            max_count,
            hatch_rate,
            hatch_stride,
            precision,
            response_time,
            percentile,
            fail_rate,
            wait_time,
        } => {
            let params = RampParams {
                init_count,
                max_count,
                hatch_rate,
                hatch_stride,
                precision,
                response_time,
                percentile,
                fail_rate,
                wait_time,
            };
            let backend = Arc::new(MemoryChartBackend::new());
            let state = Arc::new(Mutex::new(DashboardState::new(backend)));
            let mut panel = ControlPanel::new(api, state);
            let ack = panel.start_ramp(&params).await?;
            report_ack(&ack)?;
        }

        Command::Stop => {
            api.stop().await?;
            println!("✅ 정지 요청을 보냈습니다.");
        }

        Command::Reset => {
            api.reset_stats().await?;
            println!("✅ 통계 카운터를 리셋했습니다.");
        }

        Command::Config { action } => match action {
            ConfigAction::Get => {
                let body = api.fetch_config().await?;
                println!("{body}");
            }
            ConfigAction::Push { file } => {
                let body = std::fs::read_to_string(&file)?;
                let ack = api.save_config(&body).await?;
                report_ack(&ack)?;
            }
        },

        Command::Csv { action } => match action {
            CsvAction::Columns { file } => {
                let name = file_name_of(&file)?;
                let content = std::fs::read(&file)?;
                let columns = api.csv_columns(&name, content).await?;
                for column in &columns {
                    println!("{column}");
                }
            }
            CsvAction::Convert {
                headers,
                json_path,
                json_option,
                last_var_type,
            } => {
                // 서버에 저장된 최신 설정에 주입한다
                let config_text = api.fetch_config().await?;
                let request = CsvConvertRequest {
                    headers,
                    json_path,
                    json_option,
                    config_text,
                    last_var_type,
                };
                let ack = api.convert_csv(&request).await?;
                report_ack(&ack)?;
            }
        },

        Command::Export { kind, output } => {
            let body = api.export_csv(kind.into()).await?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &body)?;
                    println!("✅ 저장됨: {}", path.display());
                }
                None => print!("{body}"),
            }
        }

        Command::Upload { directory, file } => {
            let name = file_name_of(&file)?;
            let content = std::fs::read(&file)?;
            let ack = api.upload_test_file(&directory, &name, content).await?;
            if !ack.success {
                warn!("업로드 거부: {:?}", ack.message);
            }
            report_ack(&ack)?;
        }
    }

    Ok(())
}
