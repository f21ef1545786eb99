//! 차트 백엔드 포트.
//!
//! 차트 렌더링 내부는 외부 협력자다 — 이 포트는 라인 생성/데이터
//! 추가/리사이즈/폐기만 모델링하고, 그리는 방식은 구현체에 맡긴다.
//! 구현: `swarmview-dashboard`의 인메모리 백엔드 (테스트/헤드리스용).

use chrono::{DateTime, Utc};

use crate::models::stats::EndpointKey;

/// 어드밴스 차트가 겹쳐 보여줄 수 있는 지표
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdvanceMetric {
    /// 사용자 수
    Users,
    /// 초당 요청 수
    Rps,
    /// 평균 응답 시간
    ResponseTime,
    /// 실패 수
    Failures,
}

impl AdvanceMetric {
    /// 엔드포인트별 라인을 가지는 지표들 (Users 시리즈는 Total 한 줄뿐)
    pub const ENDPOINT_METRICS: [AdvanceMetric; 3] = [
        AdvanceMetric::Rps,
        AdvanceMetric::ResponseTime,
        AdvanceMetric::Failures,
    ];

    /// 지표 표시 이름
    pub fn label(&self) -> &'static str {
        match self {
            AdvanceMetric::Users => "users",
            AdvanceMetric::Rps => "rps",
            AdvanceMetric::ResponseTime => "response time",
            AdvanceMetric::Failures => "failures",
        }
    }

    /// 지표 단위
    pub fn unit(&self) -> &'static str {
        match self {
            AdvanceMetric::Users => "users",
            AdvanceMetric::Rps => "reqs/s",
            AdvanceMetric::ResponseTime => "ms",
            AdvanceMetric::Failures => "failures",
        }
    }
}

/// 단일 지표 라인 차트 생성 사양
#[derive(Debug, Clone)]
pub struct ChartSpec {
    /// 차트 제목
    pub title: String,
    /// 부제목
    pub subtitle: String,
    /// Y축 단위
    pub unit: String,
    /// 생성 시점에 미리 만들 라인 라벨 목록
    pub initial_lines: Vec<String>,
}

/// 어드밴스 차트에 추가되는 한 폴링 분량의 다중 시리즈 데이터 포인트
#[derive(Debug, Clone)]
pub struct AdvanceSample {
    /// 현재 사용자 수
    pub users: f64,
    /// 정렬된 엔드포인트 순서의 초당 요청 수 배열
    pub rps: Vec<f64>,
    /// 정렬된 엔드포인트 순서의 평균 응답 시간 배열
    pub response_times: Vec<f64>,
    /// 정렬된 엔드포인트 순서의 실패 수 배열
    pub failures: Vec<f64>,
}

/// 단일 지표 라인 차트 핸들
pub trait LineChart: Send {
    /// 라인 추가 (이미 있으면 호출하지 않는 것이 호출자 책임)
    fn add_line(&mut self, key: &EndpointKey, label: &str);

    /// 해당 키의 라인 존재 여부
    fn has_line(&self, key: &EndpointKey) -> bool;

    /// 데이터 포인트 1개 추가 — 값 배열은 라인 생성 순서를 따른다
    fn append(&mut self, timestamp: DateTime<Utc>, values: &[f64]);

    /// 레이아웃 재계산 (차트 탭이 다시 보일 때)
    fn resize(&mut self);

    /// 차트 폐기 — 이후 호출은 무시되어야 한다
    fn dispose(&mut self);
}

/// 다중 지표 오버레이(어드밴스) 차트 핸들
///
/// 지표별 시리즈를 가지며, 사용자가 동시에 최대 2개 지표를
/// 필터로 선택해 겹쳐 본다.
pub trait AdvanceChart: Send {
    /// 특정 지표 시리즈에 라인 추가
    fn add_line(&mut self, metric: AdvanceMetric, key: &EndpointKey, label: &str);

    /// 특정 지표 시리즈에 해당 키의 라인 존재 여부
    fn has_line(&self, metric: AdvanceMetric, key: &EndpointKey) -> bool;

    /// 다중 시리즈 데이터 포인트 1개 추가
    fn append(&mut self, timestamp: DateTime<Utc>, sample: &AdvanceSample);

    /// 표시 필터에 지표 추가
    fn add_filter(&mut self, metric: AdvanceMetric);

    /// 표시 필터에서 지표 제거
    fn remove_filter(&mut self, metric: AdvanceMetric);

    /// 레이아웃 재계산
    fn resize(&mut self);

    /// 차트 폐기
    fn dispose(&mut self);
}

/// 차트 팩토리 — 리셋 시 새 차트 객체를 만들어 준다
pub trait ChartBackend: Send + Sync {
    /// 단일 지표 라인 차트 생성
    fn line_chart(&self, spec: &ChartSpec) -> Box<dyn LineChart>;

    /// 어드밴스 차트 생성
    fn advance_chart(&self, title: &str) -> Box<dyn AdvanceChart>;
}
