//! # swarmview-dashboard
//!
//! 대시보드 로직 어댑터: 차트 레지스트리, 통계 테이블 정렬,
//! 폴링 루프, 제어 패널 상태 머신.
//!
//! 차트 렌더링과 테이블 렌더링 자체는 `swarmview-core`의 포트
//! ([`swarmview_core::ports::chart`], [`swarmview_core::ports::view`])
//! 뒤에 있다.

pub mod control;
pub mod filters;
pub mod memory_chart;
pub mod poller;
pub mod registry;
pub mod state;
pub mod table;

pub use control::{ControlPanel, Panel, RunPhase};
pub use memory_chart::MemoryChartBackend;
pub use registry::ChartRegistry;
pub use state::DashboardState;
pub use table::{SortSpec, StatField, StatsTable};
