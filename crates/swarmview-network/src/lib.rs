//! # swarmview-network
//!
//! `SwarmApi` 포트의 reqwest 구현.
//! 폴링 실패는 재시도 없이 호출자에게 전달된다 — 복원력은
//! 폴링 루프의 다음 틱 재장전이 유일한 메커니즘이다.

pub mod http_client;

pub use http_client::HttpSwarmClient;
