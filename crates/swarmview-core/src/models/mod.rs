//! SWARMVIEW 도메인 모델.
//!
//! 로드 테스트 서버와 주고받는 핵심 데이터 구조체를 정의한다.
//! 모든 모델은 `serde` Serialize/Deserialize를 구현한다.

pub mod control;
pub mod errors;
pub mod stats;
