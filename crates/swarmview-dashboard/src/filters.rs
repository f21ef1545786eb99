//! 어드밴스 차트 필터 집합.
//!
//! 동시에 최대 2개, 최소 1개의 지표만 활성화할 수 있다.
//! 기본 활성 지표는 응답 시간.

use swarmview_core::ports::chart::AdvanceMetric;

/// 필터 토글 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterChange {
    /// 지표가 활성화됨
    Added,
    /// 지표가 비활성화됨
    Removed,
}

/// 활성 필터 집합
#[derive(Debug, Clone)]
pub struct FilterSet {
    active: Vec<AdvanceMetric>,
}

impl Default for FilterSet {
    fn default() -> Self {
        Self {
            active: vec![AdvanceMetric::ResponseTime],
        }
    }
}

impl FilterSet {
    /// 지표 토글 — 한도 때문에 무시되면 `None`
    pub fn toggle(&mut self, metric: AdvanceMetric) -> Option<FilterChange> {
        if let Some(pos) = self.active.iter().position(|m| *m == metric) {
            // 마지막 남은 필터는 제거할 수 없다
            if self.active.len() <= 1 {
                return None;
            }
            self.active.remove(pos);
            Some(FilterChange::Removed)
        } else {
            if self.active.len() >= 2 {
                return None;
            }
            self.active.push(metric);
            Some(FilterChange::Added)
        }
    }

    /// 현재 활성 지표 목록
    pub fn active(&self) -> &[AdvanceMetric] {
        &self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_response_time() {
        let filters = FilterSet::default();
        assert_eq!(filters.active(), &[AdvanceMetric::ResponseTime]);
    }

    #[test]
    fn at_most_two_active() {
        let mut filters = FilterSet::default();
        assert_eq!(filters.toggle(AdvanceMetric::Rps), Some(FilterChange::Added));
        // 세 번째 추가는 무시된다
        assert_eq!(filters.toggle(AdvanceMetric::Users), None);
        assert_eq!(filters.active().len(), 2);
    }

    #[test]
    fn at_least_one_active() {
        let mut filters = FilterSet::default();
        assert_eq!(filters.toggle(AdvanceMetric::ResponseTime), None);
        assert_eq!(filters.active().len(), 1);
    }

    #[test]
    fn toggle_removes_when_two_active() {
        let mut filters = FilterSet::default();
        filters.toggle(AdvanceMetric::Failures);
        assert_eq!(
            filters.toggle(AdvanceMetric::ResponseTime),
            Some(FilterChange::Removed)
        );
        assert_eq!(filters.active(), &[AdvanceMetric::Failures]);
    }
}
