//! 인메모리 차트 백엔드.
//!
//! 헤드리스 실행과 테스트에서 사용하는 `ChartBackend` 구현.
//! 라인/데이터 포인트를 그대로 기록하며, 백엔드가 기록 핸들을
//! 보관하므로 레지스트리가 차트를 폐기한 뒤에도 검증할 수 있다.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use swarmview_core::models::stats::EndpointKey;
use swarmview_core::ports::chart::{
    AdvanceChart, AdvanceMetric, AdvanceSample, ChartBackend, ChartSpec, LineChart,
};

/// 라인 차트 기록
#[derive(Debug, Default)]
pub struct LineChartRecord {
    /// 차트 제목
    pub title: String,
    /// 부제목
    pub subtitle: String,
    /// Y축 단위
    pub unit: String,
    /// 생성 순서의 (키, 라벨) 목록
    pub lines: Vec<(String, String)>,
    /// 추가된 데이터 포인트
    pub points: Vec<(DateTime<Utc>, Vec<f64>)>,
    /// resize 호출 횟수
    pub resize_count: u32,
    /// 폐기 여부
    pub disposed: bool,
}

/// 어드밴스 차트 기록
#[derive(Debug, Default)]
pub struct AdvanceChartRecord {
    /// 차트 제목
    pub title: String,
    /// 지표 시리즈별 (키, 라벨) 목록
    pub lines: HashMap<AdvanceMetric, Vec<(String, String)>>,
    /// 추가된 다중 시리즈 데이터 포인트
    pub samples: Vec<(DateTime<Utc>, AdvanceSample)>,
    /// 현재 활성 필터
    pub filters: Vec<AdvanceMetric>,
    /// resize 호출 횟수
    pub resize_count: u32,
    /// 폐기 여부
    pub disposed: bool,
}

struct MemoryLineChart {
    record: Arc<Mutex<LineChartRecord>>,
}

impl LineChart for MemoryLineChart {
    fn add_line(&mut self, key: &EndpointKey, label: &str) {
        let mut record = self.record.lock();
        if record.disposed {
            return;
        }
        record.lines.push((key.as_str().to_string(), label.to_string()));
    }

    fn has_line(&self, key: &EndpointKey) -> bool {
        self.record
            .lock()
            .lines
            .iter()
            .any(|(k, _)| k == key.as_str())
    }

    fn append(&mut self, timestamp: DateTime<Utc>, values: &[f64]) {
        let mut record = self.record.lock();
        if record.disposed {
            return;
        }
        record.points.push((timestamp, values.to_vec()));
    }

    fn resize(&mut self) {
        self.record.lock().resize_count += 1;
    }

    fn dispose(&mut self) {
        self.record.lock().disposed = true;
    }
}

struct MemoryAdvanceChart {
    record: Arc<Mutex<AdvanceChartRecord>>,
}

impl AdvanceChart for MemoryAdvanceChart {
    fn add_line(&mut self, metric: AdvanceMetric, key: &EndpointKey, label: &str) {
        let mut record = self.record.lock();
        if record.disposed {
            return;
        }
        record
            .lines
            .entry(metric)
            .or_default()
            .push((key.as_str().to_string(), label.to_string()));
    }

    fn has_line(&self, metric: AdvanceMetric, key: &EndpointKey) -> bool {
        self.record
            .lock()
            .lines
            .get(&metric)
            .is_some_and(|lines| lines.iter().any(|(k, _)| k == key.as_str()))
    }

    fn append(&mut self, timestamp: DateTime<Utc>, sample: &AdvanceSample) {
        let mut record = self.record.lock();
        if record.disposed {
            return;
        }
        record.samples.push((timestamp, sample.clone()));
    }

    fn add_filter(&mut self, metric: AdvanceMetric) {
        let mut record = self.record.lock();
        if !record.filters.contains(&metric) {
            record.filters.push(metric);
        }
    }

    fn remove_filter(&mut self, metric: AdvanceMetric) {
        self.record.lock().filters.retain(|m| *m != metric);
    }

    fn resize(&mut self) {
        self.record.lock().resize_count += 1;
    }

    fn dispose(&mut self) {
        self.record.lock().disposed = true;
    }
}

/// 인메모리 차트 팩토리
#[derive(Default)]
pub struct MemoryChartBackend {
    line_records: Mutex<Vec<Arc<Mutex<LineChartRecord>>>>,
    advance_records: Mutex<Vec<Arc<Mutex<AdvanceChartRecord>>>>,
}

impl MemoryChartBackend {
    /// 새 백엔드 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 지금까지 생성된 모든 라인 차트 기록 (폐기된 것 포함)
    pub fn line_records(&self) -> Vec<Arc<Mutex<LineChartRecord>>> {
        self.line_records.lock().clone()
    }

    /// 폐기되지 않은 라인 차트 기록
    pub fn live_line_records(&self) -> Vec<Arc<Mutex<LineChartRecord>>> {
        self.line_records
            .lock()
            .iter()
            .filter(|r| !r.lock().disposed)
            .cloned()
            .collect()
    }

    /// 제목으로 살아있는 라인 차트 기록 조회
    pub fn live_chart(&self, title: &str) -> Option<Arc<Mutex<LineChartRecord>>> {
        self.live_line_records()
            .into_iter()
            .find(|r| r.lock().title == title)
    }

    /// 지금까지 생성된 모든 어드밴스 차트 기록
    pub fn advance_records(&self) -> Vec<Arc<Mutex<AdvanceChartRecord>>> {
        self.advance_records.lock().clone()
    }

    /// 폐기되지 않은 어드밴스 차트 기록
    pub fn live_advance_record(&self) -> Option<Arc<Mutex<AdvanceChartRecord>>> {
        self.advance_records
            .lock()
            .iter()
            .find(|r| !r.lock().disposed)
            .cloned()
    }
}

impl ChartBackend for MemoryChartBackend {
    fn line_chart(&self, spec: &ChartSpec) -> Box<dyn LineChart> {
        let mut record = LineChartRecord {
            title: spec.title.clone(),
            subtitle: spec.subtitle.clone(),
            unit: spec.unit.clone(),
            ..LineChartRecord::default()
        };
        for label in &spec.initial_lines {
            record
                .lines
                .push((label.to_uppercase(), label.clone()));
        }

        let record = Arc::new(Mutex::new(record));
        self.line_records.lock().push(record.clone());
        Box::new(MemoryLineChart { record })
    }

    fn advance_chart(&self, title: &str) -> Box<dyn AdvanceChart> {
        let record = Arc::new(Mutex::new(AdvanceChartRecord {
            title: title.to_string(),
            ..AdvanceChartRecord::default()
        }));
        self.advance_records.lock().push(record.clone());
        Box::new(MemoryAdvanceChart { record })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposed_chart_ignores_writes() {
        let backend = MemoryChartBackend::new();
        let mut chart = backend.line_chart(&ChartSpec {
            title: "t".to_string(),
            subtitle: String::new(),
            unit: "ms".to_string(),
            initial_lines: vec![],
        });

        chart.add_line(&EndpointKey::new("/a", "GET"), "/a");
        chart.dispose();
        chart.append(Utc::now(), &[1.0]);
        chart.add_line(&EndpointKey::new("/b", "GET"), "/b");

        let record = backend.line_records()[0].clone();
        let record = record.lock();
        assert!(record.disposed);
        assert!(record.points.is_empty());
        assert_eq!(record.lines.len(), 1);
    }

    #[test]
    fn initial_lines_pre_created() {
        let backend = MemoryChartBackend::new();
        let chart = backend.line_chart(&ChartSpec {
            title: "Number of Users".to_string(),
            subtitle: String::new(),
            unit: "users".to_string(),
            initial_lines: vec!["Total".to_string()],
        });
        assert!(chart.has_line(&EndpointKey::new("Total", "")));
    }
}
