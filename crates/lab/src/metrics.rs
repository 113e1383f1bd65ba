//! Per-object creation metrics

use std::collections::HashMap;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use serde::Serialize;
use shared::{GeometryType, MaterialType, ObjectId};

/// Milliseconds elapsed since `started`
pub fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Timings recorded when the renderer creates an object primitive
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectPerformanceMetrics {
    pub id: ObjectId,
    pub name: String,
    pub object_type: String,
    pub geometry_type: GeometryType,
    pub material_type: MaterialType,
    pub creation_time_ms: f64,
    pub geometry_init_time_ms: f64,
    pub material_init_time_ms: f64,
    /// Filled in later by whoever can measure uploads
    pub gpu_upload_time_ms: Option<f64>,
    pub total_setup_time_ms: f64,
    pub total_vertices: usize,
    pub attribute_count: usize,
    pub timestamp: u64,
}

/// Aggregate over every recorded sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedMetrics {
    pub total_objects: usize,
    pub total_vertices: usize,
    pub avg_creation_time_ms: f64,
    pub avg_geometry_time_ms: f64,
    pub avg_material_time_ms: f64,
    /// Only over samples that have a GPU time
    pub avg_gpu_time_ms: Option<f64>,
    pub max_creation_time_ms: f64,
    pub max_geometry_time_ms: f64,
    pub max_material_time_ms: f64,
    pub max_gpu_time_ms: Option<f64>,
}

/// Append-only metrics log with a latest-per-object index
#[derive(Debug, Default)]
pub struct PerformanceTracker {
    samples: Vec<ObjectPerformanceMetrics>,
    latest: HashMap<ObjectId, usize>,
}

impl PerformanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, metrics: ObjectPerformanceMetrics) {
        tracing::debug!(
            "created {} ({}) in {:.3}ms, {} vertices",
            metrics.name,
            metrics.id,
            metrics.creation_time_ms,
            metrics.total_vertices
        );
        self.latest.insert(metrics.id.clone(), self.samples.len());
        self.samples.push(metrics);
    }

    /// Attach a measured GPU upload time to the latest sample for `id`
    pub fn record_gpu_upload(&mut self, id: &str, time_ms: f64) -> bool {
        let Some(sample) = self.latest.get(id).and_then(|&i| self.samples.get_mut(i)) else {
            return false;
        };
        sample.gpu_upload_time_ms = Some(time_ms);
        sample.total_setup_time_ms += time_ms;
        true
    }

    pub fn all(&self) -> &[ObjectPerformanceMetrics] {
        &self.samples
    }

    /// Latest sample for an object
    pub fn get(&self, id: &str) -> Option<&ObjectPerformanceMetrics> {
        self.latest.get(id).and_then(|&i| self.samples.get(i))
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.latest.clear();
    }

    /// `None` when nothing was recorded
    pub fn aggregated(&self) -> Option<AggregatedMetrics> {
        if self.samples.is_empty() {
            return None;
        }

        let count = self.samples.len() as f64;
        let avg = |f: fn(&ObjectPerformanceMetrics) -> f64| {
            self.samples.iter().map(f).sum::<f64>() / count
        };
        let max = |f: fn(&ObjectPerformanceMetrics) -> f64| {
            self.samples.iter().map(f).fold(f64::MIN, f64::max)
        };

        let gpu: Vec<f64> = self
            .samples
            .iter()
            .filter_map(|m| m.gpu_upload_time_ms)
            .collect();
        let (avg_gpu, max_gpu) = if gpu.is_empty() {
            (None, None)
        } else {
            (
                Some(gpu.iter().sum::<f64>() / gpu.len() as f64),
                Some(gpu.iter().copied().fold(f64::MIN, f64::max)),
            )
        };

        Some(AggregatedMetrics {
            total_objects: self.samples.len(),
            total_vertices: self.samples.iter().map(|m| m.total_vertices).sum(),
            avg_creation_time_ms: avg(|m| m.creation_time_ms),
            avg_geometry_time_ms: avg(|m| m.geometry_init_time_ms),
            avg_material_time_ms: avg(|m| m.material_init_time_ms),
            avg_gpu_time_ms: avg_gpu,
            max_creation_time_ms: max(|m| m.creation_time_ms),
            max_geometry_time_ms: max(|m| m.geometry_init_time_ms),
            max_material_time_ms: max(|m| m.material_init_time_ms),
            max_gpu_time_ms: max_gpu,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str, creation: f64, vertices: usize) -> ObjectPerformanceMetrics {
        ObjectPerformanceMetrics {
            id: id.to_string(),
            name: id.to_uppercase(),
            object_type: "Group".to_string(),
            geometry_type: GeometryType::Box,
            material_type: MaterialType::Normal,
            creation_time_ms: creation,
            geometry_init_time_ms: creation / 2.0,
            material_init_time_ms: creation / 4.0,
            gpu_upload_time_ms: None,
            total_setup_time_ms: creation,
            total_vertices: vertices,
            attribute_count: 2,
            timestamp: 0,
        }
    }

    #[test]
    fn test_empty_aggregate() {
        assert!(PerformanceTracker::new().aggregated().is_none());
    }

    #[test]
    fn test_aggregate() {
        let mut tracker = PerformanceTracker::new();
        tracker.record(sample("a", 2.0, 24));
        tracker.record(sample("b", 4.0, 100));

        let agg = tracker.aggregated().unwrap();
        assert_eq!(agg.total_objects, 2);
        assert_eq!(agg.total_vertices, 124);
        assert!((agg.avg_creation_time_ms - 3.0).abs() < 1e-9);
        assert!((agg.max_geometry_time_ms - 2.0).abs() < 1e-9);
        assert_eq!(agg.avg_gpu_time_ms, None);
        assert_eq!(agg.max_gpu_time_ms, None);
    }

    #[test]
    fn test_gpu_upload_only_counts_timed_samples() {
        let mut tracker = PerformanceTracker::new();
        tracker.record(sample("a", 1.0, 24));
        tracker.record(sample("b", 1.0, 24));
        assert!(tracker.record_gpu_upload("a", 3.0));
        assert!(!tracker.record_gpu_upload("missing", 3.0));

        let a = tracker.get("a").unwrap();
        assert_eq!(a.gpu_upload_time_ms, Some(3.0));
        assert!((a.total_setup_time_ms - 4.0).abs() < 1e-9);

        let agg = tracker.aggregated().unwrap();
        assert_eq!(agg.avg_gpu_time_ms, Some(3.0));
        assert_eq!(agg.max_gpu_time_ms, Some(3.0));
    }

    #[test]
    fn test_latest_per_object_and_clear() {
        let mut tracker = PerformanceTracker::new();
        tracker.record(sample("a", 1.0, 24));
        tracker.record(sample("a", 5.0, 24));
        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.get("a").unwrap().creation_time_ms, 5.0);

        tracker.clear();
        assert!(tracker.is_empty());
        assert!(tracker.get("a").is_none());
    }
}
