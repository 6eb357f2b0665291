//! Batch metrics

use std::time::Duration;

use arcstd_core::AttachmentScore;

use crate::executor::ExecutionMode;

/// Results of a batch together with its metrics
#[derive(Debug, Clone)]
pub struct BatchOutput<T> {
    /// Per-sentence results, in input order, skipped sentences left out
    pub items: Vec<T>,
    /// Counters for the whole batch
    pub metrics: BatchMetrics,
}

/// Counters collected over one batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchMetrics {
    /// Execution mode that was actually used
    pub mode_used: ExecutionMode,
    /// Sentences processed
    pub sentences: usize,
    /// Sentences left out by the non-projective policy
    pub skipped: usize,
    /// Transitions executed
    pub actions: usize,
    /// Wall-clock time of the batch
    pub processing_time: Duration,
    /// Throughput
    pub sentences_per_second: f64,
    /// Attachment counts, when the batch was compared against gold
    pub score: AttachmentScore,
}

impl BatchMetrics {
    /// Assemble metrics for a finished batch
    pub fn new(
        mode_used: ExecutionMode,
        sentences: usize,
        skipped: usize,
        actions: usize,
        processing_time: Duration,
        score: AttachmentScore,
    ) -> Self {
        let seconds = processing_time.as_secs_f64();
        let sentences_per_second = if seconds > 0.0 {
            sentences as f64 / seconds
        } else {
            0.0
        };
        Self {
            mode_used,
            sentences,
            skipped,
            actions,
            processing_time,
            sentences_per_second,
            score,
        }
    }

    /// Average transitions per processed sentence
    pub fn actions_per_sentence(&self) -> f64 {
        if self.sentences == 0 {
            0.0
        } else {
            self.actions as f64 / self.sentences as f64
        }
    }
}
