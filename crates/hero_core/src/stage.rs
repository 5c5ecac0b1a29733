//! Ordered scroll stages and the progress -> stage mapping.

use serde::Deserialize;

/// Timeline units between consecutive stage labels.
pub const STAGE_SPAN: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Stage1,
    Stage2,
    Stage3,
}

impl Stage {
    pub const ALL: &'static [Stage] = &[Stage::Stage1, Stage::Stage2, Stage::Stage3];

    pub fn index(self) -> usize {
        match self {
            Self::Stage1 => 0,
            Self::Stage2 => 1,
            Self::Stage3 => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Stage1 => "stage1",
            Self::Stage2 => "stage2",
            Self::Stage3 => "stage3",
        }
    }

    /// Value written to the pinned root's stage attribute.
    pub fn attribute_value(self) -> &'static str {
        match self {
            Self::Stage1 => "1",
            Self::Stage2 => "2",
            Self::Stage3 => "3",
        }
    }

    /// Label offset on the timeline.
    pub fn offset(self) -> f32 {
        self.index() as f32 * STAGE_SPAN
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The declared stages of one sequence plus their progress boundaries.
///
/// Thresholds sit halfway between consecutive label fractions, so the stage
/// intervals `[0, t0), [t0, t1), ..., [tn, 1]` partition the unit range.
#[derive(Debug, Clone, PartialEq)]
pub struct StageMap {
    stages: Vec<Stage>,
    label_fractions: Vec<f32>,
    thresholds: Vec<f32>,
}

impl StageMap {
    /// Build the map for the first `count` stages. `count` must be 2 or 3.
    pub fn new(count: usize) -> Result<Self, String> {
        if !(2..=Stage::ALL.len()).contains(&count) {
            return Err(format!(
                "Stage count must be between 2 and {}, got {count}",
                Stage::ALL.len()
            ));
        }
        let stages: Vec<Stage> = Stage::ALL[..count].to_vec();
        let duration = stages[count - 1].offset();
        let label_fractions: Vec<f32> = stages.iter().map(|s| s.offset() / duration).collect();
        let thresholds = label_fractions
            .windows(2)
            .map(|pair| (pair[0] + pair[1]) * 0.5)
            .collect();
        Ok(Self {
            stages,
            label_fractions,
            thresholds,
        })
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn first(&self) -> Stage {
        self.stages[0]
    }

    pub fn last(&self) -> Stage {
        self.stages[self.stages.len() - 1]
    }

    pub fn contains(&self, stage: Stage) -> bool {
        stage.index() < self.stages.len()
    }

    /// Timeline length in units (offset of the terminal label).
    pub fn duration(&self) -> f32 {
        self.last().offset()
    }

    pub fn thresholds(&self) -> &[f32] {
        &self.thresholds
    }

    /// Progress fraction of each stage label, ascending, first 0 and last 1.
    pub fn label_fractions(&self) -> &[f32] {
        &self.label_fractions
    }

    pub fn label_fraction(&self, stage: Stage) -> Option<f32> {
        self.label_fractions.get(stage.index()).copied()
    }

    /// Total, monotonic mapping from progress to stage. Out-of-range and NaN
    /// inputs are clamped first.
    pub fn stage_at(&self, progress: f32) -> Stage {
        let p = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        let index = self.thresholds.iter().take_while(|&&t| p >= t).count();
        self.stages[index]
    }
}
