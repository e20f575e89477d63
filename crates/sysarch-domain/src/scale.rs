//! Weighting scales - named ordinal scales used to judge relationships

use crate::error::{require_name, ModelError, ModelResult};
use crate::ids::{LevelId, ProjectId, ScaleId};
use serde::{Deserialize, Serialize};

/// One step of a weighting scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightLevel {
    /// Unique identifier
    pub id: LevelId,
    /// Scale that owns this level
    pub scale: ScaleId,
    /// Level name, e.g. "Must Have"
    pub name: String,
    /// Numeric value used for scoring
    pub value: f64,
}

/// A named ordinal scale such as "Criticality" or "MoSCoW"
///
/// Levels are kept in insertion order. Values need not be unique; the
/// conventional order is highest to lowest, see [`WeightingScale::levels_desc`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightingScale {
    /// Unique identifier
    pub id: ScaleId,
    /// Owning project
    pub project: ProjectId,
    /// Scale name
    pub name: String,
    /// Explanation of the scale
    pub description: String,
    /// Succinct statement of what the scale measures
    pub criteria: String,
    /// Levels in insertion order
    pub levels: Vec<WeightLevel>,
}

impl WeightingScale {
    /// Create an empty scale
    pub fn new(project: ProjectId, attrs: ScaleAttrs) -> ModelResult<Self> {
        require_name("Scale", &attrs.name)?;
        Ok(Self {
            id: ScaleId::new(),
            project,
            name: attrs.name,
            description: attrs.description,
            criteria: attrs.criteria,
            levels: Vec::new(),
        })
    }

    /// Append a level to the scale
    pub fn add_level(&mut self, name: impl Into<String>, value: f64) -> ModelResult<WeightLevel> {
        let name = name.into();
        require_name("Level", &name)?;
        check_value(&name, value)?;

        let level = WeightLevel {
            id: LevelId::new(),
            scale: self.id,
            name,
            value,
        };
        self.levels.push(level.clone());
        Ok(level)
    }

    /// Rename or revalue a level in place
    pub fn update_level(
        &mut self,
        level: LevelId,
        name: impl Into<String>,
        value: f64,
    ) -> ModelResult<WeightLevel> {
        let name = name.into();
        require_name("Level", &name)?;
        check_value(&name, value)?;

        let found = self
            .levels
            .iter_mut()
            .find(|l| l.id == level)
            .ok_or_else(|| ModelError::not_found("level", level))?;
        found.name = name;
        found.value = value;
        Ok(found.clone())
    }

    /// Largest level value
    pub fn max(&self) -> ModelResult<f64> {
        self.levels
            .iter()
            .map(|l| l.value)
            .reduce(f64::max)
            .ok_or(ModelError::EmptyScale(self.id))
    }

    /// Smallest level value
    pub fn min(&self) -> ModelResult<f64> {
        self.levels
            .iter()
            .map(|l| l.value)
            .reduce(f64::min)
            .ok_or(ModelError::EmptyScale(self.id))
    }

    /// Look up a level of this scale
    pub fn level(&self, id: LevelId) -> Option<&WeightLevel> {
        self.levels.iter().find(|l| l.id == id)
    }

    /// Look up a level by name (case-insensitive)
    pub fn level_named(&self, name: &str) -> Option<&WeightLevel> {
        self.levels
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Levels sorted by descending value, for display
    pub fn levels_desc(&self) -> Vec<&WeightLevel> {
        let mut levels: Vec<&WeightLevel> = self.levels.iter().collect();
        levels.sort_by(|a, b| b.value.total_cmp(&a.value));
        levels
    }
}

fn check_value(name: &str, value: f64) -> ModelResult<()> {
    if !value.is_finite() {
        return Err(ModelError::Validation(format!(
            "Level '{}' value must be finite, got {}",
            name, value
        )));
    }
    Ok(())
}

/// Attributes for creating a scale
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScaleAttrs {
    /// Scale name
    pub name: String,
    /// Explanation of the scale
    #[serde(default)]
    pub description: String,
    /// What the scale measures
    #[serde(default)]
    pub criteria: String,
}

impl ScaleAttrs {
    /// Attributes with only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Standard scales used in architecting studies
pub mod presets {
    /// A preset scale definition: name, description, levels
    #[derive(Debug, Clone, Copy)]
    pub struct Preset {
        /// Scale name
        pub name: &'static str,
        /// Scale description
        pub description: &'static str,
        /// (level name, value) pairs, highest first
        pub levels: &'static [(&'static str, f64)],
    }

    /// How critical one entity is to another
    pub const CRITICALITY: Preset = Preset {
        name: "Criticality",
        description: "A measure of how critical one entity is to another.",
        levels: &[
            ("Cannot Be Achieved Without", 1.0),
            ("Seriously Jeopardized Without", 0.8),
            ("Somewhat Jeopardized Without", 0.6),
            ("Minimally Jeopardized Without", 0.3),
            ("Practically Not Jeopardized Without", 0.1),
            ("Not Applicable", 0.0),
        ],
    };

    /// How well something satisfies something else
    pub const SATISFIABILITY: Preset = Preset {
        name: "Satisfiability",
        description: "A measure of how well something can satisfy something else.",
        levels: &[
            ("Completely satisfies the function under all circumstances", 1.0),
            ("Satisfies the function under most circumstances", 0.8),
            ("Satisfies the function under some circumstances", 0.2),
            ("Does not satisfies the function", 0.0),
        ],
    };

    /// MoSCoW prioritization
    pub const MOSCOW: Preset = Preset {
        name: "MoSCoW",
        description: "A prioritization technique used in management.",
        levels: &[
            ("Must Have", 1.0),
            ("Should Have", 0.8),
            ("Could Have", 0.4),
            ("Will Not Have", 0.0),
        ],
    };

    /// Five-point Likert importance
    pub const LIKERT: Preset = Preset {
        name: "Likert",
        description: "A prioritization technique used in management.",
        levels: &[
            ("Very Important", 1.0),
            ("Important", 0.8),
            ("Moderately Important", 0.5),
            ("Of Little Importance", 0.25),
            ("Unimportant", 0.0),
        ],
    };

    /// QFD house of quality 9-3-1
    pub const HOUSE_OF_QUALITY: Preset = Preset {
        name: "House of Quality",
        description: "A prioritization technique used in management.",
        levels: &[("High", 9.0), ("Medium", 3.0), ("Low", 1.0), ("N/A", 0.0)],
    };

    /// Every preset
    pub const ALL: [Preset; 5] = [CRITICALITY, SATISFIABILITY, MOSCOW, LIKERT, HOUSE_OF_QUALITY];

    /// Find a preset by name (case-insensitive)
    pub fn find(name: &str) -> Option<Preset> {
        ALL.iter()
            .copied()
            .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
    }
}
