// src/analysis/pace_classifier.rs

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaceCategory {
    Express,
    Fast,
    FastMedium,
    MediumFast,
    Medium,
    SlowSpin,
}

impl PaceCategory {
    /// Lower bound (km/h, inclusive) for each band, fastest first
    const BANDS: [(f32, PaceCategory); 5] = [
        (145.0, PaceCategory::Express),
        (130.0, PaceCategory::Fast),
        (115.0, PaceCategory::FastMedium),
        (100.0, PaceCategory::MediumFast),
        (80.0, PaceCategory::Medium),
    ];

    pub fn from_kph(speed_kph: f32) -> Self {
        Self::BANDS
            .iter()
            .find(|(floor, _)| speed_kph >= *floor)
            .map(|(_, category)| *category)
            .unwrap_or(PaceCategory::SlowSpin)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Express => "Express Pace",
            Self::Fast => "Fast",
            Self::FastMedium => "Fast-Medium",
            Self::MediumFast => "Medium-Fast",
            Self::Medium => "Medium",
            Self::SlowSpin => "Slow/Spin",
        }
    }

    pub fn color_tag(&self) -> &'static str {
        match self {
            Self::Express => "red",
            Self::Fast => "orange",
            Self::FastMedium => "amber",
            Self::MediumFast => "yellow",
            Self::Medium => "green",
            Self::SlowSpin => "blue",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaceReading {
    pub category: PaceCategory,
    pub label: &'static str,
    pub color_tag: &'static str,
}

/// Total over all inputs, NaN included (it lands in the slowest band)
pub fn classify_pace(speed_kph: f32) -> PaceReading {
    let category = PaceCategory::from_kph(speed_kph);
    PaceReading {
        category,
        label: category.label(),
        color_tag: category.color_tag(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_speeds() {
        assert_eq!(classify_pace(150.0).label, "Express Pace");
        assert_eq!(classify_pace(90.0).label, "Medium");
        assert_eq!(classify_pace(60.0).label, "Slow/Spin");
    }

    #[test]
    fn test_band_floors_are_inclusive() {
        assert_eq!(classify_pace(145.0).category, PaceCategory::Express);
        assert_eq!(classify_pace(144.9).category, PaceCategory::Fast);
        assert_eq!(classify_pace(130.0).category, PaceCategory::Fast);
        assert_eq!(classify_pace(115.0).category, PaceCategory::FastMedium);
        assert_eq!(classify_pace(100.0).category, PaceCategory::MediumFast);
        assert_eq!(classify_pace(80.0).category, PaceCategory::Medium);
        assert_eq!(classify_pace(79.9).category, PaceCategory::SlowSpin);
    }

    #[test]
    fn test_degenerate_inputs_still_classify() {
        assert_eq!(classify_pace(f32::NAN).category, PaceCategory::SlowSpin);
        assert_eq!(classify_pace(-10.0).color_tag, "blue");
        assert_eq!(classify_pace(f32::INFINITY).label, "Express Pace");
    }
}
