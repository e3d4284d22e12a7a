use serde::{Deserialize, Serialize};

/// Station alert tier, ordered from healthy to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum AlertLevel {
    Normal,
    Watch,
    Advisory,
    Warning,
    Emergency,
}

/// Dashboard colour attached to each alert tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StatusColor {
    Green,
    Yellow,
    Orange,
    Red,
    DarkRed,
}

impl AlertLevel {
    /// Map a pulse score in [0, 100] to its tier.
    ///
    /// Lower bounds are inclusive: 80 is NORMAL, 79.999 is WATCH. Anything
    /// below 20 (including NaN) is an EMERGENCY.
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Normal
        } else if score >= 60.0 {
            Self::Watch
        } else if score >= 40.0 {
            Self::Advisory
        } else if score >= 20.0 {
            Self::Warning
        } else {
            Self::Emergency
        }
    }

    pub fn color(&self) -> StatusColor {
        match self {
            Self::Normal => StatusColor::Green,
            Self::Watch => StatusColor::Yellow,
            Self::Advisory => StatusColor::Orange,
            Self::Warning => StatusColor::Red,
            Self::Emergency => StatusColor::DarkRed,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Normal => "Groundwater levels are healthy",
            Self::Watch => "Groundwater levels are moderate - monitor closely",
            Self::Advisory => "Groundwater levels are below normal - conservation advised",
            Self::Warning => "Groundwater levels are critically low - immediate action needed",
            Self::Emergency => "Groundwater emergency - implement emergency measures",
        }
    }

    /// Health label used in station summaries
    pub fn health_label(&self) -> &'static str {
        match self {
            Self::Normal => "EXCELLENT",
            Self::Watch => "GOOD",
            Self::Advisory => "FAIR",
            Self::Warning => "POOR",
            Self::Emergency => "CRITICAL",
        }
    }

    /// Whether operators should be notified
    pub fn requires_notification(&self) -> bool {
        *self != Self::Normal
    }
}

/// Classified station status for a pulse score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StationStatus {
    pub pulse_score: f64,
    pub alert_level: AlertLevel,
    pub color: StatusColor,
    pub message: &'static str,
}

impl StationStatus {
    pub fn classify(pulse_score: f64) -> Self {
        let alert_level = AlertLevel::from_score(pulse_score);
        Self {
            pulse_score,
            alert_level,
            color: alert_level.color(),
            message: alert_level.message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(100.0, AlertLevel::Normal, StatusColor::Green)]
    #[case(80.0, AlertLevel::Normal, StatusColor::Green)]
    #[case(79.999, AlertLevel::Watch, StatusColor::Yellow)]
    #[case(60.0, AlertLevel::Watch, StatusColor::Yellow)]
    #[case(59.9, AlertLevel::Advisory, StatusColor::Orange)]
    #[case(40.0, AlertLevel::Advisory, StatusColor::Orange)]
    #[case(39.9, AlertLevel::Warning, StatusColor::Red)]
    #[case(20.0, AlertLevel::Warning, StatusColor::Red)]
    #[case(19.9, AlertLevel::Emergency, StatusColor::DarkRed)]
    #[case(0.0, AlertLevel::Emergency, StatusColor::DarkRed)]
    fn test_classify_boundaries(
        #[case] score: f64,
        #[case] level: AlertLevel,
        #[case] color: StatusColor,
    ) {
        let status = StationStatus::classify(score);
        assert_eq!(status.alert_level, level);
        assert_eq!(status.color, color);
        assert_eq!(status.message, level.message());
    }

    #[test]
    fn test_severity_decreases_with_score() {
        let mut previous = AlertLevel::Emergency;
        for step in 0..=1000 {
            let level = AlertLevel::from_score(step as f64 / 10.0);
            assert!(level <= previous);
            previous = level;
        }
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!(
            serde_json::to_string(&AlertLevel::Advisory).unwrap(),
            "\"ADVISORY\""
        );
        assert_eq!(
            serde_json::to_string(&StatusColor::DarkRed).unwrap(),
            "\"darkred\""
        );
        assert_eq!(AlertLevel::Emergency.to_string(), "EMERGENCY");
    }

    #[test]
    fn test_notification_only_off_normal() {
        assert!(!AlertLevel::Normal.requires_notification());
        assert!(AlertLevel::Watch.requires_notification());
        assert_eq!(AlertLevel::Warning.health_label(), "POOR");
    }
}
