/// Severity tiers for percentage readings
///
/// `< 50` is normal, `[50, 75)` is warning, `>= 75` is critical. Boundary
/// values belong to the higher tier.

use ratatui::style::Color;

pub const WARNING_THRESHOLD: f64 = 50.0;
pub const CRITICAL_THRESHOLD: f64 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Normal,
    Warning,
    Critical,
}

impl Tier {
    pub fn color(&self) -> Color {
        match self {
            Tier::Normal => Color::Green,
            Tier::Warning => Color::Yellow,
            Tier::Critical => Color::Red,
        }
    }
}

/// Classify a percentage. NaN has no meaningful tier and maps to normal.
pub fn classify(percent: f64) -> Tier {
    if percent.is_nan() || percent < WARNING_THRESHOLD {
        Tier::Normal
    } else if percent < CRITICAL_THRESHOLD {
        Tier::Warning
    } else {
        Tier::Critical
    }
}

/// Bar width in percent, clamped to [0, 100] for display only
pub fn bar_width(percent: f64) -> f64 {
    if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(0.0), Tier::Normal);
        assert_eq!(classify(49.99), Tier::Normal);
        assert_eq!(classify(50.0), Tier::Warning);
        assert_eq!(classify(74.99), Tier::Warning);
        assert_eq!(classify(75.0), Tier::Critical);
        assert_eq!(classify(100.0), Tier::Critical);
    }

    #[test]
    fn test_classify_out_of_range() {
        assert_eq!(classify(-5.0), Tier::Normal);
        assert_eq!(classify(120.5), Tier::Critical);
        assert_eq!(classify(f64::INFINITY), Tier::Critical);
        assert_eq!(classify(f64::NAN), Tier::Normal);
    }

    #[test]
    fn test_bar_width_is_clamped() {
        assert_eq!(bar_width(120.5), 100.0);
        assert_eq!(bar_width(42.0), 42.0);
        assert_eq!(bar_width(-3.0), 0.0);
        assert_eq!(bar_width(f64::NAN), 0.0);
    }
}
