//! In-range classification against a bound pair of unknown orientation.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub in_range: bool,
    /// Position of the value inside `[low, high]`, clamped to 0..=100.
    pub percentage: f64,
}

impl Classification {
    pub const OUT_OF_RANGE: Self = Self {
        in_range: false,
        percentage: 0.0,
    };
}

pub fn classify(value: f64, low_bound: f64, high_bound: f64) -> Classification {
    if !(value.is_finite() && low_bound.is_finite() && high_bound.is_finite()) {
        return Classification::OUT_OF_RANGE;
    }

    let low = low_bound.min(high_bound);
    let high = low_bound.max(high_bound);
    if high == low {
        return Classification::OUT_OF_RANGE;
    }

    let percentage = ((value - low) / (high - low) * 100.0).clamp(0.0, 100.0);
    Classification {
        in_range: low <= value && value <= high,
        percentage,
    }
}
