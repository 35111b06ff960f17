//! Per-card retention score.

/// Weight of answer accuracy in the score.
const ACCURACY_WEIGHT: f64 = 0.7;
/// Weight of the normalized ease factor in the score.
const EASE_WEIGHT: f64 = 0.3;
/// Ease factor that maps to 0 after normalization.
const EASE_FLOOR: f64 = 1.3;
/// Ease span that maps to 1 after normalization (1.3 + 1.7 = 3.0).
const EASE_SPAN: f64 = 1.7;

/// Combine answer accuracy with the ease factor into a 0-100 score.
///
/// Returns 0 for a card that was never answered. The result is rounded to
/// one decimal.
pub fn retention_score(times_correct: u32, times_incorrect: u32, ease_factor: f64) -> f64 {
    let total = times_correct + times_incorrect;
    if total == 0 {
        return 0.0;
    }

    let accuracy = f64::from(times_correct) / f64::from(total);
    let ease = ((ease_factor - EASE_FLOOR) / EASE_SPAN).clamp(0.0, 1.0);

    let score = (accuracy * ACCURACY_WEIGHT + ease * EASE_WEIGHT) * 100.0;
    (score * 10.0).round() / 10.0
}
