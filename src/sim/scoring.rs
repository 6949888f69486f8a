//! Answer scoring

use crate::consts::BASE_POINTS;

/// Score multiplier for the current combo (after it was incremented)
pub fn combo_multiplier(combo: u32) -> f64 {
    match combo {
        10.. => 3.0,
        5.. => 2.0,
        3.. => 1.5,
        _ => 1.0,
    }
}

/// +25% per difficulty level above 1
pub fn difficulty_bonus(difficulty: u8) -> f64 {
    1.0 + (difficulty.max(1) - 1) as f64 * 0.25
}

/// Points for a correct answer
pub fn answer_points(combo: u32, difficulty: u8) -> u64 {
    let base = (BASE_POINTS * combo_multiplier(combo)).floor();
    (base * difficulty_bonus(difficulty)).floor() as u64
}
