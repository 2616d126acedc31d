//! Lookback decision shared by the fixed and adaptive strategies
//!
//! Care if the realized frequency is below the need. On an exact tie the
//! decision alternates with the window's most recent day, otherwise a tie
//! would repeat the same decision forever.

use super::window::last_bit;

pub fn decide(need: f64, mu: f64, window: &[f64]) -> u8 {
    if mu < need {
        1
    } else if mu == need {
        1 - last_bit(window)
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_need_cares() {
        assert_eq!(decide(0.2, 0.1, &[1.0, 0.0]), 1);
    }

    #[test]
    fn test_above_need_waits() {
        assert_eq!(decide(0.2, 0.4, &[0.0, 1.0]), 0);
    }

    #[test]
    fn test_tie_alternates() {
        let cared_yesterday = [0.0, 0.0, 0.0, 0.0, 1.0];
        let not_yesterday = [0.0, 0.0, 0.0, 1.0, 0.0];
        assert_eq!(decide(0.2, 0.2, &cared_yesterday), 0);
        assert_eq!(decide(0.2, 0.2, &not_yesterday), 1);
    }
}
