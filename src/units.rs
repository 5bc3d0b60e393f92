/// Rounds half toward positive infinity, so -2.5 becomes -2.
pub fn round_half_up(value: f64) -> i64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor as i64 + 1
    } else {
        floor as i64
    }
}

#[test]
fn test_round_half_up() {
    assert_eq!(round_half_up(0.49999999999999994), 0);
    assert_eq!(round_half_up(0.5), 1);
    assert_eq!(round_half_up(-0.5), 0);
    assert_eq!(round_half_up(-2.5), -2);
    assert_eq!(round_half_up(-2.51), -3);
}

pub mod temperature {
    use super::round_half_up;

    /// Forecast panels only carry one temperature, the low is derived from it.
    pub const LOW_OFFSET: i64 = 3;

    pub fn degrees(temp_c: f64) -> String {
        format!("{}°", round_half_up(temp_c))
    }

    pub fn low_from_high(high: i64) -> i64 {
        high - LOW_OFFSET
    }

    #[test]
    fn test_degrees() {
        assert_eq!(degrees(4.4), "4°");
        assert_eq!(degrees(4.5), "5°");
        assert_eq!(degrees(-2.5), "-2°");
        assert_eq!(degrees(-2.6), "-3°");
        assert_eq!(low_from_high(-1), -4);
    }
}

pub mod speed {
    use super::round_half_up;

    pub fn meters_per_second(speed: f64) -> String {
        format!("{} m/s", round_half_up(speed))
    }

    #[test]
    fn test_meters_per_second() {
        assert_eq!(meters_per_second(3.6), "4 m/s");
        assert_eq!(meters_per_second(0.0), "0 m/s");
    }
}

pub mod precipitation {
    pub fn millimeters(amount: f64) -> String {
        format!("{amount}mm")
    }

    #[test]
    fn test_millimeters() {
        assert_eq!(millimeters(0.0), "0mm");
        assert_eq!(millimeters(0.3), "0.3mm");
        assert_eq!(millimeters(12.0), "12mm");
    }
}
