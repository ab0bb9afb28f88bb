use crate::kinematics::lorentz::LorentzVector;

/// Speed of light in m/s, used to turn internal mm/c times into seconds.
pub const C_LIGHT: f64 = 2.99792458E8;

/// Out-of-range marker written instead of undefined angles and ratios.
pub const SENTINEL: f64 = 999.9;

/// Converts an internal time component into seconds.
///
/// # Examples
///
/// ```
/// use hepcore::kinematics::projection::{physical_time, C_LIGHT};
///
/// assert_eq!(physical_time(1000.0), 1000.0 * 1.0E-3 / C_LIGHT);
/// ```
#[inline]
pub fn physical_time(t: f64) -> f64 {
    t * 1.0E-3 / C_LIGHT
}

/// True when the vector lies exactly on the beam axis (or is null).
#[inline]
pub fn on_beam_axis(v: &LorentzVector) -> bool {
    v.cos_theta().abs() == 1.0
}

#[inline]
fn signed_sentinel(v: &LorentzVector) -> f64 {
    if v.z >= 0.0 { SENTINEL } else { -SENTINEL }
}

/// Pseudorapidity with the `±999.9` beam-axis sentinel.
pub fn guarded_eta(v: &LorentzVector) -> f64 {
    if on_beam_axis(v) { signed_sentinel(v) } else { v.eta() }
}

/// Rapidity with the `±999.9` beam-axis sentinel.
pub fn guarded_rapidity(v: &LorentzVector) -> f64 {
    if on_beam_axis(v) { signed_sentinel(v) } else { v.rapidity() }
}

/// `numerator / denominator` for a positive denominator, [`SENTINEL`] otherwise.
#[inline]
pub fn ratio_or_sentinel(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 { numerator / denominator } else { SENTINEL }
}

/// Derived direction of a four-vector as written to output records.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Direction {
    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
    pub rapidity: f64,
}

impl Direction {
    /// Projects a four-vector, applying the beam-axis sentinel to eta and rapidity.
    ///
    /// # Examples
    ///
    /// ```
    /// use hepcore::kinematics::lorentz::LorentzVector;
    /// use hepcore::kinematics::projection::Direction;
    ///
    /// let direction = Direction::of(&LorentzVector::new(0.0, 0.0, -7.0, 7.0));
    /// assert_eq!(direction.eta, -999.9);
    /// assert_eq!(direction.rapidity, -999.9);
    /// ```
    pub fn of(v: &LorentzVector) -> Self {
        Direction {
            pt: v.pt(),
            eta: guarded_eta(v),
            phi: v.phi(),
            rapidity: guarded_rapidity(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sentinel_on_axis() {
        let forward = Direction::of(&LorentzVector::new(0.0, 0.0, 10.0, 11.0));
        assert_eq!(forward.eta, 999.9);
        assert_eq!(forward.rapidity, 999.9);
        assert_eq!(forward.pt, 0.0);

        let backward = Direction::of(&LorentzVector::new(0.0, 0.0, -10.0, 11.0));
        assert_eq!(backward.eta, -999.9);
        assert_eq!(backward.rapidity, -999.9);
    }

    #[test]
    fn test_null_vector_uses_positive_sentinel() {
        let direction = Direction::of(&LorentzVector::default());
        assert_eq!(direction.eta, 999.9);
        assert_eq!(direction.rapidity, 999.9);
        assert_eq!(direction.phi, 0.0);
    }

    #[test]
    fn test_time_conversion() {
        let t = physical_time(1000.0);
        assert_eq!(t, 1000.0e-3 / 2.99792458e8);
    }

    #[test]
    fn test_ratio_or_sentinel() {
        assert_eq!(ratio_or_sentinel(5.0, 0.0), 999.9);
        assert_eq!(ratio_or_sentinel(5.0, -1.0), 999.9);
        assert_eq!(ratio_or_sentinel(5.0, 2.0), 2.5);
    }

    proptest! {
        #[test]
        fn prop_beam_axis_gives_signed_sentinel(pz in -1.0e4_f64..1.0e4, extra in 0.0_f64..100.0) {
            let v = LorentzVector::new(0.0, 0.0, pz, pz.abs() + extra);
            let direction = Direction::of(&v);
            let expected = if pz >= 0.0 { 999.9 } else { -999.9 };
            prop_assert_eq!(direction.eta, expected);
            prop_assert_eq!(direction.rapidity, expected);
        }

        #[test]
        fn prop_off_axis_matches_closed_form(
            pt in 0.1_f64..500.0,
            eta in -4.0_f64..4.0,
            phi in -3.1_f64..3.1,
            mass in 0.0_f64..10.0,
        ) {
            let px = pt * phi.cos();
            let py = pt * phi.sin();
            let pz = pt * eta.sinh();
            let e = (px * px + py * py + pz * pz + mass * mass).sqrt();
            let direction = Direction::of(&LorentzVector::new(px, py, pz, e));

            prop_assert!((direction.eta - eta).abs() < 1e-6);
            prop_assert!((direction.phi - phi).abs() < 1e-9);
            prop_assert!((direction.pt - pt).abs() < 1e-9 * pt.max(1.0));
            let expected_rapidity = 0.5 * ((e + pz) / (e - pz)).ln();
            prop_assert!((direction.rapidity - expected_rapidity).abs() < 1e-9);
        }
    }
}
