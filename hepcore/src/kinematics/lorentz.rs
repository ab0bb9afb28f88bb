use std::fmt;
use std::fmt::{Display, Formatter};
use std::ops::{Add, AddAssign, Neg, Sub};
use bincode::{Decode, Encode};
use serde::{Serialize, Deserialize};

/// Four-vector shared by momenta and positions.
///
/// # Description
///
/// Components are stored as `(x, y, z, t)`. A momentum reads them as
/// `(px, py, pz, E)`, a position as `(x, y, z, time)`; the accessors for both
/// readings are provided so call sites can say what they mean.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct LorentzVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub t: f64,
}

impl LorentzVector {
    /// Creates a new `LorentzVector`.
    ///
    /// # Arguments
    ///
    /// * `x` - x component (or px).
    /// * `y` - y component (or py).
    /// * `z` - z component, along the beam (or pz).
    /// * `t` - time component (or energy).
    ///
    /// # Examples
    ///
    /// ```
    /// use hepcore::kinematics::lorentz::LorentzVector;
    ///
    /// let p = LorentzVector::new(3.0, 4.0, 0.0, 5.0);
    /// assert_eq!(p.pt(), 5.0);
    /// ```
    pub fn new(x: f64, y: f64, z: f64, t: f64) -> Self {
        LorentzVector { x, y, z, t }
    }

    pub fn px(&self) -> f64 { self.x }
    pub fn py(&self) -> f64 { self.y }
    pub fn pz(&self) -> f64 { self.z }
    pub fn e(&self) -> f64 { self.t }

    /// Squared transverse component.
    pub fn perp2(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Transverse component, the transverse momentum for a momentum vector.
    pub fn pt(&self) -> f64 {
        self.perp2().sqrt()
    }

    /// Squared length of the spatial part.
    pub fn mag2(&self) -> f64 {
        self.perp2() + self.z * self.z
    }

    /// Length of the spatial part.
    pub fn p(&self) -> f64 {
        self.mag2().sqrt()
    }

    /// Cosine of the polar angle. A null spatial part counts as lying on the +z axis.
    pub fn cos_theta(&self) -> f64 {
        let p = self.p();
        if p == 0.0 { 1.0 } else { self.z / p }
    }

    /// Azimuthal angle in `(-pi, pi]`, zero on the beam axis.
    pub fn phi(&self) -> f64 {
        if self.x == 0.0 && self.y == 0.0 {
            0.0
        } else {
            self.y.atan2(self.x)
        }
    }

    /// Pseudorapidity.
    ///
    /// Vectors along the axis return `±1e11` (zero for the null vector); use
    /// [`crate::kinematics::projection::guarded_eta`] where the projection
    /// sentinel is needed instead.
    pub fn eta(&self) -> f64 {
        let cos_theta = self.cos_theta();
        if cos_theta * cos_theta < 1.0 {
            return -0.5 * ((1.0 - cos_theta) / (1.0 + cos_theta)).ln();
        }
        if self.z == 0.0 {
            0.0
        } else if self.z > 0.0 {
            10e10
        } else {
            -10e10
        }
    }

    /// Rapidity `0.5 ln((E + pz) / (E - pz))`.
    pub fn rapidity(&self) -> f64 {
        0.5 * ((self.t + self.z) / (self.t - self.z)).ln()
    }

    /// Minkowski square `t² - |p|²`.
    pub fn m2(&self) -> f64 {
        self.t * self.t - self.mag2()
    }

    /// Invariant mass, negative for space-like vectors.
    pub fn m(&self) -> f64 {
        let mm = self.m2();
        if mm < 0.0 { -(-mm).sqrt() } else { mm.sqrt() }
    }
}

impl Neg for LorentzVector {
    type Output = LorentzVector;

    fn neg(self) -> Self::Output {
        LorentzVector::new(-self.x, -self.y, -self.z, -self.t)
    }
}

impl Add for LorentzVector {
    type Output = LorentzVector;

    fn add(self, other: LorentzVector) -> Self::Output {
        LorentzVector::new(self.x + other.x, self.y + other.y, self.z + other.z, self.t + other.t)
    }
}

impl AddAssign for LorentzVector {
    fn add_assign(&mut self, other: LorentzVector) {
        *self = *self + other;
    }
}

impl Sub for LorentzVector {
    type Output = LorentzVector;

    fn sub(self, other: LorentzVector) -> Self::Output {
        self + (-other)
    }
}

impl Display for LorentzVector {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "LorentzVector(x: {}, y: {}, z: {}, t: {})", self.x, self.y, self.z, self.t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pt_and_mass() {
        let p = LorentzVector::new(3.0, 4.0, 12.0, 15.0);
        assert_eq!(p.pt(), 5.0);
        assert_eq!(p.p(), 13.0);
        assert!((p.m() - 56.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_space_like_mass_is_negative() {
        let p = LorentzVector::new(3.0, 4.0, 0.0, 3.0);
        assert_eq!(p.m(), -4.0);
    }

    #[test]
    fn test_phi_on_axis_is_zero() {
        assert_eq!(LorentzVector::new(0.0, 0.0, 5.0, 5.0).phi(), 0.0);
        assert!((LorentzVector::new(0.0, 1.0, 0.0, 1.0).phi() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_eta_closed_form() {
        let p = LorentzVector::new(1.0, 0.0, 1.0, 2.0);
        let expected = (1.0 / (std::f64::consts::FRAC_PI_4 / 2.0).tan()).ln();
        assert!((p.eta() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_eta_on_axis_is_large() {
        assert_eq!(LorentzVector::new(0.0, 0.0, 2.0, 2.0).eta(), 10e10);
        assert_eq!(LorentzVector::new(0.0, 0.0, -2.0, 2.0).eta(), -10e10);
        assert_eq!(LorentzVector::default().eta(), 0.0);
    }

    #[test]
    fn test_negation() {
        let p = -LorentzVector::new(3.0, 4.0, 0.0, 5.0);
        assert_eq!(p, LorentzVector::new(-3.0, -4.0, -0.0, -5.0));
    }
}
