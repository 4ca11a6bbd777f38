// cs-core/src/units.rs

use uom::si::f64::{Length as UomLength, Mass as UomMass, Ratio as UomRatio};

// Public canonical unit types (SI, f64)
pub type Length = UomLength;
pub type Mass = UomMass;
pub type Ratio = UomRatio;

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

/// Metric tonnes (1 t = 1000 kg).
#[inline]
pub fn t(v: f64) -> Mass {
    use uom::si::mass::ton;
    Mass::new::<ton>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}

#[inline]
pub fn in_m(l: Length) -> f64 {
    use uom::si::length::meter;
    l.get::<meter>()
}

#[inline]
pub fn in_t(mass: Mass) -> f64 {
    use uom::si::mass::ton;
    mass.get::<ton>()
}

#[inline]
pub fn in_percent(r: Ratio) -> f64 {
    use uom::si::ratio::percent;
    r.get::<percent>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn constructors_smoke() {
        let _l = m(20.0);
        let _w = t(48.0);
        let _r = unitless(0.5);
    }

    #[test]
    fn tonnes_are_metric() {
        use uom::si::mass::kilogram;
        assert!(close(t(1.5).get::<kilogram>(), 1500.0));
        assert!(close(in_t(t(18.0)), 18.0));
    }

    #[test]
    fn ratio_as_percent() {
        assert!(close(in_percent(unitless(0.75)), 75.0));
        assert!(close(in_m(m(35.0)), 35.0));
    }
}
