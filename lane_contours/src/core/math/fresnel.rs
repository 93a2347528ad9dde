//! Fresnel integrals `C(t) = ∫ cos(PI s² / 2) ds` and `S(t) = ∫ sin(PI s² / 2) ds` from 0 to t.
//!
//! Rational Chebyshev approximations by W. J. Cody, "Chebyshev approximations for the Fresnel
//! integrals", Mathematics of Computation 22 (1968). Absolute error stays below 1e-9 over the
//! whole real line.

use std::f64::consts::PI;

const CN1: [f64; 5] = [
    9.999999999999999421E-01,
    -1.994608988261842706E-01,
    1.761939525434914045E-02,
    -5.280796513726226960E-04,
    5.477113856826871660E-06,
];
const CD1: [f64; 5] = [
    1.0,
    4.727921120104532689E-02,
    1.099572150256418851E-03,
    1.552378852769941331E-05,
    1.189389014228757184E-07,
];
const CN2: [f64; 6] = [
    1.00000000000111043640E+00,
    -2.07073360335323894245E-01,
    1.91870279431746926505E-02,
    -6.71376034694922109230E-04,
    1.02365435056105864908E-05,
    -5.68293310121870728343E-08,
];
const CD2: [f64; 6] = [
    1.0,
    3.96667496952323433510E-02,
    7.88905245052359907842E-04,
    1.01344630866749406081E-05,
    8.77945377892369265356E-08,
    4.41701374065009620393E-10,
];
const SN1: [f64; 5] = [
    5.2359877559829887021E-01,
    -7.0748991514452302596E-02,
    3.8778212346368287939E-03,
    -8.4555728435277680591E-05,
    6.7174846662514086196E-07,
];
const SD1: [f64; 5] = [
    1.0,
    4.1122315114238422205E-02,
    8.1709194215213447204E-04,
    9.6269087593903403370E-06,
    5.9528122767840998345E-08,
];
const SN2: [f64; 6] = [
    5.23598775598344165913E-01,
    -7.37766914010191323867E-02,
    4.30730526504366510217E-03,
    -1.09540023911434994566E-04,
    1.28531043742724820610E-06,
    -5.76765815593088804567E-09,
];
const SD2: [f64; 6] = [
    1.0,
    3.53398342167472162540E-02,
    6.18224620195473216538E-04,
    6.87086265718620117905E-06,
    5.03090581246612375866E-08,
    2.05539124458579596075E-10,
];
const FN3: [f64; 6] = [
    3.1830975293580985290E-01,
    1.2226000551672961219E+01,
    1.2924886131901657025E+02,
    4.3886367156695547655E+02,
    4.1466722177958961672E+02,
    5.6771463664185116454E+01,
];
const FD3: [f64; 6] = [
    1.0,
    3.8713003365583442831E+01,
    4.1674359830705629745E+02,
    1.4740030733966610568E+03,
    1.5371675584895759916E+03,
    2.9113088788847831515E+02,
];
const FN4: [f64; 6] = [
    3.183098818220169217E-01,
    1.958839410219691002E+01,
    3.398371349269842400E+02,
    1.930076407867157531E+03,
    3.091451615744296552E+03,
    7.177032493651399590E+02,
];
const FD4: [f64; 6] = [
    1.0,
    6.184271381728873709E+01,
    1.085350675006501251E+03,
    6.337471558511437898E+03,
    1.093342489888087888E+04,
    3.361216991805511494E+03,
];
const FN5: [f64; 7] = [
    -9.675460329952532343E-02,
    -2.431275407194161683E+01,
    -1.947621998306889176E+03,
    -6.059852197160773639E+04,
    -7.076806952837779823E+05,
    -2.417656749061154155E+06,
    -7.834914590078311336E+05,
];
const FD5: [f64; 7] = [
    1.0,
    2.548289012949732752E+02,
    2.099761536857815105E+04,
    6.924122509827708985E+05,
    9.178823229918143780E+06,
    4.292733255630186679E+07,
    4.803294184260528342E+07,
];
const GN3: [f64; 6] = [
    1.013206188102747985E-01,
    4.445338275505123778E+00,
    5.311228134809894481E+01,
    1.991828186789025318E+02,
    1.962320379716626191E+02,
    2.054214324985006303E+01,
];
const GD3: [f64; 6] = [
    1.0,
    4.539250196736893605E+01,
    5.835905757164290666E+02,
    2.544731331818221034E+03,
    3.481121478565452837E+03,
    1.013794833960028555E+03,
];
const GN4: [f64; 6] = [
    1.01321161761804586E-01,
    7.11205001789782823E+00,
    1.40959617911315524E+02,
    9.08311749529593938E+02,
    1.59268006085353864E+03,
    3.13330163068755950E+02,
];
const GD4: [f64; 6] = [
    1.0,
    7.17128596939302198E+01,
    1.49051922797329229E+03,
    1.06729678030583897E+04,
    2.41315567213369742E+04,
    1.15149832376260604E+04,
];
const GN5: [f64; 7] = [
    -1.53989733819769316E-01,
    -4.31710157823357568E+01,
    -3.87754141746378493E+03,
    -1.35678867813756347E+05,
    -1.77758950838029676E+06,
    -6.66907061668636416E+06,
    -1.72590224654836845E+06,
];
const GD5: [f64; 7] = [
    1.0,
    2.86733194975899483E+02,
    2.69183180396242536E+04,
    1.02878693056687506E+06,
    1.62095600500231646E+07,
    9.38695862531635179E+07,
    1.40622441123580005E+08,
];

/// Evaluates `sum(coef[i] * x^i)` by Horner's rule.
#[inline]
fn poly(coef: &[f64], x: f64) -> f64 {
    coef.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Fresnel integrals `(C(t), S(t))`, odd in `t`.
///
/// # Examples
///
/// ```
/// # use lane_contours::core::math::fresnel;
/// let (c, s) = fresnel(0.0);
/// assert_eq!((c, s), (0.0, 0.0));
/// // both integrals tend to 1/2
/// let (c, s) = fresnel(1.0e4);
/// assert!((c - 0.5).abs() < 1e-4 && (s - 0.5).abs() < 1e-4);
/// ```
pub fn fresnel(t: f64) -> (f64, f64) {
    let x = t.abs();
    let (c, s) = if x < 1.6 {
        let x2 = x * x;
        let x4 = x2 * x2;
        if x < 1.2 {
            (
                x * poly(&CN1, x4) / poly(&CD1, x4),
                x * x2 * poly(&SN1, x4) / poly(&SD1, x4),
            )
        } else {
            (
                x * poly(&CN2, x4) / poly(&CD2, x4),
                x * x2 * poly(&SN2, x4) / poly(&SD2, x4),
            )
        }
    } else {
        // auxiliary functions f and g in powers of 1 / x^4
        let inv = 1.0 / x;
        let inv4 = inv.powi(4);
        let (f, g) = if x < 1.9 {
            (
                inv * poly(&FN3, inv4) / poly(&FD3, inv4),
                inv.powi(3) * poly(&GN3, inv4) / poly(&GD3, inv4),
            )
        } else if x < 2.4 {
            (
                inv * poly(&FN4, inv4) / poly(&FD4, inv4),
                inv.powi(3) * poly(&GN4, inv4) / poly(&GD4, inv4),
            )
        } else {
            (
                inv * (1.0 / PI + inv4 * poly(&FN5, inv4) / poly(&FD5, inv4)),
                inv.powi(3) * (1.0 / (PI * PI) + inv4 * poly(&GN5, inv4) / poly(&GD5, inv4)),
            )
        };
        let (sin_v, cos_v) = (0.5 * PI * x * x).sin_cos();
        (
            0.5 + f * sin_v - g * cos_v,
            0.5 - f * cos_v - g * sin_v,
        )
    };

    if t < 0.0 {
        (-c, -s)
    } else {
        (c, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Composite Simpson reference for checking the approximation regions.
    fn fresnel_simpson(t: f64) -> (f64, f64) {
        let n = 20_000;
        let h = t / n as f64;
        let mut c = 0.0;
        let mut s = 0.0;
        for i in 0..=n {
            let x = i as f64 * h;
            let w = if i == 0 || i == n {
                1.0
            } else if i % 2 == 1 {
                4.0
            } else {
                2.0
            };
            let (sv, cv) = (0.5 * PI * x * x).sin_cos();
            c += w * cv;
            s += w * sv;
        }
        (c * h / 3.0, s * h / 3.0)
    }

    #[test]
    fn matches_quadrature_in_every_region() {
        for &t in &[0.3, 1.1, 1.3, 1.7, 2.0, 2.5, 3.7] {
            let (c, s) = fresnel(t);
            let (cr, sr) = fresnel_simpson(t);
            assert!((c - cr).abs() < 1e-9, "C({}) = {} expected {}", t, c, cr);
            assert!((s - sr).abs() < 1e-9, "S({}) = {} expected {}", t, s, sr);
        }
    }

    #[test]
    fn odd_symmetry() {
        let (c, s) = fresnel(-1.8);
        let (cp, sp) = fresnel(1.8);
        assert_eq!((c, s), (-cp, -sp));
    }

    #[test]
    fn continuous_across_region_boundaries() {
        for &b in &[1.2, 1.6, 1.9, 2.4] {
            let (c0, s0) = fresnel(b - 1e-12);
            let (c1, s1) = fresnel(b + 1e-12);
            assert!((c0 - c1).abs() < 1e-9);
            assert!((s0 - s1).abs() < 1e-9);
        }
    }
}
