//! Perceptual color difference formulas
//!
//! - CIE76: Euclidean distance in Lab
//! - CIEDE2000: lightness, chroma and hue weighting plus the blue rotation term

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use super::lab::Lab;

/// Distance metric used for nearest-category classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Metric {
    /// ΔE*ab 1976, plain Euclidean distance in Lab.
    #[default]
    Cie76,
    /// ΔE00, CIEDE2000 with kL = kC = kH = 1.
    Ciede2000,
}

impl Metric {
    /// A value that orders pairs the same way as the metric's ΔE.
    ///
    /// CIE76 returns the squared distance to avoid the square root; CIEDE2000
    /// returns ΔE00 itself. Only compare values produced by the same metric.
    #[inline]
    pub fn ordering_distance(self, a: &[f32; 3], b: &[f32; 3]) -> f32 {
        match self {
            Metric::Cie76 => {
                let dl = a[0] - b[0];
                let da = a[1] - b[1];
                let db = a[2] - b[2];
                dl * dl + da * da + db * db
            }
            Metric::Ciede2000 => delta_e_2000(
                Lab::new(a[0] as f64, a[1] as f64, a[2] as f64),
                Lab::new(b[0] as f64, b[1] as f64, b[2] as f64),
            ) as f32,
        }
    }

    /// The metric's ΔE between two Lab colors.
    pub fn delta_e(self, a: Lab, b: Lab) -> f64 {
        match self {
            Metric::Cie76 => delta_e_76(a, b),
            Metric::Ciede2000 => delta_e_2000(a, b),
        }
    }

    /// The metric a comparison run is checked against.
    pub fn counterpart(self) -> Metric {
        match self {
            Metric::Cie76 => Metric::Ciede2000,
            Metric::Ciede2000 => Metric::Cie76,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Cie76 => f.write_str("CIE76"),
            Metric::Ciede2000 => f.write_str("CIEDE2000"),
        }
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "cie76" | "cie1976" | "e1976" | "de76" => Ok(Metric::Cie76),
            "ciede2000" | "cie2000" | "e2000" | "de2000" => Ok(Metric::Ciede2000),
            other => Err(format!("unknown color difference metric: {other}")),
        }
    }
}

/// CIE76 (ΔE*ab).
#[inline]
pub fn delta_e_76(a: Lab, b: Lab) -> f64 {
    let dl = a.l - b.l;
    let da = a.a - b.a;
    let db = a.b - b.b;
    (dl * dl + da * da + db * db).sqrt()
}

const POW25_7: f64 = 6_103_515_625.0; // 25^7

/// CIEDE2000 (ΔE00) following Sharma, Wu & Dalal (2005).
pub fn delta_e_2000(lab1: Lab, lab2: Lab) -> f64 {
    const TWO_PI: f64 = 2.0 * PI;

    let c1_star = lab1.a.hypot(lab1.b);
    let c2_star = lab2.a.hypot(lab2.b);
    let c_bar = (c1_star + c2_star) / 2.0;

    let c_bar_7 = c_bar.powi(7);
    let g = 0.5 * (1.0 - (c_bar_7 / (c_bar_7 + POW25_7)).sqrt());

    let a1_prime = lab1.a * (1.0 + g);
    let a2_prime = lab2.a * (1.0 + g);

    let c1_prime = a1_prime.hypot(lab1.b);
    let c2_prime = a2_prime.hypot(lab2.b);

    let hue = |a: f64, b: f64| {
        if a == 0.0 && b == 0.0 {
            0.0
        } else {
            let h = b.atan2(a);
            if h < 0.0 {
                h + TWO_PI
            } else {
                h
            }
        }
    };
    let h1_prime = hue(a1_prime, lab1.b);
    let h2_prime = hue(a2_prime, lab2.b);

    let dl_prime = lab2.l - lab1.l;
    let dc_prime = c2_prime - c1_prime;

    let dh_prime = if c1_prime * c2_prime == 0.0 {
        0.0
    } else {
        let diff = h2_prime - h1_prime;
        if diff.abs() <= PI {
            diff
        } else if diff > PI {
            diff - TWO_PI
        } else {
            diff + TWO_PI
        }
    };
    let dh_prime_big = 2.0 * (c1_prime * c2_prime).sqrt() * (dh_prime / 2.0).sin();

    let l_bar_prime = (lab1.l + lab2.l) / 2.0;
    let c_bar_prime = (c1_prime + c2_prime) / 2.0;

    let h_bar_prime = if c1_prime * c2_prime == 0.0 {
        h1_prime + h2_prime
    } else if (h1_prime - h2_prime).abs() <= PI {
        (h1_prime + h2_prime) / 2.0
    } else if h1_prime + h2_prime < TWO_PI {
        (h1_prime + h2_prime + TWO_PI) / 2.0
    } else {
        (h1_prime + h2_prime - TWO_PI) / 2.0
    };

    let t = 1.0 - 0.17 * (h_bar_prime - 30f64.to_radians()).cos()
        + 0.24 * (2.0 * h_bar_prime).cos()
        + 0.32 * (3.0 * h_bar_prime + 6f64.to_radians()).cos()
        - 0.20 * (4.0 * h_bar_prime - 63f64.to_radians()).cos();

    let l_mid = (l_bar_prime - 50.0).powi(2);
    let sl = 1.0 + 0.015 * l_mid / (20.0 + l_mid).sqrt();
    let sc = 1.0 + 0.045 * c_bar_prime;
    let sh = 1.0 + 0.015 * c_bar_prime * t;

    let delta_theta =
        30f64.to_radians() * (-((h_bar_prime.to_degrees() - 275.0) / 25.0).powi(2)).exp();
    let c_bar_prime_7 = c_bar_prime.powi(7);
    let rc = 2.0 * (c_bar_prime_7 / (c_bar_prime_7 + POW25_7)).sqrt();
    let rt = -rc * (2.0 * delta_theta).sin();

    let dl_term = dl_prime / sl;
    let dc_term = dc_prime / sc;
    let dh_term = dh_prime_big / sh;

    (dl_term * dl_term + dc_term * dc_term + dh_term * dh_term + rt * dc_term * dh_term).sqrt()
}
