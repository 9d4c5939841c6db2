//! Munsell renotation data
//!
//! Reads the whitespace separated `h V C x y Y` tables published with the
//! 1943 renotation (`real.dat`, `all.dat`) and interpolates chromaticity
//! between the tabulated samples:
//!
//! - chroma: linear in xy between the even chromas on either side, with
//!   chroma 0 at the illuminant C white
//! - hue: radial around the white point between neighbouring 2.5 steps
//! - value: linear in xy, weighted by luminance, between tabulated values
//!
//! Luminance itself always comes from the ASTM D1535 polynomial, so the `Y`
//! column is checked but not used.

use std::collections::HashMap;
use std::f64::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use super::notation::{MunsellColor, MunsellHue};
use super::renotation::luminance;
use crate::color::Illuminant;
use crate::error::ColorTermsError;

/// 2.5-step hue positions around the circle.
const HUE_SLOTS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SampleKey {
    slot: u8,
    value_tenths: u16,
    chroma: u16,
}

/// Tabulated renotation samples, keyed by hue, value and chroma.
#[derive(Clone, Default)]
pub struct RenotationTable {
    samples: HashMap<SampleKey, [f64; 2]>,
    /// Distinct tabulated values, in tenths, ascending
    values: Vec<u16>,
}

impl fmt::Debug for RenotationTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenotationTable")
            .field("samples", &self.samples.len())
            .field("values", &self.values)
            .finish()
    }
}

fn hue_position(hue: MunsellHue) -> f64 {
    (hue.hue_number() / 2.5).rem_euclid(HUE_SLOTS as f64)
}

fn on_grid(x: f64) -> bool {
    (x - x.round()).abs() < 1e-6
}

impl RenotationTable {
    /// Parse renotation data.
    ///
    /// Blank lines, `#` comments and a `h V C x y Y` header line are
    /// skipped. Every other line needs six columns: a hue on the 2.5 grid,
    /// a value in tenths, an even chroma and the x, y, Y coordinates.
    ///
    /// # Errors
    ///
    /// [`ColorTermsError::RenotationData`] for the first malformed or
    /// duplicate line, or with line 0 when the text holds no samples.
    pub fn parse(text: &str) -> Result<Self, ColorTermsError> {
        let mut samples = HashMap::new();

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let fail = |reason: String| ColorTermsError::RenotationData { line, reason };

            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = trimmed.split_whitespace().collect();
            if fields[0].eq_ignore_ascii_case("h") {
                continue;
            }
            if fields.len() != 6 {
                return Err(fail(format!("expected 6 columns, found {}", fields.len())));
            }

            let hue: MunsellHue = fields[0]
                .parse()
                .map_err(|_| fail(format!("invalid hue {:?}", fields[0])))?;
            let position = hue_position(hue);
            if !on_grid(position) {
                return Err(fail(format!("hue {} is not a multiple of 2.5", fields[0])));
            }

            let mut numbers = [0.0; 5];
            for (slot, field) in numbers.iter_mut().zip(&fields[1..]) {
                *slot = field
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| fail(format!("invalid number {:?}", field)))?;
            }
            let [value, chroma, x, y, big_y] = numbers;

            if !(0.0..=10.0).contains(&value) || !on_grid(value * 10.0) {
                return Err(fail(format!("value {} is not in tenths of 0..10", fields[1])));
            }
            if chroma < 2.0 || !on_grid(chroma / 2.0) {
                return Err(fail(format!("chroma {} is not a positive even number", fields[2])));
            }
            if x <= 0.0 || y <= 0.0 || big_y < 0.0 {
                return Err(fail("chromaticity must be positive".to_string()));
            }

            let key = SampleKey {
                slot: (position.round() as usize % HUE_SLOTS) as u8,
                value_tenths: (value * 10.0).round() as u16,
                chroma: chroma.round() as u16,
            };
            if samples.insert(key, [x, y]).is_some() {
                return Err(fail(format!("duplicate sample {} {}/{}", fields[0], fields[1], fields[2])));
            }
        }

        if samples.is_empty() {
            return Err(ColorTermsError::RenotationData {
                line: 0,
                reason: "no samples".to_string(),
            });
        }

        let mut values: Vec<u16> = samples.keys().map(|k| k.value_tenths).collect();
        values.sort_unstable();
        values.dedup();

        Ok(Self { samples, values })
    }

    /// Number of tabulated samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the table holds no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// CIE xyY of a notation relative to illuminant C.
    ///
    /// # Errors
    ///
    /// [`ColorTermsError::UnresolvableNotation`] when the notation lies
    /// outside the tabulated samples, typically beyond the highest chroma
    /// measured for its hue and value.
    pub fn to_xyy(&self, color: &MunsellColor) -> Result<[f64; 3], ColorTermsError> {
        let big_y = luminance(color.value());
        let [wx, wy] = Illuminant::C.xy();
        match *color {
            MunsellColor::Chromatic { hue, value, chroma } if chroma > 0.0 => {
                let [x, y] = self.xy_at_value(hue_position(hue), value, chroma).ok_or_else(|| {
                    ColorTermsError::UnresolvableNotation {
                        notation: color.to_string(),
                    }
                })?;
                Ok([x, y, big_y])
            }
            _ => Ok([wx, wy, big_y]),
        }
    }

    fn xy_at_value(&self, position: f64, value: f64, chroma: f64) -> Option<[f64; 2]> {
        let tenths = value * 10.0;
        if on_grid(tenths) {
            let exact = tenths.round() as u16;
            if self.values.binary_search(&exact).is_ok() {
                return self.xy_at_hue(position, exact, chroma);
            }
        }

        let upper_index = self.values.partition_point(|&v| (v as f64) < tenths);
        if upper_index == 0 || upper_index == self.values.len() {
            return None;
        }
        let lower = self.values[upper_index - 1];
        let upper = self.values[upper_index];
        let a = self.xy_at_hue(position, lower, chroma)?;
        let b = self.xy_at_hue(position, upper, chroma)?;

        let y_lower = luminance(lower as f64 / 10.0);
        let y_upper = luminance(upper as f64 / 10.0);
        let t = (luminance(value) - y_lower) / (y_upper - y_lower);
        Some(lerp(a, b, t))
    }

    fn xy_at_hue(&self, position: f64, value_tenths: u16, chroma: f64) -> Option<[f64; 2]> {
        let lower = position.floor();
        let t = position - lower;
        let slot = lower as usize % HUE_SLOTS;
        if t < 1e-9 {
            return self.xy_at_chroma(slot, value_tenths, chroma);
        }
        if t > 1.0 - 1e-9 {
            return self.xy_at_chroma((slot + 1) % HUE_SLOTS, value_tenths, chroma);
        }

        let a = self.xy_at_chroma(slot, value_tenths, chroma)?;
        let b = self.xy_at_chroma((slot + 1) % HUE_SLOTS, value_tenths, chroma)?;
        let white = Illuminant::C.xy();
        let (rho_a, phi_a) = to_polar(a, white);
        let (rho_b, phi_b) = to_polar(b, white);
        let mut delta = (phi_b - phi_a).rem_euclid(TAU);
        if delta > PI {
            delta -= TAU;
        }
        let rho = rho_a + t * (rho_b - rho_a);
        let phi = phi_a + t * delta;
        Some([white[0] + rho * phi.cos(), white[1] + rho * phi.sin()])
    }

    fn xy_at_chroma(&self, slot: usize, value_tenths: u16, chroma: f64) -> Option<[f64; 2]> {
        let sample = |c: u16| {
            if c == 0 {
                return Some(Illuminant::C.xy());
            }
            self.samples
                .get(&SampleKey {
                    slot: slot as u8,
                    value_tenths,
                    chroma: c,
                })
                .copied()
        };

        let lower = (chroma / 2.0).floor() * 2.0;
        let t = (chroma - lower) / 2.0;
        if t < 1e-9 {
            return sample(lower as u16);
        }
        let a = sample(lower as u16)?;
        let b = sample(lower as u16 + 2)?;
        Some(lerp(a, b, t))
    }
}

impl FromStr for RenotationTable {
    type Err = ColorTermsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn lerp(a: [f64; 2], b: [f64; 2], t: f64) -> [f64; 2] {
    [a[0] + t * (b[0] - a[0]), a[1] + t * (b[1] - a[1])]
}

fn to_polar(xy: [f64; 2], white: [f64; 2]) -> (f64, f64) {
    let dx = xy[0] - white[0];
    let dy = xy[1] - white[1];
    (dx.hypot(dy), dy.atan2(dx))
}

/// Renotation text sampled from the analytic model, for tests.
///
/// Every 2.5 hue step at values 1 through 9 and even chromas up to
/// `max_chroma`, in the layout of `real.dat`.
#[cfg(test)]
pub(crate) fn analytic_table_text(max_chroma: u16) -> String {
    use super::notation::HueFamily;
    use super::renotation::to_xyy;

    let mut text = String::from("h V C x y Y\n");
    for family in HueFamily::ALL {
        for step in [2.5, 5.0, 7.5, 10.0] {
            for value in 1..=9 {
                for chroma in (2..=max_chroma).step_by(2) {
                    let [x, y, big_y] = to_xyy(&MunsellColor::Chromatic {
                        hue: MunsellHue::new(step, family),
                        value: value as f64,
                        chroma: chroma as f64,
                    });
                    text.push_str(&format!(
                        "{}{} {} {} {:.6} {:.6} {:.4}\n",
                        step,
                        family.letters(),
                        value,
                        chroma,
                        x,
                        y,
                        big_y * 100.0
                    ));
                }
            }
        }
    }
    text
}
