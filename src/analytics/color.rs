// ============================================================================
// Couleur de variance : dégradé bleu → violet → rose
// ============================================================================
// Encode |variance| dans [0, 1] :
// - 0.0 : bleu néon (#78c8ff) → prévision fiable
// - 0.5 : violet (#b084ff)
// - 1.0 : rose (#ff7ad9) → prévision incertaine
//
// CONCEPT RUST : const fn et types Copy
// - Rgb est Copy (3 octets), les constantes sont évaluées à la compilation
// ============================================================================

use ratatui::style::Color;

/// Couleur RGB 24 bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Bleu néon (variance nulle)
pub const LOW: Rgb = Rgb::new(0x78, 0xc8, 0xff);
/// Violet (variance 0.5)
pub const MID: Rgb = Rgb::new(0xb0, 0x84, 0xff);
/// Rose (variance >= 1)
pub const HIGH: Rgb = Rgb::new(0xff, 0x7a, 0xd9);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Interpolation linéaire canal par canal, t dans [0, 1]
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| -> u8 {
            let value = a as f64 + (b as f64 - a as f64) * t;
            value.round().clamp(0.0, 255.0) as u8
        };
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb(rgb.r, rgb.g, rgb.b)
    }
}

/// Couleur associée à une variance de prévision
///
/// v = clamp(|variance|, 0, 1), puis :
/// - v <= 0.5 : LOW → MID avec t = v / 0.5
/// - v > 0.5  : MID → HIGH avec t = (v - 0.5) / 0.5
///
/// NaN est traité comme 0, ±∞ est ramené à 1.
pub fn variance_color(variance: f64) -> Rgb {
    let v = if variance.is_nan() {
        0.0
    } else {
        variance.abs().clamp(0.0, 1.0)
    };

    if v <= 0.5 {
        LOW.lerp(MID, v / 0.5)
    } else {
        MID.lerp(HIGH, (v - 0.5) / 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(variance_color(0.0), LOW);
        assert_eq!(variance_color(0.5), MID);
        assert_eq!(variance_color(1.0), HIGH);
    }

    #[test]
    fn test_clamped_outside_range() {
        assert_eq!(variance_color(3.0), HIGH);
        assert_eq!(variance_color(-7.5), HIGH);
        assert_eq!(variance_color(f64::NAN), LOW);
        assert_eq!(variance_color(f64::INFINITY), HIGH);
        assert_eq!(variance_color(f64::NEG_INFINITY), HIGH);
        assert_eq!(variance_color(1e308), variance_color(f64::INFINITY));
    }

    #[test]
    fn test_distance_from_low_never_decreases() {
        let distance = |c: Rgb| {
            [
                (c.r as i32 - LOW.r as i32).abs(),
                (c.g as i32 - LOW.g as i32).abs(),
                (c.b as i32 - LOW.b as i32).abs(),
            ]
        };

        let mut previous = distance(variance_color(0.0));
        for step in 1..=200 {
            let current = distance(variance_color(step as f64 / 200.0));
            for channel in 0..3 {
                assert!(
                    current[channel] >= previous[channel],
                    "canal {} recule à v = {}",
                    channel,
                    step as f64 / 200.0
                );
            }
            previous = current;
        }
    }

    #[test]
    fn test_continuous_at_midpoint() {
        let below = variance_color(0.5 - 1e-9);
        let above = variance_color(0.5 + 1e-9);
        assert_eq!(below, above);
        assert_eq!(below, MID);
    }

    #[test]
    fn test_absolute_value_symmetry() {
        for step in 0..=40 {
            let v = step as f64 * 0.05 - 1.0;
            assert_eq!(variance_color(v), variance_color(-v));
        }
    }

    #[test]
    fn test_quarter_is_halfway_low_mid() {
        // t = 0.5 entre LOW et MID : (0x78+0xb0)/2 = 0x94, (0xc8+0x84)/2 = 0xa6
        assert_eq!(variance_color(0.25), Rgb::new(0x94, 0xa6, 0xff));
        assert_eq!(variance_color(-0.25), variance_color(0.25));
    }

    #[test]
    fn test_into_ratatui_color() {
        let color: Color = MID.into();
        assert_eq!(color, Color::Rgb(0xb0, 0x84, 0xff));
    }
}
