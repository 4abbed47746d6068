use crate::models::{AngularData, Lang};

/// A sidereal zodiac sign with its localized names.
#[derive(Debug, Clone, Copy)]
pub struct ZodiacSign {
    /// Western equivalent, shown in brackets.
    pub western: &'static str,
    /// Kannada transliteration.
    pub kannada: &'static str,
    /// Sanskrit transliteration.
    pub sanskrit: &'static str,
}

/// The 12 sidereal zodiac signs (rashis), 30° each from Mesha at 0°.
pub const ZODIAC_SIGNS: [ZodiacSign; 12] = [
    ZodiacSign { western: "Aries", kannada: "Mesha", sanskrit: "Mesha" },
    ZodiacSign { western: "Taurus", kannada: "Vrishabha", sanskrit: "Vrishabha" },
    ZodiacSign { western: "Gemini", kannada: "Mithuna", sanskrit: "Mithuna" },
    ZodiacSign { western: "Cancer", kannada: "Karkataka", sanskrit: "Karkataka" },
    ZodiacSign { western: "Leo", kannada: "Simha", sanskrit: "Simha" },
    ZodiacSign { western: "Virgo", kannada: "Kanya", sanskrit: "Kanya" },
    ZodiacSign { western: "Libra", kannada: "Tula", sanskrit: "Tula" },
    ZodiacSign { western: "Scorpio", kannada: "Vrishchika", sanskrit: "Vrishchika" },
    ZodiacSign { western: "Sagittarius", kannada: "Dhanu", sanskrit: "Dhanu" },
    ZodiacSign { western: "Capricorn", kannada: "Makara", sanskrit: "Makara" },
    ZodiacSign { western: "Aquarius", kannada: "Kumbha", sanskrit: "Kumbha" },
    ZodiacSign { western: "Pisces", kannada: "Meena", sanskrit: "Meena" },
];

/// Width of one nakshatra segment in degrees (360 / 27).
const NAKSHATRA_SPAN: f64 = 360.0 / 27.0;

/// Tolerance for matching the exact new/full moon boundary angles.
/// Upstream values arrive as floats; a hair of jitter must not flip the label.
const PHASE_BOUNDARY_TOLERANCE: f64 = 1e-6;

/// Placeholder rendered for any value the service did not supply.
pub const PLACEHOLDER: &str = "-";

/// Sign index for a sidereal longitude: `floor(angle / 30) mod 12`.
///
/// Total over any finite input; out-of-range and negative angles wrap.
pub fn sidereal_sign_index(angle: f64) -> usize {
    ((angle / 30.0).floor() as i64).rem_euclid(12) as usize
}

/// Nakshatra index (0-26) for a sidereal longitude, 13°20′ per segment.
pub fn nakshatra_index(moon_longitude: f64) -> usize {
    ((moon_longitude / NAKSHATRA_SPAN).floor() as i64).rem_euclid(27) as usize
}

/// Localized display name of the zodiac sign at `index` (0-11), with the
/// Western equivalent in brackets.
///
/// For `En` the Sanskrit transliteration serves as the traditional base.
pub fn zodiac_name(index: usize, lang: Lang) -> String {
    let sign = &ZODIAC_SIGNS[index % 12];
    let traditional = match lang {
        Lang::Kn => sign.kannada,
        Lang::Sa | Lang::En => sign.sanskrit,
    };
    format!("{} ({})", traditional, sign.western)
}

/// Human label for a Sun-Moon separation angle.
///
/// 0° is a new moon and 180° a full moon; anything between is rendered as
/// the separation to one decimal place.
pub fn moon_phase_label(phase_angle: f64) -> String {
    if phase_angle.abs() < PHASE_BOUNDARY_TOLERANCE {
        "New Moon".to_string()
    } else if (phase_angle - 180.0).abs() < PHASE_BOUNDARY_TOLERANCE {
        "Full Moon".to_string()
    } else {
        format!("{:.1}° separation", phase_angle)
    }
}

/// The four derived-insight tiles computed client-side from angular data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactCards {
    /// Sidereal sun sign.
    pub sun_sign: String,
    /// Sidereal moon sign.
    pub moon_sign: String,
    /// Moon phase label.
    pub moon_phase: String,
    /// Ayanamsha precision correction, two decimal places.
    pub ayanamsha: String,
}

impl FactCards {
    /// Derives the four cards from angular data; placeholders when absent.
    pub fn derive(angular: Option<&AngularData>, lang: Lang) -> Self {
        match angular {
            Some(data) => Self {
                sun_sign: zodiac_name(sidereal_sign_index(data.sun_sidereal), lang),
                moon_sign: zodiac_name(sidereal_sign_index(data.moon_sidereal), lang),
                moon_phase: moon_phase_label(data.phase_angle),
                ayanamsha: format!("{:.2}°", data.ayanamsha),
            },
            None => Self {
                sun_sign: PLACEHOLDER.to_string(),
                moon_sign: PLACEHOLDER.to_string(),
                moon_phase: PLACEHOLDER.to_string(),
                ayanamsha: PLACEHOLDER.to_string(),
            },
        }
    }
}
