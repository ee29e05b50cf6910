//! Human-readable color names in the Color Naming System style:
//! `"{lightness} {saturation} {hue}"`, with special buckets for near-black,
//! near-white, and grayish colors.

use crate::hsv::DeviceHsv;

/// Inclusive hue ranges in whole degrees.
const HUE_NAMES: &[(u16, u16, &str)] = &[
    (0, 14, "Red"),
    (15, 29, "Vermilion"),
    (30, 44, "Orange"),
    (45, 59, "Amber"),
    (60, 74, "Yellow"),
    (75, 89, "Lime"),
    (90, 104, "Chartreuse"),
    (105, 119, "Ddahal"),
    (120, 134, "Green"),
    (135, 149, "Erin"),
    (150, 164, "Spring"),
    (165, 179, "Gashyanta"),
    (180, 194, "Cyan"),
    (195, 209, "Capri"),
    (210, 224, "Azure"),
    (225, 239, "Cerulean"),
    (240, 254, "Blue"),
    (255, 269, "Volta"),
    (270, 284, "Violet"),
    (285, 299, "Llew"),
    (300, 314, "Magenta"),
    (315, 329, "Cerise"),
    (330, 344, "Rose"),
    (345, 358, "Crimson"),
    (359, 360, "Red"),
];

/// Inclusive value-percentage ranges.
const VALUE_ADJECTIVES: &[(u8, u8, &str)] = &[
    (0, 9, "very dark"),
    (10, 25, "dark"),
    (26, 55, "moderate"),
    (56, 80, "light"),
    (81, 100, "very light"),
];

/// Inclusive saturation-percentage ranges.
const SATURATION_ADJECTIVES: &[(u8, u8, &str)] = &[
    (0, 9, "whitish"),
    (10, 25, "pale"),
    (26, 55, "dim"),
    (56, 80, "brilliant"),
    (81, 100, "vivid"),
];

const ACHROMATIC_NAME: &str = "Gray";

fn lookup<T: PartialOrd + Copy>(table: &[(T, T, &'static str)], x: T) -> Option<&'static str> {
    table
        .iter()
        .find(|(lo, hi, _)| *lo <= x && x <= *hi)
        .map(|(_, _, name)| *name)
}

fn percent(x: u8) -> u8 {
    (x as u16 * 100 / 255) as u8
}

/// Hue bucket name, or `"Gray"` for colors without a hue.
pub fn hue_name(hue: Option<u16>) -> &'static str {
    hue.and_then(|h| lookup(HUE_NAMES, h))
        .unwrap_or(ACHROMATIC_NAME)
}

/// Names a device HSV color.
///
/// ```
/// use palette_tin_core::hsv::DeviceHsv;
/// use palette_tin_core::naming::color_name;
///
/// let hsv = DeviceHsv { hue: Some(0), saturation: 255, value: 255 };
/// assert_eq!(color_name(hsv), "very light vivid Red");
/// ```
pub fn color_name(hsv: DeviceHsv) -> String {
    let hue = hue_name(hsv.hue);
    let sat = percent(hsv.saturation);
    let val = percent(hsv.value);

    if sat <= 25 && val <= 20 {
        return format!("blackish {hue}");
    }
    if sat <= 10 && val >= 90 {
        return format!("whitish {hue}");
    }
    if sat < 20 && 20 < val && val < 90 {
        return format!("grayish {hue}");
    }

    // Percentages are always in 0..=100, so both tables cover them.
    let value_adj = lookup(VALUE_ADJECTIVES, val).unwrap_or("very light");
    let sat_adj = lookup(SATURATION_ADJECTIVES, sat).unwrap_or("vivid");
    format!("{value_adj} {sat_adj} {hue}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb8;
    use crate::hsv::rgb8_to_hsv;

    fn hsv(hue: Option<u16>, saturation: u8, value: u8) -> DeviceHsv {
        DeviceHsv {
            hue,
            saturation,
            value,
        }
    }

    #[test]
    fn unsaturated_mid_value_is_grayish() {
        // 199 / 255 is 78%.
        assert_eq!(color_name(hsv(Some(0), 0, 199)), "grayish Red");
        assert_eq!(color_name(hsv(None, 0, 199)), "grayish Gray");
    }

    #[test]
    fn dark_low_saturation_is_blackish() {
        assert_eq!(color_name(hsv(Some(120), 64, 51)), "blackish Green");
        assert_eq!(color_name(hsv(None, 0, 0)), "blackish Gray");
    }

    #[test]
    fn bright_unsaturated_is_whitish() {
        assert_eq!(color_name(hsv(None, 0, 255)), "whitish Gray");
        assert_eq!(color_name(hsv(Some(240), 25, 230)), "whitish Blue");
    }

    #[test]
    fn blackish_wins_over_grayish() {
        // sat 10%, val 20%: both the blackish and grayish rules could apply.
        assert_eq!(color_name(hsv(Some(60), 26, 52)), "blackish Yellow");
    }

    #[test]
    fn value_at_90_is_not_grayish() {
        // sat 15%, val 90%: neither whitish (sat > 10) nor grayish (val not < 90).
        assert_eq!(color_name(hsv(Some(30), 39, 230)), "very light pale Orange");
    }

    #[test]
    fn chromatic_colors_get_three_words() {
        assert_eq!(color_name(hsv(Some(332), 184, 232)), "very light brilliant Rose");
        assert_eq!(color_name(hsv(Some(200), 100, 100)), "moderate dim Capri");
    }

    #[test]
    fn hue_table_edges() {
        assert_eq!(hue_name(Some(14)), "Red");
        assert_eq!(hue_name(Some(15)), "Vermilion");
        assert_eq!(hue_name(Some(358)), "Crimson");
        assert_eq!(hue_name(Some(359)), "Red");
        assert_eq!(hue_name(None), "Gray");
    }

    #[test]
    fn names_from_rgb() {
        assert_eq!(
            color_name(rgb8_to_hsv(Rgb8::new(0, 0, 255))),
            "very light vivid Blue"
        );
        assert_eq!(
            color_name(rgb8_to_hsv(Rgb8::new(128, 128, 128))),
            "grayish Gray"
        );
    }

    #[test]
    fn every_hue_has_a_name() {
        for h in 0..360u16 {
            assert_ne!(hue_name(Some(h)), ACHROMATIC_NAME, "hue {h}");
        }
    }
}
