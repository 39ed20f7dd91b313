/// Colors, glyphs and number formatting shared by the views
use iced::widget::container;
use iced::{Background, Border, Color, Theme};

use crate::state::data::Treatment;

pub const BRAND: Color = Color { r: 0.06, g: 0.72, b: 0.51, a: 1.0 };
pub const BRAND_ACCENT: Color = Color { r: 0.02, g: 0.71, b: 0.83, a: 1.0 };
pub const MUTED: Color = Color { r: 0.55, g: 0.58, b: 0.62, a: 1.0 };
pub const ERROR: Color = Color { r: 0.73, g: 0.11, b: 0.11, a: 1.0 };
pub const ERROR_BG: Color = Color { r: 1.0, g: 0.95, b: 0.95, a: 1.0 };
pub const SUGGESTION: Color = Color { r: 0.08, g: 0.5, b: 0.24, a: 1.0 };
pub const SUGGESTION_BG: Color = Color { r: 0.94, g: 0.99, b: 0.96, a: 1.0 };

/// Foreground and background colors for a classification badge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub text: Color,
    pub background: Color,
    pub border: Color,
}

pub fn palette(treatment: Treatment) -> Palette {
    match treatment {
        Treatment::Positive => Palette {
            text: Color::from_rgb8(0x16, 0xa3, 0x4a),
            background: Color::from_rgb8(0xf0, 0xfd, 0xf4),
            border: Color::from_rgb8(0xbb, 0xf7, 0xd0),
        },
        Treatment::Cautionary => Palette {
            text: Color::from_rgb8(0xea, 0x58, 0x0c),
            background: Color::from_rgb8(0xff, 0xf7, 0xed),
            border: Color::from_rgb8(0xfe, 0xd7, 0xaa),
        },
        Treatment::Alarming => Palette {
            text: Color::from_rgb8(0xdc, 0x26, 0x26),
            background: Color::from_rgb8(0xfe, 0xf2, 0xf2),
            border: Color::from_rgb8(0xfe, 0xca, 0xca),
        },
        Treatment::Neutral => Palette {
            text: Color::from_rgb8(0x4b, 0x55, 0x63),
            background: Color::from_rgb8(0xf9, 0xfa, 0xfb),
            border: Color::from_rgb8(0xe5, 0xe7, 0xeb),
        },
    }
}

/// Glyph shown before the classification label
pub fn glyph(treatment: Treatment) -> Option<&'static str> {
    match treatment {
        Treatment::Positive => Some("✔"),
        Treatment::Cautionary => Some("⚠"),
        Treatment::Alarming => Some("✖"),
        Treatment::Neutral => None,
    }
}

/// Container style for a classification badge
pub fn badge(treatment: Treatment) -> impl Fn(&Theme) -> container::Style {
    let colors = palette(treatment);
    move |_theme| container::Style {
        text_color: Some(colors.text),
        background: Some(Background::Color(colors.background)),
        border: Border {
            color: colors.border,
            width: 2.0,
            radius: 16.0.into(),
        },
        ..Default::default()
    }
}

/// Card container with a subtle border
pub fn card(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    container::Style {
        background: Some(Background::Color(palette.background.weak.color)),
        border: Border {
            color: palette.background.strong.color,
            width: 1.0,
            radius: 16.0.into(),
        },
        ..Default::default()
    }
}

/// Tinted banner used for errors and suggestions
pub fn banner(text: Color, background: Color) -> impl Fn(&Theme) -> container::Style {
    move |_theme| container::Style {
        text_color: Some(text),
        background: Some(Background::Color(background)),
        border: Border {
            color: Color { a: 0.3, ..text },
            width: 1.0,
            radius: 12.0.into(),
        },
        ..Default::default()
    }
}

/// Render a magnitude the way the label printed it: `120`, `15.1`
pub fn format_amount(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(120.0), "120");
        assert_eq!(format_amount(15.1), "15.1");
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(85.25), "85.25");
    }

    #[test]
    fn test_every_tier_has_distinct_palette() {
        let tiers = [
            Treatment::Positive,
            Treatment::Cautionary,
            Treatment::Alarming,
            Treatment::Neutral,
        ];
        for (i, a) in tiers.iter().enumerate() {
            for b in &tiers[i + 1..] {
                assert_ne!(palette(*a).text, palette(*b).text);
            }
        }
        assert_eq!(glyph(Treatment::Neutral), None);
    }
}
