use crate::color::HexColor;

/// Window color schemes, cycled by the "Switch Theme" button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    GradientGalaxy,
    NatureGreen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThemeColors {
    /// Left and right stops of the horizontal window gradient.
    pub gradient: (HexColor, HexColor),
    pub button: HexColor,
    pub button_hover: HexColor,
    pub text: HexColor,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::GradientGalaxy, Theme::NatureGreen];

    pub fn name(self) -> &'static str {
        match self {
            Theme::GradientGalaxy => "Gradient Galaxy",
            Theme::NatureGreen => "Nature Green",
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn colors(self) -> ThemeColors {
        match self {
            Theme::GradientGalaxy => ThemeColors {
                gradient: (HexColor::from_rgb(0x00, 0x04, 0x28), HexColor::from_rgb(0x00, 0x4e, 0x92)),
                button: HexColor::from_rgb(0x8e, 0x44, 0xad),
                button_hover: HexColor::from_rgb(0x9b, 0x59, 0xb6),
                text: HexColor::WHITE,
            },
            Theme::NatureGreen => ThemeColors {
                gradient: (HexColor::from_rgb(0x3b, 0x53, 0x23), HexColor::from_rgb(0xd4, 0xc5, 0x9e)),
                button: HexColor::from_rgb(0x55, 0x6b, 0x2f),
                button_hover: HexColor::from_rgb(0x6b, 0x8e, 0x23),
                text: HexColor::WHITE,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_through_both_themes() {
        let start = Theme::default();
        assert_eq!(start.name(), "Gradient Galaxy");
        assert_eq!(start.next(), Theme::NatureGreen);
        assert_eq!(start.next().next(), start);
    }

    #[test]
    fn buttons_carry_white_labels() {
        for theme in Theme::ALL {
            let colors = theme.colors();
            assert_eq!(colors.text, HexColor::WHITE);
            assert_ne!(colors.button, colors.button_hover);
        }
    }
}
