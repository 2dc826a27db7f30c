#![forbid(unsafe_code)]

//! Device collaborators: the rendering surface and the capability table.
//!
//! # Overview
//!
//! - [`RenderSurface`] receives whole-display repaint requests and the two
//!   scroll-indicator flags. The runtime only ever writes to it.
//! - [`DeviceCapabilities`] answers questions about the handset (colour
//!   depth, key mapping, backlight). The runtime only ever reads it. Every
//!   optional query has a default that answers "unsupported".
//! - [`DeviceProfile`] is a plain-data implementation of
//!   [`DeviceCapabilities`] describing one concrete handset.

use crate::event::{GameAction, KeyCode};
use bitflags::bitflags;
use std::time::Duration;

// ============================================================================
// Rendering surface
// ============================================================================

/// Whole-display rendering surface.
///
/// Calls are requests; implementations coalesce and service them on their
/// own schedule and must not block.
pub trait RenderSurface: Send + Sync {
    /// Request a repaint of the whole display.
    fn repaint(&self);

    /// Show or hide the "more content above" indicator.
    fn set_scroll_up(&self, active: bool);

    /// Show or hide the "more content below" indicator.
    fn set_scroll_down(&self, active: bool);
}

// ============================================================================
// Capability queries
// ============================================================================

/// Named colours of the system palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSpecifier {
    Background,
    Foreground,
    HighlightedBackground,
    HighlightedForeground,
    Border,
    HighlightedBorder,
}

impl ColorSpecifier {
    pub const ALL: [Self; 6] = [
        Self::Background,
        Self::Foreground,
        Self::HighlightedBackground,
        Self::HighlightedForeground,
        Self::Border,
        Self::HighlightedBorder,
    ];

    /// Index into a six-entry palette.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Background => 0,
            Self::Foreground => 1,
            Self::HighlightedBackground => 2,
            Self::HighlightedForeground => 3,
            Self::Border => 4,
            Self::HighlightedBorder => 5,
        }
    }
}

/// Line style for element borders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderStyle {
    #[default]
    Solid,
    Dotted,
}

/// Image slots whose preferred size the device can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageType {
    ListElement,
    ChoiceGroupElement,
    Alert,
}

impl ImageType {
    const fn index(self) -> usize {
        match self {
            Self::ListElement => 0,
            Self::ChoiceGroupElement => 1,
            Self::Alert => 2,
        }
    }
}

bitflags! {
    /// Optional hardware features.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DeviceFeatures: u8 {
        const BACKLIGHT = 1 << 0;
        const VIBRATION = 1 << 1;
    }
}

/// Read-only handset capability table.
pub trait DeviceCapabilities: Send + Sync {
    fn is_color(&self) -> bool;

    /// Colours (or grey levels when not colour) the display can show.
    fn num_colors(&self) -> u32;

    fn game_action(&self, key: KeyCode) -> Option<GameAction>;

    fn key_code(&self, action: GameAction) -> Option<KeyCode>;

    fn num_alpha_levels(&self) -> u32 {
        0
    }

    /// Palette entry as `0x00RRGGBB`.
    fn color(&self, _specifier: ColorSpecifier) -> u32 {
        0
    }

    fn border_style(&self, _highlighted: bool) -> BorderStyle {
        BorderStyle::Solid
    }

    /// Preferred `(width, height)` for images in the given slot.
    fn best_image_size(&self, _image: ImageType) -> (u32, u32) {
        (0, 0)
    }

    /// Flash the backlight; false when the device has none.
    fn flash_backlight(&self, _duration: Duration) -> bool {
        false
    }

    /// Run the vibrator; false when the device has none.
    fn vibrate(&self, _duration: Duration) -> bool {
        false
    }
}

// ============================================================================
// DeviceProfile
// ============================================================================

/// Monochrome palette: black on white, inverted highlight.
const MONO_PALETTE: [u32; 6] = [
    0x00FF_FFFF,
    0x0000_0000,
    0x0000_0000,
    0x00FF_FFFF,
    0x0000_0000,
    0x0000_0000,
];

/// Soft-arrow key codes reported by common handsets.
const SOFT_UP: i32 = -1;
const SOFT_DOWN: i32 = -2;
const SOFT_LEFT: i32 = -3;
const SOFT_RIGHT: i32 = -4;
const SOFT_FIRE: i32 = -5;

/// Static description of one handset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceProfile {
    pub color: bool,
    pub num_colors: u32,
    pub alpha_levels: u32,
    pub palette: [u32; 6],
    pub highlighted_border: BorderStyle,
    pub features: DeviceFeatures,
    /// Preferred image sizes, indexed list / choice group / alert.
    pub image_sizes: [(u32, u32); 3],
    /// Key to action table; the first entry for an action is its canonical key.
    pub key_map: Vec<(KeyCode, GameAction)>,
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            color: false,
            num_colors: 2,
            alpha_levels: 2,
            palette: MONO_PALETTE,
            highlighted_border: BorderStyle::Solid,
            features: DeviceFeatures::empty(),
            image_sizes: [(12, 12), (12, 12), (32, 32)],
            key_map: standard_key_map(),
        }
    }
}

impl DeviceProfile {
    /// A 16-bit colour handset with backlight and vibrator.
    #[must_use]
    pub fn color_handset() -> Self {
        Self {
            color: true,
            num_colors: 65_536,
            alpha_levels: 256,
            palette: [
                0x00FF_FFFF,
                0x0000_0000,
                0x0000_3399,
                0x00FF_FFFF,
                0x0080_8080,
                0x0000_3399,
            ],
            highlighted_border: BorderStyle::Dotted,
            features: DeviceFeatures::BACKLIGHT | DeviceFeatures::VIBRATION,
            image_sizes: [(16, 16), (16, 16), (48, 48)],
            key_map: standard_key_map(),
        }
    }

    #[must_use]
    pub fn with_features(mut self, features: DeviceFeatures) -> Self {
        self.features = features;
        self
    }

    #[must_use]
    pub fn with_palette(mut self, palette: [u32; 6]) -> Self {
        self.palette = palette;
        self
    }

    #[must_use]
    pub fn with_key_map(mut self, key_map: Vec<(KeyCode, GameAction)>) -> Self {
        self.key_map = key_map;
        self
    }
}

/// ITU keypad digits first (2/4/6/8/5 and the corners), then soft arrows.
#[must_use]
pub fn standard_key_map() -> Vec<(KeyCode, GameAction)> {
    vec![
        (KeyCode::NUM2, GameAction::Up),
        (KeyCode::NUM8, GameAction::Down),
        (KeyCode::NUM4, GameAction::Left),
        (KeyCode::NUM6, GameAction::Right),
        (KeyCode::NUM5, GameAction::Fire),
        (KeyCode::NUM1, GameAction::GameA),
        (KeyCode::NUM3, GameAction::GameB),
        (KeyCode::NUM7, GameAction::GameC),
        (KeyCode::NUM9, GameAction::GameD),
        (KeyCode::new(SOFT_UP), GameAction::Up),
        (KeyCode::new(SOFT_DOWN), GameAction::Down),
        (KeyCode::new(SOFT_LEFT), GameAction::Left),
        (KeyCode::new(SOFT_RIGHT), GameAction::Right),
        (KeyCode::new(SOFT_FIRE), GameAction::Fire),
    ]
}

impl DeviceCapabilities for DeviceProfile {
    fn is_color(&self) -> bool {
        self.color
    }

    fn num_colors(&self) -> u32 {
        self.num_colors
    }

    fn game_action(&self, key: KeyCode) -> Option<GameAction> {
        self.key_map
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, action)| *action)
    }

    fn key_code(&self, action: GameAction) -> Option<KeyCode> {
        self.key_map
            .iter()
            .find(|(_, a)| *a == action)
            .map(|(key, _)| *key)
    }

    fn num_alpha_levels(&self) -> u32 {
        self.alpha_levels
    }

    fn color(&self, specifier: ColorSpecifier) -> u32 {
        self.palette[specifier.index()]
    }

    fn border_style(&self, highlighted: bool) -> BorderStyle {
        if highlighted {
            self.highlighted_border
        } else {
            BorderStyle::Solid
        }
    }

    fn best_image_size(&self, image: ImageType) -> (u32, u32) {
        self.image_sizes[image.index()]
    }

    fn flash_backlight(&self, _duration: Duration) -> bool {
        self.features.contains(DeviceFeatures::BACKLIGHT)
    }

    fn vibrate(&self, _duration: Duration) -> bool {
        self.features.contains(DeviceFeatures::VIBRATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;

    impl DeviceCapabilities for Bare {
        fn is_color(&self) -> bool {
            false
        }

        fn num_colors(&self) -> u32 {
            2
        }

        fn game_action(&self, _key: KeyCode) -> Option<GameAction> {
            None
        }

        fn key_code(&self, _action: GameAction) -> Option<KeyCode> {
            None
        }
    }

    #[test]
    fn trait_defaults_answer_unsupported() {
        let d = Bare;
        assert_eq!(d.num_alpha_levels(), 0);
        assert_eq!(d.color(ColorSpecifier::Foreground), 0);
        assert_eq!(d.border_style(true), BorderStyle::Solid);
        assert_eq!(d.best_image_size(ImageType::Alert), (0, 0));
        assert!(!d.flash_backlight(Duration::from_millis(100)));
        assert!(!d.vibrate(Duration::from_millis(100)));
    }

    #[test]
    fn every_action_has_a_canonical_key() {
        let p = DeviceProfile::default();
        for action in GameAction::ALL {
            let key = p.key_code(action).expect("mapped");
            assert_eq!(p.game_action(key), Some(action));
        }
    }

    #[test]
    fn canonical_key_is_keypad_digit() {
        let p = DeviceProfile::default();
        assert_eq!(p.key_code(GameAction::Up), Some(KeyCode::NUM2));
        assert_eq!(p.game_action(KeyCode::new(SOFT_UP)), Some(GameAction::Up));
        assert_eq!(p.game_action(KeyCode::NUM0), None);
    }

    #[test]
    fn palette_lookup() {
        let p = DeviceProfile::default();
        assert_eq!(p.color(ColorSpecifier::Background), 0x00FF_FFFF);
        assert_eq!(p.color(ColorSpecifier::Foreground), 0);
        let c = DeviceProfile::color_handset();
        assert_eq!(c.color(ColorSpecifier::HighlightedBackground), 0x0000_3399);
    }

    #[test]
    fn features_gate_backlight_and_vibration() {
        let mono = DeviceProfile::default();
        assert!(!mono.flash_backlight(Duration::from_millis(50)));
        let lit = mono.with_features(DeviceFeatures::BACKLIGHT);
        assert!(lit.flash_backlight(Duration::from_millis(50)));
        assert!(!lit.vibrate(Duration::from_millis(50)));
    }

    #[test]
    fn highlighted_border_style() {
        let c = DeviceProfile::color_handset();
        assert_eq!(c.border_style(false), BorderStyle::Solid);
        assert_eq!(c.border_style(true), BorderStyle::Dotted);
    }
}
