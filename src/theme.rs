//! Voucher theme registry.
//!
//! Static table mapping each theme to its display metadata. Lookup never
//! fails: unknown input resolves to the first entry.

use serde::{Deserialize, Serialize};

/// Visual style applied to a voucher card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VoucherTheme {
    Birthday,
    Wedding,
    Anniversary,
    ThankYou,
    Congratulations,
}

/// Display metadata for a theme.
#[derive(Debug, Clone, Copy)]
pub struct ThemeDescriptor {
    pub theme: VoucherTheme,
    /// Human-readable name (e.g. "Thank You").
    pub name: &'static str,
    /// Color-gradient token consumed by the rendering layer.
    pub gradient: &'static str,
    /// Icon token.
    pub icon: &'static str,
    pub emoji: &'static str,
}

/// All themes in registry order. The first entry is the fallback.
pub static THEMES: [ThemeDescriptor; 5] = [
    ThemeDescriptor {
        theme: VoucherTheme::Birthday,
        name: "Birthday",
        gradient: "pink-purple",
        icon: "cake",
        emoji: "🎂",
    },
    ThemeDescriptor {
        theme: VoucherTheme::Wedding,
        name: "Wedding",
        gradient: "blue-indigo",
        icon: "heart",
        emoji: "💍",
    },
    ThemeDescriptor {
        theme: VoucherTheme::Anniversary,
        name: "Anniversary",
        gradient: "amber-red",
        icon: "trophy",
        emoji: "🥂",
    },
    ThemeDescriptor {
        theme: VoucherTheme::ThankYou,
        name: "Thank You",
        gradient: "emerald-teal",
        icon: "smile",
        emoji: "🙏",
    },
    ThemeDescriptor {
        theme: VoucherTheme::Congratulations,
        name: "Congratulations",
        gradient: "yellow-orange",
        icon: "award",
        emoji: "🎉",
    },
];

impl VoucherTheme {
    /// Stable identifier used in tokens and persisted records.
    pub fn as_str(&self) -> &'static str {
        match self {
            VoucherTheme::Birthday => "birthday",
            VoucherTheme::Wedding => "wedding",
            VoucherTheme::Anniversary => "anniversary",
            VoucherTheme::ThankYou => "thank-you",
            VoucherTheme::Congratulations => "congratulations",
        }
    }

    /// Parse an identifier; `None` for unknown input.
    pub fn parse(s: &str) -> Option<Self> {
        THEMES.iter().find(|d| d.theme.as_str() == s).map(|d| d.theme)
    }

    /// Display metadata for this theme.
    pub fn descriptor(&self) -> &'static ThemeDescriptor {
        THEMES
            .iter()
            .find(|d| d.theme == *self)
            .unwrap_or(&THEMES[0])
    }
}

impl Default for VoucherTheme {
    fn default() -> Self {
        THEMES[0].theme
    }
}

/// Resolve display metadata for a raw identifier, falling back to the
/// default theme for unknown input.
pub fn descriptor_for(id: &str) -> &'static ThemeDescriptor {
    VoucherTheme::parse(id).unwrap_or_default().descriptor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_theme() {
        for descriptor in &THEMES {
            let theme = descriptor.theme;
            assert_eq!(VoucherTheme::parse(theme.as_str()), Some(theme));
        }
    }

    #[test]
    fn unknown_id_falls_back_to_first_entry() {
        let descriptor = descriptor_for("pirate-party");
        assert_eq!(descriptor.theme, THEMES[0].theme);
    }

    #[test]
    fn default_is_first_registry_entry() {
        assert_eq!(VoucherTheme::default(), THEMES[0].theme);
    }

    #[test]
    fn descriptor_matches_theme() {
        let descriptor = VoucherTheme::ThankYou.descriptor();
        assert_eq!(descriptor.name, "Thank You");
        assert_eq!(descriptor.emoji, "🙏");
    }

    #[test]
    fn serde_uses_kebab_case_ids() {
        let json = serde_json::to_string(&VoucherTheme::ThankYou).unwrap();
        assert_eq!(json, "\"thank-you\"");
        let back: VoucherTheme = serde_json::from_str(&json).unwrap();
        assert_eq!(back, VoucherTheme::ThankYou);
    }
}
