use egui::Color32;
use launcher_core::Tag;

/// Env vars that opt into the enhanced theme; the second is the older name.
pub const ENHANCED_THEME_ENVS: [&str; 2] = ["CHATBOT_ENHANCED_THEME", "CHATBOT_USE_TTKBOOTSTRAP"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color32,
    pub surface: Color32,
    pub text: Color32,
    pub muted: Color32,
    pub accent: Color32,
    pub danger: Color32,
    pub sys: Color32,
    pub bot: Color32,
    pub user: Color32,
}

const DARK: Palette = Palette {
    background: Color32::from_rgb(0x0f, 0x11, 0x13),
    surface: Color32::from_rgb(0x1b, 0x1e, 0x22),
    text: Color32::from_rgb(0xe6, 0xe6, 0xe6),
    muted: Color32::from_rgb(0xa1, 0xa1, 0xaa),
    accent: Color32::from_rgb(0x25, 0x63, 0xeb),
    danger: Color32::from_rgb(0xef, 0x44, 0x44),
    sys: Color32::from_rgb(0x8a, 0xb4, 0xf8),
    bot: Color32::from_rgb(0xc7, 0xf2, 0x96),
    user: Color32::from_rgb(0xff, 0xbf, 0x7f),
};

/// Stock egui dark colors, with tag colors toned down to match.
const BASIC: Palette = Palette {
    background: Color32::from_gray(27),
    surface: Color32::from_gray(40),
    text: Color32::from_gray(200),
    muted: Color32::from_gray(140),
    accent: Color32::from_rgb(90, 170, 255),
    danger: Color32::from_rgb(255, 110, 110),
    sys: Color32::from_rgb(140, 170, 210),
    bot: Color32::from_rgb(170, 210, 140),
    user: Color32::from_rgb(225, 180, 130),
};

/// Chosen once at startup; widgets ask it for colors instead of branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeProvider {
    Enhanced,
    Basic,
}

impl ThemeProvider {
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Enhanced when any of [`ENHANCED_THEME_ENVS`] is truthy.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let enhanced = ENHANCED_THEME_ENVS
            .iter()
            .any(|name| Self::from_flag(lookup(name).as_deref()) == Self::Enhanced);
        if enhanced {
            Self::Enhanced
        } else {
            Self::Basic
        }
    }

    pub fn from_flag(value: Option<&str>) -> Self {
        let enabled = value
            .map(|value| value.trim().to_ascii_lowercase())
            .is_some_and(|value| matches!(value.as_str(), "1" | "true" | "yes" | "on"));
        if enabled {
            Self::Enhanced
        } else {
            Self::Basic
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::Enhanced => DARK,
            Self::Basic => BASIC,
        }
    }

    pub fn tag_color(self, tag: Tag) -> Color32 {
        let palette = self.palette();
        match tag {
            Tag::Sys => palette.sys,
            Tag::User => palette.user,
            Tag::Bot => palette.bot,
        }
    }

    pub fn visuals(self) -> egui::Visuals {
        let mut visuals = egui::Visuals::dark();
        if self == Self::Basic {
            return visuals;
        }

        let palette = self.palette();
        visuals.override_text_color = Some(palette.text);
        visuals.window_fill = palette.surface;
        visuals.panel_fill = palette.background;
        visuals.extreme_bg_color = palette.surface;
        visuals.faint_bg_color = palette.surface;
        visuals.error_fg_color = palette.danger;
        visuals.hyperlink_color = palette.accent;
        visuals.selection.bg_fill = palette.accent;
        visuals.widgets.active.bg_fill = palette.accent;
        visuals.widgets.hovered.bg_fill = palette.accent.gamma_multiply(0.85);
        visuals
    }

    pub fn apply(self, ctx: &egui::Context) {
        ctx.set_visuals(self.visuals());
    }
}
