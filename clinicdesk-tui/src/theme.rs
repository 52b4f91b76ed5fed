//! Clinic theme and color utilities.

use crate::notifications::NotificationLevel;
use clinicdesk_core::TriageItem;
use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct ClinicTheme {
    pub bg: Color,
    pub bg_highlight: Color,
    pub primary: Color,
    pub primary_dim: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub text: Color,
    pub text_dim: Color,
    pub text_muted: Color,
    pub border: Color,
    pub border_focus: Color,
}

impl ClinicTheme {
    pub fn clinic() -> Self {
        Self {
            bg: Color::Rgb(16, 22, 28),
            bg_highlight: Color::Rgb(34, 48, 60),
            primary: Color::Rgb(64, 196, 170),
            primary_dim: Color::Rgb(36, 112, 98),
            accent: Color::Rgb(120, 170, 255),
            success: Color::Rgb(96, 200, 120),
            warning: Color::Rgb(240, 190, 80),
            error: Color::Rgb(235, 90, 90),
            text: Color::Rgb(230, 236, 240),
            text_dim: Color::Rgb(140, 152, 160),
            text_muted: Color::Rgb(84, 96, 104),
            border: Color::Rgb(70, 84, 94),
            border_focus: Color::Rgb(64, 196, 170),
        }
    }
}

/// Unread items stand out; resolved ones fade.
pub fn triage_item_color(item: &TriageItem, theme: &ClinicTheme) -> Color {
    if item.has_unread {
        theme.primary
    } else if item.is_active {
        theme.text
    } else {
        theme.text_dim
    }
}

pub fn badge_color(count: u32, theme: &ClinicTheme) -> Color {
    match count {
        0 => theme.text_muted,
        1..=9 => theme.warning,
        _ => theme.error,
    }
}

pub fn notification_color(level: NotificationLevel, theme: &ClinicTheme) -> Color {
    match level {
        NotificationLevel::Info => theme.accent,
        NotificationLevel::Warning => theme.warning,
        NotificationLevel::Error => theme.error,
    }
}
