use serde::{Deserialize, Serialize};

use crate::core::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartTheme {
    #[default]
    Dark,
    Light,
}

/// Resolved colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThemePalette {
    pub background: Color,
    pub grid: Color,
    pub text: Color,
    pub up: Color,
    pub down: Color,
    pub line: Color,
    pub area_top: Color,
    pub area_bottom: Color,
    pub volume: VolumeColors,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeColors {
    pub up: Color,
    pub down: Color,
}

impl Default for VolumeColors {
    fn default() -> Self {
        Self {
            up: Color::rgba8(0x26, 0xa6, 0x9a, 0x80),
            down: Color::rgba8(0xef, 0x53, 0x50, 0x80),
        }
    }
}

impl ChartTheme {
    #[must_use]
    pub fn palette(self) -> ThemePalette {
        let up = Color::rgba8(0x26, 0xa6, 0x9a, 0xff);
        let down = Color::rgba8(0xef, 0x53, 0x50, 0xff);
        let line = Color::rgba8(0x29, 0x62, 0xff, 0xff);
        match self {
            Self::Dark => ThemePalette {
                background: Color::rgba8(0x13, 0x17, 0x22, 0xff),
                grid: Color::rgba8(0x1f, 0x2a, 0x3c, 0xff),
                text: Color::rgba8(0xd1, 0xd4, 0xdc, 0xff),
                up,
                down,
                line,
                area_top: Color::rgba8(0x29, 0x62, 0xff, 0x66),
                area_bottom: Color::rgba8(0x29, 0x62, 0xff, 0x00),
                volume: VolumeColors::default(),
            },
            Self::Light => ThemePalette {
                background: Color::rgba8(0xff, 0xff, 0xff, 0xff),
                grid: Color::rgba8(0xe1, 0xe3, 0xea, 0xff),
                text: Color::rgba8(0x13, 0x17, 0x22, 0xff),
                up,
                down,
                line,
                area_top: Color::rgba8(0x29, 0x62, 0xff, 0x47),
                area_bottom: Color::rgba8(0x29, 0x62, 0xff, 0x00),
                volume: VolumeColors::default(),
            },
        }
    }
}
