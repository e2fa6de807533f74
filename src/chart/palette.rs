use ratatui::style::Color;

/// The dashboard's fixed categorical colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteColor {
    Burgundy,
    Coffee,
    Cream,
}

impl PaletteColor {
    pub const ALL: [PaletteColor; 3] = [
        PaletteColor::Burgundy,
        PaletteColor::Coffee,
        PaletteColor::Cream,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PaletteColor::Burgundy => "Burgundy",
            PaletteColor::Coffee => "Coffee",
            PaletteColor::Cream => "Cream",
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            PaletteColor::Burgundy => "#803D3B",
            PaletteColor::Coffee => "#AF8260",
            PaletteColor::Cream => "#E4C59E",
        }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            PaletteColor::Burgundy => (0x80, 0x3D, 0x3B),
            PaletteColor::Coffee => (0xAF, 0x82, 0x60),
            PaletteColor::Cream => (0xE4, 0xC5, 0x9E),
        }
    }
}

impl From<PaletteColor> for Color {
    fn from(color: PaletteColor) -> Self {
        let (r, g, b) = color.rgb();
        Color::Rgb(r, g, b)
    }
}
