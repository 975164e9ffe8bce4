use eframe::egui::Color32;

/// Fixed commands understood by the lamp firmware.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LampCommand {
    On,
    Off,
}

impl LampCommand {
    pub fn payload(&self) -> &'static str {
        match self {
            LampCommand::On => "999,",
            LampCommand::Off => "998,",
        }
    }

    // Button caption
    pub fn label(&self) -> &'static str {
        match self {
            LampCommand::On => "Włącz",
            LampCommand::Off => "Wyłącz",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("expected 6 hex digits, got {0:?}")]
    BadLength(String),
    #[error("invalid hex digits in {0:?}")]
    BadDigit(String),
}

/// Opaque RGB colour picked by the user.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct LampColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl LampColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` or `rrggbb`, case-insensitive.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ColorError::BadLength(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| ColorError::BadDigit(hex.to_string()))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// ASCII payload written to the lamp, comma-terminated like the fixed commands.
    pub fn command_string(&self) -> String {
        format!("{},{},{},", self.r, self.g, self.b)
    }

    pub fn to_color32(&self) -> Color32 {
        Color32::from_rgb(self.r, self.g, self.b)
    }
}

impl From<Color32> for LampColor {
    fn from(color: Color32) -> Self {
        Self::new(color.r(), color.g(), color.b())
    }
}

impl std::fmt::Display for LampColor {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
