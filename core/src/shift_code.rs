//! Shift code table.
//!
//! Codes are the short strings that appear in roster cells ("M2", "DO",
//! ...). Each known code maps to one display label; unknown codes pass
//! through unmapped so a new code in the source sheet never breaks
//! rendering.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftCode {
    M2,
    M3,
    M4,
    D1,
    D2,
    DayOff,
    SickLeave,
    CasualLeave,
    EmergencyLeave,
}

impl ShiftCode {
    pub const ALL: [ShiftCode; 9] = [
        ShiftCode::M2,
        ShiftCode::M3,
        ShiftCode::M4,
        ShiftCode::D1,
        ShiftCode::D2,
        ShiftCode::DayOff,
        ShiftCode::SickLeave,
        ShiftCode::CasualLeave,
        ShiftCode::EmergencyLeave,
    ];

    pub fn parse(code: &str) -> Option<Self> {
        match code.trim() {
            "M2" => Some(Self::M2),
            "M3" => Some(Self::M3),
            "M4" => Some(Self::M4),
            "D1" => Some(Self::D1),
            "D2" => Some(Self::D2),
            "DO" => Some(Self::DayOff),
            "SL" => Some(Self::SickLeave),
            "CL" => Some(Self::CasualLeave),
            "EL" => Some(Self::EmergencyLeave),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::M2 => "M2",
            Self::M3 => "M3",
            Self::M4 => "M4",
            Self::D1 => "D1",
            Self::D2 => "D2",
            Self::DayOff => "DO",
            Self::SickLeave => "SL",
            Self::CasualLeave => "CL",
            Self::EmergencyLeave => "EL",
        }
    }

    /// Display label shown wherever the raw code is too terse.
    pub fn label(self) -> &'static str {
        match self {
            Self::M2 => "8 AM – 5 PM",
            Self::M3 => "9 AM – 6 PM",
            Self::M4 => "10 AM – 7 PM",
            Self::D1 => "12 PM – 9 PM",
            Self::D2 => "1 PM – 10 PM",
            Self::DayOff => "OFF",
            Self::SickLeave => "Sick Leave",
            Self::CasualLeave => "Casual Leave",
            Self::EmergencyLeave => "Emergency Leave",
        }
    }

    /// True for leave-type codes (day off and the leave variants).
    pub fn is_leave(self) -> bool {
        matches!(
            self,
            Self::DayOff | Self::SickLeave | Self::CasualLeave | Self::EmergencyLeave
        )
    }
}

impl fmt::Display for ShiftCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display text for a raw schedule cell.
///
/// Empty cells read as "N/A"; unknown codes come back trimmed but
/// otherwise unchanged.
pub fn display_label(code: &str) -> &str {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return "N/A";
    }
    match ShiftCode::parse(trimmed) {
        Some(known) => known.label(),
        None => trimmed,
    }
}
