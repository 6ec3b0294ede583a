use bitflags::bitflags;
use std::fmt;
use std::str::FromStr;

bitflags! {
    /// Device capabilities the user has granted.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Capabilities: u8 {
        const SEND_SMS = 1 << 0;
        const FINE_LOCATION = 1 << 1;
        const CALL_PHONE = 1 << 2;

        /// Required before any dispatch starts.
        const DISPATCH = Self::SEND_SMS.bits() | Self::FINE_LOCATION.bits();
        const ALL = Self::DISPATCH.bits() | Self::CALL_PHONE.bits();
    }
}

impl Capabilities {
    /// Capabilities in `required` that are not in `self`.
    #[must_use]
    pub const fn missing(self, required: Self) -> Self {
        required.difference(self)
    }
}

/// One grant name. Unknown names are rejected rather than granting nothing.
impl FromStr for Capabilities {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sms" | "send_sms" => Ok(Self::SEND_SMS),
            "location" | "fine_location" => Ok(Self::FINE_LOCATION),
            "call" | "call_phone" => Ok(Self::CALL_PHONE),
            "all" | "*" => Ok(Self::ALL),
            _ => Err(format!("unknown capability '{s}'")),
        }
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (Self::SEND_SMS, "send_sms"),
            (Self::FINE_LOCATION, "fine_location"),
            (Self::CALL_PHONE, "call_phone"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
        .collect();
        f.write_str(&names.join(", "))
    }
}
