use chrono::{DateTime, FixedOffset, Timelike, Utc};

/// Asia/Kolkata is UTC+05:30 all year round.
pub const IST_OFFSET_MINUTES: i32 = 5 * 60 + 30;

/// Time-of-day policy for starting a subscription purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionPolicy {
    AlwaysOpen,
    /// Open for the single local hour `open_hour:00` to `open_hour:59`.
    DailyWindow {
        open_hour: u32,
        utc_offset_minutes: i32,
    },
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self::DailyWindow {
            open_hour: 10,
            utc_offset_minutes: IST_OFFSET_MINUTES,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AdmissionGate {
    policy: AdmissionPolicy,
}

impl AdmissionGate {
    pub fn new(policy: AdmissionPolicy) -> Self {
        Self { policy }
    }

    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        match self.policy {
            AdmissionPolicy::AlwaysOpen => true,
            AdmissionPolicy::DailyWindow {
                open_hour,
                utc_offset_minutes,
            } => match FixedOffset::east_opt(utc_offset_minutes * 60) {
                Some(offset) => now.with_timezone(&offset).hour() == open_hour,
                None => false,
            },
        }
    }

    /// Human-readable description of when the gate opens, used in denial messages.
    pub fn window_description(&self) -> String {
        match self.policy {
            AdmissionPolicy::AlwaysOpen => "at any time".to_string(),
            AdmissionPolicy::DailyWindow {
                open_hour,
                utc_offset_minutes,
            } => {
                let sign = if utc_offset_minutes < 0 { '-' } else { '+' };
                let abs = utc_offset_minutes.abs();
                format!(
                    "between {:02}:00 and {:02}:59 (UTC{}{:02}:{:02})",
                    open_hour,
                    open_hour,
                    sign,
                    abs / 60,
                    abs % 60
                )
            }
        }
    }
}
