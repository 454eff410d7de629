//! Verification verdict domain model.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Gate action value that means access was granted.
pub const GATE_GRANTED: &str = "granted";

/// Attendance action value for leaving the premises.
pub const ACTION_CHECK_OUT: &str = "check_out";

/// Student details echoed back by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentInfo {
    #[serde(default)]
    pub name: Option<String>,
}

/// Body returned by `verify-entry.php`.
///
/// Every field is optional on the wire; absent fields take their default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationResponse {
    /// `"granted"`, or any other value meaning denied.
    pub gate_action: Option<String>,
    /// `"check_in"` or `"check_out"`.
    pub action: Option<String>,
    pub student: Option<StudentInfo>,
    /// Server-side time of the attendance record.
    pub timestamp: Option<String>,
    /// Whether the guardian SMS went out.
    #[serde(deserialize_with = "truthy")]
    pub sms_sent: bool,
    #[serde(deserialize_with = "truthy")]
    pub success: bool,
    pub message: Option<String>,
}

impl VerificationResponse {
    /// Whether the service opened the gate.
    pub fn is_granted(&self) -> bool {
        self.gate_action.as_deref() == Some(GATE_GRANTED)
    }

    /// Attendance direction of this record.
    pub fn attendance_action(&self) -> AttendanceAction {
        AttendanceAction::from_wire(self.action.as_deref())
    }

    /// Student name, or `"Unknown"`.
    pub fn student_name(&self) -> &str {
        self.student
            .as_ref()
            .and_then(|s| s.name.as_deref())
            .unwrap_or("Unknown")
    }

    /// Server timestamp, or an empty string.
    pub fn timestamp_or_empty(&self) -> &str {
        self.timestamp.as_deref().unwrap_or("")
    }

    /// Denial message, or `"Unknown error"`.
    pub fn message_or_default(&self) -> &str {
        self.message.as_deref().unwrap_or("Unknown error")
    }

    /// Guardian notification status line, if there is anything to report.
    pub fn sms_status(&self) -> Option<&'static str> {
        if self.sms_sent {
            Some("SMS notification sent to guardian")
        } else if self.success {
            Some("SMS notification could not be sent")
        } else {
            None
        }
    }
}

/// Loose boolean: `null`, `0`, `""` and empty containers are false.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    })
}

/// Direction of a granted attendance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttendanceAction {
    CheckIn,
    CheckOut,
}

impl AttendanceAction {
    /// Anything other than `check_out` (including absent) counts as a check-in.
    pub fn from_wire(action: Option<&str>) -> Self {
        match action {
            Some(ACTION_CHECK_OUT) => AttendanceAction::CheckOut,
            _ => AttendanceAction::CheckIn,
        }
    }

    /// Label shown on the console.
    pub fn label(&self) -> &'static str {
        match self {
            AttendanceAction::CheckIn => "CHECK-IN",
            AttendanceAction::CheckOut => "CHECK-OUT",
        }
    }
}

/// What the checkpoint did with a verification result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Access granted; green feedback ran.
    Granted {
        action: AttendanceAction,
        student_name: String,
    },
    /// Access denied by the service; red feedback ran.
    Denied { message: String },
    /// Request failed or the body was unusable; red feedback ran.
    NoResponse,
}

impl GateOutcome {
    /// Whether the gate opened.
    pub fn is_granted(&self) -> bool {
        matches!(self, GateOutcome::Granted { .. })
    }
}
