//! Audit log records for access and login events.
//!
//! Each record renders as a single line (`KIND: key=value ...`) and is
//! emitted through `tracing` under the `gatehouse::audit` target with the
//! same values attached as structured fields.

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;

/// Formats a timestamp as UTC ISO-8601 with microsecond precision.
#[must_use]
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// An auditable event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEvent<'a> {
    /// A gated route was requested without a logged-in user.
    UnauthorizedAccess {
        ip: &'a str,
        path: &'a str,
        timestamp: DateTime<Utc>,
    },
    /// A user completed the code exchange.
    Login {
        user_id: &'a str,
        email: &'a str,
        timestamp: DateTime<Utc>,
    },
    /// A logged-in user opened a gated route.
    AccessProtected {
        user_id: &'a str,
        timestamp: DateTime<Utc>,
        path: &'a str,
    },
}

impl AuditEvent<'_> {
    /// Returns the record kind as it appears at the start of the line.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnauthorizedAccess { .. } => "UNAUTHORIZED_ACCESS",
            Self::Login { .. } => "LOGIN",
            Self::AccessProtected { .. } => "ACCESS_PROTECTED",
        }
    }

    /// Emits the record: warnings for denied access, info otherwise.
    pub fn emit(&self) {
        match *self {
            Self::UnauthorizedAccess { ip, path, .. } => {
                tracing::warn!(target: "gatehouse::audit", event = self.kind(), ip, path, "{self}");
            }
            Self::Login { user_id, email, .. } => {
                tracing::info!(target: "gatehouse::audit", event = self.kind(), user_id, email, "{self}");
            }
            Self::AccessProtected { user_id, path, .. } => {
                tracing::info!(target: "gatehouse::audit", event = self.kind(), user_id, path, "{self}");
            }
        }
    }
}

impl fmt::Display for AuditEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnauthorizedAccess {
                ip,
                path,
                timestamp,
            } => write!(
                f,
                "UNAUTHORIZED_ACCESS: ip={ip} path={path} timestamp={}",
                format_timestamp(*timestamp)
            ),
            Self::Login {
                user_id,
                email,
                timestamp,
            } => write!(
                f,
                "LOGIN: user_id={user_id} email={email} timestamp={}",
                format_timestamp(*timestamp)
            ),
            Self::AccessProtected {
                user_id,
                timestamp,
                path,
            } => write!(
                f,
                "ACCESS_PROTECTED: user_id={user_id} timestamp={} path={path}",
                format_timestamp(*timestamp)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io;
    use std::sync::{Arc, Mutex};

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 45).unwrap()
            + chrono::Duration::microseconds(123_456)
    }

    #[test]
    fn timestamp_is_utc_iso8601_with_micros() {
        assert_eq!(format_timestamp(fixed_time()), "2024-05-01T12:30:45.123456Z");
    }

    #[test]
    fn unauthorized_access_line() {
        let event = AuditEvent::UnauthorizedAccess {
            ip: "127.0.0.1",
            path: "/protected",
            timestamp: fixed_time(),
        };
        assert_eq!(
            event.to_string(),
            "UNAUTHORIZED_ACCESS: ip=127.0.0.1 path=/protected timestamp=2024-05-01T12:30:45.123456Z"
        );
        assert_eq!(event.kind(), "UNAUTHORIZED_ACCESS");
    }

    #[test]
    fn login_line() {
        let event = AuditEvent::Login {
            user_id: "unknown",
            email: "unknown",
            timestamp: fixed_time(),
        };
        assert_eq!(
            event.to_string(),
            "LOGIN: user_id=unknown email=unknown timestamp=2024-05-01T12:30:45.123456Z"
        );
    }

    #[test]
    fn access_protected_line() {
        let event = AuditEvent::AccessProtected {
            user_id: "abc123",
            timestamp: fixed_time(),
            path: "/protected",
        };
        assert_eq!(
            event.to_string(),
            "ACCESS_PROTECTED: user_id=abc123 timestamp=2024-05-01T12:30:45.123456Z path=/protected"
        );
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn emit_uses_warn_for_denied_access() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            AuditEvent::UnauthorizedAccess {
                ip: "10.0.0.1",
                path: "/protected",
                timestamp: fixed_time(),
            }
            .emit();
            AuditEvent::Login {
                user_id: "abc123",
                email: "a@b.com",
                timestamp: fixed_time(),
            }
            .emit();
        });

        let output = String::from_utf8(captured.0.lock().expect("lock").clone()).expect("utf8");
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("WARN"));
        assert!(lines[0].contains("UNAUTHORIZED_ACCESS: ip=10.0.0.1 path=/protected"));
        assert!(lines[1].contains("INFO"));
        assert!(lines[1].contains("LOGIN: user_id=abc123 email=a@b.com"));
    }
}
