//! Scan-session state machine.
//!
//! ```text
//! Idle -> Starting -> Scanning -> Decoded -> Fetching -> Done
//!            |                       |           \-> Failed
//!            \-> Failed              \-> Failed (validation)
//! ```
//!
//! `Decoded` is the one-shot latch: once a frame decodes, later frames are
//! ignored until a new session starts. Each start bumps `generation`; fetch
//! results tagged with an older generation are dropped.

use crate::core::record::Payload;

use super::error::ScanError;
use super::payload::ScanQuery;

#[derive(Debug, Clone, PartialEq)]
pub enum ScanPhase {
    Idle,
    Starting,
    Scanning,
    Decoded { text: String },
    Fetching { query: ScanQuery },
    Done,
    Failed(ScanError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanSession {
    pub phase: ScanPhase,
    pub generation: u64,
    /// Records of the current session; only set in `Done`.
    pub payload: Option<Payload>,
}

impl Default for ScanSession {
    fn default() -> Self {
        Self {
            phase: ScanPhase::Idle,
            generation: 0,
            payload: None,
        }
    }
}

impl ScanSession {
    /// Opens the scanner, discarding whatever the previous session fetched.
    /// Returns the new generation, or `None` while a session is in flight.
    pub fn open(&mut self) -> Option<u64> {
        match self.phase {
            ScanPhase::Idle | ScanPhase::Done | ScanPhase::Failed(_) => {
                self.generation = self.generation.wrapping_add(1);
                self.phase = ScanPhase::Starting;
                self.payload = None;
                Some(self.generation)
            }
            _ => None,
        }
    }

    pub fn device_started(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.phase != ScanPhase::Starting {
            return false;
        }
        self.phase = ScanPhase::Scanning;
        true
    }

    pub fn device_failed(&mut self, generation: u64, err: ScanError) -> bool {
        if generation != self.generation || self.phase != ScanPhase::Starting {
            return false;
        }
        self.phase = ScanPhase::Failed(err);
        true
    }

    /// Latches the first decoded text. Duplicate frames return `false`.
    pub fn decoded(&mut self, generation: u64, text: &str) -> bool {
        if generation != self.generation || self.phase != ScanPhase::Scanning {
            return false;
        }
        self.phase = ScanPhase::Decoded {
            text: text.to_string(),
        };
        true
    }

    /// Hand-typed code. Starts a fresh session when idle, or stands in for a
    /// camera decode while scanning. Returns the generation it belongs to.
    pub fn enter_code(&mut self, text: &str) -> Option<u64> {
        match self.phase {
            ScanPhase::Idle | ScanPhase::Done | ScanPhase::Failed(_) => {
                self.generation = self.generation.wrapping_add(1);
                self.payload = None;
            }
            ScanPhase::Scanning => {}
            _ => return None,
        }
        self.phase = ScanPhase::Decoded {
            text: text.to_string(),
        };
        Some(self.generation)
    }

    /// Validates the latched text. On success the session moves to
    /// `Fetching` and the query is returned; on failure it moves to `Failed`
    /// and no request should be made.
    pub fn begin_fetch(&mut self) -> Option<ScanQuery> {
        let ScanPhase::Decoded { text } = &self.phase else {
            return None;
        };

        match ScanQuery::parse(text) {
            Ok(query) => {
                self.phase = ScanPhase::Fetching {
                    query: query.clone(),
                };
                Some(query)
            }
            Err(err) => {
                self.phase = ScanPhase::Failed(err);
                None
            }
        }
    }

    /// Applies a fetch outcome. Stale or unexpected results are ignored.
    pub fn finish(&mut self, generation: u64, outcome: Result<Payload, ScanError>) -> bool {
        if generation != self.generation || !matches!(self.phase, ScanPhase::Fetching { .. }) {
            return false;
        }
        match outcome {
            Ok(payload) => {
                self.payload = Some(payload);
                self.phase = ScanPhase::Done;
            }
            Err(err) => {
                self.payload = None;
                self.phase = ScanPhase::Failed(err);
            }
        }
        true
    }

    /// Closes the scanner from any phase. A pending fetch keeps running but
    /// its result will no longer match the generation.
    pub fn cancel(&mut self) {
        if matches!(self.phase, ScanPhase::Fetching { .. }) {
            self.generation = self.generation.wrapping_add(1);
        }
        self.phase = ScanPhase::Idle;
        self.payload = None;
    }

    /// Camera preview should be visible.
    pub fn scanner_open(&self) -> bool {
        matches!(self.phase, ScanPhase::Starting | ScanPhase::Scanning)
    }

    /// The camera may still be held and must be released.
    pub fn holds_device(&self) -> bool {
        matches!(
            self.phase,
            ScanPhase::Starting | ScanPhase::Scanning | ScanPhase::Decoded { .. }
        )
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, ScanPhase::Fetching { .. })
    }

    pub fn error(&self) -> Option<&ScanError> {
        match &self.phase {
            ScanPhase::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scanning() -> (ScanSession, u64) {
        let mut session = ScanSession::default();
        let generation = session.open().unwrap();
        assert!(session.device_started(generation));
        (session, generation)
    }

    #[test]
    fn happy_path_reaches_done() {
        let (mut session, generation) = scanning();
        assert!(session.scanner_open());
        assert!(session.decoded(generation, "P100,L2,05/01/2024"));

        let query = session.begin_fetch().unwrap();
        assert_eq!(query.date_param(), "2024-01-05");
        assert!(session.is_loading());

        let payload = Payload::from_value(json!([{ "a": 1 }]));
        assert!(session.finish(generation, Ok(payload.clone())));
        assert_eq!(session.phase, ScanPhase::Done);
        assert_eq!(session.payload(), Some(&payload));
        assert!(!session.scanner_open());
    }

    #[test]
    fn duplicate_frames_are_latched_out() {
        let (mut session, generation) = scanning();
        assert!(session.decoded(generation, "P1,L1,01/01/2024"));
        assert!(!session.decoded(generation, "P1,L1,01/01/2024"));
        assert!(session.begin_fetch().is_some());
        assert!(session.begin_fetch().is_none());
        assert!(!session.decoded(generation, "P2,L1,01/01/2024"));
    }

    #[test]
    fn malformed_text_fails_before_fetching() {
        let (mut session, generation) = scanning();
        session.decoded(generation, "P100,L2");
        assert!(session.begin_fetch().is_none());
        assert_eq!(
            session.error(),
            Some(&ScanError::InvalidPayloadFormat { parts: 2 })
        );
        assert!(!session.scanner_open());
    }

    #[test]
    fn fetch_failure_leaves_scanner_closed_without_records() {
        let (mut session, generation) = scanning();
        session.decoded(generation, "P100,L2,05/01/2024");
        session.begin_fetch();
        assert!(session.finish(
            generation,
            Err(ScanError::FetchFailure("HTTP 500 Internal Server Error".into()))
        ));
        assert!(matches!(session.error(), Some(ScanError::FetchFailure(_))));
        assert!(session.payload().is_none());
        assert!(!session.scanner_open());
    }

    #[test]
    fn device_failure_is_recoverable() {
        let mut session = ScanSession::default();
        let generation = session.open().unwrap();
        assert!(session.device_failed(
            generation,
            ScanError::DeviceUnavailable("no camera found".into())
        ));
        assert!(session.error().is_some());
        assert!(session.open().is_some());
    }

    #[test]
    fn open_is_refused_mid_session() {
        let (mut session, _) = scanning();
        assert_eq!(session.open(), None);
    }

    #[test]
    fn rescanning_discards_previous_records() {
        let (mut session, generation) = scanning();
        session.decoded(generation, "P1,L1,01/01/2024");
        session.begin_fetch();
        session.finish(generation, Ok(Payload::default()));
        assert!(session.payload().is_some());

        session.open();
        assert!(session.payload().is_none());
    }

    #[test]
    fn cancel_drops_late_results() {
        let (mut session, generation) = scanning();
        session.decoded(generation, "P1,L1,01/01/2024");
        session.begin_fetch();
        session.cancel();
        assert_eq!(session.phase, ScanPhase::Idle);
        assert!(!session.finish(generation, Ok(Payload::default())));
        assert!(session.payload().is_none());
    }

    #[test]
    fn typed_codes_share_the_decode_latch() {
        let mut session = ScanSession::default();
        let generation = session.enter_code("P1,L1,01/01/2024").unwrap();
        assert_eq!(generation, 1);
        assert!(session.enter_code("P2,L1,01/01/2024").is_none());
        assert!(session.begin_fetch().is_some());
        assert!(session.enter_code("P3,L1,01/01/2024").is_none());

        let (mut live, generation) = scanning();
        assert_eq!(live.enter_code("P1,L1,01/01/2024"), Some(generation));
        assert!(!live.decoded(generation, "P1,L1,01/01/2024"));
    }

    #[test]
    fn stale_device_events_are_ignored() {
        let mut session = ScanSession::default();
        let first = session.open().unwrap();
        session.cancel();
        let second = session.open().unwrap();
        assert!(!session.device_started(first));
        assert!(session.device_started(second));
        assert!(!session.decoded(first, "P1,L1,01/01/2024"));
    }
}
