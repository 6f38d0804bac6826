//! Database access.
//!
//! - Single-connection sessions and the MySQL driver binding
//! - The connection tester that runs the diagnostic cycle

pub mod probe;
pub mod session;

pub use probe::{ConnectionProbe, ProbeOutcome, ProbeState};
pub use session::{
    Connector, DIAGNOSTIC_QUERY, DiagnosticSession, MySqlConnector, MySqlSession, SessionGuard,
};
