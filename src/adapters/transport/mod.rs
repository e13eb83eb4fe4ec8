//! Gateway transport adapters.

mod mock;
mod reqwest;

pub use self::reqwest::ReqwestTransport;
pub use mock::{MockTransport, RecordedCall, ScriptedResponse};
