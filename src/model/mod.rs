use derive_new::new;
use serde::{Deserialize, Deserializer, Serialize};

pub use movie::*;
pub use search_log::*;
pub use stats::*;
pub use timestamp::*;

mod movie;
mod search_log;
mod stats;
mod timestamp;

/// Identifier of a movie on the metadata provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, new)]
#[serde(transparent)]
pub struct MovieId(i64);

impl MovieId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reads a field that should hold a number, treating any other JSON value as absent.
fn number_or_null<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(serde_json::Value::as_f64))
}
