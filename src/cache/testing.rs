//! Test builders shared by the cache unit and property tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::{BuildError, ViewBuilder};

/// Builds `"<key>#<n>"` where `n` counts every build, and fails for the keys
/// listed in `failing`.
#[derive(Debug, Default)]
pub struct CountingBuilder {
    builds: AtomicUsize,
    failing: HashSet<String>,
    delay: Option<Duration>,
}

impl CountingBuilder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(keys: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            failing: keys.iter().map(|k| k.to_string()).collect(),
            ..Self::default()
        })
    }

    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay: Some(delay),
            ..Self::default()
        })
    }

    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

impl ViewBuilder<String> for CountingBuilder {
    fn build(&self, key: &str) -> Result<String, BuildError> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if self.failing.contains(key) {
            return Err(BuildError::NotFound(key.to_string()));
        }
        let n = self.builds.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("{key}#{n}"))
    }
}
