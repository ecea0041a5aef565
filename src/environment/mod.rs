//! Read-only lookup tables that feed the frame chain and the drag model:
//! Earth orientation parameters and solar/geomagnetic activity.

mod drag;
mod eop;
mod space_weather;

use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;

pub use drag::{effective_bstar, scaled_state};
pub use eop::{EopRecord, EopTable};
pub use space_weather::{SpaceWeatherRecord, SpaceWeatherTable};

#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// A table that many propagation threads read while one writer may swap in
/// a fresh copy. Readers take a snapshot and never wait on a reload.
#[derive(Debug)]
pub struct SharedTable<T> {
    inner: Arc<RwLock<Arc<T>>>,
}

impl<T> Clone for SharedTable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> SharedTable<T> {
    pub fn new(table: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(table))),
        }
    }

    pub fn snapshot(&self) -> Arc<T> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    pub fn replace(&self, table: T) {
        let fresh = Arc::new(table);
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let old = std::mem::replace(&mut *guard, fresh);
        // The last reference to a large table is freed after the lock is released.
        drop(guard);
        drop(old);
    }
}

impl<T: Default> Default for SharedTable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
