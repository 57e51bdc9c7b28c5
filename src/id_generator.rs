// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pluggable generation of fresh [`LogId`]s.
//!
//! The process-wide generator starts out as a [`RandomIdGenerator`] and can be replaced at any
//! time with [`set_id_generator`], for example with a [`CountingIdGenerator`] to make test
//! output deterministic.
//!
//! ```
//! use ctxlog::{CountingIdGenerator, IdGenerator};
//!
//! let generator = CountingIdGenerator::new();
//! assert_eq!(generator.new_id().to_string(), "0000000000000000");
//! assert_eq!(generator.new_id().to_string(), "0000000000000001");
//! ```

use crate::log_id::LogId;
use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// Produces fresh identifiers.
///
/// Implementations are called concurrently from every thread that binds a context, so they
/// must synchronize any internal state themselves.
pub trait IdGenerator: Debug + Send + Sync {
    /// Returns a new identifier. It should not be [`LogId::NIL`].
    fn new_id(&self) -> LogId;
}

/// The default generator: a `StdRng` seeded from the operating system.
#[derive(Debug)]
pub struct RandomIdGenerator {
    rng: Mutex<StdRng>,
}

impl RandomIdGenerator {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }
}

impl Default for RandomIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for RandomIdGenerator {
    fn new_id(&self) -> LogId {
        let mut rng = self.rng.lock();
        loop {
            let mut bytes = [0u8; 8];
            rng.fill_bytes(&mut bytes);
            let id = LogId::from_bytes(bytes);
            if !id.is_nil() {
                return id;
            }
        }
    }
}

/// Emits `0000000000000000`, `0000000000000001`, ... as string identifiers.
///
/// Intended for tests and examples where log output has to be predictable.
#[derive(Debug, Default)]
pub struct CountingIdGenerator {
    next: AtomicU64,
}

impl CountingIdGenerator {
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }

    /// Starts counting at `first` instead of zero.
    pub const fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl IdGenerator for CountingIdGenerator {
    fn new_id(&self) -> LogId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        LogId::from_string(format!("{:016}", n))
    }
}

static ID_GENERATOR: OnceLock<RwLock<Arc<dyn IdGenerator>>> = OnceLock::new();

fn generator_slot() -> &'static RwLock<Arc<dyn IdGenerator>> {
    ID_GENERATOR.get_or_init(|| RwLock::new(Arc::new(RandomIdGenerator::new())))
}

/// Returns the process-wide generator.
pub fn id_generator() -> Arc<dyn IdGenerator> {
    generator_slot().read().clone()
}

/// Replaces the process-wide generator.
///
/// Contexts bound afterwards draw their identifiers from `generator`; identifiers already
/// stored in existing contexts are unaffected.
pub fn set_id_generator(generator: Arc<dyn IdGenerator>) {
    *generator_slot().write() = generator;
}

/// Draws a fresh identifier from the process-wide generator.
pub fn new_id() -> LogId {
    id_generator().new_id()
}
