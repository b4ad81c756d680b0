//! Host runtime scope.
//!
//! [`RuntimeScope`] is entered once per process before any block work and
//! left when it is dropped. Entering installs the tracing subscriber and
//! builds the worker pool that parallel lane fills run on. The scope is
//! one-shot: once it has been left it cannot be entered again.

use crate::config::TutorialConfig;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use std::sync::atomic::{AtomicU8, Ordering};
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const IDLE: u8 = 0;
const ACTIVE: u8 = 1;
const FINALISED: u8 = 2;

static SCOPE_STATE: AtomicU8 = AtomicU8::new(IDLE);

/// Runtime scope errors
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Runtime scope is already active in this process")]
    AlreadyActive,

    #[error("Runtime scope has already been finalised in this process")]
    AlreadyFinalised,

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] ThreadPoolBuildError),
}

/// Lifecycle of the process-wide scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeState {
    /// Not yet entered.
    Idle,
    /// A guard is alive.
    Active,
    /// Entered and left; cannot be entered again.
    Finalised,
}

/// Guard for the initialised host runtime.
pub struct RuntimeScope {
    pool: ThreadPool,
    threads: usize,
}

impl RuntimeScope {
    /// Enter the runtime scope.
    ///
    /// Succeeds at most once per process.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::AlreadyActive`] while another guard is alive,
    /// [`RuntimeError::AlreadyFinalised`] after the scope has been left, or
    /// [`RuntimeError::ThreadPool`] if the worker pool cannot be built. A
    /// failed pool build leaves the scope enterable.
    pub fn acquire(config: &TutorialConfig) -> Result<Self, RuntimeError> {
        match SCOPE_STATE.compare_exchange(IDLE, ACTIVE, Ordering::AcqRel, Ordering::Acquire) {
            Ok(_) => {}
            Err(ACTIVE) => return Err(RuntimeError::AlreadyActive),
            Err(_) => return Err(RuntimeError::AlreadyFinalised),
        }

        init_tracing(config.log_level.as_filter_str());

        let threads = worker_threads(config);
        let pool = match ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("soa-worker-{}", i))
            .build()
        {
            Ok(pool) => pool,
            Err(err) => {
                SCOPE_STATE.store(IDLE, Ordering::Release);
                return Err(err.into());
            }
        };

        tracing::info!(threads, "Runtime scope initialised");
        Ok(Self { pool, threads })
    }

    /// Current lifecycle state of the process-wide scope.
    pub fn state() -> ScopeState {
        match SCOPE_STATE.load(Ordering::Acquire) {
            IDLE => ScopeState::Idle,
            ACTIVE => ScopeState::Active,
            _ => ScopeState::Finalised,
        }
    }

    /// Whether a scope is currently alive.
    pub fn is_active() -> bool {
        Self::state() == ScopeState::Active
    }

    /// Worker thread count.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Run `op` on the scope's worker pool.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }
}

impl Drop for RuntimeScope {
    fn drop(&mut self) {
        tracing::info!("Runtime scope finalised");
        SCOPE_STATE.store(FINALISED, Ordering::Release);
    }
}

impl std::fmt::Debug for RuntimeScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeScope")
            .field("threads", &self.threads)
            .finish()
    }
}

/// Worker count for `config`; 0 means one per CPU.
fn worker_threads(config: &TutorialConfig) -> usize {
    if config.threads == 0 {
        num_cpus::get()
    } else {
        config.threads
    }
}

fn init_tracing(log_level: &str) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
