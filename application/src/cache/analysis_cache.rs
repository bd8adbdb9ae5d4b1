//! Single-flight analysis cache
//!
//! Results are keyed by `(case_id, question)`. Concurrent requests for the
//! same key share one in-flight computation and all receive the same
//! outcome; only successful results are stored.
//!
//! # Lifecycle of a computation
//!
//! ```text
//! run_or_reuse(key) ──► stored? ──yes──► Arc<AnalysisResult>
//!                         │ no
//!                         ▼
//!                  in flight? ──yes──► join the shared future
//!                         │ no
//!                         ▼
//!        spawn task (generation g) ──► complete(key, g) ──► store if newest
//! ```
//!
//! The spawned task is aborted once every waiter has gone away, which in
//! turn cancels its agent calls. A computation that is superseded by a
//! forced re-run (higher generation) can neither overwrite the newer result
//! nor clear the newer in-flight marker. Evicting a case records the
//! generation at eviction time; computations for that case started earlier
//! still answer their waiters but are never stored.
//!
//! Locks are always taken in the order `in_flight`, `evictions`, `entries`.

use crate::use_cases::run_analysis::AnalysisError;
use council_domain::{AnalysisKey, AnalysisResult};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared, WeakShared};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tokio_util::task::AbortOnDropHandle;
use tracing::debug;

type Outcome = Result<Arc<AnalysisResult>, AnalysisError>;
type Computation = BoxFuture<'static, Outcome>;

struct Stored {
    generation: u64,
    result: Arc<AnalysisResult>,
}

struct Flight {
    generation: u64,
    computation: WeakShared<Computation>,
}

/// Keyed store of completed analyses with in-flight deduplication
#[derive(Default)]
pub struct AnalysisCache {
    entries: RwLock<HashMap<AnalysisKey, Stored>>,
    in_flight: Mutex<HashMap<AnalysisKey, Flight>>,
    /// Generation at which each case was last evicted
    evictions: Mutex<HashMap<String, u64>>,
    generations: AtomicU64,
}

impl AnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored result for `key`, if any
    pub fn get(&self, key: &AnalysisKey) -> Option<Arc<AnalysisResult>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .map(|stored| Arc::clone(&stored.result))
    }

    /// Return the stored result, join a running computation, or start one
    ///
    /// `compute` is invoked only when a new computation is started.
    pub async fn run_or_reuse<F, Fut>(self: &Arc<Self>, key: AnalysisKey, compute: F) -> Outcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<AnalysisResult, AnalysisError>> + Send + 'static,
    {
        if let Some(hit) = self.get(&key) {
            debug!(%key, "Cache hit");
            return Ok(hit);
        }

        let computation = {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);

            // Re-check under the lock: a computation may have completed since
            if let Some(hit) = self.get(&key) {
                debug!(%key, "Cache hit");
                return Ok(hit);
            }

            match in_flight.get(&key).and_then(|flight| flight.computation.upgrade()) {
                Some(running) => {
                    debug!(%key, "Joining in-flight analysis");
                    running
                }
                None => self.start(&mut in_flight, key, compute()),
            }
        };

        computation.await
    }

    /// Start a fresh computation regardless of stored or running ones
    ///
    /// The result replaces whatever is stored for `key` once it completes.
    pub async fn recompute<Fut>(self: &Arc<Self>, key: AnalysisKey, computation: Fut) -> Outcome
    where
        Fut: Future<Output = Result<AnalysisResult, AnalysisError>> + Send + 'static,
    {
        let computation = {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            debug!(%key, "Forced re-analysis");
            self.start(&mut in_flight, key, computation)
        };

        computation.await
    }

    /// Store `result` for `key`, replacing any earlier one
    ///
    /// Computations already running for `key` will not overwrite it.
    pub fn put(&self, key: AnalysisKey, result: AnalysisResult) -> Arc<AnalysisResult> {
        let _in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;
        let result = Arc::new(result);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                key,
                Stored {
                    generation,
                    result: Arc::clone(&result),
                },
            );
        result
    }

    /// Drop every stored result for `case_id`; returns how many were removed
    ///
    /// Computations already running for the case are detached: their
    /// waiters still get an answer, but nothing they produce is stored and
    /// later requests start afresh.
    pub fn evict_case(&self, case_id: &str) -> usize {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        in_flight.retain(|key, _| key.case_id != case_id);

        let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;
        self.evictions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(case_id.to_string(), generation);

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|key, _| key.case_id != case_id);
        before - entries.len()
    }

    /// Number of stored results
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a computation for `key` is currently running
    pub fn is_in_flight(&self, key: &AnalysisKey) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .is_some_and(|flight| flight.computation.upgrade().is_some())
    }

    fn start<Fut>(
        self: &Arc<Self>,
        in_flight: &mut HashMap<AnalysisKey, Flight>,
        key: AnalysisKey,
        computation: Fut,
    ) -> Shared<Computation>
    where
        Fut: Future<Output = Result<AnalysisResult, AnalysisError>> + Send + 'static,
    {
        let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;
        let cache = Arc::clone(self);
        let task_key = key.clone();

        let task = AbortOnDropHandle::new(tokio::spawn(async move {
            let outcome = computation.await.map(Arc::new);
            cache.complete(&task_key, generation, &outcome);
            outcome
        }));

        let shared = async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(e) => Err(AnalysisError::CacheComputationFailed(e.to_string())),
            }
        }
        .boxed()
        .shared();

        if let Some(weak) = shared.downgrade() {
            in_flight.insert(
                key,
                Flight {
                    generation,
                    computation: weak,
                },
            );
        }
        shared
    }

    fn complete(&self, key: &AnalysisKey, generation: u64, outcome: &Outcome) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if in_flight
            .get(key)
            .is_some_and(|flight| flight.generation == generation)
        {
            in_flight.remove(key);
        }

        let Ok(result) = outcome else {
            debug!(%key, "Analysis failed; nothing stored");
            return;
        };

        let evicted_at = self
            .evictions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key.case_id)
            .copied();
        if evicted_at.is_some_and(|evicted| evicted > generation) {
            debug!(%key, generation, "Case evicted while analysis ran; not stored");
            return;
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries
            .get(key)
            .is_some_and(|stored| stored.generation > generation)
        {
            debug!(%key, generation, "Discarding superseded analysis");
            return;
        }

        let stored = Stored {
            generation,
            result: Arc::clone(result),
        };
        if entries.insert(key.clone(), stored).is_some() {
            debug!(%key, generation, "Overwrote stored analysis");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{ConsensusAggregator, Question, Roster, Vote};
    use std::sync::atomic::{AtomicBool, AtomicUsize};
    use std::time::Duration;

    fn key(case_id: &str, question: &str) -> AnalysisKey {
        AnalysisKey::new(case_id, &Question::new(question).unwrap())
    }

    fn result(question: &str, confidence: f64) -> AnalysisResult {
        let roster = Roster::default();
        let verdicts = roster
            .profiles()
            .iter()
            .map(|p| Vote::yes(p, confidence, "mock").into())
            .collect();
        ConsensusAggregator::default()
            .aggregate(question, verdicts)
            .unwrap()
    }

    /// A computation that counts invocations and takes `delay` to finish
    fn counted(
        counter: &Arc<AtomicUsize>,
        delay: Duration,
        confidence: f64,
    ) -> impl Future<Output = Result<AnalysisResult, AnalysisError>> + Send + 'static {
        let counter = Arc::clone(counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            Ok(result("Q?", confidence))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_requests_share_one_computation() {
        let cache = Arc::new(AnalysisCache::new());
        let counter = Arc::new(AtomicUsize::new(0));
        let k = key("0148", "Q?");

        let (a, b, c) = tokio::join!(
            cache.run_or_reuse(k.clone(), || counted(&counter, Duration::from_secs(3), 0.9)),
            cache.run_or_reuse(k.clone(), || counted(&counter, Duration::from_secs(3), 0.1)),
            cache.run_or_reuse(k.clone(), || counted(&counter, Duration::from_secs(3), 0.1)),
        );

        let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&a, &b) && Arc::ptr_eq(&b, &c));
        assert_eq!(a.confidence, 0.9);
        assert!(!cache.is_in_flight(&k));
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_result_is_reused() {
        let cache = Arc::new(AnalysisCache::new());
        let counter = Arc::new(AtomicUsize::new(0));
        let k = key("0148", "Q?");

        let first = cache
            .run_or_reuse(k.clone(), || counted(&counter, Duration::from_secs(1), 0.9))
            .await
            .unwrap();
        let second = cache
            .run_or_reuse(k.clone(), || counted(&counter, Duration::from_secs(1), 0.2))
            .await
            .unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&cache.get(&k).unwrap(), &first));
    }

    #[tokio::test(start_paused = true)]
    async fn test_different_questions_compute_independently() {
        let cache = Arc::new(AnalysisCache::new());
        let counter = Arc::new(AtomicUsize::new(0));

        let (a, b) = tokio::join!(
            cache.run_or_reuse(key("0148", "A?"), || counted(&counter, Duration::from_secs(1), 0.9)),
            cache.run_or_reuse(key("0148", "B?"), || counted(&counter, Duration::from_secs(1), 0.7)),
        );

        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert!(!Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_shared_and_not_stored() {
        let cache = Arc::new(AnalysisCache::new());
        let counter = Arc::new(AtomicUsize::new(0));
        let k = key("0148", "Q?");

        let failing = || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_secs(1)).await;
                Err::<AnalysisResult, _>(AnalysisError::InsufficientQuorum {
                    responded: 2,
                    required: 3,
                    roster: 5,
                })
            }
        };

        let (a, b) = tokio::join!(
            cache.run_or_reuse(k.clone(), failing),
            cache.run_or_reuse(k.clone(), failing),
        );

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(a.unwrap_err(), b.unwrap_err());
        assert!(cache.get(&k).is_none());
        assert!(cache.is_empty());

        // The next request starts afresh
        cache
            .run_or_reuse(k.clone(), || counted(&counter, Duration::from_secs(1), 0.9))
            .await
            .unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recompute_overwrites() {
        let cache = Arc::new(AnalysisCache::new());
        let counter = Arc::new(AtomicUsize::new(0));
        let k = key("0148", "Q?");

        let first = cache
            .run_or_reuse(k.clone(), || counted(&counter, Duration::from_secs(1), 0.9))
            .await
            .unwrap();
        let second = cache
            .recompute(k.clone(), counted(&counter, Duration::from_secs(1), 0.6))
            .await
            .unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&cache.get(&k).unwrap(), &second));
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_computation_does_not_overwrite() {
        let cache = Arc::new(AnalysisCache::new());
        let counter = Arc::new(AtomicUsize::new(0));
        let k = key("0148", "Q?");

        let (old, new) = tokio::join!(
            cache.run_or_reuse(k.clone(), || counted(&counter, Duration::from_secs(10), 0.1)),
            async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                cache
                    .recompute(k.clone(), counted(&counter, Duration::from_secs(1), 0.8))
                    .await
            },
        );

        // Both callers get their own computation's result
        assert_eq!(old.unwrap().confidence, 0.1);
        let new = new.unwrap();
        assert_eq!(new.confidence, 0.8);
        assert!(Arc::ptr_eq(&cache.get(&k).unwrap(), &new));
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_wins_over_running_computation() {
        let cache = Arc::new(AnalysisCache::new());
        let counter = Arc::new(AtomicUsize::new(0));
        let k = key("0147", "Q?");

        let (running, stored) = tokio::join!(
            cache.run_or_reuse(k.clone(), || counted(&counter, Duration::from_secs(10), 0.1)),
            async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                cache.put(k.clone(), result("Q?", 0.7))
            },
        );

        assert_eq!(running.unwrap().confidence, 0.1);
        assert!(Arc::ptr_eq(&cache.get(&k).unwrap(), &stored));

        let reused = cache
            .run_or_reuse(k.clone(), || counted(&counter, Duration::from_secs(1), 0.9))
            .await
            .unwrap();
        assert!(Arc::ptr_eq(&reused, &stored));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_computation_is_cancelled() {
        let cache = Arc::new(AnalysisCache::new());
        let finished = Arc::new(AtomicBool::new(false));
        let k = key("0148", "Q?");

        let slow = {
            let finished = Arc::clone(&finished);
            move || async move {
                tokio::time::sleep(Duration::from_secs(60)).await;
                finished.store(true, Ordering::SeqCst);
                Ok::<_, AnalysisError>(result("Q?", 0.9))
            }
        };

        let abandoned =
            tokio::time::timeout(Duration::from_secs(1), cache.run_or_reuse(k.clone(), slow)).await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(!finished.load(Ordering::SeqCst));
        assert!(cache.get(&k).is_none());
        assert!(!cache.is_in_flight(&k));

        // A later request starts a fresh computation
        let counter = Arc::new(AtomicUsize::new(0));
        cache
            .run_or_reuse(k.clone(), || counted(&counter, Duration::from_secs(1), 0.9))
            .await
            .unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_evict_during_computation_discards_its_result() {
        let cache = Arc::new(AnalysisCache::new());
        let counter = Arc::new(AtomicUsize::new(0));
        let k = key("0148", "Q?");

        let (running, evicted) = tokio::join!(
            cache.run_or_reuse(k.clone(), || counted(&counter, Duration::from_secs(10), 0.9)),
            async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                cache.evict_case("0148")
            },
        );

        // The caller still gets its answer, but the deleted case stays deleted
        assert_eq!(running.unwrap().confidence, 0.9);
        assert_eq!(evicted, 0);
        assert!(cache.get(&k).is_none());
        assert!(!cache.is_in_flight(&k));

        // Analyses started after the eviction are stored again
        cache
            .run_or_reuse(k.clone(), || counted(&counter, Duration::from_secs(1), 0.6))
            .await
            .unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(cache.get(&k).unwrap().confidence, 0.6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_evict_case() {
        let cache = Arc::new(AnalysisCache::new());
        let counter = Arc::new(AtomicUsize::new(0));

        for (case_id, question) in [("0148", "A?"), ("0148", "B?"), ("0200", "A?")] {
            cache
                .run_or_reuse(key(case_id, question), || {
                    counted(&counter, Duration::from_secs(1), 0.9)
                })
                .await
                .unwrap();
        }

        assert_eq!(cache.evict_case("0148"), 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&key("0200", "A?")).is_some());
        assert_eq!(cache.evict_case("0148"), 0);
    }
}
