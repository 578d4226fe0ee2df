use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use stitch_core::{FetchOutcome, Payload, StitchError, Timeframe, TrendFetcher, TrendQuery};

/// Instruction for how one call should behave.
#[derive(Debug, Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(StitchError),
    /// Hang indefinitely (simulate a stalled connection).
    Hang,
}

#[derive(Default)]
struct InternalState {
    build_script: VecDeque<MockBehavior<()>>,
    fetch_script: VecDeque<MockBehavior<FetchOutcome>>,
    timeframe_rules: HashMap<Timeframe, MockBehavior<FetchOutcome>>,
    build_calls: Vec<Timeframe>,
    fetch_calls: Vec<Timeframe>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Queue the behavior of the next unscripted `build_payload` call.
    pub async fn push_build_behavior(&self, behavior: MockBehavior<()>) {
        self.state.lock().await.build_script.push_back(behavior);
    }

    /// Queue `n` copies of a `build_payload` behavior.
    pub async fn push_build_behaviors(&self, behavior: MockBehavior<()>, n: usize) {
        let mut guard = self.state.lock().await;
        guard
            .build_script
            .extend(std::iter::repeat_n(behavior, n));
    }

    /// Queue the behavior of the next `interest_over_time` call.
    pub async fn push_fetch_behavior(&self, behavior: MockBehavior<FetchOutcome>) {
        self.state.lock().await.fetch_script.push_back(behavior);
    }

    /// Queue `n` copies of an `interest_over_time` behavior.
    pub async fn push_fetch_behaviors(&self, behavior: MockBehavior<FetchOutcome>, n: usize) {
        let mut guard = self.state.lock().await;
        guard
            .fetch_script
            .extend(std::iter::repeat_n(behavior, n));
    }

    /// Fix the retrieval behavior for one timeframe. Takes precedence over queued behaviors.
    pub async fn set_timeframe_behavior(
        &self,
        timeframe: Timeframe,
        behavior: MockBehavior<FetchOutcome>,
    ) {
        let mut guard = self.state.lock().await;
        guard.timeframe_rules.insert(timeframe, behavior);
    }

    /// Timeframes passed to `build_payload`, in call order.
    pub async fn build_calls(&self) -> Vec<Timeframe> {
        self.state.lock().await.build_calls.clone()
    }

    /// Timeframes passed to `interest_over_time`, in call order.
    pub async fn fetch_calls(&self) -> Vec<Timeframe> {
        self.state.lock().await.fetch_calls.clone()
    }

    /// Clear all configured behaviors and call logs.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.build_script.clear();
        guard.fetch_script.clear();
        guard.timeframe_rules.clear();
        guard.build_calls.clear();
        guard.fetch_calls.clear();
    }
}

/// A fetcher that defers its behavior to an external controller.
///
/// Unscripted calls go to the delegate when one is configured. Without a
/// delegate, `build_payload` succeeds and `interest_over_time` fails with
/// `Unsupported`.
pub struct DynamicMockFetcher {
    name: &'static str,
    delegate: Option<Arc<dyn TrendFetcher>>,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockFetcher {
    /// Create a new dynamic mock fetcher and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn TrendFetcher>, DynamicMockController) {
        Self::build(name, None)
    }

    /// Create a dynamic mock that passes unscripted calls to `delegate`.
    #[must_use]
    pub fn wrapping(
        name: &'static str,
        delegate: Arc<dyn TrendFetcher>,
    ) -> (Arc<dyn TrendFetcher>, DynamicMockController) {
        Self::build(name, Some(delegate))
    }

    fn build(
        name: &'static str,
        delegate: Option<Arc<dyn TrendFetcher>>,
    ) -> (Arc<dyn TrendFetcher>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self {
            name,
            delegate,
            state,
        });
        (me as Arc<dyn TrendFetcher>, controller)
    }
}

async fn hang<T>() -> T {
    std::future::pending::<T>().await
}

#[async_trait]
impl TrendFetcher for DynamicMockFetcher {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "DynamicMock"
    }

    async fn build_payload(
        &self,
        query: &TrendQuery,
        timeframe: &Timeframe,
    ) -> Result<Payload, StitchError> {
        // Acquire behavior without holding the lock across await points
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.build_calls.push(*timeframe);
            guard.build_script.pop_front()
        };

        match behavior {
            Some(MockBehavior::Return(())) => Ok(Payload::new(query.clone(), *timeframe)),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => hang().await,
            None => match &self.delegate {
                Some(d) => d.build_payload(query, timeframe).await,
                None => Ok(Payload::new(query.clone(), *timeframe)),
            },
        }
    }

    async fn interest_over_time(&self, payload: &Payload) -> Result<FetchOutcome, StitchError> {
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.fetch_calls.push(payload.timeframe);
            match guard.timeframe_rules.get(&payload.timeframe).cloned() {
                Some(rule) => Some(rule),
                None => guard.fetch_script.pop_front(),
            }
        };

        match behavior {
            Some(MockBehavior::Return(outcome)) => Ok(outcome),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => hang().await,
            None => match &self.delegate {
                Some(d) => d.interest_over_time(payload).await,
                None => Err(StitchError::unsupported("interest_over_time")),
            },
        }
    }
}
