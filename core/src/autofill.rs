//! Draft auto-fill orchestration.
//!
//! Owns the meal draft during an editing session and runs the two research
//! tracks: photo analysis (OCR and classification joined) and the debounced
//! name lookup. Field writes respect the manual-edit flags, so the user
//! always wins over the pipeline.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::classify;
use crate::error::PipelineError;
use crate::label;
use crate::models::{DetectionResult, EstimateSource, MealDraft, NutritionEstimate};
use crate::researcher::NutritionResearcher;
use crate::vision::{ImageClassifier, TextRecognizer};

/// Status lines shown under the draft fields.
pub const STATUS_LABEL_APPLIED: &str = "Pulled from nutrition label";
pub const STATUS_LOCAL_ESTIMATE: &str = "Local estimate";
pub const STATUS_DATABASE_ESTIMATE: &str = "Food database estimate";
pub const STATUS_NO_MATCH: &str = "Couldn't find strong nutrition data yet";
pub const STATUS_LOOKUP_FAILED: &str = "Nutrition lookup failed";
pub const STATUS_UNIDENTIFIED: &str = "Could not identify";

/// Shortest trimmed name worth researching.
const MIN_QUERY_CHARS: usize = 3;

/// Controller tuning. The default debounce matches the app's name field.
#[derive(Debug, Clone, Copy)]
pub struct AutoFillConfig {
    pub debounce: Duration,
}

impl Default for AutoFillConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(450),
        }
    }
}

/// Orchestrates auto-fill for one meal draft at a time.
///
/// Cheap to clone; all clones share the same draft session. Collaborators
/// are injected at construction, so tests run with mocks and a short
/// debounce.
#[derive(Clone)]
pub struct AutoFillController {
    inner: Arc<Inner>,
}

struct Inner {
    researcher: NutritionResearcher,
    recognizer: Arc<dyn TextRecognizer>,
    classifier: Arc<dyn ImageClassifier>,
    config: AutoFillConfig,
    state: Mutex<SessionState>,
    pending: Mutex<Option<JoinHandle<()>>>,
    /// Bumped on every name edit; a lookup result only applies while the
    /// generation it captured is still current.
    generation: AtomicU64,
    /// Bumped on `begin_session`; nothing from an older session may land.
    session: AtomicU64,
    draft_tx: watch::Sender<MealDraft>,
    _draft_rx: watch::Receiver<MealDraft>,
}

impl Inner {
    fn publish(&self, state: &SessionState) {
        let _ = self.draft_tx.send(state.draft.clone());
    }
}

#[derive(Default)]
struct SessionState {
    draft: MealDraft,
    calories_edited: bool,
    protein_edited: bool,
    applying_autofill: bool,
}

impl SessionState {
    fn set_name_text(&mut self, text: &str) {
        self.draft.name = text.to_string();
    }

    fn set_calories_text(&mut self, text: &str) {
        self.draft.calories = text.to_string();
        if !self.applying_autofill {
            self.calories_edited = true;
        }
    }

    fn set_protein_text(&mut self, text: &str) {
        self.draft.protein = text.to_string();
        if !self.applying_autofill {
            self.protein_edited = true;
        }
    }
}

/// Marks the state as mid-auto-fill for as long as it lives, so field
/// setters skip manual-edit marking. Dropping it always restores normal
/// marking, whatever path the apply took.
struct AutofillScope<'a> {
    state: &'a mut SessionState,
}

impl<'a> AutofillScope<'a> {
    fn enter(state: &'a mut SessionState) -> Self {
        state.applying_autofill = true;
        Self { state }
    }
}

impl std::ops::Deref for AutofillScope<'_> {
    type Target = SessionState;

    fn deref(&self) -> &SessionState {
        self.state
    }
}

impl std::ops::DerefMut for AutofillScope<'_> {
    fn deref_mut(&mut self) -> &mut SessionState {
        self.state
    }
}

impl Drop for AutofillScope<'_> {
    fn drop(&mut self) {
        self.state.applying_autofill = false;
    }
}

enum LeafOutcome<T> {
    Done(T),
    Failed,
    Cancelled,
}

impl AutoFillController {
    #[must_use]
    pub fn new(
        researcher: NutritionResearcher,
        recognizer: Arc<dyn TextRecognizer>,
        classifier: Arc<dyn ImageClassifier>,
        config: AutoFillConfig,
    ) -> Self {
        let (draft_tx, draft_rx) = watch::channel(MealDraft::default());
        Self {
            inner: Arc::new(Inner {
                researcher,
                recognizer,
                classifier,
                config,
                state: Mutex::new(SessionState::default()),
                pending: Mutex::new(None),
                generation: AtomicU64::new(0),
                session: AtomicU64::new(0),
                draft_tx,
                _draft_rx: draft_rx,
            }),
        }
    }

    /// Reset the draft for a fresh editing session. The pending lookup is
    /// cancelled, both manual-edit flags clear, and anything still running
    /// from the previous session can no longer touch the draft.
    pub async fn begin_session(&self) {
        self.inner.session.fetch_add(1, Ordering::SeqCst);
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.inner.pending.lock().await.take() {
            handle.abort();
        }
        let mut state = self.inner.state.lock().await;
        *state = SessionState::default();
        self.inner.publish(&state);
    }

    /// Record a user edit of the name field and restart the lookup track.
    pub async fn set_name(&self, text: &str) {
        {
            let mut state = self.inner.state.lock().await;
            state.set_name_text(text);
            self.inner.publish(&state);
        }
        self.schedule_lookup(text).await;
    }

    /// Record a user edit of the calories field. The field is theirs now;
    /// the pipeline will not overwrite it again this session.
    pub async fn set_calories(&self, text: &str) {
        let mut state = self.inner.state.lock().await;
        state.set_calories_text(text);
        self.inner.publish(&state);
    }

    /// Record a user edit of the protein field. Same ownership rule as
    /// calories, tracked independently.
    pub async fn set_protein(&self, text: &str) {
        let mut state = self.inner.state.lock().await;
        state.set_protein_text(text);
        self.inner.publish(&state);
    }

    /// Analyze a captured photo. OCR and classification run concurrently and
    /// both outcomes land on the draft in a single pass. Returns what was
    /// detected so the capture flow can react.
    pub async fn analyze_photo(&self, image: &[u8]) -> DetectionResult {
        let session = self.inner.session.load(Ordering::SeqCst);
        {
            let mut state = self.inner.state.lock().await;
            state.draft.detection_status = None;
            self.inner.publish(&state);
        }

        let ocr = async {
            match self.inner.recognizer.recognize_text(image).await {
                Ok(lines) => LeafOutcome::Done(lines),
                Err(PipelineError::Cancelled) => LeafOutcome::Cancelled,
                Err(error) => {
                    warn!(%error, "text recognition failed");
                    LeafOutcome::Failed
                }
            }
        };
        let vision = async {
            match self.inner.classifier.classify(image).await {
                Ok(candidates) => LeafOutcome::Done(candidates),
                Err(PipelineError::Cancelled) => LeafOutcome::Cancelled,
                Err(error) => {
                    warn!(%error, "classification failed");
                    LeafOutcome::Failed
                }
            }
        };
        let (text, candidates) = tokio::join!(ocr, vision);

        if matches!(text, LeafOutcome::Cancelled) || matches!(candidates, LeafOutcome::Cancelled) {
            return DetectionResult::default();
        }

        let label_estimate = match &text {
            LeafOutcome::Done(lines) => label::extract(&lines.join("\n")),
            _ => None,
        };
        let food_label = match &candidates {
            LeafOutcome::Done(ranked) => classify::pick_food_label(ranked),
            _ => None,
        };
        let detection = DetectionResult {
            food_label,
            label_estimate,
        };

        let mut state = self.inner.state.lock().await;
        if self.inner.session.load(Ordering::SeqCst) != session {
            return detection;
        }
        apply_detection(&mut state, &detection);
        self.inner.publish(&state);
        detection
    }

    /// Current draft contents.
    #[must_use]
    pub fn draft(&self) -> MealDraft {
        self.inner.draft_tx.subscribe().borrow().clone()
    }

    /// Watch the draft as it changes.
    #[must_use]
    pub fn draft_stream(&self) -> watch::Receiver<MealDraft> {
        self.inner.draft_tx.subscribe()
    }

    async fn schedule_lookup(&self, raw: &str) {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(handle) = self.inner.pending.lock().await.take() {
            handle.abort();
        }

        {
            let mut state = self.inner.state.lock().await;
            state.draft.lookup_status = None;
            self.inner.publish(&state);
        }

        let query = raw.trim().to_lowercase();
        if query.chars().count() < MIN_QUERY_CHARS {
            return;
        }

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(inner.config.debounce).await;
            if inner.generation.load(Ordering::SeqCst) != generation {
                debug!(query = %query, "lookup superseded before firing");
                return;
            }
            let outcome = inner.researcher.lookup(&query).await;
            let mut state = inner.state.lock().await;
            if inner.generation.load(Ordering::SeqCst) != generation {
                debug!(query = %query, "lookup superseded while in flight");
                return;
            }
            apply_lookup_outcome(&mut state, outcome);
            inner.publish(&state);
        });
        *self.inner.pending.lock().await = Some(handle);
    }
}

fn apply_lookup_outcome(
    state: &mut SessionState,
    outcome: Result<Option<NutritionEstimate>, PipelineError>,
) {
    match outcome {
        Ok(Some(estimate)) => {
            apply_estimate(state, &estimate);
            let status = match estimate.source {
                EstimateSource::Preset => STATUS_LOCAL_ESTIMATE,
                EstimateSource::Database => STATUS_DATABASE_ESTIMATE,
                EstimateSource::Label => STATUS_LABEL_APPLIED,
            };
            state.draft.lookup_status = Some(status.to_string());
        }
        Ok(None) => {
            state.draft.lookup_status = Some(STATUS_NO_MATCH.to_string());
        }
        Err(PipelineError::Cancelled) => {}
        Err(error) => {
            warn!(%error, "name lookup failed");
            state.draft.lookup_status = Some(STATUS_LOOKUP_FAILED.to_string());
        }
    }
}

fn apply_detection(state: &mut SessionState, detection: &DetectionResult) {
    if let Some(estimate) = &detection.label_estimate {
        apply_estimate(state, estimate);
        state.draft.detection_status = Some(STATUS_LABEL_APPLIED.to_string());
    }
    if let Some(raw) = &detection.food_label {
        let pretty = classify::prettify_label(raw);
        state.draft.detection_status = Some(format!("Detected: {pretty}"));
        if state.draft.name.is_empty() {
            state.draft.name = pretty;
        }
    }
    if detection.label_estimate.is_none() && detection.food_label.is_none() {
        state.draft.detection_status = Some(STATUS_UNIDENTIFIED.to_string());
    }
}

/// Write an estimate into whichever numeric fields the user has not claimed.
fn apply_estimate(state: &mut SessionState, estimate: &NutritionEstimate) {
    let mut scope = AutofillScope::enter(state);
    if !scope.calories_edited {
        let text = estimate.calories.to_string();
        scope.set_calories_text(&text);
    }
    if !scope.protein_edited {
        let text = estimate.protein.to_string();
        scope.set_protein_text(&text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;

    use crate::openfoodfacts::{Nutriments, ProductData};
    use crate::researcher::FoodDatabase;
    use crate::vision::Classification;

    struct MockDatabase {
        products: Vec<ProductData>,
        queries: std::sync::Mutex<Vec<String>>,
        calls: AtomicUsize,
        delay: Duration,
        fail: bool,
    }

    impl MockDatabase {
        fn empty() -> Arc<Self> {
            Arc::new(Self {
                products: Vec::new(),
                queries: std::sync::Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
                delay: Duration::ZERO,
                fail: false,
            })
        }

        fn slow(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                products: Vec::new(),
                queries: std::sync::Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
                delay,
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                products: Vec::new(),
                queries: std::sync::Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
                delay: Duration::ZERO,
                fail: true,
            })
        }

        fn with_product(energy: f64, protein: f64) -> Arc<Self> {
            Arc::new(Self {
                products: vec![ProductData {
                    product_name: Some("remote hit".to_string()),
                    nutriments: Some(Nutriments {
                        energy_kcal_100g: Some(energy),
                        proteins_100g: Some(protein),
                    }),
                }],
                queries: std::sync::Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
                delay: Duration::ZERO,
                fail: false,
            })
        }
    }

    #[async_trait]
    impl FoodDatabase for MockDatabase {
        async fn search(
            &self,
            query: &str,
            _limit: usize,
        ) -> Result<Vec<ProductData>, PipelineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(query.to_string());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail {
                return Err(PipelineError::Network("connection reset".to_string()));
            }
            Ok(self.products.clone())
        }
    }

    enum MockFailure {
        None,
        Decode,
        Cancelled,
    }

    struct MockRecognizer {
        lines: Vec<String>,
        failure: MockFailure,
    }

    impl MockRecognizer {
        fn lines(lines: &[&str]) -> Self {
            Self {
                lines: lines.iter().map(ToString::to_string).collect(),
                failure: MockFailure::None,
            }
        }

        fn silent() -> Self {
            Self::lines(&[])
        }

        fn decode_error() -> Self {
            Self {
                lines: Vec::new(),
                failure: MockFailure::Decode,
            }
        }

        fn cancelled() -> Self {
            Self {
                lines: Vec::new(),
                failure: MockFailure::Cancelled,
            }
        }
    }

    #[async_trait]
    impl TextRecognizer for MockRecognizer {
        async fn recognize_text(&self, _image: &[u8]) -> Result<Vec<String>, PipelineError> {
            match self.failure {
                MockFailure::None => Ok(self.lines.clone()),
                MockFailure::Decode => {
                    Err(PipelineError::ImageDecoding("unreadable bytes".to_string()))
                }
                MockFailure::Cancelled => Err(PipelineError::Cancelled),
            }
        }
    }

    struct MockClassifier {
        candidates: Vec<Classification>,
        failure: MockFailure,
    }

    impl MockClassifier {
        fn candidates(pairs: &[(&str, f32)]) -> Self {
            Self {
                candidates: pairs
                    .iter()
                    .map(|(label, confidence)| Classification {
                        label: (*label).to_string(),
                        confidence: *confidence,
                    })
                    .collect(),
                failure: MockFailure::None,
            }
        }

        fn blank() -> Self {
            Self::candidates(&[])
        }

        fn decode_error() -> Self {
            Self {
                candidates: Vec::new(),
                failure: MockFailure::Decode,
            }
        }
    }

    #[async_trait]
    impl ImageClassifier for MockClassifier {
        async fn classify(&self, _image: &[u8]) -> Result<Vec<Classification>, PipelineError> {
            match self.failure {
                MockFailure::None => Ok(self.candidates.clone()),
                MockFailure::Decode => {
                    Err(PipelineError::ImageDecoding("unreadable bytes".to_string()))
                }
                MockFailure::Cancelled => Err(PipelineError::Cancelled),
            }
        }
    }

    /// Classifier that replays scripted (delay, candidates) responses in
    /// call order.
    struct ScriptedClassifier {
        script: std::sync::Mutex<VecDeque<(Duration, Vec<Classification>)>>,
    }

    impl ScriptedClassifier {
        fn new(script: Vec<(Duration, Vec<Classification>)>) -> Self {
            Self {
                script: std::sync::Mutex::new(script.into()),
            }
        }
    }

    #[async_trait]
    impl ImageClassifier for ScriptedClassifier {
        async fn classify(&self, _image: &[u8]) -> Result<Vec<Classification>, PipelineError> {
            let (delay, candidates) = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .expect("script exhausted");
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            Ok(candidates)
        }
    }

    fn candidate(label: &str, confidence: f32) -> Classification {
        Classification {
            label: label.to_string(),
            confidence,
        }
    }

    fn controller(
        database: Arc<MockDatabase>,
        recognizer: MockRecognizer,
        classifier: impl ImageClassifier + 'static,
        debounce_ms: u64,
    ) -> AutoFillController {
        AutoFillController::new(
            NutritionResearcher::new(database),
            Arc::new(recognizer),
            Arc::new(classifier),
            AutoFillConfig {
                debounce: Duration::from_millis(debounce_ms),
            },
        )
    }

    async fn settle(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test]
    async fn test_debounced_lookup_applies_preset() {
        let database = MockDatabase::empty();
        let ctl = controller(
            database.clone(),
            MockRecognizer::silent(),
            MockClassifier::blank(),
            25,
        );

        ctl.set_name("chicken bowl").await;
        settle(250).await;

        let draft = ctl.draft();
        assert_eq!(draft.calories, "520");
        assert_eq!(draft.protein, "36");
        assert_eq!(draft.lookup_status.as_deref(), Some(STATUS_LOCAL_ESTIMATE));
        assert_eq!(database.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_remote_estimate_applies_with_database_status() {
        let database = MockDatabase::with_product(200.0, 10.0);
        let ctl = controller(
            database.clone(),
            MockRecognizer::silent(),
            MockClassifier::blank(),
            25,
        );

        ctl.set_name("mystery stew").await;
        settle(250).await;

        let draft = ctl.draft();
        assert_eq!(draft.calories, "440");
        assert_eq!(draft.protein, "22");
        assert_eq!(
            draft.lookup_status.as_deref(),
            Some(STATUS_DATABASE_ESTIMATE)
        );
    }

    #[tokio::test]
    async fn test_short_query_never_starts_a_lookup() {
        let database = MockDatabase::empty();
        let ctl = controller(
            database.clone(),
            MockRecognizer::silent(),
            MockClassifier::blank(),
            25,
        );

        ctl.set_name("ab").await;
        settle(150).await;

        let draft = ctl.draft();
        assert_eq!(draft.name, "ab");
        assert!(draft.lookup_status.is_none());
        assert!(draft.calories.is_empty());
        assert_eq!(database.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_short_query_clears_previous_status() {
        let ctl = controller(
            MockDatabase::empty(),
            MockRecognizer::silent(),
            MockClassifier::blank(),
            25,
        );

        ctl.set_name("chicken bowl").await;
        settle(250).await;
        assert!(ctl.draft().lookup_status.is_some());

        ctl.set_name("ch").await;
        assert!(ctl.draft().lookup_status.is_none());
    }

    #[tokio::test]
    async fn test_rapid_edits_only_final_query_runs() {
        let database = MockDatabase::empty();
        let ctl = controller(
            database.clone(),
            MockRecognizer::silent(),
            MockClassifier::blank(),
            120,
        );

        ctl.set_name("mystery stew o").await;
        ctl.set_name("mystery stew on").await;
        ctl.set_name("mystery stew one").await;
        settle(600).await;

        assert_eq!(database.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            *database.queries.lock().unwrap(),
            vec!["mystery stew one".to_string()]
        );
        assert_eq!(ctl.draft().lookup_status.as_deref(), Some(STATUS_NO_MATCH));
    }

    #[tokio::test]
    async fn test_typing_burst_applies_only_final_name() {
        let database = MockDatabase::empty();
        let ctl = controller(
            database.clone(),
            MockRecognizer::silent(),
            MockClassifier::blank(),
            25,
        );

        // The short prefixes never even schedule; the full name resolves as
        // a preset without a network call.
        ctl.set_name("c").await;
        ctl.set_name("ch").await;
        ctl.set_name("chicken bowl").await;
        settle(250).await;

        let draft = ctl.draft();
        assert_eq!(draft.calories, "520");
        assert_eq!(draft.protein, "36");
        assert_eq!(database.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_superseded_lookup_never_applies() {
        let database = MockDatabase::slow(Duration::from_millis(150));
        let ctl = controller(
            database.clone(),
            MockRecognizer::silent(),
            MockClassifier::blank(),
            25,
        );

        // First lookup fires and sits inside the slow remote call when the
        // second edit arrives.
        ctl.set_name("mystery stew").await;
        settle(60).await;
        ctl.set_name("chicken bowl").await;
        settle(400).await;

        let draft = ctl.draft();
        assert_eq!(draft.calories, "520");
        assert_eq!(draft.lookup_status.as_deref(), Some(STATUS_LOCAL_ESTIMATE));
    }

    #[tokio::test]
    async fn test_lookup_failure_surfaces_as_status_only() {
        let ctl = controller(
            MockDatabase::failing(),
            MockRecognizer::silent(),
            MockClassifier::blank(),
            25,
        );

        ctl.set_name("mystery stew").await;
        settle(250).await;

        let draft = ctl.draft();
        assert_eq!(draft.lookup_status.as_deref(), Some(STATUS_LOOKUP_FAILED));
        assert!(draft.calories.is_empty());
        assert!(draft.protein.is_empty());
    }

    #[tokio::test]
    async fn test_manual_edit_is_never_overwritten() {
        let ctl = controller(
            MockDatabase::empty(),
            MockRecognizer::lines(&["Calories: 999", "Protein: 99g"]),
            MockClassifier::blank(),
            25,
        );

        ctl.set_calories("800").await;
        ctl.set_name("chicken bowl").await;
        settle(250).await;

        // Protein was untouched by hand, so the preset fills it; calories
        // stay manual.
        let draft = ctl.draft();
        assert_eq!(draft.calories, "800");
        assert_eq!(draft.protein, "36");

        // A later photo with a label cannot reclaim the field either.
        ctl.analyze_photo(b"img").await;
        let draft = ctl.draft();
        assert_eq!(draft.calories, "800");
        assert_eq!(draft.protein, "99");
    }

    #[tokio::test]
    async fn test_autofill_writes_do_not_claim_fields() {
        let ctl = controller(
            MockDatabase::empty(),
            MockRecognizer::silent(),
            MockClassifier::blank(),
            25,
        );

        ctl.set_name("chicken bowl").await;
        settle(250).await;
        assert_eq!(ctl.draft().calories, "520");

        // The pipeline wrote those numbers, so a newer result may replace
        // them.
        ctl.set_name("burrito").await;
        settle(250).await;

        let draft = ctl.draft();
        assert_eq!(draft.calories, "650");
        assert_eq!(draft.protein, "28");
    }

    #[tokio::test]
    async fn test_photo_applies_label_and_name_in_one_pass() {
        let ctl = controller(
            MockDatabase::empty(),
            MockRecognizer::lines(&["Calories: 250", "Protein: 12g"]),
            MockClassifier::candidates(&[("chicken_curry, plated food", 0.82)]),
            25,
        );

        let detection = ctl.analyze_photo(b"img").await;
        assert_eq!(detection.food_label.as_deref(), Some("chicken_curry, plated food"));
        let estimate = detection.label_estimate.unwrap();
        assert_eq!(estimate.calories, 250);
        assert_eq!(estimate.protein, 12);
        assert_eq!(estimate.source, EstimateSource::Label);

        let draft = ctl.draft();
        assert_eq!(draft.calories, "250");
        assert_eq!(draft.protein, "12");
        assert_eq!(draft.name, "Chicken Curry");
        assert_eq!(
            draft.detection_status.as_deref(),
            Some("Detected: Chicken Curry")
        );
    }

    #[tokio::test]
    async fn test_photo_keeps_existing_name() {
        let ctl = controller(
            MockDatabase::empty(),
            MockRecognizer::silent(),
            MockClassifier::candidates(&[("pizza", 0.9)]),
            25,
        );

        ctl.set_name("My Lunch").await;
        ctl.analyze_photo(b"img").await;

        let draft = ctl.draft();
        assert_eq!(draft.name, "My Lunch");
        assert_eq!(draft.detection_status.as_deref(), Some("Detected: Pizza"));
    }

    #[tokio::test]
    async fn test_photo_with_nothing_recognizable() {
        let ctl = controller(
            MockDatabase::empty(),
            MockRecognizer::silent(),
            MockClassifier::blank(),
            25,
        );

        let detection = ctl.analyze_photo(b"img").await;
        assert_eq!(detection, DetectionResult::default());

        let draft = ctl.draft();
        assert_eq!(draft.detection_status.as_deref(), Some(STATUS_UNIDENTIFIED));
        assert!(draft.calories.is_empty());
    }

    #[tokio::test]
    async fn test_photo_decode_errors_are_swallowed() {
        let ctl = controller(
            MockDatabase::empty(),
            MockRecognizer::decode_error(),
            MockClassifier::decode_error(),
            25,
        );

        let detection = ctl.analyze_photo(b"not an image").await;
        assert_eq!(detection, DetectionResult::default());
        assert_eq!(
            ctl.draft().detection_status.as_deref(),
            Some(STATUS_UNIDENTIFIED)
        );
    }

    #[tokio::test]
    async fn test_cancelled_capture_reports_nothing() {
        let ctl = controller(
            MockDatabase::empty(),
            MockRecognizer::cancelled(),
            MockClassifier::candidates(&[("pizza", 0.9)]),
            25,
        );

        let detection = ctl.analyze_photo(b"img").await;
        assert_eq!(detection, DetectionResult::default());
        assert!(ctl.draft().detection_status.is_none());
        assert!(ctl.draft().name.is_empty());
    }

    #[tokio::test]
    async fn test_begin_session_resets_draft_and_flags() {
        let ctl = controller(
            MockDatabase::empty(),
            MockRecognizer::silent(),
            MockClassifier::blank(),
            25,
        );

        ctl.set_calories("900").await;
        ctl.set_name("chicken bowl").await;
        settle(250).await;
        assert_eq!(ctl.draft().calories, "900");

        ctl.begin_session().await;
        assert_eq!(ctl.draft(), MealDraft::default());

        // Calories are writable again in the new session.
        ctl.set_name("chicken bowl").await;
        settle(250).await;
        assert_eq!(ctl.draft().calories, "520");
    }

    #[tokio::test]
    async fn test_stale_photo_from_earlier_capture_still_lands() {
        // Two captures race: the first classifies slowly, the second wins
        // the draft first. The late first result still applies, which is the
        // accepted behavior for photo joins (they are not cancellable).
        let classifier = ScriptedClassifier::new(vec![
            (
                Duration::from_millis(120),
                vec![candidate("chicken_curry", 0.9)],
            ),
            (Duration::ZERO, vec![candidate("pizza", 0.9)]),
        ]);
        let ctl = controller(
            MockDatabase::empty(),
            MockRecognizer::silent(),
            classifier,
            25,
        );

        let slow = {
            let ctl = ctl.clone();
            tokio::spawn(async move { ctl.analyze_photo(b"first").await })
        };
        settle(30).await;
        ctl.analyze_photo(b"second").await;
        assert_eq!(ctl.draft().name, "Pizza");

        slow.await.unwrap();
        let draft = ctl.draft();
        // Name was already taken, but the stale status overwrote the new one.
        assert_eq!(draft.name, "Pizza");
        assert_eq!(
            draft.detection_status.as_deref(),
            Some("Detected: Chicken Curry")
        );
    }

    #[tokio::test]
    async fn test_previous_session_photo_cannot_apply() {
        let classifier = ScriptedClassifier::new(vec![(
            Duration::from_millis(120),
            vec![candidate("pizza", 0.9)],
        )]);
        let ctl = controller(
            MockDatabase::empty(),
            MockRecognizer::silent(),
            classifier,
            25,
        );

        let slow = {
            let ctl = ctl.clone();
            tokio::spawn(async move { ctl.analyze_photo(b"img").await })
        };
        settle(30).await;
        ctl.begin_session().await;
        slow.await.unwrap();

        let draft = ctl.draft();
        assert!(draft.name.is_empty());
        assert!(draft.detection_status.is_none());
    }

    #[tokio::test]
    async fn test_draft_stream_observes_changes() {
        let ctl = controller(
            MockDatabase::empty(),
            MockRecognizer::silent(),
            MockClassifier::blank(),
            25,
        );

        let mut stream = ctl.draft_stream();
        ctl.set_calories("320").await;
        stream.changed().await.unwrap();
        assert_eq!(stream.borrow().calories, "320");
    }
}
