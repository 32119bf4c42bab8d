// 🧭 Waste Session - Explicit per-session context
//
// Owns the store, the identification stub, the "currently identified" pointer
// and the notification sink. Created once per session and torn down with
// `close()`; nothing here lives in process-wide globals.

use crate::catalog::{Catalog, WasteType};
use crate::error::{WasteError, WasteResult};
use crate::evaluator::{DisposalOutcome, LimitEvaluator};
use crate::identify::{IdentificationStub, InputDescriptor};
use crate::store::WasteLogStore;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

// ============================================================================
// NOTIFICATIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Destructive,
}

/// User-facing advisory message (a toast in a graphical host)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn info(title: &str, description: impl Into<String>) -> Self {
        Notification {
            title: title.to_string(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    pub fn destructive(title: &str, description: impl Into<String>) -> Self {
        Notification {
            title: title.to_string(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }
}

/// Fire-and-forget notification sink
pub trait Notifier {
    fn notify(&self, notification: Notification);
}

/// Sends notifications to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, n: Notification) {
        match n.severity {
            Severity::Info => info!(title = %n.title, "{}", n.description),
            Severity::Destructive => warn!(title = %n.title, "{}", n.description),
        }
    }
}

/// Keeps every notification; clones share the same list
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    received: Arc<RwLock<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.received.read().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Notification> {
        self.received.read().ok()?.last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut received) = self.received.write() {
            received.push(notification);
        }
    }
}

// ============================================================================
// IDENTIFICATION TICKETS
// ============================================================================

/// Handle for one in-flight identification. Only the newest ticket of an
/// open session may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentificationTicket {
    generation: u64,
}

/// An identification running apart from the session.
///
/// Owns a forked stub, so the session stays free for other calls while this
/// resolves. Hand the result back through `WasteSession::complete_identification`.
pub struct PendingIdentification {
    ticket: IdentificationTicket,
    stub: IdentificationStub,
    descriptor: Option<InputDescriptor>,
    delay: Duration,
}

impl PendingIdentification {
    pub fn ticket(&self) -> IdentificationTicket {
        self.ticket
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Resolve immediately, skipping the delay
    pub fn resolve_now(mut self) -> (IdentificationTicket, WasteResult<WasteType>) {
        let result = self.stub.identify(self.descriptor.as_ref());
        (self.ticket, result)
    }

    /// Wait out the delay, then pick
    #[cfg(feature = "async")]
    pub async fn resolve(mut self) -> (IdentificationTicket, WasteResult<WasteType>) {
        let result = self.stub.identify_after(self.descriptor, self.delay).await;
        (self.ticket, result)
    }
}

// ============================================================================
// SESSION
// ============================================================================

pub struct WasteSession {
    id: Uuid,
    store: WasteLogStore,
    stub: IdentificationStub,
    notifier: Box<dyn Notifier>,
    identified: Option<WasteType>,
    generation: u64,
    open: bool,
}

impl WasteSession {
    pub fn new(store: WasteLogStore, stub: IdentificationStub, notifier: Box<dyn Notifier>) -> Self {
        let id = Uuid::new_v4();
        info!(session_id = %id, "session opened");

        WasteSession {
            id,
            store,
            stub,
            notifier,
            identified: None,
            generation: 0,
            open: true,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn catalog(&self) -> &Catalog {
        self.store.catalog()
    }

    pub fn store(&self) -> &WasteLogStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut WasteLogStore {
        &mut self.store
    }

    /// Swap the notification sink (the dashboard shows them in its status bar)
    pub fn set_notifier(&mut self, notifier: Box<dyn Notifier>) {
        self.notifier = notifier;
    }

    pub fn evaluator(&self) -> LimitEvaluator<'_> {
        LimitEvaluator::new(&self.store)
    }

    // ========================================================================
    // CURRENTLY IDENTIFIED
    // ========================================================================

    pub fn current_identified_waste(&self) -> Option<&WasteType> {
        self.identified.as_ref()
    }

    /// Replace (never merge) the current pointer; `None` clears it
    pub fn set_identified_waste(&mut self, waste: Option<WasteType>) {
        self.identified = waste;
    }

    // ========================================================================
    // IDENTIFICATION
    // ========================================================================

    /// Identify synchronously and adopt the result as currently identified
    pub fn identify(&mut self, descriptor: Option<&InputDescriptor>) -> Option<WasteType> {
        let ticket = self.begin_identification();
        let result = self.stub.identify(descriptor);
        self.complete_identification(ticket, result)
    }

    /// Start an identification; any earlier outstanding ticket becomes stale
    pub fn begin_identification(&mut self) -> IdentificationTicket {
        self.generation += 1;
        IdentificationTicket { generation: self.generation }
    }

    /// Drop interest in whatever identification is in flight
    pub fn abandon_identification(&mut self) {
        self.generation += 1;
    }

    /// Apply a finished identification if its ticket is still current.
    ///
    /// Stale or post-close results are ignored entirely: no state change and
    /// no notification. Returns the adopted waste on success.
    pub fn complete_identification(
        &mut self,
        ticket: IdentificationTicket,
        result: WasteResult<WasteType>,
    ) -> Option<WasteType> {
        if !self.open || ticket.generation != self.generation {
            info!(session_id = %self.id, "ignoring stale identification result");
            return None;
        }

        match result {
            Ok(waste) => {
                self.notifier.notify(Notification::info(
                    "Waste Identified",
                    format!("Item identified as {}", waste.name),
                ));
                self.identified = Some(waste.clone());
                Some(waste)
            }
            Err(e) => {
                warn!(error = %e, "identification failed");
                self.notifier.notify(Notification::destructive(
                    "Identification Failed",
                    "Could not identify the waste item. Please try again.",
                ));
                None
            }
        }
    }

    /// Begin an identification that resolves off the session after `delay`.
    /// Anything started earlier becomes stale.
    pub fn start_identification(
        &mut self,
        descriptor: Option<InputDescriptor>,
        delay: Duration,
    ) -> PendingIdentification {
        PendingIdentification {
            ticket: self.begin_identification(),
            stub: self.stub.fork(),
            descriptor,
            delay,
        }
    }

    /// Select a catalog entry by id, as a search result click would
    pub fn select(&mut self, waste_id: &str) -> WasteResult<WasteType> {
        let waste = self
            .store
            .catalog()
            .lookup_by_id(waste_id)
            .cloned()
            .ok_or_else(|| WasteError::NotFound(waste_id.to_string()))?;
        self.abandon_identification();
        self.identified = Some(waste.clone());
        Ok(waste)
    }

    // ========================================================================
    // DISPOSAL
    // ========================================================================

    /// Record `quantity` units and tell the user whether the category went over its limit
    pub fn record_disposal(&mut self, waste: &WasteType, quantity: u32) -> WasteResult<DisposalOutcome> {
        if let Err(e) = self.store.record_disposal(&waste.id, quantity) {
            self.notifier.notify(Notification::destructive(
                "Recording Failed",
                format!("Could not record {}: {}", waste.name, e),
            ));
            return Err(e);
        }

        let outcome = self.evaluator().outcome_for(waste.category);
        let notification = if outcome.is_over_limit {
            Notification::destructive(
                "Disposal Limit Exceeded",
                format!("You've exceeded your daily limit for {} waste!", waste.category),
            )
        } else {
            Notification::info(
                "Waste Recorded",
                format!("{} {} added to your disposal log", quantity, waste.name),
            )
        };
        self.notifier.notify(notification);

        Ok(outcome)
    }

    /// Record against the currently identified waste
    pub fn record_identified(&mut self, quantity: u32) -> WasteResult<DisposalOutcome> {
        let waste = self
            .identified
            .clone()
            .ok_or_else(|| WasteError::InvalidInput("no waste item identified".to_string()))?;
        self.record_disposal(&waste, quantity)
    }

    /// End the session. Outstanding identifications can no longer apply.
    pub fn close(&mut self) {
        self.open = false;
        self.generation += 1;
        self.identified = None;
        info!(session_id = %self.id, "session closed");
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use crate::clock::FixedClock;
    use crate::storage::{MemoryStorage, StoragePort};
    use chrono::{TimeZone, Utc};

    fn session_with(storage: Box<dyn StoragePort>) -> (WasteSession, RecordingNotifier) {
        let catalog = Arc::new(Catalog::builtin());
        let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2026, 5, 20, 12, 0, 0).unwrap()));
        let store = WasteLogStore::load_with_clock(catalog.clone(), storage, clock);
        let stub = IdentificationStub::with_seed(catalog, 11);
        let notifier = RecordingNotifier::new();
        (WasteSession::new(store, stub, Box::new(notifier.clone())), notifier)
    }

    fn session() -> (WasteSession, RecordingNotifier) {
        session_with(Box::new(MemoryStorage::new()))
    }

    struct ReadOnlyStorage;

    impl StoragePort for ReadOnlyStorage {
        fn read(&self, _key: &str) -> anyhow::Result<Option<String>> {
            Ok(None)
        }

        fn write(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
            anyhow::bail!("read-only filesystem")
        }
    }

    #[test]
    fn test_identify_adopts_result_and_notifies() {
        let (mut session, notifier) = session();
        let descriptor = InputDescriptor::new(Some("newspaper-stack.jpg"), Some(10));

        let waste = session.identify(Some(&descriptor)).unwrap();
        assert_eq!(waste.id, "newspaper");
        assert_eq!(session.current_identified_waste().map(|w| w.id.as_str()), Some("newspaper"));

        let last = notifier.last().unwrap();
        assert_eq!(last.title, "Waste Identified");
        assert_eq!(last.description, "Item identified as Newspaper");
    }

    #[test]
    fn test_identify_failure_notifies_and_keeps_previous() {
        let (mut session, notifier) = session();
        session.select("batteries").unwrap();

        assert!(session.identify(None).is_none());
        assert_eq!(session.current_identified_waste().unwrap().id, "batteries");
        assert_eq!(notifier.last().unwrap().severity, Severity::Destructive);
    }

    #[test]
    fn test_stale_identification_is_ignored() {
        let (mut session, notifier) = session();
        let catalog = Catalog::builtin();

        let first = session.begin_identification();
        let second = session.begin_identification();

        let glass = catalog.lookup_by_id("glass-bottle").cloned().unwrap();
        let metal = catalog.lookup_by_id("aluminum-can").cloned().unwrap();

        // Older request resolves late
        assert!(session.complete_identification(first, Ok(glass)).is_none());
        assert!(session.current_identified_waste().is_none());
        assert!(notifier.all().is_empty());

        assert!(session.complete_identification(second, Ok(metal)).is_some());
        assert_eq!(session.current_identified_waste().unwrap().id, "aluminum-can");
    }

    #[test]
    fn test_abandon_and_close_invalidate_tickets() {
        let (mut session, _) = session();
        let waste = Catalog::builtin().lookup_by_id("newspaper").cloned().unwrap();

        let ticket = session.begin_identification();
        session.abandon_identification();
        assert!(session.complete_identification(ticket, Ok(waste.clone())).is_none());

        let ticket = session.begin_identification();
        session.close();
        assert!(!session.is_open());
        assert!(session.complete_identification(ticket, Ok(waste)).is_none());
        assert!(session.current_identified_waste().is_none());
    }

    #[test]
    fn test_set_identified_replaces_and_clears() {
        let (mut session, _) = session();
        let catalog = Catalog::builtin();

        session.set_identified_waste(catalog.lookup_by_id("batteries").cloned());
        session.set_identified_waste(catalog.lookup_by_id("newspaper").cloned());
        assert_eq!(session.current_identified_waste().unwrap().id, "newspaper");

        session.set_identified_waste(None);
        assert!(session.current_identified_waste().is_none());
    }

    #[test]
    fn test_select_unknown_id() {
        let (mut session, _) = session();
        assert!(matches!(session.select("nope"), Err(WasteError::NotFound(_))));
    }

    #[test]
    fn test_record_disposal_notifications() {
        let (mut session, notifier) = session();
        let bottle = session.select("plastic-bottle").unwrap();

        let outcome = session.record_disposal(&bottle, 2).unwrap();
        assert!(!outcome.is_over_limit);
        assert_eq!(outcome.current_count, 2);
        assert_eq!(notifier.last().unwrap().title, "Waste Recorded");
        assert_eq!(notifier.last().unwrap().description, "2 Plastic Bottle added to your disposal log");

        let outcome = session.record_identified(2).unwrap();
        assert!(outcome.success);
        assert!(outcome.is_over_limit);
        assert_eq!(outcome.current_count, 4);

        let last = notifier.last().unwrap();
        assert_eq!(last.title, "Disposal Limit Exceeded");
        assert_eq!(last.description, "You've exceeded your daily limit for plastic waste!");

        assert_eq!(session.evaluator().stat_for(Category::Plastic).over_by, 1);
    }

    #[test]
    fn test_record_identified_requires_selection() {
        let (mut session, _) = session();
        assert!(matches!(session.record_identified(1), Err(WasteError::InvalidInput(_))));
    }

    #[test]
    fn test_record_zero_quantity_notifies_failure() {
        let (mut session, notifier) = session();
        let can = session.select("aluminum-can").unwrap();

        assert!(session.record_disposal(&can, 0).is_err());
        assert_eq!(notifier.last().unwrap().title, "Recording Failed");
        assert!(session.store().entries().is_empty());
    }

    #[test]
    fn test_storage_failure_notifies_and_keeps_count() {
        let (mut session, notifier) = session_with(Box::new(ReadOnlyStorage));
        let batteries = session.select("batteries").unwrap();

        let err = session.record_disposal(&batteries, 2).unwrap_err();
        assert!(matches!(err, WasteError::Storage(_)));

        let last = notifier.last().unwrap();
        assert_eq!(last.title, "Recording Failed");
        assert_eq!(last.severity, Severity::Destructive);
        assert_eq!(session.store().entry("batteries").unwrap().count, 2);
    }

    #[test]
    fn test_pending_identification_leaves_session_usable() {
        let (mut session, notifier) = session();
        let pending = session.start_identification(
            Some(InputDescriptor::new(Some("newspaper-stack.jpg"), None)),
            Duration::from_secs(60),
        );

        // Session is free while the identification is outstanding
        let can = session.select("aluminum-can").unwrap();
        session.record_disposal(&can, 1).unwrap();

        // `select` superseded the pending ticket
        let (ticket, result) = pending.resolve_now();
        assert_eq!(result.unwrap().id, "newspaper");
        let before = notifier.all().len();
        let newspaper = Catalog::builtin().lookup_by_id("newspaper").cloned().unwrap();
        assert!(session.complete_identification(ticket, Ok(newspaper)).is_none());
        assert_eq!(notifier.all().len(), before);
        assert_eq!(session.current_identified_waste().unwrap().id, "aluminum-can");
    }

    #[test]
    fn test_pending_identification_applies_when_current() {
        let (mut session, notifier) = session();
        let pending = session.start_identification(
            Some(InputDescriptor::new(Some("used-battery.png"), None)),
            Duration::ZERO,
        );

        let (ticket, result) = pending.resolve_now();
        let waste = session.complete_identification(ticket, result).unwrap();
        assert_eq!(waste.id, "batteries");
        assert_eq!(notifier.last().unwrap().title, "Waste Identified");
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_delayed_identification_resolves_off_session() {
        let (mut session, _) = session();
        let pending = session.start_identification(
            Some(InputDescriptor::new(Some("used-battery.png"), None)),
            Duration::from_millis(5),
        );

        let (ticket, result) = pending.resolve().await;
        let waste = session.complete_identification(ticket, result).unwrap();
        assert_eq!(waste.id, "batteries");
        assert_eq!(session.current_identified_waste().unwrap().id, "batteries");
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_abandoned_delayed_identification_is_dropped() {
        let (mut session, notifier) = session();
        let pending = session.start_identification(
            Some(InputDescriptor::new(Some("used-battery.png"), None)),
            Duration::from_millis(20),
        );
        let task = tokio::spawn(pending.resolve());

        // Other operations run while the identification sleeps
        let bottle = session.select("plastic-bottle").unwrap();
        session.record_disposal(&bottle, 1).unwrap();
        session.abandon_identification();
        let notified = notifier.all().len();

        let (ticket, result) = task.await.unwrap();
        assert!(result.is_ok());
        assert!(session.complete_identification(ticket, result).is_none());
        assert_eq!(notifier.all().len(), notified);
        assert_eq!(session.current_identified_waste().unwrap().id, "plastic-bottle");
        assert_eq!(session.store().entry("plastic-bottle").unwrap().count, 1);
    }
}
