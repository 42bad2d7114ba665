//! The authoritative event store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use boxoffice_core::{EventId, LedgerError, LedgerResult, Principal};

use crate::event::{CreateEvent, Event};
use crate::payout::PayoutGateway;

/// Event Registry: owns every event record and its fund accounting.
///
/// All mutations funnel through this store. Each mutating operation takes the
/// write lock for its full check-then-mutate sequence, so concurrent callers
/// observe serializable, all-or-nothing behavior: two purchases racing for
/// the last ticket cannot both reserve it, and a failed operation leaves the
/// record untouched. Reads take the read lock and only ever see committed
/// states.
pub struct EventRegistry {
    events: RwLock<HashMap<EventId, Event>>,
    payouts: Arc<dyn PayoutGateway>,
}

impl EventRegistry {
    pub fn new(payouts: Arc<dyn PayoutGateway>) -> Self {
        Self {
            events: RwLock::new(HashMap::new()),
            payouts,
        }
    }

    /// Rebuild a registry from previously captured records (snapshot restore).
    pub fn from_events(events: HashMap<EventId, Event>, payouts: Arc<dyn PayoutGateway>) -> Self {
        Self {
            events: RwLock::new(events),
            payouts,
        }
    }

    /// Clone out every record (snapshot capture).
    pub fn export_events(&self) -> HashMap<EventId, Event> {
        self.events.read().unwrap().clone()
    }

    /// Create an event, caller recorded as organizer.
    pub fn create_event(
        &self,
        organizer: Principal,
        params: CreateEvent,
        now: DateTime<Utc>,
    ) -> LedgerResult<EventId> {
        params.validate(now)?;

        let id = EventId::new();
        let event = params.into_event(id, organizer);

        self.events.write().unwrap().insert(id, event);
        tracing::info!(event_id = %id, organizer = %organizer, "event created");

        Ok(id)
    }

    pub fn get_event(&self, id: EventId) -> LedgerResult<Event> {
        self.events
            .read()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(LedgerError::NotFound)
    }

    /// Snapshot scan; no ordering guarantee.
    pub fn events_by_organizer(&self, organizer: Principal) -> Vec<Event> {
        self.events
            .read()
            .unwrap()
            .values()
            .filter(|e| e.organizer == organizer)
            .cloned()
            .collect()
    }

    /// Atomically reserve one ticket sale: whitelist check, availability
    /// check, increment `tickets_sold`, credit `funds_collected`. Returns the
    /// charged price. Whitelist rejection takes precedence over `SoldOut`.
    ///
    /// Internal: callers are the ticket ledger's purchase path.
    pub fn reserve_sale(&self, event_id: EventId, buyer: Principal) -> LedgerResult<u64> {
        let mut events = self.events.write().unwrap();
        let event = events.get_mut(&event_id).ok_or(LedgerError::NotFound)?;

        if !event.admits(buyer) {
            return Err(LedgerError::NotWhitelisted);
        }
        if event.tickets_sold >= event.total_tickets {
            return Err(LedgerError::SoldOut);
        }

        event.tickets_sold += 1;
        // Cannot overflow: price * total_tickets is bounded at creation.
        event.funds_collected += event.ticket_price;

        debug_assert!(event.tickets_sold <= event.total_tickets);

        Ok(event.ticket_price)
    }

    /// Withdraw collected funds to the organizer.
    ///
    /// Decrement-then-signal under the write lock: the balance debit is
    /// committed before the payout gateway is asked to release, and a gateway
    /// rejection re-credits the balance before the error surfaces. No
    /// intermediate state is observable.
    pub fn withdraw_funds(
        &self,
        event_id: EventId,
        amount_e8s: u64,
        caller: Principal,
    ) -> LedgerResult<()> {
        let mut events = self.events.write().unwrap();
        let event = events.get_mut(&event_id).ok_or(LedgerError::NotFound)?;

        if event.organizer != caller {
            return Err(LedgerError::Unauthorized);
        }
        if amount_e8s > event.funds_collected {
            return Err(LedgerError::InsufficientFunds {
                requested_e8s: amount_e8s,
                available_e8s: event.funds_collected,
            });
        }

        event.funds_collected -= amount_e8s;

        if let Err(e) = self.payouts.release(event_id, caller, amount_e8s) {
            event.funds_collected += amount_e8s;
            tracing::warn!(event_id = %event_id, amount_e8s, error = %e, "payout rejected, withdrawal rolled back");
            return Err(LedgerError::payout_failed(e.0));
        }

        tracing::info!(event_id = %event_id, organizer = %caller, amount_e8s, "funds withdrawn");

        Ok(())
    }
}

impl std::fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRegistry")
            .field("events", &self.events.read().unwrap().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use chrono::Duration;
    use proptest::prelude::*;

    use crate::payout::{PayoutError, RecordingPayouts};

    use super::*;

    /// Gateway that rejects every release.
    struct RejectingPayouts;

    impl PayoutGateway for RejectingPayouts {
        fn release(&self, _: EventId, _: Principal, _: u64) -> Result<(), PayoutError> {
            Err(PayoutError::new("ledger transfer declined"))
        }
    }

    fn params(price: u64, supply: u64) -> CreateEvent {
        CreateEvent {
            name: "RustConf".to_string(),
            location: "Portland".to_string(),
            date: Utc::now() + Duration::days(30),
            ticket_price: price,
            total_tickets: supply,
            max_resale_multiplier: None,
            whitelist: None,
        }
    }

    fn registry() -> EventRegistry {
        EventRegistry::new(RecordingPayouts::arc())
    }

    #[test]
    fn create_and_get() {
        let reg = registry();
        let organizer = Principal::new();
        let id = reg.create_event(organizer, params(100, 5), Utc::now()).unwrap();

        let event = reg.get_event(id).unwrap();
        assert_eq!(event.organizer, organizer);
        assert_eq!(event.tickets_sold, 0);
        assert_eq!(event.funds_collected, 0);
    }

    #[test]
    fn get_unknown_event_is_not_found() {
        assert_eq!(registry().get_event(EventId::new()), Err(LedgerError::NotFound));
    }

    #[test]
    fn events_by_organizer_filters() {
        let reg = registry();
        let a = Principal::new();
        let b = Principal::new();
        reg.create_event(a, params(100, 5), Utc::now()).unwrap();
        reg.create_event(a, params(200, 5), Utc::now()).unwrap();
        reg.create_event(b, params(300, 5), Utc::now()).unwrap();

        assert_eq!(reg.events_by_organizer(a).len(), 2);
        assert_eq!(reg.events_by_organizer(b).len(), 1);
        assert!(reg.events_by_organizer(Principal::new()).is_empty());
    }

    #[test]
    fn reserve_sale_charges_and_counts() {
        let reg = registry();
        let id = reg
            .create_event(Principal::new(), params(100, 2), Utc::now())
            .unwrap();

        assert_eq!(reg.reserve_sale(id, Principal::new()).unwrap(), 100);
        let event = reg.get_event(id).unwrap();
        assert_eq!(event.tickets_sold, 1);
        assert_eq!(event.funds_collected, 100);
    }

    #[test]
    fn sold_out_leaves_state_unchanged() {
        let reg = registry();
        let id = reg
            .create_event(Principal::new(), params(100, 1), Utc::now())
            .unwrap();

        reg.reserve_sale(id, Principal::new()).unwrap();
        assert_eq!(reg.reserve_sale(id, Principal::new()), Err(LedgerError::SoldOut));

        let event = reg.get_event(id).unwrap();
        assert_eq!(event.tickets_sold, 1);
        assert_eq!(event.funds_collected, 100);
    }

    #[test]
    fn whitelist_rejection_beats_sold_out() {
        let reg = registry();
        let listed = Principal::new();
        let unlisted = Principal::new();
        let mut p = params(100, 1);
        p.whitelist = Some(BTreeSet::from([listed]));
        let id = reg.create_event(Principal::new(), p, Utc::now()).unwrap();

        reg.reserve_sale(id, listed).unwrap();
        // Event is now sold out, but the unlisted buyer still sees the
        // whitelist rejection.
        assert_eq!(reg.reserve_sale(id, unlisted), Err(LedgerError::NotWhitelisted));
    }

    #[test]
    fn concurrent_reservations_never_oversell() {
        let reg = Arc::new(registry());
        let id = reg
            .create_event(Principal::new(), params(10, 3), Utc::now())
            .unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let reg = reg.clone();
                std::thread::spawn(move || reg.reserve_sale(id, Principal::new()))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let successes = results.iter().filter(|r| r.is_ok()).count();
        let sold_out = results
            .iter()
            .filter(|r| **r == Err(LedgerError::SoldOut))
            .count();

        assert_eq!(successes, 3);
        assert_eq!(sold_out, 13);

        let event = reg.get_event(id).unwrap();
        assert_eq!(event.tickets_sold, 3);
        assert_eq!(event.funds_collected, 30);
    }

    #[test]
    fn withdraw_requires_organizer() {
        let reg = registry();
        let organizer = Principal::new();
        let id = reg.create_event(organizer, params(100, 1), Utc::now()).unwrap();
        reg.reserve_sale(id, Principal::new()).unwrap();

        assert_eq!(
            reg.withdraw_funds(id, 50, Principal::new()),
            Err(LedgerError::Unauthorized)
        );
        assert_eq!(reg.get_event(id).unwrap().funds_collected, 100);
    }

    #[test]
    fn withdraw_bounds_to_available() {
        let reg = registry();
        let organizer = Principal::new();
        let id = reg.create_event(organizer, params(100, 1), Utc::now()).unwrap();
        reg.reserve_sale(id, Principal::new()).unwrap();

        assert_eq!(
            reg.withdraw_funds(id, 101, organizer),
            Err(LedgerError::InsufficientFunds {
                requested_e8s: 101,
                available_e8s: 100,
            })
        );
        assert_eq!(reg.get_event(id).unwrap().funds_collected, 100);
    }

    #[test]
    fn withdraw_decrements_and_releases() {
        let gateway = RecordingPayouts::arc();
        let reg = EventRegistry::new(gateway.clone());
        let organizer = Principal::new();
        let id = reg.create_event(organizer, params(100, 2), Utc::now()).unwrap();
        reg.reserve_sale(id, Principal::new()).unwrap();
        reg.reserve_sale(id, Principal::new()).unwrap();

        reg.withdraw_funds(id, 150, organizer).unwrap();

        assert_eq!(reg.get_event(id).unwrap().funds_collected, 50);
        let released = gateway.released();
        assert_eq!(released.len(), 1);
        assert_eq!(released[0].to, organizer);
        assert_eq!(released[0].amount_e8s, 150);
    }

    #[test]
    fn rejected_payout_rolls_back_the_decrement() {
        let reg = EventRegistry::new(Arc::new(RejectingPayouts));
        let organizer = Principal::new();
        let id = reg.create_event(organizer, params(100, 1), Utc::now()).unwrap();
        reg.reserve_sale(id, Principal::new()).unwrap();

        let err = reg.withdraw_funds(id, 100, organizer).unwrap_err();
        assert!(matches!(err, LedgerError::PayoutFailed(_)));
        assert_eq!(reg.get_event(id).unwrap().funds_collected, 100);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: for any interleaving of reservations and withdrawals,
        /// `tickets_sold` never exceeds `total_tickets` and the balance never
        /// exceeds what purchases put in minus what withdrawals took out.
        #[test]
        fn accounting_stays_consistent(
            price in 1u64..10_000,
            supply in 1u64..50,
            attempts in 1usize..120,
            withdraw_every in 1usize..10,
        ) {
            let gateway = RecordingPayouts::arc();
            let reg = EventRegistry::new(gateway.clone());
            let organizer = Principal::new();
            let id = reg
                .create_event(organizer, params(price, supply), Utc::now())
                .unwrap();

            let mut withdrawn: u64 = 0;
            for i in 0..attempts {
                let _ = reg.reserve_sale(id, Principal::new());
                if i % withdraw_every == 0 {
                    let available = reg.get_event(id).unwrap().funds_collected;
                    let take = available / 2;
                    if take > 0 && reg.withdraw_funds(id, take, organizer).is_ok() {
                        withdrawn += take;
                    }
                }
            }

            let event = reg.get_event(id).unwrap();
            prop_assert!(event.tickets_sold <= event.total_tickets);
            prop_assert_eq!(
                event.funds_collected,
                event.tickets_sold * price - withdrawn
            );
            let released: u64 = gateway.released().iter().map(|p| p.amount_e8s).sum();
            prop_assert_eq!(released, withdrawn);
        }
    }
}
