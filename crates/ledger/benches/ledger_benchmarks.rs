use std::sync::Arc;

use chrono::{Duration, Utc};
use criterion::{criterion_group, criterion_main, Criterion, Throughput};

use boxoffice_core::Principal;
use boxoffice_ledger::{PurchaseTicket, TicketLedger};
use boxoffice_registry::{CreateEvent, EventRegistry, RecordingPayouts};

fn setup(supply: u64) -> (Arc<EventRegistry>, TicketLedger, boxoffice_core::EventId) {
    let registry = Arc::new(EventRegistry::new(RecordingPayouts::arc()));
    let event_id = registry
        .create_event(
            Principal::new(),
            CreateEvent {
                name: "Benchmark".to_string(),
                location: "Nowhere".to_string(),
                date: Utc::now() + Duration::days(1),
                ticket_price: 100,
                total_tickets: supply,
                max_resale_multiplier: Some(2.0),
                whitelist: None,
            },
            Utc::now(),
        )
        .unwrap();
    let ledger = TicketLedger::new(registry.clone());
    (registry, ledger, event_id)
}

fn bench_purchase(c: &mut Criterion) {
    let mut group = c.benchmark_group("purchase_ticket");
    group.throughput(Throughput::Elements(1));
    group.bench_function("mint", |b| {
        b.iter_batched(
            || setup(u64::MAX / 101),
            |(_, ledger, event_id)| {
                ledger
                    .purchase_ticket(
                        Principal::new(),
                        PurchaseTicket {
                            event_id,
                            seat: None,
                            tier: None,
                            image_url: None,
                        },
                        Utc::now(),
                    )
                    .unwrap()
            },
            criterion::BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_transfer(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer_ticket");
    group.throughput(Throughput::Elements(1));
    group.bench_function("with_declared_price", |b| {
        let (_, ledger, event_id) = setup(1);
        let owner = Principal::new();
        let ticket_id = ledger
            .purchase_ticket(
                owner,
                PurchaseTicket {
                    event_id,
                    seat: None,
                    tier: None,
                    image_url: None,
                },
                Utc::now(),
            )
            .unwrap();
        let mut current = owner;
        b.iter(|| {
            let next = Principal::new();
            ledger
                .transfer_ticket(current, ticket_id, next, Some(150), Utc::now())
                .unwrap();
            current = next;
        })
    });
    group.finish();
}

criterion_group!(benches, bench_purchase, bench_transfer);
criterion_main!(benches);
