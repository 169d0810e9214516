use std::sync::{Arc, Mutex};

use mtncl_netlist::Catalog;
use mtncl_synth::{SynthConfig, enumerate_polymorphic, generate, generate_polymorphic};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::registry::Registry;

#[derive(Clone, Default)]
struct WarningCounter(Arc<Mutex<usize>>);

impl<S: Subscriber> Layer<S> for WarningCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            *self.0.lock().unwrap() += 1;
        }
    }
}

fn warnings(f: impl FnOnce()) -> usize {
    let counter = WarningCounter::default();
    tracing::subscriber::with_default(Registry::default().with(counter.clone()), f);
    *counter.0.lock().unwrap()
}

#[test]
fn test_empty_generation_warns() {
    let catalog = Catalog::standard();
    let config = SynthConfig::default();
    assert!(warnings(|| assert!(generate(&"!A".parse().unwrap(), &catalog, &config, 1).is_empty())) > 0);
    assert_eq!(warnings(|| assert_eq!(generate(&"(A + B) & C".parse().unwrap(), &catalog, &config, 1).len(), 1)), 0);
}

#[test]
fn test_empty_polymorphic_warns() {
    let catalog = Catalog::standard();
    let config = SynthConfig::default();
    assert!(warnings(|| assert!(generate_polymorphic("A + B", "A ^ B", &catalog, &config, 1).unwrap().is_empty())) > 0);
    assert_eq!(warnings(|| assert_eq!(generate_polymorphic("A + B", "A & B", &catalog, &config, 1).unwrap().len(), 1)), 0);
}

#[test]
fn test_empty_enumeration_warns() {
    let catalog = Catalog::standard();
    assert!(warnings(|| assert!(enumerate_polymorphic("a^b", "a&b", &catalog, 10).unwrap().is_empty())) > 0);
    assert_eq!(warnings(|| assert!(!enumerate_polymorphic("a|b", "a&b", &catalog, 1).unwrap().is_empty())), 0);
}
