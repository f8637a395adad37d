// crates/laptop-store/src/laptop.rs
//
// In-memory laptop catalog implementing the `LaptopStore` trait.
//
// Laptops are cloned on the way in and on the way out, so the stored copy
// can never alias a value held by a caller.

use std::collections::HashMap;
use std::sync::RwLock;

use laptop_core::context::CallContext;
use laptop_core::error::LaptopError;
use laptop_core::filter::Filter;
use laptop_core::laptop::Laptop;
use laptop_core::traits::LaptopStore;

use crate::poisoned;

/// In-memory laptop catalog keyed by laptop ID.
#[derive(Debug, Default)]
pub struct InMemoryLaptopStore {
    laptops: RwLock<HashMap<String, Laptop>>,
}

impl InMemoryLaptopStore {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the number of laptops currently stored.
    pub fn len(&self) -> usize {
        self.laptops.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Return whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LaptopStore for InMemoryLaptopStore {
    fn save(&self, laptop: &Laptop) -> Result<(), LaptopError> {
        let mut laptops = self.laptops.write().map_err(poisoned)?;

        if laptops.contains_key(&laptop.id) {
            return Err(LaptopError::AlreadyExists(format!("laptop {}", laptop.id)));
        }

        laptops.insert(laptop.id.clone(), laptop.clone());
        Ok(())
    }

    fn find(&self, id: &str) -> Result<Option<Laptop>, LaptopError> {
        let laptops = self.laptops.read().map_err(poisoned)?;
        Ok(laptops.get(id).cloned())
    }

    fn search(
        &self,
        ctx: &CallContext,
        filter: &Filter,
        found: &mut dyn FnMut(Laptop) -> Result<(), LaptopError>,
    ) -> Result<(), LaptopError> {
        let laptops = self.laptops.read().map_err(poisoned)?;

        for laptop in laptops.values() {
            tracing::debug!(laptop_id = %laptop.id, "Checking laptop");

            if let Some(err) = ctx.err() {
                tracing::info!("Search stopped: {}", err);
                return Err(err);
            }

            if filter.matches(laptop) {
                found(laptop.clone())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use laptop_core::laptop::{Cpu, Memory, MemoryUnit};

    use super::*;

    fn make_laptop(id: &str, price: f64, cores: u32) -> Laptop {
        Laptop {
            id: id.to_string(),
            brand: "Dell".to_string(),
            name: "XPS".to_string(),
            cpu: Some(Cpu {
                number_cores: cores,
                min_ghz: 2.4,
                ..Default::default()
            }),
            ram: Some(Memory::new(16, MemoryUnit::Gigabyte)),
            price_usd: price,
            release_year: 2019,
            ..Default::default()
        }
    }

    fn collect(store: &InMemoryLaptopStore, ctx: &CallContext, filter: &Filter) -> Vec<Laptop> {
        let mut found = Vec::new();
        store
            .search(ctx, filter, &mut |laptop| {
                found.push(laptop);
                Ok(())
            })
            .unwrap();
        found
    }

    #[test]
    fn test_save_then_find_returns_copy() {
        let store = InMemoryLaptopStore::new();
        let laptop = make_laptop("a", 1500.0, 4);
        store.save(&laptop).unwrap();

        let mut found = store.find("a").unwrap().unwrap();
        assert_eq!(found, laptop);

        // Mutating the copy must not leak into the store.
        found.price_usd = 1.0;
        assert_eq!(store.find("a").unwrap().unwrap().price_usd, 1500.0);
    }

    #[test]
    fn test_find_missing_is_none() {
        let store = InMemoryLaptopStore::new();
        assert!(store.find("nope").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_save_rejected() {
        let store = InMemoryLaptopStore::new();
        store.save(&make_laptop("a", 1500.0, 4)).unwrap();

        let err = store.save(&make_laptop("a", 9.0, 1)).unwrap_err();
        assert!(matches!(err, LaptopError::AlreadyExists(_)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.find("a").unwrap().unwrap().price_usd, 1500.0);
    }

    #[test]
    fn test_search_unconstrained_filter_returns_all_once() {
        let store = InMemoryLaptopStore::new();
        for id in ["a", "b", "c"] {
            store.save(&make_laptop(id, 1500.0, 4)).unwrap();
        }

        let mut ids: Vec<String> = collect(&store, &CallContext::new(), &Filter::unconstrained())
            .into_iter()
            .map(|l| l.id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_search_applies_filter() {
        let store = InMemoryLaptopStore::new();
        store.save(&make_laptop("cheap", 1000.0, 4)).unwrap();
        store.save(&make_laptop("pricey", 3000.0, 8)).unwrap();
        store.save(&make_laptop("weak", 900.0, 2)).unwrap();

        let filter = Filter {
            max_price_usd: 2000.0,
            min_cpu_cores: 4,
            ..Default::default()
        };
        let found = collect(&store, &CallContext::new(), &filter);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "cheap");

        let impossible = Filter {
            max_price_usd: 0.01,
            ..Default::default()
        };
        assert!(collect(&store, &CallContext::new(), &impossible).is_empty());
    }

    #[test]
    fn test_search_zero_max_price_returns_none() {
        let store = InMemoryLaptopStore::new();
        store.save(&make_laptop("a", 1500.0, 4)).unwrap();
        store.save(&make_laptop("b", 1500.0, 8)).unwrap();

        let filter = Filter {
            max_price_usd: 0.0,
            ..Default::default()
        };
        assert!(collect(&store, &CallContext::new(), &filter).is_empty());
    }

    #[test]
    fn test_search_stops_on_cancel() {
        let store = InMemoryLaptopStore::new();
        store.save(&make_laptop("a", 1000.0, 4)).unwrap();

        let ctx = CallContext::new();
        ctx.cancel();
        let err = store
            .search(&ctx, &Filter::unconstrained(), &mut |_| Ok(()))
            .unwrap_err();
        assert!(matches!(err, LaptopError::Cancelled));
    }

    #[test]
    fn test_search_stops_on_deadline() {
        let store = InMemoryLaptopStore::new();
        store.save(&make_laptop("a", 1000.0, 4)).unwrap();

        let ctx = CallContext::with_timeout(Duration::ZERO);
        let err = store
            .search(&ctx, &Filter::unconstrained(), &mut |_| Ok(()))
            .unwrap_err();
        assert!(matches!(err, LaptopError::DeadlineExceeded));
    }

    #[test]
    fn test_search_cancelled_mid_scan() {
        let store = InMemoryLaptopStore::new();
        for i in 0..10 {
            store.save(&make_laptop(&format!("l{}", i), 1000.0, 4)).unwrap();
        }

        let ctx = CallContext::new();
        let mut seen = 0;
        let err = store
            .search(&ctx, &Filter::unconstrained(), &mut |_| {
                seen += 1;
                ctx.cancel();
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, LaptopError::Cancelled));
        assert_eq!(seen, 1);
    }

    #[test]
    fn test_search_callback_error_aborts() {
        let store = InMemoryLaptopStore::new();
        for id in ["a", "b"] {
            store.save(&make_laptop(id, 1000.0, 4)).unwrap();
        }

        let mut calls = 0;
        let err = store
            .search(&CallContext::new(), &Filter::unconstrained(), &mut |_| {
                calls += 1;
                Err(LaptopError::Internal("send failed".to_string()))
            })
            .unwrap_err();
        assert!(matches!(err, LaptopError::Internal(_)));
        assert_eq!(calls, 1);
    }
}
