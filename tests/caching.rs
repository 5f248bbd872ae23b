//! Caching-proxy collaborator integration tests.
//!
//! The collaborator is deliberately thin: it wires a proxy with the single default
//! pass-through interceptor and nothing else. These tests pin down that wiring and the
//! configuration surface around it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use interpose::caching::CacheFactory;
use interpose::{Error, ProxyFactory, Result};

interpose::contract! {
    pub trait PriceList {
        fn price(&self, article: String) -> u64;
        fn refresh(&self);
    }
}

#[derive(Default)]
struct StaticPrices {
    refreshes: AtomicUsize,
}

impl PriceList for StaticPrices {
    fn price(&self, article: String) -> u64 {
        match article.as_str() {
            "coffee" => 450,
            _ => 0,
        }
    }

    fn refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_built_proxy_forwards_through_pass_through() -> Result<()> {
    let target = Arc::new(StaticPrices::default());
    let factory = CacheFactory::new();

    let proxy = factory
        .caching_proxy::<dyn PriceList>()?
        .for_instance(Arc::clone(&target) as Arc<dyn PriceList>)
        .build()?;

    assert_eq!(proxy.price(String::from("coffee")), 450);
    assert_eq!(proxy.price(String::from("tea")), 0);

    proxy.refresh();
    assert_eq!(target.refreshes.load(Ordering::SeqCst), 1);

    // Exactly the single default interceptor is installed.
    assert_eq!(proxy.interceptors().len(), 1);
    Ok(())
}

#[test]
fn test_build_without_target_is_an_error() -> Result<()> {
    let factory = CacheFactory::new();
    let configuration = factory.caching_proxy::<dyn PriceList>()?;

    match configuration.build().map(|_| ()).unwrap_err() {
        Error::MissingTarget { contract } => assert_eq!(contract, "PriceList"),
        other => panic!("expected MissingTarget, got {other}"),
    }
    Ok(())
}

#[test]
fn test_configuration_is_reusable_after_build() -> Result<()> {
    let target = Arc::new(StaticPrices::default());
    let factory = CacheFactory::new();
    let configuration = factory
        .caching_proxy::<dyn PriceList>()?
        .for_instance(Arc::clone(&target) as Arc<dyn PriceList>);

    let first = configuration.build()?;
    let second = configuration.build()?;

    first.refresh();
    second.refresh();
    assert_eq!(target.refreshes.load(Ordering::SeqCst), 2);
    Ok(())
}

#[test]
fn test_injected_factory_shares_descriptor_cache() -> Result<()> {
    let engine = ProxyFactory::new();
    let factory = CacheFactory::with_factory(engine);

    let target = Arc::new(StaticPrices::default());
    let _first = factory
        .caching_proxy::<dyn PriceList>()?
        .for_instance(Arc::clone(&target) as Arc<dyn PriceList>)
        .build()?;
    let _second = factory
        .caching_proxy::<dyn PriceList>()?
        .for_instance(Arc::clone(&target) as Arc<dyn PriceList>)
        .build()?;

    // Both configurations went through the injected engine's cache.
    assert_eq!(factory.factory().cache().build_count(), 1);
    Ok(())
}
