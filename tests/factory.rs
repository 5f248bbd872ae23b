//! Factory, descriptor-cache and validation integration tests.
//!
//! Covers descriptor reuse across builders, concurrent first use collapsing to a single
//! build, contract validation failures for hand-written backends, and the metadata the
//! generated descriptors expose.

use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use interpose::contract::{Contract, ContractShape, MemberKind, MemberShape, ParamShape};
use interpose::value::Value;
use interpose::{Error, ProxyFactory, Result};

interpose::contract! {
    pub trait Widget {
        fn poke(&self) -> u32;
        #[getter] fn label(&self) -> String;
        #[setter] fn set_label(&self, value: String);
    }
}

#[derive(Default)]
struct StubWidget {
    pokes: AtomicUsize,
}

impl Widget for StubWidget {
    fn poke(&self) -> u32 {
        self.pokes.fetch_add(1, Ordering::SeqCst) as u32
    }

    fn label(&self) -> String {
        String::from("stub")
    }

    fn set_label(&self, _value: String) {}
}

#[test]
fn test_sequential_requests_share_one_descriptor() -> Result<()> {
    let factory = ProxyFactory::new();

    let first = factory.create_proxy::<dyn Widget>()?;
    let second = factory.create_proxy::<dyn Widget>()?;

    assert!(ptr::eq(first.descriptor(), second.descriptor()));
    assert_eq!(factory.cache().build_count(), 1);
    assert_eq!(factory.cache().len(), 1);

    // Instances from both builders forward identically.
    let target = Arc::new(StubWidget::default());
    let from_first = first.create_instance(Arc::clone(&target) as Arc<dyn Widget>, []);
    let from_second = second.create_instance(Arc::clone(&target) as Arc<dyn Widget>, []);
    assert_eq!(from_first.poke(), 0);
    assert_eq!(from_second.poke(), 1);
    assert_eq!(target.pokes.load(Ordering::SeqCst), 2);
    Ok(())
}

#[test]
fn test_concurrent_first_use_builds_once() {
    let factory = Arc::new(ProxyFactory::new());

    std::thread::scope(|scope| {
        for _ in 0..16 {
            let factory = Arc::clone(&factory);
            scope.spawn(move || {
                factory.create_proxy::<dyn Widget>().unwrap();
            });
        }
    });

    assert_eq!(factory.cache().build_count(), 1);
}

#[test]
fn test_global_factory_is_one_instance() {
    assert!(ptr::eq(ProxyFactory::global(), ProxyFactory::global()));
}

#[test]
fn test_descriptor_exposes_member_metadata() -> Result<()> {
    let factory = ProxyFactory::new();
    let builder = factory.create_proxy::<dyn Widget>()?;
    let descriptor = builder.descriptor();

    assert_eq!(descriptor.name(), "Widget");
    assert_eq!(descriptor.members().len(), 3);

    let poke = descriptor.member(0);
    assert_eq!(poke.name(), "poke");
    assert_eq!(poke.kind(), MemberKind::Method);
    assert_eq!(poke.arity(), 0);
    assert_eq!(poke.return_type(), Some("u32"));
    assert_eq!(poke.signature(), "Widget::poke() -> u32");

    let setter = descriptor.member_named("set_label").expect("set_label");
    assert_eq!(setter.kind(), MemberKind::PropertySet);
    assert_eq!(setter.parameters()[0].name, "value");
    assert_eq!(setter.parameters()[0].ty, "String");
    assert_eq!(setter.return_type(), None);
    Ok(())
}

#[test]
fn test_builder_clone_shares_descriptor() -> Result<()> {
    let factory = ProxyFactory::new();
    let builder = factory.create_proxy::<dyn Widget>()?;
    let clone = builder.clone();

    assert!(ptr::eq(builder.descriptor(), clone.descriptor()));
    Ok(())
}

// A hand-written backend with an accessor whose shape violates its category: the
// runtime validation path `contract!` users never hit.
struct Crooked;

static CROOKED_SHAPE: ContractShape = ContractShape {
    name: "Crooked",
    members: &[MemberShape {
        name: "label",
        kind: MemberKind::PropertyGet,
        parameters: &[ParamShape { name: "extra", ty: "u8" }],
        returns: Some("String"),
    }],
};

impl Contract for Crooked {
    fn shape() -> &'static ContractShape {
        &CROOKED_SHAPE
    }

    fn call_target(_: &Self, _: usize, _: &mut [Value]) -> Option<Value> {
        None
    }
}

#[test]
fn test_malformed_contract_is_unsupported() {
    let factory = ProxyFactory::new();

    let error = factory.create_proxy::<Crooked>().map(|_| ()).unwrap_err();
    match error {
        Error::UnsupportedContract { contract, reason } => {
            assert_eq!(contract, "Crooked");
            assert!(reason.contains("label"), "reason: {reason}");
        }
        other => panic!("expected UnsupportedContract, got {other}"),
    }

    // Failed contracts never occupy the cache.
    assert_eq!(factory.cache().build_count(), 0);
    assert!(factory.cache().is_empty());
}
