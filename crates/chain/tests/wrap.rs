//! Adopting constructors defined outside any chain.

use std::sync::Arc;

use lineage_chain::{
	ArityPolicy, ChainConfig, Constructor, CtorRef, Function, NativeCtor, Runtime, Value, is, wrap,
};
use pretty_assertions::assert_eq;

/// A constructor with fields and a surface method, built without the chain.
fn typical() -> Arc<NativeCtor> {
	let ctor = Arc::new(NativeCtor::new(
		"Typical",
		Function::body(0, |this, _| {
			this.set("a", 1);
			this.set("ron", Value::Null);
			this.set("s", "zztop");
			Ok(())
		}),
	));
	ctor.prototype().define(
		"add",
		Function::new(0, |this, _| {
			let mut next = 0;
			this.update("a", |a| {
				next = a.as_int().unwrap_or(0) + 1;
				Value::Int(next)
			});
			Ok(Value::Int(next))
		}),
	);
	ctor
}

#[test]
fn wrapped_constructor_is_a_chain_link() {
	let original: CtorRef = typical();
	let wrapped = wrap(original.clone());

	assert!(is(&wrapped.to_value()));
	assert!(wrapped.parent().is_some_and(|p| Arc::ptr_eq(p, &original)));
	assert!(wrapped.stubs().is_empty());
}

#[test]
fn descendants_are_instances_of_the_original() {
	let original = typical();
	let child = wrap(original.clone()).extend([]);

	let instance = child.construct(&[]).unwrap();
	assert!(instance.is_instance_of(original.as_ref()));
	assert_eq!(instance.get("s"), Some(Value::from("zztop")));
	assert_eq!(instance.call_method("add", &[]).unwrap(), Value::Int(2));
}

#[test]
fn original_is_not_modified() {
	let original = typical();
	let names_before = original.prototype().own_names();
	let child = wrap(original.clone()).extend([]);
	child.prototype().define("extra", true);

	assert_eq!(original.prototype().own_names(), names_before);
	assert!(!is(&Value::Ctor(original.clone())));

	let direct = original.construct(&[]).unwrap();
	assert!(direct.get("extra").is_none());
}

#[test]
fn wrapped_link_reports_the_original_arity() {
	let original = NativeCtor::new("Pair", Function::body(2, |_, _| Ok(()))).into_ref();
	let wrapped = wrap(original);
	assert_eq!(wrapped.arity(), 2);
}

#[test]
fn runtime_wrap_uses_runtime_config() {
	let rt = Runtime::new(ChainConfig::default().with_arity(ArityPolicy::Legacy));
	let wrapped = rt.wrap(typical());
	assert_eq!(wrapped.config().arity, ArityPolicy::Legacy);
	assert!(rt.is(&wrapped.to_value()));
}
