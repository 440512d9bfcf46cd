//! Mixin registration seen through instantiation.

use lineage_chain::{
	ChainConfig, ChainError, ChainLink, Constructor, Function, MixinRegistration, NativeCtor,
	Object, Runtime, Value, arg,
};
use pretty_assertions::assert_eq;

fn ctor(f: impl Fn(&Object, &[Value]) + Send + Sync + 'static) -> Value {
	Value::Function(Function::body(0, move |this, args| {
		f(this, args);
		Ok(())
	}))
}

fn setter(rt: &Runtime, name: &'static str, value: i64) -> ChainLink {
	rt.extend([ctor(move |this, _| this.set(name, value))])
}

fn int(obj: &Object, name: &str) -> Option<i64> {
	obj.get(name).and_then(|v| v.as_int())
}

#[test]
fn mixin_constructor_runs() {
	let rt = Runtime::default();
	let child = setter(&rt, "a", 1);
	child.mixin(&[setter(&rt, "b", 2).to_value()]).unwrap();

	let instance = child.construct(&[]).unwrap();
	assert_eq!(int(&instance, "a"), Some(1));
	assert_eq!(int(&instance, "b"), Some(2));
}

#[test]
fn descendants_run_ancestor_mixins() {
	let rt = Runtime::default();
	let child = setter(&rt, "a", 1);
	rt.mixin(&child, &[setter(&rt, "b", 2).to_value()]).unwrap();
	let grand = child.extend([ctor(|this, _| this.set("c", 3))]);

	let instance = grand.construct(&[]).unwrap();
	assert_eq!(
		(int(&instance, "a"), int(&instance, "b"), int(&instance, "c")),
		(Some(1), Some(2), Some(3))
	);
}

fn assert_abcde(instance: &Object) {
	for (name, value) in [("a", 1), ("b", 2), ("c", 3), ("d", 4), ("e", 5)] {
		assert_eq!(int(instance, name), Some(value), "field {name}");
	}
}

#[test]
fn list_form_registers_every_entry() {
	let rt = Runtime::default();
	let child = setter(&rt, "a", 1);
	let list = Value::list([setter(&rt, "b", 2), setter(&rt, "c", 3), setter(&rt, "d", 4)]);
	child.mixin(&[list]).unwrap();
	let grand = child.extend([ctor(|this, _| this.set("e", 5))]);

	assert_abcde(&grand.construct(&[]).unwrap());
}

#[test]
fn separate_arguments_register_every_entry() {
	let rt = Runtime::default();
	let child = setter(&rt, "a", 1);
	child
		.mixin(&[
			setter(&rt, "b", 2).to_value(),
			setter(&rt, "c", 3).to_value(),
			setter(&rt, "d", 4).to_value(),
		])
		.unwrap();
	let grand = child.extend([ctor(|this, _| this.set("e", 5))]);

	assert_abcde(&grand.construct(&[]).unwrap());
}

#[test]
fn mixin_sees_fields_set_by_parent() {
	let rt = Runtime::default();
	let base = setter(&rt, "a", 1);
	let child = base.extend([]);
	let bump = rt.extend([ctor(|this, _| {
		this.update("a", |a| Value::Int(a.as_int().unwrap_or(0) + 1));
	})]);
	child.mixin(&[bump.to_value()]).unwrap();

	assert_eq!(int(&child.construct(&[]).unwrap(), "a"), Some(2));
}

#[test]
fn body_runs_after_mixins() {
	let rt = Runtime::default();
	let child = setter(&rt, "a", 1);
	child.mixin(&[setter(&rt, "a", 7).to_value()]).unwrap();

	assert_eq!(int(&child.construct(&[]).unwrap(), "a"), Some(1));
}

#[test]
fn mixins_receive_resolved_parent_arguments() {
	let rt = Runtime::default();
	let parent = rt.extend([Value::Function(Function::body(1, |_, _| Ok(())))]);
	let child = parent.extend([Value::Int(5)]);
	let capture = rt.extend([ctor(|this, args| this.set("seen", Value::list(args.to_vec())))]);
	child.mixin(&[capture.to_value()]).unwrap();

	let instance = child.construct(&[Value::Int(9)]).unwrap();
	assert_eq!(instance.get("seen"), Some(Value::list([5])));
}

#[test]
fn mixin_prototype_methods_reach_descendants() {
	let rt = Runtime::default();
	let child = setter(&rt, "a", 1);
	let helper = rt.extend([]);
	helper.prototype().define(
		"add",
		Function::new(2, |_, args| {
			let sum = arg(args, 0).as_int().unwrap_or(0) + arg(args, 1).as_int().unwrap_or(0);
			Ok(Value::Int(sum))
		}),
	);
	child.mixin(&[helper.to_value()]).unwrap();
	let grand = child.extend([ctor(|this, _| this.set("c", 3))]);

	let instance = grand.construct(&[]).unwrap();
	assert_eq!(
		instance.call_method("add", &[Value::Int(1), Value::Int(1)]).unwrap(),
		Value::Int(2)
	);
}

#[test]
fn last_registered_member_wins() {
	let rt = Runtime::default();
	let target = rt.extend([]);
	let m1 = rt.extend([]);
	m1.prototype().define("x", 1);
	let m2 = rt.extend([]);
	m2.prototype().define("x", 2);

	target.mixin(&[m1.to_value()]).unwrap();
	target.mixin(&[m2.to_value()]).unwrap();

	for _ in 0..3 {
		assert_eq!(target.construct(&[]).unwrap().get("x"), Some(Value::Int(2)));
	}
}

#[test]
fn native_constructors_mix_in() {
	let rt = Runtime::default();
	let native = NativeCtor::new(
		"Tagged",
		Function::body(0, |this, _| {
			this.set("tagged", true);
			Ok(())
		}),
	);
	native.prototype().define("kind", "native");
	let target = rt.extend([]);
	target.mixin(&[Value::Ctor(native.into_ref())]).unwrap();

	let instance = target.construct(&[]).unwrap();
	assert_eq!(instance.get("tagged"), Some(Value::Bool(true)));
	assert_eq!(instance.get("kind"), Some(Value::from("native")));
}

#[test]
fn invalid_argument_fails_registration() {
	let rt = Runtime::default();
	let target = rt.extend([]);
	let err = target.mixin(&[Value::from("nope")]).unwrap_err();
	assert!(matches!(
		err,
		ChainError::InvalidMixinArgument {
			index: 0,
			element: None,
			found: "string"
		}
	));
}

#[test]
fn registration_policy_comes_from_the_runtime() {
	let rt = Runtime::new(ChainConfig::default().with_mixin_registration(MixinRegistration::Eager));
	let target = rt.extend([]);
	let result = target.mixin(&[setter(&rt, "b", 2).to_value(), Value::Null]);

	assert!(result.is_err());
	assert_eq!(target.mixins().len(), 1);
	assert_eq!(int(&target.construct(&[]).unwrap(), "b"), Some(2));
}

#[test]
fn existing_instances_see_later_mixin_members() {
	let rt = Runtime::default();
	let target = rt.extend([]);
	let early = target.construct(&[]).unwrap();
	assert_eq!(early.get("greet"), None);

	let m1 = rt.extend([]);
	m1.prototype().define("greet", "hello");
	m1.prototype().define("x", 1);
	target.mixin(&[m1.to_value()]).unwrap();

	assert_eq!(early.get("greet"), Some(Value::from("hello")));
	assert_eq!(early.get("x"), Some(Value::Int(1)));

	let m2 = rt.extend([]);
	m2.prototype().define("x", 2);
	target.mixin(&[m2.to_value()]).unwrap();

	assert_eq!(early.get("x"), Some(Value::Int(2)));
	assert_eq!(target.construct(&[]).unwrap().get("x"), Some(Value::Int(2)));
}

#[test]
fn descendant_cannot_be_mixed_into_its_ancestor() {
	let rt = Runtime::default();
	let link = setter(&rt, "a", 1);
	let grand = link.extend([]);

	let err = link.mixin(&[grand.to_value()]).unwrap_err();

	assert!(matches!(err, ChainError::CyclicMixin { link: id, .. } if id == link.id()));
	assert!(link.mixins().is_empty());
	assert_eq!(int(&link.construct(&[]).unwrap(), "a"), Some(1));
	assert_eq!(int(&grand.construct(&[]).unwrap(), "a"), Some(1));
}
