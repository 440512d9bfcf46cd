//! Positional classification of `extend` arguments.
//!
//! `extend` takes one flat argument list and splits it by position:
//!
//! 1. A leading chain link is the parent override (otherwise the default parent).
//! 2. A trailing callable is the body (otherwise a no-op).
//! 3. Everything left, in order, is the stub list.
//!
//! Detection is positional, not type-based. A callable meant as a stub
//! argument must not be the last element: it would be taken as the body.
//! That is a calling convention, and nothing detects it at runtime. Use
//! [`crate::LinkBuilder`] when a stub list ends in a callable.

use lineage_primitives::{Function, Value};

use crate::builder::LinkBuilder;
use crate::link::ChainLink;


/// A definition call split into its three parts.
#[derive(Debug, Clone, Default)]
pub struct Definition {
	/// Leading chain link, if one was passed.
	pub parent: Option<ChainLink>,
	/// Remaining arguments, in their original order.
	pub stubs: Vec<Value>,
	/// Trailing callable, if one was passed.
	pub body: Option<Function>,
}

impl Definition {
	/// Turns the definition into a builder, falling back to `default_parent`
	/// when no parent override was classified.
	pub fn into_builder(self, default_parent: &ChainLink) -> LinkBuilder {
		let parent = self.parent.as_ref().unwrap_or(default_parent);
		let builder = LinkBuilder::new(parent).with_stubs(self.stubs);
		match self.body {
			Some(body) => builder.with_body(body),
			None => builder,
		}
	}
}

/// Splits a full definition call: parent override, stubs, body.
pub fn classify(args: impl IntoIterator<Item = Value>) -> Definition {
	let mut args: Vec<Value> = args.into_iter().collect();
	let parent = take_parent(&mut args);
	let body = take_body(&mut args);
	Definition {
		parent,
		stubs: args,
		body,
	}
}

/// Splits a call made on a link, where the parent is already bound.
///
/// A leading chain link is an ordinary argument here.
pub(crate) fn classify_bound(args: impl IntoIterator<Item = Value>) -> Definition {
	let mut args: Vec<Value> = args.into_iter().collect();
	let body = take_body(&mut args);
	Definition {
		parent: None,
		stubs: args,
		body,
	}
}

fn take_parent(args: &mut Vec<Value>) -> Option<ChainLink> {
	let parent = args.first().and_then(ChainLink::from_value)?;
	args.remove(0);
	Some(parent)
}

fn take_body(args: &mut Vec<Value>) -> Option<Function> {
	if !args.last().is_some_and(Value::is_callable) {
		return None;
	}
	match args.pop()? {
		Value::Function(body) => Some(body),
		Value::Ctor(ctor) => Some(Function::from_ctor(ctor)),
		_ => None,
	}
}
