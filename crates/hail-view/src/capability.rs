//! Named template capabilities and the registry that owns them.
//!
//! A capability is anything a template can call by name: a function
//! (`{{ now() }}`), a filter (`{{ name | snake_case }}`), or a test
//! (`{% if date is past %}`). Names share a single namespace across all three
//! kinds, and a later registration under an existing name replaces the earlier
//! entry regardless of kind.
//!
//! Registered names shadow Tera's built-ins only within their own kind. If a
//! name moves to another kind (an `upper` filter replaced by an `upper`
//! function), templates using it as a filter get Tera's built-in `upper` again.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use tera::{Tera, Value};

/// The kind of a registered capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CapabilityKind {
    Function,
    Filter,
    Test,
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function => f.write_str("function"),
            Self::Filter => f.write_str("filter"),
            Self::Test => f.write_str("test"),
        }
    }
}

/// A shared, invocable template behavior.
#[derive(Clone)]
pub enum Capability {
    Function(Arc<dyn tera::Function>),
    Filter(Arc<dyn tera::Filter>),
    Test(Arc<dyn tera::Test>),
}

impl Capability {
    pub fn function<F: tera::Function + 'static>(function: F) -> Self {
        Self::Function(Arc::new(function))
    }

    pub fn filter<F: tera::Filter + 'static>(filter: F) -> Self {
        Self::Filter(Arc::new(filter))
    }

    pub fn test<T: tera::Test + 'static>(test: T) -> Self {
        Self::Test(Arc::new(test))
    }

    pub fn kind(&self) -> CapabilityKind {
        match self {
            Self::Function(_) => CapabilityKind::Function,
            Self::Filter(_) => CapabilityKind::Filter,
            Self::Test(_) => CapabilityKind::Test,
        }
    }

    /// Invoke a function capability directly, outside of any template.
    pub fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
        match self {
            Self::Function(f) => f.call(args),
            other => Err(tera::Error::msg(format!(
                "capability is a {}, not a function",
                other.kind()
            ))),
        }
    }

    /// Apply a filter capability directly, outside of any template.
    pub fn apply(&self, value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
        match self {
            Self::Filter(f) => f.filter(value, args),
            other => Err(tera::Error::msg(format!(
                "capability is a {}, not a filter",
                other.kind()
            ))),
        }
    }

    /// Evaluate a test capability directly, outside of any template.
    pub fn check(&self, value: Option<&Value>, args: &[Value]) -> tera::Result<bool> {
        match self {
            Self::Test(t) => t.test(value, args),
            other => Err(tera::Error::msg(format!(
                "capability is a {}, not a test",
                other.kind()
            ))),
        }
    }

    fn install(&self, name: &str, tera: &mut Tera) {
        match self {
            Self::Function(f) => tera.register_function(name, Shared(Arc::clone(f))),
            Self::Filter(f) => tera.register_filter(name, Shared(Arc::clone(f))),
            Self::Test(t) => tera.register_tester(name, Shared(Arc::clone(t))),
        }
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Capability").field(&self.kind()).finish()
    }
}

/// Adapter so one `Arc`'d behavior can be handed to any number of Tera instances.
struct Shared<T: ?Sized>(Arc<T>);

impl tera::Function for Shared<dyn tera::Function> {
    fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
        self.0.call(args)
    }

    fn is_safe(&self) -> bool {
        self.0.is_safe()
    }
}

impl tera::Filter for Shared<dyn tera::Filter> {
    fn filter(&self, value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
        self.0.filter(value, args)
    }

    fn is_safe(&self) -> bool {
        self.0.is_safe()
    }
}

impl tera::Test for Shared<dyn tera::Test> {
    fn test(&self, value: Option<&Value>, args: &[Value]) -> tera::Result<bool> {
        self.0.test(value, args)
    }
}

/// Name-to-capability mapping with last-writer-wins semantics.
#[derive(Debug, Clone, Default)]
pub struct CapabilityRegistry {
    entries: BTreeMap<String, Capability>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a capability, returning the entry it displaced.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        capability: Capability,
    ) -> Option<Capability> {
        let name = name.into();
        let kind = capability.kind();
        let previous = self.entries.insert(name.clone(), capability);
        match &previous {
            Some(old) => tracing::debug!(
                %name,
                %kind,
                previous = %old.kind(),
                "Replaced template capability"
            ),
            None => tracing::debug!(%name, %kind, "Registered template capability"),
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<&Capability> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Capability)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register every entry on a Tera instance, overriding Tera built-ins of the same name and kind.
    pub(crate) fn install(&self, tera: &mut Tera) {
        for (name, capability) in &self.entries {
            capability.install(name, tera);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(text: &'static str) -> Capability {
        Capability::function(move |_: &HashMap<String, Value>| -> tera::Result<Value> {
            Ok(Value::from(text))
        })
    }

    #[test]
    fn test_insert_and_get() {
        let mut registry = CapabilityRegistry::new();
        assert!(registry.insert("greet", constant("hi")).is_none());

        let cap = registry.get("greet").unwrap();
        assert_eq!(cap.kind(), CapabilityKind::Function);
        assert_eq!(cap.call(&HashMap::new()).unwrap(), Value::from("hi"));
    }

    #[test]
    fn test_last_writer_wins() {
        let mut registry = CapabilityRegistry::new();
        registry.insert("greet", constant("first"));
        let displaced = registry.insert("greet", constant("second"));

        assert!(displaced.is_some());
        assert_eq!(registry.len(), 1);
        let value = registry.get("greet").unwrap().call(&HashMap::new()).unwrap();
        assert_eq!(value, Value::from("second"));
    }

    #[test]
    fn test_replacement_across_kinds() {
        let mut registry = CapabilityRegistry::new();
        registry.insert(
            "upper",
            Capability::filter(
                |v: &Value, _: &HashMap<String, Value>| -> tera::Result<Value> { Ok(v.clone()) },
            ),
        );
        registry.insert("upper", constant("fn"));

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get("upper").unwrap().kind(),
            CapabilityKind::Function
        );
    }

    #[test]
    fn test_names_sorted() {
        let mut registry = CapabilityRegistry::new();
        registry.insert("lower", constant("l"));
        registry.insert("upper", constant("u"));
        registry.insert("capitalize", constant("c"));

        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["capitalize", "lower", "upper"]);
    }

    #[test]
    fn test_wrong_kind_invocation_is_an_error() {
        let cap =
            Capability::test(|_: Option<&Value>, _: &[Value]| -> tera::Result<bool> { Ok(true) });
        assert!(cap.call(&HashMap::new()).is_err());
        assert!(cap.apply(&Value::Null, &HashMap::new()).is_err());
        assert!(cap.check(None, &[]).unwrap());
    }

    #[test]
    fn test_install_overrides_builtin_filter() {
        let mut registry = CapabilityRegistry::new();
        registry.insert(
            "upper",
            Capability::filter(|_: &Value, _: &HashMap<String, Value>| -> tera::Result<Value> {
                Ok(Value::from("X"))
            }),
        );

        let mut tera = Tera::default();
        registry.install(&mut tera);
        tera.add_raw_template("t", r#"{{ "abc" | upper }}"#).unwrap();
        let out = tera.render("t", &tera::Context::new()).unwrap();
        assert_eq!(out, "X");
    }
}
