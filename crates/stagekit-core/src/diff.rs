//! Structural comparison and cloning of node configuration trees.
//!
//! Configuration trees are dynamic values with shared, possibly cyclic,
//! containers. Comparison follows script-style semantics: containers are
//! compared by content, callbacks and images are never compared, and a
//! container already visited during one comparison counts as equal.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

/// Shared array container.
pub type ArrayRef = Rc<RefCell<Vec<ConfigValue>>>;

/// Shared object container. Keys are visited in sorted order.
pub type ObjectRef = Rc<RefCell<BTreeMap<String, ConfigValue>>>;

/// Loaded image handle. Only identity matters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    pub url: String,
}

/// A dynamic configuration value.
#[derive(Clone)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(ArrayRef),
    Object(ObjectRef),
    /// Opaque callback (event handler, clip function, ...).
    Function(Rc<dyn Fn()>),
    Image(Rc<ImageSource>),
}

impl fmt::Debug for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Null => write!(f, "Null"),
            ConfigValue::Bool(b) => write!(f, "Bool({b})"),
            ConfigValue::Number(n) => write!(f, "Number({n})"),
            ConfigValue::String(s) => write!(f, "String({s:?})"),
            ConfigValue::Array(a) => write!(f, "Array(len={})", a.borrow().len()),
            ConfigValue::Object(o) => {
                let keys: Vec<String> = o.borrow().keys().cloned().collect();
                write!(f, "Object({keys:?})")
            }
            ConfigValue::Function(_) => write!(f, "Function"),
            ConfigValue::Image(img) => write!(f, "Image({:?})", img.url),
        }
    }
}

/// Runtime type category, as a script `typeof` would report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeTag {
    Object,
    Boolean,
    Number,
    String,
    Function,
}

impl ConfigValue {
    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, ConfigValue)>) -> Self {
        let map = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        ConfigValue::Object(Rc::new(RefCell::new(map)))
    }

    pub fn array(items: impl IntoIterator<Item = ConfigValue>) -> Self {
        ConfigValue::Array(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    pub fn function(f: impl Fn() + 'static) -> Self {
        ConfigValue::Function(Rc::new(f))
    }

    pub fn image(url: impl Into<String>) -> Self {
        ConfigValue::Image(Rc::new(ImageSource { url: url.into() }))
    }

    /// Set `key` on an object. Returns false for non-objects.
    pub fn insert(&self, key: impl Into<String>, value: ConfigValue) -> bool {
        match self {
            ConfigValue::Object(map) => {
                map.borrow_mut().insert(key.into(), value);
                true
            }
            _ => false,
        }
    }

    /// Member of an object (by key) or array (by decimal index).
    pub fn get(&self, key: &str) -> Option<ConfigValue> {
        match self {
            ConfigValue::Object(map) => map.borrow().get(key).cloned(),
            ConfigValue::Array(items) => {
                let index: usize = key.parse().ok()?;
                items.borrow().get(index).cloned()
            }
            _ => None,
        }
    }

    /// Own enumerable keys: object keys or array indices.
    pub fn keys(&self) -> Vec<String> {
        match self {
            ConfigValue::Object(map) => map.borrow().keys().cloned().collect(),
            ConfigValue::Array(items) => (0..items.borrow().len()).map(|i| i.to_string()).collect(),
            _ => Vec::new(),
        }
    }

    fn has_key(&self, key: &str) -> bool {
        match self {
            ConfigValue::Object(map) => map.borrow().contains_key(key),
            ConfigValue::Array(items) => key
                .parse::<usize>()
                .is_ok_and(|i| i < items.borrow().len()),
            _ => false,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    fn type_tag(&self) -> TypeTag {
        match self {
            ConfigValue::Null
            | ConfigValue::Array(_)
            | ConfigValue::Object(_)
            | ConfigValue::Image(_) => TypeTag::Object,
            ConfigValue::Bool(_) => TypeTag::Boolean,
            ConfigValue::Number(_) => TypeTag::Number,
            ConfigValue::String(_) => TypeTag::String,
            ConfigValue::Function(_) => TypeTag::Function,
        }
    }

    /// Address of the shared container, for identity tracking.
    fn container_addr(&self) -> Option<usize> {
        match self {
            ConfigValue::Array(a) => Some(Rc::as_ptr(a) as *const () as usize),
            ConfigValue::Object(o) => Some(Rc::as_ptr(o) as *const () as usize),
            ConfigValue::Image(i) => Some(Rc::as_ptr(i) as *const () as usize),
            _ => None,
        }
    }

    /// Strict equality: primitives by value (NaN is unequal to itself),
    /// everything else by identity.
    pub fn strict_eq(&self, other: &ConfigValue) -> bool {
        match (self, other) {
            (ConfigValue::Null, ConfigValue::Null) => true,
            (ConfigValue::Bool(a), ConfigValue::Bool(b)) => a == b,
            (ConfigValue::Number(a), ConfigValue::Number(b)) => a == b,
            (ConfigValue::String(a), ConfigValue::String(b)) => a == b,
            (ConfigValue::Array(a), ConfigValue::Array(b)) => Rc::ptr_eq(a, b),
            (ConfigValue::Object(a), ConfigValue::Object(b)) => Rc::ptr_eq(a, b),
            (ConfigValue::Function(a), ConfigValue::Function(b)) => Rc::ptr_eq(a, b),
            (ConfigValue::Image(a), ConfigValue::Image(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ConfigValue::Null,
            serde_json::Value::Bool(b) => ConfigValue::Bool(b),
            serde_json::Value::Number(n) => ConfigValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => ConfigValue::String(s),
            serde_json::Value::Array(items) => {
                ConfigValue::array(items.into_iter().map(ConfigValue::from))
            }
            serde_json::Value::Object(map) => {
                ConfigValue::object(map.into_iter().map(|(k, v)| (k, ConfigValue::from(v))))
            }
        }
    }
}

impl From<f64> for ConfigValue {
    fn from(n: f64) -> Self {
        ConfigValue::Number(n)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

/// Callback for a reported primitive mismatch: key, left value and right
/// value (`None` when the key is missing on the right).
pub type ChangeCallback<'a> = &'a mut dyn FnMut(&str, &ConfigValue, Option<&ConfigValue>);

/// One reported difference.
#[derive(Debug, Clone)]
pub struct ConfigChange {
    pub key: String,
    pub before: ConfigValue,
    pub after: Option<ConfigValue>,
}

struct Comparison<'a, 'k> {
    ignore_keys: &'k [&'k str],
    seen: HashSet<usize>,
    on_change: Option<ChangeCallback<'a>>,
}

impl Comparison<'_, '_> {
    fn visible_keys(&self, value: &ConfigValue) -> Vec<String> {
        value
            .keys()
            .into_iter()
            .filter(|k| !self.ignore_keys.contains(&k.as_str()))
            .collect()
    }

    fn equal(&mut self, a: &ConfigValue, b: &ConfigValue) -> bool {
        if let Some(addr) = a.container_addr() {
            if !self.seen.insert(addr) {
                return true;
            }
        }
        if a.strict_eq(b) {
            return true;
        }
        if a.is_null() || b.is_null() {
            return false;
        }
        if a.type_tag() != b.type_tag() {
            return false;
        }
        match (a, b) {
            (ConfigValue::Function(_), ConfigValue::Function(_))
            | (ConfigValue::Image(_), ConfigValue::Image(_)) => return true,
            _ => {}
        }
        if a.type_tag() != TypeTag::Object {
            return false;
        }

        let keys = self.visible_keys(a);
        if keys.len() != self.visible_keys(b).len() {
            return false;
        }
        let has_text = a.has_key("text");

        let mut same = true;
        for key in keys {
            let Some(left) = a.get(&key) else {
                continue;
            };
            let right = b.get(&key);
            if let Some(right) = &right {
                let skipped = matches!(
                    (&left, right),
                    (ConfigValue::Function(_), ConfigValue::Function(_))
                        | (ConfigValue::Image(_), ConfigValue::Image(_))
                );
                if skipped {
                    continue;
                }
            }
            if key == "height" && has_text {
                continue;
            }
            match &right {
                Some(right)
                    if left.type_tag() == TypeTag::Object && right.type_tag() == TypeTag::Object =>
                {
                    if !self.equal(&left, right) {
                        same = false;
                    }
                }
                _ => {
                    if !right.as_ref().is_some_and(|r| left.strict_eq(r)) {
                        if let Some(cb) = self.on_change.as_deref_mut() {
                            cb(&key, &left, right.as_ref());
                        }
                        same = false;
                    }
                }
            }
        }
        same
    }
}

/// Deep structural equality of two configuration values.
///
/// Keys in `ignore_keys` are neither counted nor compared, and `height` is
/// skipped on objects that carry a `text` key. Every primitive mismatch is
/// passed to `on_change`; the walk continues after a mismatch.
pub fn structurally_equal(
    a: &ConfigValue,
    b: &ConfigValue,
    ignore_keys: &[&str],
    on_change: Option<ChangeCallback<'_>>,
) -> bool {
    let mut cmp = Comparison {
        ignore_keys,
        seen: HashSet::new(),
        on_change,
    };
    cmp.equal(a, b)
}

/// Every primitive mismatch between `a` and `b`.
pub fn changes(a: &ConfigValue, b: &ConfigValue, ignore_keys: &[&str]) -> Vec<ConfigChange> {
    let mut out = Vec::new();
    let mut collect = |key: &str, before: &ConfigValue, after: Option<&ConfigValue>| {
        out.push(ConfigChange {
            key: key.to_string(),
            before: before.clone(),
            after: after.cloned(),
        });
    };
    structurally_equal(a, b, ignore_keys, Some(&mut collect));
    out
}

/// Copy every container of a tree. Callbacks and images are shared; cycles
/// are reproduced in the copy.
pub fn deep_clone(value: &ConfigValue) -> ConfigValue {
    fn walk(value: &ConfigValue, memo: &mut HashMap<usize, ConfigValue>) -> ConfigValue {
        let Some(addr) = value.container_addr() else {
            return value.clone();
        };
        if let Some(copy) = memo.get(&addr) {
            return copy.clone();
        }
        match value {
            ConfigValue::Array(items) => {
                let copy: ArrayRef = Rc::new(RefCell::new(Vec::new()));
                memo.insert(addr, ConfigValue::Array(copy.clone()));
                let cloned: Vec<ConfigValue> =
                    items.borrow().iter().map(|v| walk(v, memo)).collect();
                *copy.borrow_mut() = cloned;
                ConfigValue::Array(copy)
            }
            ConfigValue::Object(map) => {
                let copy: ObjectRef = Rc::new(RefCell::new(BTreeMap::new()));
                memo.insert(addr, ConfigValue::Object(copy.clone()));
                let cloned: BTreeMap<String, ConfigValue> = map
                    .borrow()
                    .iter()
                    .map(|(k, v)| (k.clone(), walk(v, memo)))
                    .collect();
                *copy.borrow_mut() = cloned;
                ConfigValue::Object(copy)
            }
            _ => value.clone(),
        }
    }
    walk(value, &mut HashMap::new())
}
