//! Layered attribute trees.

use serde::Serialize;
use serde_json::{Map, Value};

/// A node's exported attributes as a plain nested mapping.
///
/// Keys serialize in sorted order, which keeps generated documents stable
/// between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Manifest(Map<String, Value>);

/// Fields written into the mapping found at `scope`.
///
/// Applying a layer is an override, not a merge: each field replaces the
/// value already stored under its key wholesale, nested mappings included.
/// Keys the layer does not name are left alone.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub scope: &'static [&'static str],
    pub fields: Map<String, Value>,
}

impl Layer {
    /// Layer writing `fields` at the top of the manifest
    pub fn root(fields: Value) -> Self {
        Self::at(&[], fields)
    }

    /// Layer writing `fields` into the mapping at `scope`.
    ///
    /// Non-mapping `fields` carry nothing and give an empty layer.
    pub fn at(scope: &'static [&'static str], fields: Value) -> Self {
        let fields = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Layer { scope, fields }
    }
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `layer`, creating the mappings along its scope if missing.
    ///
    /// A scalar or sequence sitting on the scope path is replaced by an
    /// empty mapping first.
    pub fn apply(&mut self, layer: &Layer) {
        apply_at(&mut self.0, layer.scope, &layer.fields);
    }

    /// Builder form of [`apply`](Self::apply) over several layers in order
    pub fn layered<'a>(mut self, layers: impl IntoIterator<Item = &'a Layer>) -> Self {
        for layer in layers {
            self.apply(layer);
        }
        self
    }

    /// Look up a nested field by key path
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.0.get(*first)?;
        for key in rest {
            current = current.as_object()?.get(*key)?;
        }
        Some(current)
    }

    /// Keys of the mapping at `path`, in sorted order
    pub fn keys(&self, path: &[&str]) -> Vec<&str> {
        let map = if path.is_empty() {
            Some(&self.0)
        } else {
            self.get(path).and_then(Value::as_object)
        };
        map.map(|m| m.keys().map(String::as_str).collect()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Non-mapping values carry no fields and convert to an empty manifest.
impl From<Value> for Manifest {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Manifest(map),
            _ => Manifest::default(),
        }
    }
}

fn apply_at(map: &mut Map<String, Value>, scope: &[&str], fields: &Map<String, Value>) {
    let Some((key, rest)) = scope.split_first() else {
        for (key, value) in fields {
            map.insert(key.clone(), value.clone());
        }
        return;
    };
    let slot = map
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if let Value::Object(inner) = slot {
        apply_at(inner, rest, fields);
        return;
    }
    let mut inner = Map::new();
    apply_at(&mut inner, rest, fields);
    *slot = Value::Object(inner);
}
