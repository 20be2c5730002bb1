//! Shared primitives and strongly-typed identifiers for the radiant crates.
//!
//! ```rust
//! use rcommon::{GenerationOptions, MetadataMap, SessionId, TraceId};
//!
//! let session = SessionId::from("telegram:42");
//! let trace = TraceId::new("turn-1");
//! let mut metadata = MetadataMap::new();
//! metadata.insert("platform".to_string(), "telegram".to_string());
//!
//! let options = GenerationOptions::default().with_temperature(0.3).with_max_tokens(500);
//! assert_eq!(session.as_str(), "telegram:42");
//! assert_eq!(trace.to_string(), "turn-1");
//! assert_eq!(options.max_tokens, Some(500));
//! ```

pub mod future {
    //! Shared async future aliases.
    //!
    //! ```rust
    //! use rcommon::BoxFuture;
    //!
    //! fn str_len<'a>(value: &'a str) -> BoxFuture<'a, usize> {
    //!     Box::pin(async move { value.len() })
    //! }
    //!
    //! let _future = str_len("hello");
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod context {
    //! Session/trace identifiers and free-form metadata shared across crates.

    use std::collections::HashMap;
    use std::fmt::{Display, Formatter};

    pub type MetadataMap = HashMap<String, String>;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct SessionId(String);

    impl SessionId {
        pub fn new(value: impl Into<String>) -> Self {
            Self(value.into())
        }

        pub fn as_str(&self) -> &str {
            self.0.as_str()
        }
    }

    impl Display for SessionId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<String> for SessionId {
        fn from(value: String) -> Self {
            Self(value)
        }
    }

    impl From<&str> for SessionId {
        fn from(value: &str) -> Self {
            Self(value.to_string())
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct TraceId(String);

    impl TraceId {
        pub fn new(value: impl Into<String>) -> Self {
            Self(value.into())
        }

        pub fn as_str(&self) -> &str {
            self.0.as_str()
        }
    }

    impl Display for TraceId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<String> for TraceId {
        fn from(value: String) -> Self {
            Self(value)
        }
    }

    impl From<&str> for TraceId {
        fn from(value: &str) -> Self {
            Self(value.to_string())
        }
    }
}

pub mod model {
    //! Generation settings attached to every model request.
    //!
    //! ```rust
    //! use rcommon::GenerationOptions;
    //!
    //! let options = GenerationOptions::default()
    //!     .with_temperature(0.2)
    //!     .with_max_tokens(128);
    //!
    //! assert_eq!(options.temperature, Some(0.2));
    //! assert_eq!(options.max_tokens, Some(128));
    //! ```

    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct GenerationOptions {
        pub temperature: Option<f32>,
        pub max_tokens: Option<u32>,
    }

    impl GenerationOptions {
        pub fn with_temperature(mut self, temperature: f32) -> Self {
            self.temperature = Some(temperature);
            self
        }

        pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
            self.max_tokens = Some(max_tokens);
            self
        }

        /// Fills unset fields from `defaults`.
        pub fn or(self, defaults: GenerationOptions) -> Self {
            Self {
                temperature: self.temperature.or(defaults.temperature),
                max_tokens: self.max_tokens.or(defaults.max_tokens),
            }
        }
    }
}

pub mod registry {
    //! Insertion-ordered registry map used by the tool registry.
    //!
    //! Iteration follows registration order; replacing a key keeps its slot.
    //!
    //! ```rust
    //! use rcommon::Registry;
    //!
    //! let mut registry = Registry::new();
    //! registry.insert("beta".to_string(), 2_u32);
    //! registry.insert("alpha".to_string(), 1_u32);
    //!
    //! assert_eq!(registry.get("alpha"), Some(&1));
    //! assert_eq!(registry.values().copied().collect::<Vec<_>>(), vec![2, 1]);
    //! ```

    use std::borrow::Borrow;
    use std::collections::HashMap;
    use std::hash::Hash;

    #[derive(Debug, Clone)]
    pub struct Registry<K, V> {
        index: HashMap<K, usize>,
        entries: Vec<(K, V)>,
    }

    impl<K, V> Default for Registry<K, V>
    where
        K: Eq + Hash,
    {
        fn default() -> Self {
            Self {
                index: HashMap::new(),
                entries: Vec::new(),
            }
        }
    }

    impl<K, V> Registry<K, V>
    where
        K: Eq + Hash + Clone,
    {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert(&mut self, key: K, value: V) -> Option<V> {
            if let Some(&slot) = self.index.get(&key) {
                return Some(std::mem::replace(&mut self.entries[slot].1, value));
            }

            self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key, value));
            None
        }

        pub fn get<Q>(&self, key: &Q) -> Option<&V>
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.index.get(key).map(|&slot| &self.entries[slot].1)
        }

        pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            let slot = self.index.remove(key)?;
            let (_, value) = self.entries.remove(slot);
            for position in self.index.values_mut() {
                if *position > slot {
                    *position -= 1;
                }
            }
            Some(value)
        }

        pub fn contains_key<Q>(&self, key: &Q) -> bool
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.index.contains_key(key)
        }

        pub fn keys(&self) -> impl Iterator<Item = &K> {
            self.entries.iter().map(|(key, _)| key)
        }

        pub fn values(&self) -> impl Iterator<Item = &V> {
            self.entries.iter().map(|(_, value)| value)
        }

        pub fn len(&self) -> usize {
            self.entries.len()
        }

        pub fn is_empty(&self) -> bool {
            self.entries.is_empty()
        }
    }
}

pub use context::{MetadataMap, SessionId, TraceId};
pub use future::BoxFuture;
pub use model::GenerationOptions;
pub use registry::Registry;
