//! JSON truss descriptions.
//!
//! A description mirrors the request body of a truss analysis service:
//!
//! ```json
//! {
//!   "nodes":    {"A": [0, 0], "B": [1, 0], "C": [0, 1]},
//!   "members":  [["A", "B"], {"start": "A", "end": "C", "ea": 2.0e8}],
//!   "supports": {"B": [true, true], "C": [true, true]},
//!   "loads":    {"A": [10, 0]}
//! }
//! ```
//!
//! Node ids may be strings or integers but may not contain commas, which join
//! the two ids of a member in the results. `supports` and `loads` are optional.
//! A key repeated inside `nodes`, `supports` or `loads` is rejected instead of
//! being silently summed or overwritten.

use std::fmt;
use std::marker::PhantomData;

use petgraph::graph::{EdgeIndex, NodeIndex};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::errors::AnalysisError;
use crate::geometry::{Force, Point};
use crate::truss::Truss;

/// A node id given as a JSON string or integer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub String);

impl NodeId {
    /// The id as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        /// Accepts string and integer ids.
        struct NodeIdVisitor;

        impl<'de> Visitor<'de> for NodeIdVisitor {
            type Value = NodeId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a node id (string or integer)")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<NodeId, E> {
                Ok(NodeId(value.to_owned()))
            }

            fn visit_string<E: de::Error>(self, value: String) -> Result<NodeId, E> {
                Ok(NodeId(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<NodeId, E> {
                Ok(NodeId(value.to_string()))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<NodeId, E> {
                Ok(NodeId(value.to_string()))
            }
        }

        deserializer.deserialize_any(NodeIdVisitor)
    }
}

/// Insertion-ordered map from node id to value that refuses repeated keys.
#[derive(Clone, Debug, PartialEq)]
pub struct UniqueMap<V>(Vec<(NodeId, V)>);

impl<V> Default for UniqueMap<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<V> UniqueMap<V> {
    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value stored for `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&V> {
        self.0
            .iter()
            .find(|(key, _)| key.as_str() == id)
            .map(|(_, value)| value)
    }

    /// Entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &V)> {
        self.0.iter().map(|(key, value)| (key, value))
    }
}

impl<V> FromIterator<(NodeId, V)> for UniqueMap<V> {
    fn from_iter<I: IntoIterator<Item = (NodeId, V)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for UniqueMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        /// Collects entries in document order.
        struct UniqueMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for UniqueMapVisitor<V> {
            type Value = UniqueMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map keyed by node id")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(NodeId, V)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<NodeId, V>()? {
                    if entries.iter().any(|(existing, _)| *existing == key) {
                        return Err(de::Error::custom(format_args!(
                            "duplicate node id `{key}`"
                        )));
                    }
                    entries.push((key, value));
                }
                Ok(UniqueMap(entries))
            }
        }

        deserializer.deserialize_map(UniqueMapVisitor(PhantomData))
    }
}

/// One member entry: a bare `[start, end]` pair or an object with rigidity.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged, deny_unknown_fields)]
pub enum MemberSpec {
    /// `["A", "B"]`
    Pair([NodeId; 2]),
    /// `{"start": "A", "end": "B", "ea": 2.0e8}`
    Detailed {
        /// Joint the member starts at.
        start: NodeId,
        /// Joint the member ends at.
        end: NodeId,
        /// Axial rigidity `EA`.
        #[serde(default)]
        ea: Option<f64>,
    },
}

impl MemberSpec {
    /// Start and end ids.
    #[must_use]
    pub fn endpoints(&self) -> (&NodeId, &NodeId) {
        match self {
            Self::Pair([start, end]) | Self::Detailed { start, end, .. } => (start, end),
        }
    }

    /// Axial rigidity, if given.
    #[must_use]
    pub fn ea(&self) -> Option<f64> {
        match self {
            Self::Pair(_) => None,
            Self::Detailed { ea, .. } => *ea,
        }
    }
}

/// Validated shape of a truss analysis request.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrussDescription {
    /// Node id to `[x, y]`.
    pub nodes: UniqueMap<[f64; 2]>,
    /// Members in input order.
    pub members: Vec<MemberSpec>,
    /// Node id to `[x_fixed, y_fixed]`.
    #[serde(default)]
    pub supports: UniqueMap<[bool; 2]>,
    /// Node id to `[fx, fy]`.
    #[serde(default)]
    pub loads: UniqueMap<[f64; 2]>,
}

impl TrussDescription {
    /// Parse a description from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::MalformedInput`] for syntax errors, missing or
    /// ill-typed fields, unknown fields and repeated node ids.
    ///
    /// # Examples
    /// ```
    /// use trussx2d::TrussDescription;
    ///
    /// let description = TrussDescription::from_json_str(
    ///     r#"{"nodes": {"1": [0, 0], "2": [1, 0]}, "members": [[1, 2]]}"#,
    /// )?;
    /// assert_eq!(description.nodes.len(), 2);
    /// # Ok::<(), trussx2d::AnalysisError>(())
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, AnalysisError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a [`Truss`] from the description.
    ///
    /// Nodes are numbered in document order and members keep their list order,
    /// so the n-th member becomes `EdgeIndex::new(n)`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidTopology`] when a member names an
    /// unknown node, and [`AnalysisError::MalformedInput`] when a member is
    /// listed twice, a rigidity is not positive, or a support or load names an
    /// unknown node.
    pub fn to_truss(&self) -> Result<Truss, AnalysisError> {
        let mut truss = Truss::new();
        for (id, &position) in self.nodes.iter() {
            truss.add_joint(id.as_str(), Point::from(position))?;
        }

        for (idx, spec) in self.members.iter().enumerate() {
            let member = EdgeIndex::new(idx);
            let (start, end) = spec.endpoints();
            let resolve = |id: &NodeId| {
                truss
                    .find_joint(id.as_str())
                    .ok_or_else(|| AnalysisError::InvalidTopology {
                        member,
                        node: id.0.clone(),
                    })
            };
            let (start, end) = (resolve(start)?, resolve(end)?);
            let added = truss.add_member(start, end)?;
            if let Some(ea) = spec.ea() {
                truss.set_member_rigidity(added, ea)?;
            }
        }

        for (id, &support) in self.supports.iter() {
            let joint = Self::known_joint(&truss, id, "support")?;
            truss.set_support(joint, support)?;
        }
        for (id, &load) in self.loads.iter() {
            let joint = Self::known_joint(&truss, id, "load")?;
            truss.set_load(joint, Force::from(load))?;
        }
        Ok(truss)
    }

    /// Resolve an id used by a support or load entry.
    fn known_joint(
        truss: &Truss,
        id: &NodeId,
        what: &str,
    ) -> Result<NodeIndex, AnalysisError> {
        truss.find_joint(id.as_str()).ok_or_else(|| {
            AnalysisError::MalformedInput(format!("{what} refers to unknown node `{id}`"))
        })
    }
}
