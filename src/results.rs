//! Packaged output of one analysis.

use petgraph::graph::{EdgeIndex, NodeIndex};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::geometry::{Displacement, Force};

/// Axial response of one member.
#[derive(Clone, Debug, PartialEq)]
pub struct MemberResult {
    /// Member identifier.
    pub member: EdgeIndex,
    /// Id of the joint the member starts at.
    pub start: String,
    /// Id of the joint the member ends at.
    pub end: String,
    /// Axial force; positive in tension, negative in compression.
    pub axial_force: f64,
}

/// Response of one joint.
#[derive(Clone, Debug, PartialEq)]
pub struct JointResult {
    /// Joint identifier.
    pub joint: NodeIndex,
    /// Joint id as given in the description.
    pub id: String,
    /// Solved translation; exactly zero in restrained directions.
    pub displacement: Displacement,
    /// Support reaction, present only for joints with at least one restraint.
    pub reaction: Option<Force>,
}

/// Displacements, member forces and reactions for a solved truss.
///
/// Members are kept in the order they were added and joints in enumeration
/// order. Serialising produces the JSON shape
///
/// ```text
/// {
///   "member_forces": { "A,B": -10.0, ... },
///   "displacements": { "A": [ux, uy], ... },
///   "reactions":     { "B": [rx, ry], ... }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrussResults {
    /// Per-member results in member order.
    members: Vec<MemberResult>,
    /// Per-joint results in joint order.
    joints: Vec<JointResult>,
}

impl TrussResults {
    /// Bundle already computed member and joint results.
    #[must_use]
    pub fn new(members: Vec<MemberResult>, joints: Vec<JointResult>) -> Self {
        Self { members, joints }
    }

    /// All member results in member order.
    #[must_use]
    pub fn members(&self) -> &[MemberResult] {
        &self.members
    }

    /// All joint results in joint order.
    #[must_use]
    pub fn joints(&self) -> &[JointResult] {
        &self.joints
    }

    /// Axial force in a member.
    #[must_use]
    pub fn member_axial_force(&self, member: EdgeIndex) -> Option<f64> {
        self.members
            .iter()
            .find(|result| result.member == member)
            .map(|result| result.axial_force)
    }

    /// Axial force in the member joining two joint ids, in either order.
    #[must_use]
    pub fn force_between(&self, a: &str, b: &str) -> Option<f64> {
        self.members
            .iter()
            .find(|result| {
                (result.start == a && result.end == b) || (result.start == b && result.end == a)
            })
            .map(|result| result.axial_force)
    }

    /// Displacement of a joint by index.
    #[must_use]
    pub fn joint_displacement(&self, joint: NodeIndex) -> Option<Displacement> {
        self.joints
            .iter()
            .find(|result| result.joint == joint)
            .map(|result| result.displacement)
    }

    /// Displacement of a joint by id.
    #[must_use]
    pub fn displacement(&self, id: &str) -> Option<Displacement> {
        self.joint(id).map(|result| result.displacement)
    }

    /// Support reaction at a joint by id, if it is supported.
    #[must_use]
    pub fn reaction(&self, id: &str) -> Option<Force> {
        self.joint(id).and_then(|result| result.reaction)
    }

    /// Member carrying the largest force magnitude.
    #[must_use]
    pub fn max_force_member(&self) -> Option<&MemberResult> {
        self.members
            .iter()
            .max_by(|a, b| a.axial_force.abs().total_cmp(&b.axial_force.abs()))
    }

    /// Joint with the largest displacement magnitude.
    #[must_use]
    pub fn max_displacement_joint(&self) -> Option<&JointResult> {
        self.joints.iter().max_by(|a, b| {
            a.displacement
                .magnitude()
                .total_cmp(&b.displacement.magnitude())
        })
    }

    /// Look up a joint result by id.
    fn joint(&self, id: &str) -> Option<&JointResult> {
        self.joints.iter().find(|result| result.id == id)
    }
}

impl Serialize for TrussResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TrussResults", 3)?;
        state.serialize_field("member_forces", &MemberForces(&self.members))?;
        state.serialize_field("displacements", &Displacements(&self.joints))?;
        state.serialize_field("reactions", &Reactions(&self.joints))?;
        state.end()
    }
}

/// Member forces keyed by `"start,end"`.
struct MemberForces<'a>(&'a [MemberResult]);

impl Serialize for MemberForces<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for member in self.0 {
            let key = format!("{},{}", member.start, member.end);
            map.serialize_entry(&key, &member.axial_force)?;
        }
        map.end()
    }
}

/// Displacements keyed by joint id.
struct Displacements<'a>(&'a [JointResult]);

impl Serialize for Displacements<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for joint in self.0 {
            let Displacement { x, y } = joint.displacement;
            map.serialize_entry(&joint.id, &[x, y])?;
        }
        map.end()
    }
}

/// Reactions keyed by joint id, supported joints only.
struct Reactions<'a>(&'a [JointResult]);

impl Serialize for Reactions<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for joint in self.0 {
            if let Some(Force { x, y }) = joint.reaction {
                map.serialize_entry(&joint.id, &[x, y])?;
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TrussResults {
        TrussResults::new(
            vec![
                MemberResult {
                    member: EdgeIndex::new(0),
                    start: "A".into(),
                    end: "B".into(),
                    axial_force: -10.0,
                },
                MemberResult {
                    member: EdgeIndex::new(1),
                    start: "A".into(),
                    end: "C".into(),
                    axial_force: 2.5,
                },
            ],
            vec![
                JointResult {
                    joint: NodeIndex::new(0),
                    id: "A".into(),
                    displacement: Displacement::new(10.0, 0.0),
                    reaction: None,
                },
                JointResult {
                    joint: NodeIndex::new(1),
                    id: "B".into(),
                    displacement: Displacement::default(),
                    reaction: Some(Force::new(10.0, 0.0)),
                },
            ],
        )
    }

    #[test]
    fn lookups_by_id_and_index() {
        let results = sample();
        assert_eq!(results.force_between("B", "A"), Some(-10.0));
        assert_eq!(results.force_between("B", "C"), None);
        assert_eq!(results.member_axial_force(EdgeIndex::new(1)), Some(2.5));
        assert_eq!(results.displacement("A"), Some(Displacement::new(10.0, 0.0)));
        assert_eq!(results.reaction("A"), None);
        assert_eq!(results.reaction("B"), Some(Force::new(10.0, 0.0)));
        assert_eq!(
            results.max_force_member().map(|member| member.member),
            Some(EdgeIndex::new(0))
        );
        assert_eq!(
            results.max_displacement_joint().map(|joint| joint.id.as_str()),
            Some("A")
        );
    }

    #[test]
    fn serialises_to_keyed_maps() {
        let json = serde_json::to_string(&sample()).expect("serialisable");
        assert_eq!(
            json,
            r#"{"member_forces":{"A,B":-10.0,"A,C":2.5},"displacements":{"A":[10.0,0.0],"B":[0.0,0.0]},"reactions":{"B":[10.0,0.0]}}"#
        );
    }
}
