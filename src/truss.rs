//! Core data structures and the stiffness-method pipeline.

use std::collections::HashMap;

use nalgebra::{DMatrix, DVector};
use petgraph::graph::{EdgeIndex, Graph, NodeIndex};

use crate::assembly::assemble;
use crate::boundary::DofPartition;
use crate::dof::DofMap;
use crate::element::ElementStiffness;
use crate::errors::{AnalysisError, TrussEditError};
use crate::geometry::{Displacement, Force, Point};
use crate::options::SolverOptions;
use crate::recovery::{member_forces, reactions};
use crate::results::{JointResult, MemberResult, TrussResults};
use crate::solver::solve_displacements;

/// Internal representation of a truss joint.
#[derive(Clone, Debug)]
struct Joint {
    /// Id supplied by the caller.
    id: String,
    /// Position of the joint.
    position: Point,
    /// Whether the X and Y translations are restrained.
    support: Option<[bool; 2]>,
    /// External load applied to the joint.
    load: Force,
}

impl Joint {
    /// Create a free, unloaded joint.
    fn new(id: String, position: Point) -> Self {
        Self {
            id,
            position,
            support: None,
            load: Force::default(),
        }
    }
}

/// Internal representation of a truss member.
#[derive(Clone, Debug, Default)]
struct Member {
    /// Axial rigidity `EA`, if assigned.
    axial_rigidity: Option<f64>,
}

/// Container for a pin-jointed planar truss model.
///
/// The model only holds the input description. Every call to
/// [`analyse`](Self::analyse) builds its own stiffness matrix, load vector and
/// displacement vector and hands back a fresh [`TrussResults`].
#[derive(Clone, Debug, Default)]
pub struct Truss {
    /// Underlying graph storage for joints and members.
    graph: Graph<Joint, Member>,
    /// Lookup from joint id to graph index.
    ids: HashMap<String, NodeIndex>,
}

impl Truss {
    /// Create an empty truss.
    ///
    /// # Examples
    /// ```
    /// use trussx2d::Truss;
    ///
    /// let truss = Truss::new();
    /// assert_eq!(truss.joint_count(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the number of joints in the truss.
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of members in the truss.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Add a new joint with a unique id.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::DuplicateJoint`] when `id` is already in use
    /// and [`TrussEditError::InvalidJointId`] when it contains a comma, which
    /// separates the joint ids of a member in serialised results.
    ///
    /// # Examples
    /// ```
    /// use trussx2d::{point, Truss};
    ///
    /// let mut truss = Truss::new();
    /// let joint = truss.add_joint("A", point(0.0, 0.0)).expect("new id");
    /// assert_eq!(truss.joint_count(), 1);
    /// assert_eq!(truss.find_joint("A"), Some(joint));
    /// assert!(truss.add_joint("A", point(1.0, 0.0)).is_err());
    /// ```
    pub fn add_joint(
        &mut self,
        id: impl Into<String>,
        position: Point,
    ) -> Result<NodeIndex, TrussEditError> {
        let id = id.into();
        if id.contains(',') {
            return Err(TrussEditError::InvalidJointId(id));
        }
        if self.ids.contains_key(&id) {
            return Err(TrussEditError::DuplicateJoint(id));
        }
        let joint = self.graph.add_node(Joint::new(id.clone(), position));
        self.ids.insert(id, joint);
        Ok(joint)
    }

    /// Look up a joint by id.
    #[must_use]
    pub fn find_joint(&self, id: &str) -> Option<NodeIndex> {
        self.ids.get(id).copied()
    }

    /// Return the id of a joint.
    #[must_use]
    pub fn joint_id(&self, joint: NodeIndex) -> Option<&str> {
        self.graph.node_weight(joint).map(|joint| joint.id.as_str())
    }

    /// Return the position of a joint.
    #[must_use]
    pub fn joint_position(&self, joint: NodeIndex) -> Option<Point> {
        self.graph.node_weight(joint).map(|joint| joint.position)
    }

    /// Update the position of an existing joint.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when `joint` is not part of this truss.
    pub fn move_joint(&mut self, joint: NodeIndex, position: Point) -> Result<(), TrussEditError> {
        self.joint_mut(joint)?.position = position;
        Ok(())
    }

    /// Connect two joints with a new member running from `start` to `end`.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when either joint is not part of
    /// this truss and [`TrussEditError::DuplicateMember`] when the two joints are
    /// already connected, in either direction.
    pub fn add_member(
        &mut self,
        start: NodeIndex,
        end: NodeIndex,
    ) -> Result<EdgeIndex, TrussEditError> {
        for joint in [start, end] {
            if self.graph.node_weight(joint).is_none() {
                return Err(TrussEditError::UnknownJoint(joint));
            }
        }
        if self.graph.find_edge_undirected(start, end).is_some() {
            return Err(TrussEditError::DuplicateMember {
                start: self.graph[start].id.clone(),
                end: self.graph[end].id.clone(),
            });
        }
        Ok(self.graph.add_edge(start, end, Member::default()))
    }

    /// Return the start and end joints of a member.
    #[must_use]
    pub fn member_endpoints(&self, member: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(member)
    }

    /// Set the restraint state for a joint.
    ///
    /// Each entry in `support` corresponds to the X and Y directions
    /// respectively. A value of `true` indicates that the degree of freedom is
    /// fixed.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when `joint` is not part of this truss.
    pub fn set_support(
        &mut self,
        joint: NodeIndex,
        support: [bool; 2],
    ) -> Result<(), TrussEditError> {
        self.joint_mut(joint)?.support = Some(support);
        Ok(())
    }

    /// Apply a point load to a joint, replacing any previous load.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when `joint` is not part of this truss.
    pub fn set_load(&mut self, joint: NodeIndex, load: Force) -> Result<(), TrussEditError> {
        self.joint_mut(joint)?.load = load;
        Ok(())
    }

    /// Set the axial rigidity `EA` of a member.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownMember`] when `member` is not part of this
    /// truss and [`TrussEditError::NonPositiveRigidity`] when `ea` is not a
    /// strictly positive finite number.
    ///
    /// # Examples
    /// ```
    /// use trussx2d::{point, Truss, TrussEditError};
    ///
    /// let mut truss = Truss::new();
    /// let a = truss.add_joint("A", point(0.0, 0.0))?;
    /// let b = truss.add_joint("B", point(1.0, 0.0))?;
    /// let member = truss.add_member(a, b)?;
    ///
    /// let error = truss
    ///     .set_member_rigidity(member, 0.0)
    ///     .expect_err("zero rigidity rejected");
    /// assert!(matches!(error, TrussEditError::NonPositiveRigidity { .. }));
    /// # Ok::<(), TrussEditError>(())
    /// ```
    pub fn set_member_rigidity(&mut self, member: EdgeIndex, ea: f64) -> Result<(), TrussEditError> {
        let edge = self
            .graph
            .edge_weight_mut(member)
            .ok_or(TrussEditError::UnknownMember(member))?;
        if !ea.is_finite() || ea <= 0.0 {
            return Err(TrussEditError::NonPositiveRigidity { member, ea });
        }
        edge.axial_rigidity = Some(ea);
        Ok(())
    }

    /// Set the same axial rigidity on every member.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::NonPositiveRigidity`] when `ea` is not a
    /// strictly positive finite number.
    pub fn set_rigidity_for_all(&mut self, ea: f64) -> Result<(), TrussEditError> {
        for member in self.graph.edge_indices() {
            self.set_member_rigidity(member, ea)?;
        }
        Ok(())
    }

    /// Assemble the global stiffness matrix without solving.
    ///
    /// # Errors
    ///
    /// Returns the same input errors as [`analyse`](Self::analyse), but never
    /// [`AnalysisError::SingularSystem`].
    pub fn stiffness_matrix(&self, options: &SolverOptions) -> Result<DMatrix<f64>, AnalysisError> {
        options.validate()?;
        self.validate()?;
        let dofs = self.dof_map();
        let elements = self.elements(options)?;
        Ok(assemble(&dofs, &elements, self.loads())?.stiffness)
    }

    /// Analyse the truss under the configured loads.
    ///
    /// The pipeline runs DOF numbering, element construction, assembly,
    /// partitioning, the reduced solve and force recovery, in that order, on
    /// storage owned by this call alone.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::MalformedInput`] for invalid tolerances,
    /// non-finite coordinates or loads, and inputs so large that forces or
    /// reactions overflow. Returns [`AnalysisError::DegenerateMember`] or
    /// [`AnalysisError::MissingRigidity`] for unusable members, and
    /// [`AnalysisError::SingularSystem`] when the supports and connectivity do
    /// not stabilise the structure.
    ///
    /// # Examples
    /// ```
    /// use trussx2d::{force, point, SolverOptions, Truss};
    ///
    /// let mut truss = Truss::new();
    /// let a = truss.add_joint("A", point(0.0, 0.0))?;
    /// let b = truss.add_joint("B", point(2.0, 0.0))?;
    /// let ab = truss.add_member(a, b)?;
    /// truss.set_member_rigidity(ab, 4.0)?;
    /// truss.set_support(a, [true, true])?;
    /// truss.set_support(b, [false, true])?;
    /// truss.set_load(b, force(1.0, 0.0))?;
    ///
    /// let results = truss.analyse(&SolverOptions::default())?;
    /// assert!((results.member_axial_force(ab).unwrap() - 1.0).abs() < 1e-12);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn analyse(&self, options: &SolverOptions) -> Result<TrussResults, AnalysisError> {
        options.validate()?;
        self.validate()?;
        let dofs = self.dof_map();
        let elements = self.elements(options)?;
        let system = assemble(&dofs, &elements, self.loads())?;
        let partition = DofPartition::new(&dofs, self.supports())?;
        let displacements =
            solve_displacements(&system, &partition, options.singularity_tolerance)?;
        let forces = member_forces(&dofs, &elements, &displacements)?;
        let support_reactions = reactions(&system, &partition, &displacements);
        if forces.iter().chain(support_reactions.iter()).any(|value| !value.is_finite()) {
            return Err(AnalysisError::MalformedInput(
                "member forces or reactions overflowed".into(),
            ));
        }
        Ok(self.package(
            &dofs,
            &elements,
            &forces,
            &displacements,
            &support_reactions,
        ))
    }

    /// Fetch a joint for mutation.
    fn joint_mut(&mut self, joint: NodeIndex) -> Result<&mut Joint, TrussEditError> {
        self.graph
            .node_weight_mut(joint)
            .ok_or(TrussEditError::UnknownJoint(joint))
    }

    /// Reject non-finite positions and loads before any matrix work.
    fn validate(&self) -> Result<(), AnalysisError> {
        for joint in self.graph.node_weights() {
            if !joint.position.is_finite() {
                return Err(AnalysisError::MalformedInput(format!(
                    "joint `{}` has a non-finite position",
                    joint.id
                )));
            }
            if !joint.load.is_finite() {
                return Err(AnalysisError::MalformedInput(format!(
                    "joint `{}` has a non-finite load",
                    joint.id
                )));
            }
        }
        Ok(())
    }

    /// Number the joints in graph order.
    fn dof_map(&self) -> DofMap {
        DofMap::new(self.graph.node_indices())
    }

    /// Build the element stiffness for every member, in member order.
    fn elements(&self, options: &SolverOptions) -> Result<Vec<ElementStiffness>, AnalysisError> {
        self.graph
            .raw_edges()
            .iter()
            .enumerate()
            .map(|(idx, edge)| {
                let (start, end) = (edge.source(), edge.target());
                ElementStiffness::build(
                    EdgeIndex::new(idx),
                    (start, self.graph[start].position),
                    (end, self.graph[end].position),
                    edge.weight.axial_rigidity,
                    options,
                )
            })
            .collect()
    }

    /// Non-zero joint loads.
    fn loads(&self) -> impl Iterator<Item = (NodeIndex, Force)> + '_ {
        self.graph
            .node_indices()
            .map(|node| (node, self.graph[node].load))
            .filter(|(_, load)| *load != Force::default())
    }

    /// Restraint flags of supported joints.
    fn supports(&self) -> impl Iterator<Item = (NodeIndex, [bool; 2])> + '_ {
        self.graph
            .node_indices()
            .filter_map(|node| self.graph[node].support.map(|support| (node, support)))
    }

    /// Attach ids to the raw solver output.
    fn package(
        &self,
        dofs: &DofMap,
        elements: &[ElementStiffness],
        forces: &[f64],
        displacements: &DVector<f64>,
        reactions: &DVector<f64>,
    ) -> TrussResults {
        let members = elements
            .iter()
            .zip(forces)
            .map(|(element, &axial_force)| MemberResult {
                member: element.member,
                start: self.graph[element.start].id.clone(),
                end: self.graph[element.end].id.clone(),
                axial_force,
            })
            .collect();
        let joints = self
            .graph
            .node_indices()
            .filter_map(|node| {
                let [x, y] = dofs.dofs(node)?;
                let joint = &self.graph[node];
                Some(JointResult {
                    joint: node,
                    id: joint.id.clone(),
                    displacement: Displacement::new(displacements[x], displacements[y]),
                    reaction: joint
                        .support
                        .filter(|support| support.iter().any(|&fixed| fixed))
                        .map(|_| Force::new(reactions[x], reactions[y])),
                })
            })
            .collect();
        TrussResults::new(members, joints)
    }
}
