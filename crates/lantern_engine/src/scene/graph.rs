//! Hierarchical scene graph with synchronous world-matrix propagation
//!
//! Nodes live in a flat slotmap arena and refer to each other by stable
//! [`NodeId`] handles; the parent link is non-owning, so ownership cycles
//! are impossible by construction and reparenting cycles are rejected with
//! an O(depth) ancestor walk.
//!
//! The invariant maintained by every mutating operation:
//!
//! ```text
//! world = parent.world * (local * scale)        (non-root)
//! world = local * scale                          (root)
//! ```
//!
//! holds immediately after the operation returns — no node ever observes a
//! stale world transform.

use slotmap::SlotMap;
use thiserror::Error;

use crate::foundation::math::{normal_matrix, Mat4, Vec3};
use crate::render::api::GraphicsApi;
use crate::render::context::FrameContext;
use crate::render::RenderResult;
use crate::shapes::Shape;

slotmap::new_key_type! {
    /// Stable handle to a scene-graph node
    pub struct NodeId;
}

/// Structural errors raised by graph mutations
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SceneGraphError {
    /// The referenced node does not exist (or was removed)
    #[error("unknown scene-graph node")]
    UnknownNode,

    /// The requested parentage would make a node its own ancestor
    #[error("reparenting would make a node its own ancestor")]
    WouldFormCycle,
}

/// What a node contributes to rendering
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Pure transform node: propagates to children, draws nothing
    Group,
    /// Carries a shape drawn with this node's world transform
    Drawable(Shape),
}

/// One transform node
#[derive(Debug, Clone)]
pub struct Node {
    local: Mat4,
    shape_scale: Vec3,
    world: Mat4,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

impl Node {
    /// Transform relative to the parent node
    pub fn local_transform(&self) -> &Mat4 {
        &self.local
    }

    /// Non-uniform scale applied to this node's own geometry
    pub fn shape_scale(&self) -> Vec3 {
        self.shape_scale
    }

    /// Derived transform into world coordinates
    pub fn world_transform(&self) -> &Mat4 {
        &self.world
    }

    /// Parent handle, if any
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child handles in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Node kind (group or drawable)
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    fn local_times_scale(&self) -> Mat4 {
        self.local * Mat4::new_nonuniform_scaling(&self.shape_scale)
    }
}

/// Arena of transform nodes plus the ordered root list
///
/// Root insertion order is render order.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, Node>,
    roots: Vec<NodeId>,
}

impl SceneGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes in the graph
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root handles in insertion (= render) order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Borrow a node
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// A node's world transform
    pub fn world_transform(&self, id: NodeId) -> Result<Mat4, SceneGraphError> {
        self.nodes
            .get(id)
            .map(|n| n.world)
            .ok_or(SceneGraphError::UnknownNode)
    }

    /// Insert a node under `parent` (or as a root when `None`)
    ///
    /// The new node's world transform is computed before this returns.
    pub fn insert(
        &mut self,
        parent: Option<NodeId>,
        local: Mat4,
        shape_scale: Vec3,
        kind: NodeKind,
    ) -> Result<NodeId, SceneGraphError> {
        if let Some(p) = parent {
            if !self.nodes.contains_key(p) {
                return Err(SceneGraphError::UnknownNode);
            }
        }
        let id = self.nodes.insert(Node {
            local,
            shape_scale,
            world: Mat4::identity(),
            parent,
            children: Vec::new(),
            kind,
        });
        match parent {
            Some(p) => self.nodes[p].children.push(id),
            None => self.roots.push(id),
        }
        self.recompute_world(id);
        Ok(id)
    }

    /// Make `child` a child of `parent`, detaching it from its previous
    /// parent (or from the root list)
    ///
    /// Fails with [`SceneGraphError::WouldFormCycle`] when `child == parent`
    /// or `child` is an ancestor of `parent`; the graph is left unchanged.
    /// On success the child's subtree is recomputed relative to its new
    /// parent.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneGraphError> {
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            return Err(SceneGraphError::UnknownNode);
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(SceneGraphError::WouldFormCycle);
        }

        self.detach(child);
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
        self.recompute_world(child);
        Ok(())
    }

    /// Detach a node from its parent, making it a root
    pub fn make_root(&mut self, id: NodeId) -> Result<(), SceneGraphError> {
        if !self.nodes.contains_key(id) {
            return Err(SceneGraphError::UnknownNode);
        }
        if self.nodes[id].parent.is_some() {
            self.detach(id);
            self.roots.push(id);
            self.recompute_world(id);
        }
        Ok(())
    }

    /// Replace a node's local transform
    ///
    /// A value-equal transform is a no-op, avoiding a redundant
    /// recomputation cascade over the subtree.
    pub fn set_local_transform(&mut self, id: NodeId, local: Mat4) -> Result<(), SceneGraphError> {
        let node = self.nodes.get_mut(id).ok_or(SceneGraphError::UnknownNode)?;
        if node.local == local {
            return Ok(());
        }
        node.local = local;
        self.recompute_world(id);
        Ok(())
    }

    /// Replace a node's shape scale (value-equal scale is a no-op)
    pub fn set_shape_scale(&mut self, id: NodeId, scale: Vec3) -> Result<(), SceneGraphError> {
        let node = self.nodes.get_mut(id).ok_or(SceneGraphError::UnknownNode)?;
        if node.shape_scale == scale {
            return Ok(());
        }
        node.shape_scale = scale;
        self.recompute_world(id);
        Ok(())
    }

    /// Draw the subtree rooted at `id` with full material binding
    ///
    /// For each drawable node: binds its material, uploads `model_m`,
    /// `mvp_m` and the inverse-transpose `normal_m`, then issues the draw
    /// call. Light uniforms must already be uploaded to the active program.
    pub fn render(
        &self,
        id: NodeId,
        ctx: &FrameContext,
        gfx: &mut dyn GraphicsApi,
    ) -> RenderResult<()> {
        self.render_with(id, ctx, gfx, &mut |_, _| {})
    }

    /// Like [`SceneGraph::render`], with a hook run per drawable after its
    /// material is bound and before the draw call
    ///
    /// The lit pass uses the hook to place shadow samplers on the texture
    /// units just past the drawable's material textures.
    pub fn render_with(
        &self,
        id: NodeId,
        ctx: &FrameContext,
        gfx: &mut dyn GraphicsApi,
        before_draw: &mut dyn FnMut(&Shape, &mut dyn GraphicsApi),
    ) -> RenderResult<()> {
        let Some(node) = self.nodes.get(id) else {
            return Ok(());
        };
        if let NodeKind::Drawable(shape) = &node.kind {
            shape.material.bind(gfx);
            gfx.upload_mat4("model_m", &node.world);
            let mvp = ctx.projection * ctx.view * node.world;
            gfx.upload_mat4("mvp_m", &mvp);
            gfx.upload_mat4("normal_m", &normal_matrix(&node.world));
            before_draw(shape, gfx);
            gfx.draw_mesh(shape.mesh)?;
        }
        for child in &node.children {
            self.render_with(*child, ctx, gfx, before_draw)?;
        }
        Ok(())
    }

    /// Draw the subtree rooted at `id` for a depth-only pass
    ///
    /// Uploads only `model_m` and issues the draw call; no material binding.
    pub fn render_depth_only(&self, id: NodeId, gfx: &mut dyn GraphicsApi) -> RenderResult<()> {
        let Some(node) = self.nodes.get(id) else {
            return Ok(());
        };
        if let NodeKind::Drawable(shape) = &node.kind {
            gfx.upload_mat4("model_m", &node.world);
            gfx.draw_mesh(shape.mesh)?;
        }
        for child in &node.children {
            self.render_depth_only(*child, gfx)?;
        }
        Ok(())
    }

    /// Whether `candidate` is an ancestor of `node`
    fn is_ancestor(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut current = self.nodes.get(node).and_then(|n| n.parent);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Remove the node's edge from its parent's child list or the root list
    fn detach(&mut self, id: NodeId) {
        match self.nodes[id].parent.take() {
            Some(parent) => self.nodes[parent].children.retain(|c| *c != id),
            None => self.roots.retain(|r| *r != id),
        }
    }

    /// Top-down recomputation of `id`'s world matrix and its descendants'
    fn recompute_world(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let local_scaled = node.local_times_scale();
        let parent_world = node.parent.and_then(|p| self.nodes.get(p)).map(|p| p.world);
        let world = match parent_world {
            Some(pw) => pw * local_scaled,
            None => local_scaled,
        };
        self.nodes[id].world = world;

        let children = self.nodes[id].children.clone();
        for child in children {
            self.recompute_world(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn translation(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::new_translation(&Vec3::new(x, y, z))
    }

    fn uniform(s: f32) -> Vec3 {
        Vec3::new(s, s, s)
    }

    /// Reference world matrix computed independently of the graph's own
    /// incremental bookkeeping.
    fn reference_world(graph: &SceneGraph, id: NodeId) -> Mat4 {
        let node = graph.node(id).expect("node exists");
        let own = node.local_transform() * Mat4::new_nonuniform_scaling(&node.shape_scale());
        match node.parent() {
            Some(p) => reference_world(graph, p) * own,
            None => own,
        }
    }

    #[test]
    fn world_matches_reference_for_depth_three_tree() {
        let mut graph = SceneGraph::new();
        let root = graph
            .insert(None, translation(1.0, 0.0, 0.0), uniform(2.0), NodeKind::Group)
            .expect("insert root");
        let mid = graph
            .insert(
                Some(root),
                Mat4::from_axis_angle(&Vec3::y_axis(), 0.5) * translation(0.0, 1.0, 0.0),
                Vec3::new(1.0, 2.0, 1.0),
                NodeKind::Group,
            )
            .expect("insert mid");
        let leaf = graph
            .insert(Some(mid), translation(0.0, 0.0, 3.0), uniform(0.5), NodeKind::Group)
            .expect("insert leaf");

        for id in [root, mid, leaf] {
            assert_relative_eq!(
                graph.world_transform(id).expect("world"),
                reference_world(&graph, id),
                epsilon = 1e-5
            );
        }
    }

    #[test]
    fn mutating_local_transform_recomputes_descendants() {
        let mut graph = SceneGraph::new();
        let root = graph
            .insert(None, Mat4::identity(), uniform(1.0), NodeKind::Group)
            .expect("root");
        let child = graph
            .insert(Some(root), translation(0.0, 1.0, 0.0), uniform(1.0), NodeKind::Group)
            .expect("child");
        let grandchild = graph
            .insert(Some(child), translation(0.0, 0.0, 1.0), uniform(1.0), NodeKind::Group)
            .expect("grandchild");

        graph
            .set_local_transform(root, translation(5.0, 0.0, 0.0))
            .expect("set local");
        graph.set_shape_scale(child, uniform(3.0)).expect("set scale");

        for id in [root, child, grandchild] {
            assert_relative_eq!(
                graph.world_transform(id).expect("world"),
                reference_world(&graph, id),
                epsilon = 1e-5
            );
        }
    }

    #[test]
    fn value_equal_mutation_is_a_no_op() {
        let mut graph = SceneGraph::new();
        let local = translation(1.0, 2.0, 3.0);
        let root = graph
            .insert(None, local, uniform(2.0), NodeKind::Group)
            .expect("root");
        let before = graph.world_transform(root).expect("world");

        graph.set_local_transform(root, local).expect("same local");
        graph.set_shape_scale(root, uniform(2.0)).expect("same scale");

        assert_eq!(graph.world_transform(root).expect("world"), before);
    }

    #[test]
    fn reparenting_twice_leaves_one_parent_edge() {
        let mut graph = SceneGraph::new();
        let a = graph
            .insert(None, translation(1.0, 0.0, 0.0), uniform(1.0), NodeKind::Group)
            .expect("a");
        let a_leaf = graph
            .insert(Some(a), translation(0.0, 1.0, 0.0), uniform(1.0), NodeKind::Group)
            .expect("a leaf");
        let b = graph
            .insert(None, translation(0.0, 0.0, 7.0), uniform(1.0), NodeKind::Group)
            .expect("b");
        let c = graph
            .insert(None, translation(0.0, -4.0, 0.0), uniform(2.0), NodeKind::Group)
            .expect("c");

        graph.add_child(b, a).expect("A under B");
        graph.add_child(c, a).expect("A under C");

        assert_eq!(graph.node(a).expect("a").parent(), Some(c));
        assert!(!graph.node(b).expect("b").children().contains(&a));
        assert!(graph.node(c).expect("c").children().contains(&a));
        assert!(!graph.roots().contains(&a));

        // A and its descendant are now positioned relative to C.
        for id in [a, a_leaf] {
            assert_relative_eq!(
                graph.world_transform(id).expect("world"),
                reference_world(&graph, id),
                epsilon = 1e-5
            );
        }
    }

    #[test]
    fn rejects_self_and_descendant_parenting() {
        let mut graph = SceneGraph::new();
        let root = graph
            .insert(None, Mat4::identity(), uniform(1.0), NodeKind::Group)
            .expect("root");
        let child = graph
            .insert(Some(root), translation(1.0, 0.0, 0.0), uniform(1.0), NodeKind::Group)
            .expect("child");
        let world_before = graph.world_transform(child).expect("world");

        assert_eq!(
            graph.add_child(root, root),
            Err(SceneGraphError::WouldFormCycle)
        );
        assert_eq!(
            graph.add_child(child, root),
            Err(SceneGraphError::WouldFormCycle)
        );

        // Tree unchanged after the rejected mutations.
        assert_eq!(graph.node(child).expect("child").parent(), Some(root));
        assert_eq!(graph.node(root).expect("root").parent(), None);
        assert_eq!(graph.world_transform(child).expect("world"), world_before);
    }

    #[test]
    fn make_root_detaches_and_recomputes() {
        let mut graph = SceneGraph::new();
        let root = graph
            .insert(None, translation(10.0, 0.0, 0.0), uniform(1.0), NodeKind::Group)
            .expect("root");
        let child = graph
            .insert(Some(root), translation(0.0, 1.0, 0.0), uniform(1.0), NodeKind::Group)
            .expect("child");

        graph.make_root(child).expect("make root");

        assert_eq!(graph.node(child).expect("child").parent(), None);
        assert!(graph.roots().contains(&child));
        assert_relative_eq!(
            graph.world_transform(child).expect("world"),
            translation(0.0, 1.0, 0.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn render_draws_every_drawable_in_the_subtree() {
        use crate::foundation::math::Point3;
        use crate::render::api::headless::{HeadlessGraphics, Submission};
        use crate::render::api::GraphicsApi;
        use crate::render::post::PostEffect;
        use crate::shapes::ShapeKind;

        let mut gfx = HeadlessGraphics::new();
        let mesh = gfx.create_mesh(&ShapeKind::Cube).expect("mesh");

        let mut graph = SceneGraph::new();
        let root = graph
            .insert(
                None,
                Mat4::identity(),
                uniform(1.0),
                NodeKind::Drawable(Shape::untextured(mesh)),
            )
            .expect("root");
        graph
            .insert(
                Some(root),
                translation(0.0, 1.0, 0.0),
                uniform(1.0),
                NodeKind::Drawable(Shape::untextured(mesh)),
            )
            .expect("drawable child");
        graph
            .insert(Some(root), translation(1.0, 0.0, 0.0), uniform(1.0), NodeKind::Group)
            .expect("group child");

        let ctx = FrameContext {
            view: Mat4::identity(),
            projection: Mat4::identity(),
            camera_position: Point3::origin(),
            camera_front: Vec3::new(0.0, 0.0, -1.0),
            viewport: (64, 64),
            dir_light_space: Mat4::identity(),
            point_light_space: None,
            point_light_position: Point3::origin(),
            far_plane: 25.0,
            effect: PostEffect::None,
        };
        graph.render(root, &ctx, &mut gfx).expect("render");

        let draws = gfx
            .submissions()
            .iter()
            .filter(|s| matches!(s, Submission::DrawMesh(_)))
            .count();
        assert_eq!(draws, 2, "groups are traversed but not drawn");
        let mvps = gfx
            .submissions()
            .iter()
            .filter(|s| matches!(s, Submission::UploadMat4 { name } if name == "mvp_m"))
            .count();
        assert_eq!(mvps, 2);
    }

    #[test]
    fn insert_under_unknown_parent_fails() {
        let mut other = SceneGraph::new();
        let foreign = other
            .insert(None, Mat4::identity(), uniform(1.0), NodeKind::Group)
            .expect("foreign");

        let mut graph = SceneGraph::new();
        assert!(matches!(
            graph.insert(Some(foreign), Mat4::identity(), uniform(1.0), NodeKind::Group),
            Err(SceneGraphError::UnknownNode)
        ));
        assert!(graph.is_empty());
    }
}
