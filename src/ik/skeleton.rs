use crate::math::Transform;
use glam::{Quat, Vec3};

/// Handle to a segment stored in a [`Skeleton`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(pub(crate) usize);

impl SegmentId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A rigid bone: a fixed offset from its parent and a local rotation the solver may rewrite.
#[derive(Debug, Clone)]
pub struct Segment {
    pub offset: Vec3,
    pub rotation: Quat,
    parent: Option<SegmentId>,
    children: Vec<SegmentId>,
}

impl Segment {
    fn new(offset: Vec3, parent: Option<SegmentId>) -> Self {
        Self {
            offset,
            rotation: Quat::IDENTITY,
            parent,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<SegmentId> {
        self.parent
    }

    pub fn children(&self) -> &[SegmentId] {
        &self.children
    }

    pub fn local_transform(&self) -> Transform {
        Transform::from_position_rotation(self.offset, self.rotation)
    }
}

/// Arena of segments. Parent and child links are handles, so the tree never owns itself.
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    segments: Vec<Segment>,
    base: Transform,
}

impl Skeleton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transform applied above every root segment (the scene pivot).
    pub fn base(&self) -> Transform {
        self.base
    }

    pub fn set_base(&mut self, base: Transform) {
        self.base = base;
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Panics if `id` was not produced by this skeleton.
    pub fn segment(&self, id: SegmentId) -> &Segment {
        &self.segments[id.0]
    }

    pub fn segment_mut(&mut self, id: SegmentId) -> &mut Segment {
        &mut self.segments[id.0]
    }

    pub fn ids(&self) -> impl Iterator<Item = SegmentId> + '_ {
        (0..self.segments.len()).map(SegmentId)
    }

    pub fn roots(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, s)| s.parent.is_none())
            .map(|(i, _)| SegmentId(i))
    }

    pub fn add_segment(&mut self, parent: Option<SegmentId>, offset: Vec3) -> SegmentId {
        let id = SegmentId(self.segments.len());
        self.segments.push(Segment::new(offset, parent));
        if let Some(parent) = parent {
            self.segments[parent.0].children.push(id);
        }
        id
    }

    /// Builds `count` segments in a straight line, each a child of the previous one.
    ///
    /// The first segment is attached to `parent` (if any) at `first_offset`; every
    /// following segment sits `offset` away from its predecessor.
    pub fn build_run(
        &mut self,
        parent: Option<SegmentId>,
        count: usize,
        first_offset: Vec3,
        offset: Vec3,
    ) -> Vec<SegmentId> {
        let mut run = Vec::with_capacity(count);
        let mut previous = parent;

        for i in 0..count {
            let local = if i == 0 { first_offset } else { offset };
            let id = self.add_segment(previous, local);
            run.push(id);
            previous = Some(id);
        }

        log::debug!("built run of {} segments under {:?}", count, parent);
        run
    }

    /// Like [`Skeleton::build_run`] for a new root, with the first segment pulled back
    /// by half the run's extent so the shape is centered on the origin.
    pub fn build_centered_run(&mut self, count: usize, offset: Vec3) -> Vec<SegmentId> {
        let extent = offset * count.saturating_sub(1) as f32;
        self.build_run(None, count, -extent * 0.5, offset)
    }

    pub fn world_transform(&self, id: SegmentId) -> Transform {
        let mut lineage = vec![id];
        let mut current = self.segments[id.0].parent;
        while let Some(parent) = current {
            lineage.push(parent);
            current = self.segments[parent.0].parent;
        }

        lineage
            .iter()
            .rev()
            .fold(self.base, |world, s| world.mul_transform(&self.segments[s.0].local_transform()))
    }

    pub fn world_position(&self, id: SegmentId) -> Vec3 {
        self.world_transform(id).position
    }

    /// World rotation of the frame `id` is expressed in.
    pub fn parent_world_rotation(&self, id: SegmentId) -> Quat {
        match self.segments[id.0].parent {
            Some(parent) => self.world_transform(parent).rotation,
            None => self.base.rotation,
        }
    }

    pub fn is_child_of(&self, child: SegmentId, parent: SegmentId) -> bool {
        self.segments[child.0].parent == Some(parent)
    }
}
