use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub(crate) usize);

/// Externally driven points. Chains only ever hold [`TargetId`]s into this set.
#[derive(Debug, Clone, Default)]
pub struct TargetSet {
    positions: Vec<Vec3>,
}

impl TargetSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, position: Vec3) -> TargetId {
        self.positions.push(position);
        TargetId(self.positions.len() - 1)
    }

    /// Panics if `id` was not produced by this set.
    pub fn position(&self, id: TargetId) -> Vec3 {
        self.positions[id.0]
    }

    pub fn set_position(&mut self, id: TargetId, position: Vec3) {
        self.positions[id.0] = position;
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TargetId, Vec3)> + '_ {
        self.positions.iter().enumerate().map(|(i, p)| (TargetId(i), *p))
    }
}
