//! Object-id assignment and the patch plan.
//!
//! New indirect objects are appended to the file with ids starting one past
//! the highest id already present. The id layout is what lets the patcher
//! emit everything in a single forward pass: the outline root precedes its
//! nodes, every parent precedes its children, and a parent's children occupy
//! a contiguous id range before the next sibling's subtree.

use crate::outline::OutlineNode;

/// How the document's Info dictionary is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoMode {
    /// No title/author to write.
    None,
    /// No Info dictionary exists; a new object is inserted and referenced
    /// from the trailer.
    Insert,
    /// An Info dictionary exists at this object id; missing keys are patched
    /// into its body in place.
    Patch(u32),
}

/// The derived plan for one patch pass: object numbering and mode flags.
///
/// Built once before the byte pass begins and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchPlan {
    /// One past the highest object id in the source file; new ids start here.
    pub base_object_count: u32,
    /// Id of the new outline root dictionary, when an outline is inserted.
    pub outline_root_id: Option<u32>,
    /// Id of the new Info object, when one is inserted.
    pub info_object_id: Option<u32>,
    /// Id of the existing Info object being patched in place, if any.
    pub patch_info_id: Option<u32>,
}

impl PatchPlan {
    /// Compute the plan from the source's object count and the active modes.
    ///
    /// When a new Info object is inserted it takes `base_object_count` and
    /// the outline root (if any) the id after it; otherwise the outline root
    /// takes `base_object_count` itself.
    pub fn new(base_object_count: u32, wants_outline: bool, info: InfoMode) -> Self {
        let (info_object_id, patch_info_id, root_base) = match info {
            InfoMode::None => (None, None, base_object_count),
            InfoMode::Insert => (Some(base_object_count), None, base_object_count + 1),
            InfoMode::Patch(id) => (None, Some(id), base_object_count),
        };
        let outline_root_id = wants_outline.then_some(root_base);
        Self {
            base_object_count,
            outline_root_id,
            info_object_id,
            patch_info_id,
        }
    }

    /// Whether an outline subtree still has to be inserted.
    pub fn needs_outline_insert(&self) -> bool {
        self.outline_root_id.is_some()
    }

    /// Whether a new Info object (plus the trailer reference) is inserted.
    pub fn needs_info_insert(&self) -> bool {
        self.info_object_id.is_some()
    }

    /// Whether an existing Info object's body is patched in place.
    pub fn needs_info_patch(&self) -> bool {
        self.patch_info_id.is_some()
    }

    /// Assign object ids to the outline nodes, starting right after the root.
    ///
    /// Returns one past the last id handed out. No-op when the plan carries
    /// no outline insert.
    pub fn index(&self, nodes: &mut [OutlineNode]) -> u32 {
        match self.outline_root_id {
            Some(root) => assign_object_ids(nodes, root + 1),
            None => self.base_object_count,
        }
    }
}

/// Assign ids in the single forward-pass layout: each top-level node takes
/// the next id, then all of its direct children take the ids immediately
/// after it, before the next top-level node.
///
/// Each node's `object_id` is written exactly once. Returns one past the
/// last id assigned.
pub fn assign_object_ids(nodes: &mut [OutlineNode], first_id: u32) -> u32 {
    let mut next = first_id;
    for node in nodes.iter_mut() {
        node.object_id = Some(next);
        next += 1;
        for child in node.children.iter_mut() {
            child.object_id = Some(next);
            next += 1;
        }
    }
    next
}
