//! Outline tree and document-info types.
//!
//! Provides [`OutlineNode`] for entries in the reconstructed document outline
//! (bookmark tree) and [`DocumentInfo`] for the title/author metadata that
//! goes into the Info dictionary.

/// A single entry in the reconstructed document outline.
///
/// The extractor produces a flat list of top-level nodes; the content-file
/// loader may additionally nest one level of children under a top-level node.
/// `object_id` is absent until the indexer assigns it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutlineNode {
    /// The entry title. UTF-8 here; serialized as UTF-16BE in the PDF.
    pub title: String,
    /// Zero-based destination page index. Signed so the calibrator can apply
    /// a negative delta without wrapping; clamped at serialization.
    pub dest_page: i64,
    /// Child entries, in order. The extractor itself never nests.
    pub children: Vec<OutlineNode>,
    /// Object id assigned by the indexer; `None` before indexing.
    pub object_id: Option<u32>,
}

impl OutlineNode {
    /// Create a leaf node.
    pub fn new(title: impl Into<String>, dest_page: i64) -> Self {
        Self {
            title: title.into(),
            dest_page,
            children: Vec::new(),
            object_id: None,
        }
    }

    /// Create a node with children.
    pub fn with_children(
        title: impl Into<String>,
        dest_page: i64,
        children: Vec<OutlineNode>,
    ) -> Self {
        Self {
            title: title.into(),
            dest_page,
            children,
            object_id: None,
        }
    }

    /// Number of nodes in this subtree, itself included.
    pub fn subtree_count(&self) -> usize {
        1 + self.children.len()
    }
}

/// Total node count across a forest, all levels flattened.
///
/// This is the value the outline root dictionary's `/Count` carries, as
/// opposed to a node's own `/Count` which covers direct children only.
pub fn total_node_count(nodes: &[OutlineNode]) -> usize {
    nodes.iter().map(OutlineNode::subtree_count).sum()
}

/// Title and author destined for the document's Info dictionary.
///
/// Both fields are optional; an empty value means there is nothing to write
/// and the patcher runs without an info insert or patch.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentInfo {
    /// Document title.
    pub title: Option<String>,
    /// Document author.
    pub author: Option<String>,
}

impl DocumentInfo {
    /// Returns `true` if neither title nor author is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none()
    }
}
