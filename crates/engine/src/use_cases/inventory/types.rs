//! Inventory operation result types.

/// Result of a batch inventory mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryActionResult {
    /// Number of distinct items changed.
    pub items_affected: usize,
}

impl InventoryActionResult {
    pub fn new(items_affected: usize) -> Self {
        Self { items_affected }
    }
}
