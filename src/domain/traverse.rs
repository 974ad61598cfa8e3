use tracing::instrument;

use crate::domain::item::TreeItem;

/// Depth-first pre-order iterator: an item is yielded before its children,
/// siblings left to right.
#[derive(Debug)]
pub struct PreOrderIter<'a> {
    stack: Vec<&'a TreeItem>,
}

impl<'a> PreOrderIter<'a> {
    #[instrument(level = "trace", skip(items))]
    pub(crate) fn new(items: &'a [TreeItem]) -> Self {
        Self {
            stack: items.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a TreeItem;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(current.children.iter().rev());
        Some(current)
    }
}

/// Depth-first post-order iterator: children before their parent.
#[derive(Debug)]
pub struct PostOrderIter<'a> {
    stack: Vec<(&'a TreeItem, bool)>,
}

impl<'a> PostOrderIter<'a> {
    #[instrument(level = "trace", skip(items))]
    pub(crate) fn new(items: &'a [TreeItem]) -> Self {
        Self {
            stack: items.iter().rev().map(|item| (item, false)).collect(),
        }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a TreeItem;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if visited {
                return Some(current);
            }
            self.stack.push((current, true));
            for child in current.children.iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}
