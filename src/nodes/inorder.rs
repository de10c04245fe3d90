// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! In-order traversal of binary search trees without parent links.
//!
//! Both cursors keep an explicit stack of the nodes whose left (or
//! right) subtree has been visited but which haven't been yielded yet,
//! so traversal never recurses and stays linear in the tree height in
//! memory, however skewed the tree is.

use std::marker::PhantomData;

/// How to get around a particular tree representation.
pub(crate) trait Walk<'a>: Copy {
    type Node: Copy;
    type Key: 'a;
    type Value: 'a;

    fn left(self, node: Self::Node) -> Option<Self::Node>;
    fn right(self, node: Self::Node) -> Option<Self::Node>;
    fn entry(self, node: Self::Node) -> (&'a Self::Key, &'a Self::Value);
}

/// A double-ended in-order iterator over a tree of `len` nodes.
///
/// The two ends walk independently; `remaining` stops them once they
/// have met.
pub(crate) struct InOrder<'a, W: Walk<'a>> {
    walk: W,
    front: Vec<W::Node>,
    back: Vec<W::Node>,
    remaining: usize,
    lifetime: PhantomData<&'a ()>,
}

impl<'a, W: Walk<'a>> InOrder<'a, W> {
    pub(crate) fn new(walk: W, root: Option<W::Node>, len: usize) -> Self {
        let mut it = InOrder {
            walk,
            front: Vec::new(),
            back: Vec::new(),
            remaining: len,
            lifetime: PhantomData,
        };
        it.push_left_spine(root);
        it.push_right_spine(root);
        it
    }

    fn push_left_spine(&mut self, mut node: Option<W::Node>) {
        while let Some(n) = node {
            self.front.push(n);
            node = self.walk.left(n);
        }
    }

    fn push_right_spine(&mut self, mut node: Option<W::Node>) {
        while let Some(n) = node {
            self.back.push(n);
            node = self.walk.right(n);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.remaining
    }

    pub(crate) fn next_node(&mut self) -> Option<W::Node> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.front.pop()?;
        self.push_left_spine(self.walk.right(node));
        self.remaining -= 1;
        Some(node)
    }

    pub(crate) fn next_back_node(&mut self) -> Option<W::Node> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.back.pop()?;
        self.push_right_spine(self.walk.left(node));
        self.remaining -= 1;
        Some(node)
    }

    pub(crate) fn next(&mut self) -> Option<(&'a W::Key, &'a W::Value)> {
        let node = self.next_node()?;
        Some(self.walk.entry(node))
    }

    pub(crate) fn next_back(&mut self) -> Option<(&'a W::Key, &'a W::Value)> {
        let node = self.next_back_node()?;
        Some(self.walk.entry(node))
    }
}

impl<'a, W: Walk<'a>> Clone for InOrder<'a, W> {
    fn clone(&self) -> Self {
        InOrder {
            walk: self.walk,
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
            lifetime: PhantomData,
        }
    }
}
