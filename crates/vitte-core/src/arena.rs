//! Index-addressed node storage shared by the AST and HIR.
//!
//! Nodes are appended once and never removed, so an id handed out by
//! [`Arena::make`] stays valid for the arena's lifetime. Every id type has an
//! `INVALID` sentinel used for "absent" children (missing `else`, extern
//! bodies, failed lowering).

use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

/// Implemented by the per-level id newtypes produced by [`define_id!`].
pub trait Idx: Copy + Eq + Hash + Debug + 'static {
    const INVALID: Self;

    fn new(index: usize) -> Self;

    fn index(self) -> usize;

    #[inline]
    fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

/// Declares a `u32` id newtype implementing [`Idx`] with `u32::MAX` as the
/// invalid sentinel.
#[macro_export]
macro_rules! define_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis struct $name(pub u32);

        impl $name {
            pub const INVALID: $name = $name(u32::MAX);

            #[inline]
            pub fn is_valid(self) -> bool {
                self.0 != u32::MAX
            }
        }

        impl $crate::arena::Idx for $name {
            const INVALID: Self = $name(u32::MAX);

            #[inline]
            fn new(index: usize) -> Self {
                assert!(index < u32::MAX as usize, "arena overflow");
                $name(index as u32)
            }

            #[inline]
            fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::INVALID
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                if self.is_valid() {
                    write!(f, "#{}", self.0)
                } else {
                    write!(f, "#invalid")
                }
            }
        }
    };
}

/// A node payload that can be stored in, and recovered from, the arena's
/// node sum type `N`.
pub trait ArenaNode<N>: Sized {
    const KIND: &'static str;

    fn into_node(self) -> N;

    fn from_node(node: &N) -> Option<&Self>;
}

/// Wires a payload type to a variant of a node enum.
#[macro_export]
macro_rules! impl_arena_node {
    ($node:ident, $variant:ident, $payload:ty, $kind:literal) => {
        impl $crate::arena::ArenaNode<$node> for $payload {
            const KIND: &'static str = $kind;

            fn into_node(self) -> $node {
                $node::$variant(self)
            }

            fn from_node(node: &$node) -> Option<&Self> {
                match node {
                    $node::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

/// Append-only storage of `N` nodes addressed by `I`.
#[derive(Debug, Clone)]
pub struct Arena<I: Idx, N> {
    nodes: Vec<N>,
    _marker: PhantomData<fn(&I)>,
}

impl<I: Idx, N> Default for Arena<I, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Idx, N> Arena<I, N> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Stores `value` and returns its id.
    pub fn make<T: ArenaNode<N>>(&mut self, value: T) -> I {
        self.alloc(value.into_node())
    }

    /// Stores an already wrapped node.
    pub fn alloc(&mut self, node: N) -> I {
        let id = I::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Returns the node behind `id`.
    ///
    /// Panics on an invalid or out-of-range id; callers check `is_valid`
    /// first for optional children.
    pub fn node(&self, id: I) -> &N {
        match self.nodes.get(id.index()).filter(|_| id.is_valid()) {
            Some(node) => node,
            None => panic!(
                "arena lookup with invalid id {:?} (arena holds {} nodes)",
                id,
                self.nodes.len()
            ),
        }
    }

    /// Typed retrieval. Panics when the stored node is not a `T`.
    pub fn get<T: ArenaNode<N>>(&self, id: I) -> &T {
        match T::from_node(self.node(id)) {
            Some(value) => value,
            None => panic!("node {:?} is not a {}", id, T::KIND),
        }
    }

    /// Typed retrieval that tolerates invalid ids and kind mismatches.
    pub fn try_get<T: ArenaNode<N>>(&self, id: I) -> Option<&T> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get(id.index()).and_then(T::from_node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (I, &N)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (I::new(index), node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    define_id! {
        struct TestId;
    }

    #[derive(Debug)]
    enum TestNode {
        Word(String),
        Number(i64),
    }

    impl_arena_node!(TestNode, Word, String, "word");
    impl_arena_node!(TestNode, Number, i64, "number");

    #[test]
    fn ids_are_stable_and_typed() {
        let mut arena: Arena<TestId, TestNode> = Arena::new();
        let word = arena.make("hello".to_string());
        let number = arena.make(7i64);

        assert_eq!(word, TestId(0));
        assert_eq!(number, TestId(1));
        assert_eq!(arena.get::<String>(word), "hello");
        assert_eq!(*arena.get::<i64>(number), 7);
        assert!(arena.try_get::<i64>(word).is_none());
        assert!(arena.try_get::<i64>(TestId::INVALID).is_none());
        assert!(matches!(arena.node(word), TestNode::Word(_)));
        assert_eq!(arena.iter().count(), 2);
    }

    #[test]
    #[should_panic(expected = "is not a number")]
    fn typed_get_panics_on_kind_mismatch() {
        let mut arena: Arena<TestId, TestNode> = Arena::new();
        let word = arena.make("x".to_string());
        let _ = arena.get::<i64>(word);
    }

    #[test]
    #[should_panic(expected = "invalid id")]
    fn node_panics_on_sentinel() {
        let arena: Arena<TestId, TestNode> = Arena::new();
        let _ = arena.node(TestId::INVALID);
    }
}
