// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Benchmark data shapes.
//!
//! Every shape is one generic [`Aggregate`] parameterised over a field
//! layout ([`Fields`]) and a storage mode ([`Storage`]):
//!
//! - [`Inline`] keeps the fields in the array element itself. Assigning an
//!   element duplicates every field.
//! - [`Shared`] keeps the fields in a separate heap block behind an `Rc`.
//!   Assigning an element duplicates only the pointer, and two instances
//!   built from equal values are still distinct objects.
//!
//! Instances are immutable once constructed. There are no setters and no
//! interior mutability.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Which storage mode an aggregate uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// Fields live inline, copied on assignment.
    Value,
    /// Fields live behind a shared pointer, aliased on assignment.
    Reference,
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKind::Value => write!(f, "value"),
            StorageKind::Reference => write!(f, "reference"),
        }
    }
}

/// Storage mode for an aggregate's fields.
pub trait Storage: 'static {
    /// What an array element actually holds.
    type Slot<T: Clone>: Clone;

    const KIND: StorageKind;

    fn wrap<T: Clone>(value: T) -> Self::Slot<T>;

    fn get<T: Clone>(slot: &Self::Slot<T>) -> &T;
}

/// Value semantics: the element is the fields.
#[derive(Debug)]
pub enum Inline {}

/// Reference semantics: the element points at a separately allocated block.
#[derive(Debug)]
pub enum Shared {}

impl Storage for Inline {
    type Slot<T: Clone> = T;

    const KIND: StorageKind = StorageKind::Value;

    #[inline]
    fn wrap<T: Clone>(value: T) -> Self::Slot<T> {
        value
    }

    #[inline]
    fn get<T: Clone>(slot: &Self::Slot<T>) -> &T {
        slot
    }
}

impl Storage for Shared {
    type Slot<T: Clone> = Rc<T>;

    const KIND: StorageKind = StorageKind::Reference;

    #[inline]
    fn wrap<T: Clone>(value: T) -> Self::Slot<T> {
        Rc::new(value)
    }

    #[inline]
    fn get<T: Clone>(slot: &Self::Slot<T>) -> &T {
        &**slot
    }
}

/// A fixed field layout that scenarios can populate and reduce.
pub trait Fields: Clone + 'static {
    /// Number of top-level fields.
    const FIELD_COUNT: usize;

    /// Number of nested reference sub-objects per instance.
    const NESTED_REFS: usize;

    /// Deterministic contents for array index `seed`: `(seed, seed+1, ...)`.
    fn populate(seed: i64) -> Self;

    /// The per-element field-sum reduction.
    fn checksum(&self) -> i64;
}

/// Plain layout of `N` integers.
impl<const N: usize> Fields for [i64; N] {
    const FIELD_COUNT: usize = N;
    const NESTED_REFS: usize = 0;

    #[inline]
    fn populate(seed: i64) -> Self {
        std::array::from_fn(|k| seed + k as i64)
    }

    #[inline]
    fn checksum(&self) -> i64 {
        self.iter().sum()
    }
}

/// An aggregate of layout `F` held in storage mode `S`.
pub struct Aggregate<F: Fields, S: Storage> {
    slot: S::Slot<F>,
}

impl<F: Fields, S: Storage> Aggregate<F, S> {
    #[inline]
    pub fn new(fields: F) -> Self {
        Self {
            slot: S::wrap(fields),
        }
    }

    /// Construct the instance that sits at array index `seed`.
    #[inline]
    pub fn populated(seed: i64) -> Self {
        Self::new(F::populate(seed))
    }

    #[inline]
    pub fn fields(&self) -> &F {
        S::get(&self.slot)
    }

    #[inline]
    pub fn checksum(&self) -> i64 {
        self.fields().checksum()
    }

    pub fn storage_kind() -> StorageKind {
        S::KIND
    }
}

impl<F: Fields> Aggregate<F, Shared> {
    /// Identity comparison. Equal field values do not imply the same object.
    pub fn same_object(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }

    /// How many elements currently alias this object.
    pub fn alias_count(&self) -> usize {
        Rc::strong_count(&self.slot)
    }
}

impl<const N: usize, S: Storage> Aggregate<[i64; N], S> {
    /// Field `k`, zero based.
    #[inline]
    pub fn field(&self, k: usize) -> i64 {
        self.fields()[k]
    }
}

impl<S: Storage> Aggregate<[i64; 2], S> {
    #[inline]
    pub fn x(&self) -> i64 {
        self.fields()[0]
    }

    #[inline]
    pub fn y(&self) -> i64 {
        self.fields()[1]
    }
}

impl<F: Fields, S: Storage> Clone for Aggregate<F, S> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<F: Fields + Copy> Copy for Aggregate<F, Inline> {}

impl<F: Fields + PartialEq, S: Storage> PartialEq for Aggregate<F, S> {
    fn eq(&self, other: &Self) -> bool {
        self.fields() == other.fields()
    }
}

impl<F: Fields + Eq, S: Storage> Eq for Aggregate<F, S> {}

impl<F: Fields + fmt::Debug, S: Storage> fmt::Debug for Aggregate<F, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aggregate")
            .field("storage", &S::KIND)
            .field("fields", self.fields())
            .finish()
    }
}

/// 2/3/4/8 integers copied by value.
pub type ValuePoint<const N: usize> = Aggregate<[i64; N], Inline>;

/// 2/3/4 integers behind a shared pointer.
pub type RefPoint<const N: usize> = Aggregate<[i64; N], Shared>;

/// Three fields where `xy` is itself a reference 2-field point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nested {
    xy: RefPoint<2>,
    z: i64,
}

impl Nested {
    /// Allocates a fresh `xy` sub-object.
    pub fn new(x: i64, y: i64, z: i64) -> Self {
        Self {
            xy: RefPoint::new([x, y]),
            z,
        }
    }

    pub fn xy(&self) -> &RefPoint<2> {
        &self.xy
    }

    pub fn z(&self) -> i64 {
        self.z
    }
}

impl Fields for Nested {
    const FIELD_COUNT: usize = 3;
    const NESTED_REFS: usize = 1;

    fn populate(seed: i64) -> Self {
        Self::new(seed, seed + 1, seed + 2)
    }

    #[inline]
    fn checksum(&self) -> i64 {
        self.xy.x() + self.xy.y() + self.z
    }
}

/// Composite held inline: the `z` integer is copied, `xy` is aliased.
pub type ValueComposite = Aggregate<Nested, Inline>;

/// Composite held behind a shared pointer.
pub type RefComposite = Aggregate<Nested, Shared>;

/// `N` fields, each an independently allocated reference 2-field point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefFields<const N: usize>([RefPoint<2>; N]);

impl<const N: usize> RefFields<N> {
    pub fn new(points: [RefPoint<2>; N]) -> Self {
        Self(points)
    }

    pub fn nested(&self, k: usize) -> &RefPoint<2> {
        &self.0[k]
    }

    pub fn points(&self) -> &[RefPoint<2>; N] {
        &self.0
    }
}

impl<const N: usize> Fields for RefFields<N> {
    const FIELD_COUNT: usize = N;
    const NESTED_REFS: usize = N;

    fn populate(seed: i64) -> Self {
        Self(std::array::from_fn(|_| RefPoint::new([seed, seed + 1])))
    }

    /// Reads one field per nested point, alternating `x` and `y`, so every
    /// sub-object is dereferenced exactly once.
    #[inline]
    fn checksum(&self) -> i64 {
        self.0
            .iter()
            .enumerate()
            .map(|(k, point)| point.field(k % 2))
            .sum()
    }
}

/// Reference-heavy shape held inline.
pub type ValueRefBundle<const N: usize> = Aggregate<RefFields<N>, Inline>;

/// Reference-heavy shape held behind a shared pointer.
pub type RefRefBundle<const N: usize> = Aggregate<RefFields<N>, Shared>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_fields_are_constructed_values() {
        let p = ValuePoint::<8>::populated(5);
        for k in 0..8 {
            assert_eq!(p.field(k), 5 + k as i64);
        }
        assert_eq!(p.checksum(), (5..13).sum::<i64>());

        let r = RefPoint::<2>::new([7, 9]);
        assert_eq!(r.x(), 7);
        assert_eq!(r.y(), 9);
    }

    #[test]
    fn test_value_point_is_copied() {
        let a = ValuePoint::<3>::new([1, 2, 3]);
        let b = a;
        assert_eq!(a, b);
        assert_eq!(std::mem::size_of::<ValuePoint<3>>(), 3 * 8);
    }

    #[test]
    fn test_reference_point_identity() {
        let a = RefPoint::<2>::new([1, 2]);
        let b = RefPoint::<2>::new([1, 2]);
        assert_eq!(a, b);
        assert!(!a.same_object(&b));

        let c = a.clone();
        assert!(a.same_object(&c));
        assert_eq!(a.alias_count(), 2);
        assert_eq!(
            std::mem::size_of::<RefPoint<2>>(),
            std::mem::size_of::<usize>()
        );
    }

    #[test]
    fn test_nested_checksum_and_aliasing() {
        let v = ValueComposite::populated(10);
        assert_eq!(v.fields().xy().x(), 10);
        assert_eq!(v.fields().xy().y(), 11);
        assert_eq!(v.fields().z(), 12);
        assert_eq!(v.checksum(), 33);

        let copy = v.clone();
        assert!(copy.fields().xy().same_object(v.fields().xy()));
    }

    #[test]
    fn test_ref_fields_are_independent_allocations() {
        let bundle = ValueRefBundle::<3>::populated(4);
        let points = bundle.fields().points();
        assert!(!points[0].same_object(&points[1]));
        assert!(!points[1].same_object(&points[2]));
        // X.X + Y.Y + Z.X
        assert_eq!(bundle.checksum(), 4 + 5 + 4);
    }

    #[test]
    fn test_ref_container_shares_nested_objects() {
        let a = RefRefBundle::<2>::populated(0);
        let b = a.clone();
        assert!(a.same_object(&b));
        assert!(a.fields().nested(0).same_object(b.fields().nested(0)));
        assert_eq!(a.checksum(), 1);
    }

    #[test]
    fn test_storage_kind() {
        assert_eq!(ValuePoint::<2>::storage_kind(), StorageKind::Value);
        assert_eq!(RefComposite::storage_kind(), StorageKind::Reference);
        assert_eq!(StorageKind::Reference.to_string(), "reference");
    }
}
