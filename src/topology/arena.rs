//! Slot arena with generation-checked handles.
//!
//! [`Arena`] owns every record of one element kind. Slot 0 holds a
//! permanently allocated dummy so that a zero offset is never a real record.
//! Removed slots are not erased: they are marked inactive, their generation
//! is bumped (invalidating outstanding handles) and their offset is queued on
//! a min-heap so the lowest free slot is reused first.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::element::{Element, ElementStatus};
use super::handle::{Generation, Handle, IGNORED_GENERATION, Offset};
use crate::mesh_error::MeshError;

/// Successor of `generation`, wrapping past the maximum back to 1.
#[inline]
pub fn next_generation(generation: Generation) -> Generation {
    match generation.checked_add(1) {
        Some(next) => next,
        None => 1,
    }
}

/// Growable storage plus free list for one element kind.
#[derive(Debug, Clone)]
pub struct Arena<E: Element> {
    slots: Vec<E>,
    free: BinaryHeap<Reverse<Handle<E>>>,
}

impl<E: Element> Default for Arena<E> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<E: Element> Arena<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arena with room for `capacity` records besides the sentinel.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity + 1);
        slots.push(E::default());
        Self {
            slots,
            free: BinaryHeap::new(),
        }
    }

    pub fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional);
    }

    /// Physical slots minus free slots. Includes the sentinel.
    #[inline]
    pub fn count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Physical slots, sentinel and free slots included.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Resolve `handle`, explaining why it fails to.
    pub fn try_get(&self, handle: Handle<E>) -> Result<&E, MeshError> {
        let offset = self.check(handle)?;
        Ok(&self.slots[offset])
    }

    pub fn try_get_mut(&mut self, handle: Handle<E>) -> Result<&mut E, MeshError> {
        let offset = self.check(handle)?;
        Ok(&mut self.slots[offset])
    }

    /// Resolve `handle`, or `None` if it is the sentinel, out of range or stale.
    pub fn get(&self, handle: Handle<E>) -> Option<&E> {
        self.try_get(handle).map_err(report).ok()
    }

    pub fn get_mut(&mut self, handle: Handle<E>) -> Option<&mut E> {
        self.try_get_mut(handle).map_err(report).ok()
    }

    fn check(&self, handle: Handle<E>) -> Result<usize, MeshError> {
        let offset = handle.offset();
        if offset == 0 {
            return Err(MeshError::SentinelHandle { kind: E::KIND });
        }
        let index = offset as usize;
        let Some(slot) = self.slots.get(index) else {
            return Err(MeshError::OffsetOutOfRange {
                kind: E::KIND,
                offset,
                len: self.slots.len(),
            });
        };
        if handle.generation() != IGNORED_GENERATION && handle.generation() != slot.generation() {
            return Err(MeshError::StaleHandle {
                kind: E::KIND,
                offset,
                expected: handle.generation(),
                found: slot.generation(),
            });
        }
        Ok(index)
    }

    /// Store `element`, reusing the lowest free slot if there is one.
    ///
    /// A reused slot keeps the generation it was given on removal; a new slot
    /// keeps the record's own generation.
    pub fn try_emplace(&mut self, mut element: E) -> Result<Handle<E>, MeshError> {
        element.header_mut().status = ElementStatus::Active;
        if let Some(Reverse(handle)) = self.free.pop() {
            element.header_mut().generation = handle.generation();
            self.slots[handle.offset() as usize] = element;
            return Ok(handle);
        }

        let offset = Offset::try_from(self.slots.len())
            .ok()
            .filter(|&o| o < Offset::MAX)
            .ok_or(MeshError::ArenaExhausted { kind: E::KIND })?;
        if element.generation() == IGNORED_GENERATION {
            element.header_mut().generation = 1;
        }
        let handle = Handle::with_generation(offset, element.generation());
        self.slots.push(element);
        Ok(handle)
    }

    /// Store `element`, or return the sentinel if the arena is exhausted.
    pub fn emplace(&mut self, element: E) -> Handle<E> {
        self.try_emplace(element)
            .map_err(report)
            .unwrap_or(Handle::INVALID)
    }

    /// Retire the record behind `handle` and queue its slot for reuse.
    pub fn try_remove(&mut self, handle: Handle<E>) -> Result<(), MeshError> {
        let element = self.try_get_mut(handle)?;
        if !element.is_active() {
            return Err(MeshError::InactiveElement {
                kind: E::KIND,
                offset: handle.offset(),
            });
        }
        let header = element.header_mut();
        header.status = ElementStatus::Inactive;
        header.generation = next_generation(header.generation);
        let freed = Handle::with_generation(handle.offset(), header.generation);
        self.free.push(Reverse(freed));
        Ok(())
    }

    /// Like [`try_remove`](Self::try_remove), but a handle that does not
    /// resolve or a slot that is already free is only reported.
    pub fn remove(&mut self, handle: Handle<E>) {
        let _ = self.try_remove(handle).map_err(report);
    }

    /// Exchange the records behind `a` and `b`.
    ///
    /// Both slots get a fresh generation, so every handle issued for either
    /// slot before the swap goes stale. Returns the handles that now name the
    /// moved records (`a`'s record lives behind the first one). Swapping a
    /// slot with itself only bumps its generation once.
    pub fn swap(&mut self, a: Handle<E>, b: Handle<E>) -> Option<(Handle<E>, Handle<E>)> {
        let ia = self.check(a).map_err(report).ok()?;
        let ib = self.check(b).map_err(report).ok()?;
        if !self.slots[ia].is_active() || !self.slots[ib].is_active() {
            log::warn!("Refusing to swap inactive slots {a} and {b}");
            return None;
        }
        if ia == ib {
            let generation = next_generation(self.slots[ia].generation());
            self.slots[ia].header_mut().generation = generation;
            let moved = Handle::with_generation(a.offset(), generation);
            return Some((moved, moved));
        }
        let gen_a = next_generation(self.slots[ia].generation());
        let gen_b = next_generation(self.slots[ib].generation());
        self.slots.swap(ia, ib);
        self.slots[ia].header_mut().generation = gen_a;
        self.slots[ib].header_mut().generation = gen_b;
        Some((
            Handle::with_generation(b.offset(), gen_b),
            Handle::with_generation(a.offset(), gen_a),
        ))
    }

    /// Live records with their current handles, in offset order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<E>, &E)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, e)| e.is_active())
            .map(|(i, e)| (Handle::with_generation(i as Offset, e.generation()), e))
    }

    pub fn handles(&self) -> Vec<Handle<E>> {
        self.iter().map(|(h, _)| h).collect()
    }
}

/// Route a lookup failure to the diagnostic sink.
fn report(err: MeshError) -> MeshError {
    match &err {
        MeshError::StaleHandle {
            kind,
            offset,
            expected,
            found,
        } => {
            log::warn!("Generation mismatch for {kind}: {offset}, {expected}");
            log::debug!("Offset: {offset}, Generation {expected} != {found}");
        }
        MeshError::SentinelHandle { .. } => log::debug!("{err}"),
        MeshError::InactiveElement { .. } => log::warn!("Ignoring removal: {err}"),
        _ => log::error!("{err}"),
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::element::Point;
    use crate::topology::handle::PointHandle;

    fn filled(n: usize) -> (Arena<Point>, Vec<PointHandle>) {
        let mut arena = Arena::new();
        let handles = (0..n)
            .map(|i| arena.emplace(Point::new(i as f64, 0.0, 0.0)))
            .collect();
        (arena, handles)
    }

    #[test]
    fn fresh_arena_holds_only_the_sentinel() {
        let arena = Arena::<Point>::new();
        assert_eq!(arena.count(), 1);
        assert_eq!(arena.slot_count(), 1);
        assert!(arena.get(PointHandle::INVALID).is_none());
        assert_eq!(arena.iter().count(), 0);
    }

    #[test]
    fn emplace_hands_out_sequential_offsets() {
        let (arena, handles) = filled(4);
        let offsets: Vec<_> = handles.iter().map(|h| h.offset()).collect();
        assert_eq!(offsets, vec![1, 2, 3, 4]);
        assert!(handles.iter().all(|h| h.generation() == 1));
        assert_eq!(arena.count(), 5);
        assert_eq!(arena.get(handles[1]).unwrap().position, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn remove_bumps_generation_and_invalidates() {
        let (mut arena, handles) = filled(3);
        arena.remove(handles[1]);
        assert!(arena.get(handles[1]).is_none());
        assert_eq!(
            arena.try_get(handles[1]),
            Err(MeshError::StaleHandle {
                kind: crate::mesh_error::ElementKind::Point,
                offset: 2,
                expected: 1,
                found: 2,
            })
        );
        assert_eq!(arena.count(), 3);
        // the other records are untouched
        assert!(arena.get(handles[0]).is_some());
        assert!(arena.get(handles[2]).is_some());
    }

    #[test]
    fn lowest_free_slot_is_reused_first() {
        let (mut arena, handles) = filled(4);
        arena.remove(handles[2]);
        arena.remove(handles[1]);
        let a = arena.emplace(Point::new(9.0, 9.0, 9.0));
        let b = arena.emplace(Point::new(8.0, 8.0, 8.0));
        assert_eq!((a.offset(), a.generation()), (2, 2));
        assert_eq!((b.offset(), b.generation()), (3, 2));
        assert_eq!(arena.get(b).unwrap().generation(), 2);
        assert_eq!(arena.free_count(), 0);
    }

    #[test]
    fn zero_generation_skips_the_check() {
        let (arena, handles) = filled(2);
        let probe = PointHandle::new(handles[1].offset());
        assert!(arena.get(probe).is_some());
    }

    #[test]
    fn out_of_range_and_sentinel_are_absent() {
        let (arena, _) = filled(2);
        assert!(matches!(
            arena.try_get(PointHandle::new(10)),
            Err(MeshError::OffsetOutOfRange { offset: 10, len: 3, .. })
        ));
        assert!(matches!(
            arena.try_get(PointHandle::new(0)),
            Err(MeshError::SentinelHandle { .. })
        ));
    }

    #[test]
    fn double_remove_frees_the_slot_once() {
        let (mut arena, handles) = filled(2);
        arena.remove(handles[0]);
        arena.remove(handles[0]);
        assert_eq!(
            arena.try_remove(PointHandle::new(handles[0].offset())),
            Err(MeshError::InactiveElement {
                kind: crate::mesh_error::ElementKind::Point,
                offset: 1,
            })
        );
        assert_eq!(arena.free_count(), 1);
        arena.remove(PointHandle::INVALID);
        assert_eq!(arena.count(), 2);
    }

    #[test]
    fn generation_wraps_to_one() {
        assert_eq!(next_generation(1), 2);
        assert_eq!(next_generation(Generation::MAX), 1);
    }

    #[test]
    fn swap_moves_records_and_invalidates_old_handles() {
        let (mut arena, handles) = filled(2);
        let (moved_a, moved_b) = arena.swap(handles[0], handles[1]).unwrap();
        assert!(arena.get(handles[0]).is_none());
        assert!(arena.get(handles[1]).is_none());
        assert_eq!(arena.get(moved_a).unwrap().position, [0.0, 0.0, 0.0]);
        assert_eq!(arena.get(moved_b).unwrap().position, [1.0, 0.0, 0.0]);
        assert_eq!(moved_a.offset(), 2);
        assert_eq!(moved_b.offset(), 1);
    }

    #[test]
    fn self_swap_bumps_the_generation_once() {
        let (mut arena, handles) = filled(2);
        let before = arena.get(handles[0]).unwrap().generation();
        let (first, second) = arena.swap(handles[0], handles[0]).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.offset(), handles[0].offset());
        assert_eq!(first.generation(), before + 1);
        assert!(arena.get(handles[0]).is_none());
        assert_eq!(arena.get(first).unwrap().position, [0.0, 0.0, 0.0]);
        assert!(arena.get(handles[1]).is_some());
    }

    #[test]
    fn iter_skips_sentinel_and_free_slots() {
        let (mut arena, handles) = filled(3);
        arena.remove(handles[1]);
        assert_eq!(arena.handles(), vec![handles[0], handles[2]]);
    }
}
