//! Fixed-capacity bump arenas
//!
//! Two flat, zero-initialized byte regions are acquired once at startup:
//! - long-lived: player and bullet pools, alive for the whole process
//! - per-level: enemy wave and its enemies, reset when a level restarts
//!
//! Records are carved out as typed [`Slot`]s at deterministic offsets. There is
//! no freelist and no per-record free; the only release is [`Arena::reset`] or
//! dropping the arena.

use std::fmt;
use std::marker::PhantomData;
use std::mem::{align_of, size_of};
use std::ops::Range;

use bytemuck::Pod;

use crate::error::ArenaError;

/// Alignment guaranteed for every region base
pub const REGION_ALIGN: usize = align_of::<u64>();

/// A typed, contiguous run of records inside one arena
///
/// Slots are plain offsets: they stay valid for the lifetime of the arena
/// generation they were carved from.
pub struct Slot<T> {
    offset: usize,
    count: usize,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Slot<T> {}

impl<T> PartialEq for Slot<T> {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset
            && self.count == other.count
            && self.generation == other.generation
    }
}

impl<T> Eq for Slot<T> {}

impl<T> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("type", &std::any::type_name::<T>())
            .field("offset", &self.offset)
            .field("count", &self.count)
            .field("generation", &self.generation)
            .finish()
    }
}

impl<T> Slot<T> {
    /// Byte offset from the region base
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of records
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    fn byte_range(&self) -> Range<usize> {
        self.offset..self.offset + self.count * size_of::<T>()
    }
}

/// One pre-sized, zero-initialized memory region
pub struct Arena {
    label: &'static str,
    words: Vec<u64>,
    capacity: usize,
    cursor: usize,
    generation: u32,
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("label", &self.label)
            .field("capacity", &self.capacity)
            .field("used", &self.cursor)
            .field("generation", &self.generation)
            .finish()
    }
}

impl Arena {
    /// Acquire a zeroed region of `bytes` bytes
    ///
    /// Fails instead of aborting when the allocator cannot provide the region.
    pub fn new(label: &'static str, bytes: usize) -> Result<Self, ArenaError> {
        let words_needed = bytes.div_ceil(REGION_ALIGN);
        let mut words = Vec::new();
        words
            .try_reserve_exact(words_needed)
            .map_err(|_| ArenaError::Provision { region: label, bytes })?;
        words.resize(words_needed, 0);

        Ok(Self {
            label,
            words,
            capacity: bytes,
            cursor: 0,
            generation: 0,
        })
    }

    #[inline]
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Total region size in bytes
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes carved so far (including alignment padding)
    #[inline]
    pub fn used(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity - self.cursor
    }

    /// Bumped on every reset; slots from older generations are rejected
    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Carve `count` consecutive records of `T`
    ///
    /// Requests are laid out in call order, each aligned for its type, so the
    /// same request sequence always yields the same offsets and no two slots
    /// alias. The records read as all-zero until written.
    pub fn alloc<T: Pod>(&mut self, count: usize) -> Result<Slot<T>, ArenaError> {
        let align = align_of::<T>();
        if align > REGION_ALIGN {
            return Err(ArenaError::Alignment {
                align,
                max: REGION_ALIGN,
            });
        }

        let start = self.cursor.next_multiple_of(align);
        let end = size_of::<T>()
            .checked_mul(count)
            .and_then(|bytes| start.checked_add(bytes))
            .filter(|&end| end <= self.capacity);

        let Some(end) = end else {
            return Err(ArenaError::OutOfSpace {
                region: self.label,
                requested: size_of::<T>()
                    .saturating_mul(count)
                    .saturating_add(start - self.cursor),
                remaining: self.remaining(),
            });
        };

        self.cursor = end;
        Ok(Slot {
            offset: start,
            count,
            generation: self.generation,
            _marker: PhantomData,
        })
    }

    /// Carve a single record
    pub fn alloc_one<T: Pod>(&mut self) -> Result<Slot<T>, ArenaError> {
        self.alloc(1)
    }

    /// Release every slot at once and zero the used bytes
    pub fn reset(&mut self) {
        let used = self.cursor;
        self.bytes_mut()[..used].fill(0);
        self.cursor = 0;
        self.generation = self.generation.wrapping_add(1);
        log::debug!(
            "Reset {} region ({} bytes released, generation {})",
            self.label,
            used,
            self.generation
        );
    }

    /// Records of a slot
    ///
    /// # Panics
    /// If the slot was not carved from this arena's current generation.
    pub fn get<T: Pod>(&self, slot: Slot<T>) -> &[T] {
        self.check(&slot);
        bytemuck::cast_slice(&self.bytes()[slot.byte_range()])
    }

    /// Mutable records of a slot
    ///
    /// # Panics
    /// If the slot was not carved from this arena's current generation.
    pub fn get_mut<T: Pod>(&mut self, slot: Slot<T>) -> &mut [T] {
        self.check(&slot);
        let range = slot.byte_range();
        bytemuck::cast_slice_mut(&mut self.bytes_mut()[range])
    }

    /// First record of a slot
    pub fn record<T: Pod>(&self, slot: Slot<T>) -> &T {
        &self.get(slot)[0]
    }

    pub fn record_mut<T: Pod>(&mut self, slot: Slot<T>) -> &mut T {
        &mut self.get_mut(slot)[0]
    }

    /// Borrow two disjoint slots mutably at the same time
    ///
    /// # Panics
    /// If either slot is foreign or stale, or if the slots overlap.
    pub fn pair_mut<A: Pod, B: Pod>(&mut self, a: Slot<A>, b: Slot<B>) -> (&mut [A], &mut [B]) {
        self.check(&a);
        self.check(&b);
        let ra = a.byte_range();
        let rb = b.byte_range();
        assert!(
            ra.end <= rb.start || rb.end <= ra.start,
            "overlapping slots in {} region: {:?} and {:?}",
            self.label,
            ra,
            rb
        );

        let bytes = self.bytes_mut();
        if ra.end <= rb.start {
            let (lo, hi) = bytes.split_at_mut(rb.start);
            let b_len = rb.len();
            (
                bytemuck::cast_slice_mut(&mut lo[ra]),
                bytemuck::cast_slice_mut(&mut hi[..b_len]),
            )
        } else {
            let (lo, hi) = bytes.split_at_mut(ra.start);
            let a_len = ra.len();
            (
                bytemuck::cast_slice_mut(&mut hi[..a_len]),
                bytemuck::cast_slice_mut(&mut lo[rb]),
            )
        }
    }

    fn check<T>(&self, slot: &Slot<T>) {
        assert_eq!(
            slot.generation, self.generation,
            "stale slot for {} region (slot generation {}, arena generation {})",
            self.label, slot.generation, self.generation
        );
        assert!(
            slot.byte_range().end <= self.cursor,
            "slot {:?} lies outside the carved part of the {} region",
            slot.byte_range(),
            self.label
        );
    }

    #[inline]
    fn bytes(&self) -> &[u8] {
        &bytemuck::cast_slice::<u64, u8>(&self.words)[..self.capacity]
    }

    #[inline]
    fn bytes_mut(&mut self) -> &mut [u8] {
        let capacity = self.capacity;
        &mut bytemuck::cast_slice_mut::<u64, u8>(&mut self.words)[..capacity]
    }
}

/// The two backing regions of a simulation
#[derive(Debug)]
pub struct Memory {
    pub long_lived: Arena,
    pub per_level: Arena,
}

impl Memory {
    /// Acquire both regions or neither
    pub fn provision(long_lived_bytes: usize, per_level_bytes: usize) -> Result<Self, ArenaError> {
        let long_lived = Arena::new("long-lived", long_lived_bytes)?;
        let per_level = Arena::new("per-level", per_level_bytes)?;
        log::info!(
            "Provisioned memory: long-lived {} bytes, per-level {} bytes",
            long_lived_bytes,
            per_level_bytes
        );
        Ok(Self {
            long_lived,
            per_level,
        })
    }
}
