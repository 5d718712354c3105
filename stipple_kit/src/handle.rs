// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Opaque handles and the generation-checked arenas behind them.

use crate::KitError;

const SLOT_SHIFT: u32 = 40;
const KIND_SHIFT: u32 = 32;
const KIND_MASK: u64 = 0xFF << KIND_SHIFT;
/// Slots are stored plus one in 24 bits.
const MAX_SLOTS: usize = (1 << 24) - 1;

/// An opaque reference to an object owned by a [`Kit`](crate::Kit).
///
/// A handle packs three fields into 64 bits:
///
/// - bits 40..64: the arena slot plus one, so no live handle is zero
/// - bits 32..40: the [`Kind`] tag
/// - bits 0..32: the slot generation
///
/// ## Liveness
///
/// - A slot starts at generation `1`.
/// - Deleting an object bumps its slot's generation, so every outstanding
///   handle to it becomes stale. Stale handles are rejected, never resolved
///   to whatever reuses the slot.
/// - Generations skip `0` when they wrap.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Handle(u64);

impl Handle {
    /// The failure sentinel, never a live object.
    pub const NULL: Self = Self(0);

    /// Reinterpret a raw value received across the call boundary.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw value to pass across the call boundary.
    pub const fn to_raw(self) -> u64 {
        self.0
    }

    /// Whether this is [`Handle::NULL`].
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// The kind tag, or `None` for null and unknown tags.
    pub fn kind(self) -> Option<Kind> {
        if self.is_null() {
            None
        } else {
            Kind::from_code(self.kind_code())
        }
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "slots are bounded by MAX_SLOTS, which fits in 24 bits"
    )]
    const fn new(slot: usize, kind: Kind, generation: u32) -> Self {
        Self(((slot as u64 + 1) << SLOT_SHIFT) | ((kind as u64) << KIND_SHIFT) | generation as u64)
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "the kind tag is 8 bits wide"
    )]
    pub(crate) const fn kind_code(self) -> u8 {
        (self.0 >> KIND_SHIFT) as u8
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "the slot field is 24 bits wide"
    )]
    fn slot(self) -> Option<usize> {
        ((self.0 >> SLOT_SHIFT) as usize).checked_sub(1)
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "the generation is the low 32 bits"
    )]
    const fn generation(self) -> u32 {
        self.0 as u32
    }

    /// The same slot and generation under another kind tag.
    pub(crate) const fn with_kind(self, kind: Kind) -> Self {
        Self((self.0 & !KIND_MASK) | ((kind as u64) << KIND_SHIFT))
    }
}

/// The kind of object a [`Handle`] refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Kind {
    /// A mutable path accumulator.
    PathBuilder = 1,
    /// An immutable path snapshot.
    Path = 2,
    /// A drawing style.
    Paint = 3,
    /// A render target.
    Surface = 4,
    /// The drawing interface of a surface.
    Canvas = 5,
    /// A sized typeface reference.
    Font = 6,
    /// A styled text accumulator.
    ParagraphBuilder = 7,
    /// Laid-out text.
    Paragraph = 8,
    /// Shared premultiplied pixels.
    Image = 9,
    /// A shared color source.
    Shader = 10,
    /// A shared color transform.
    ColorFilter = 11,
    /// A shared font face.
    Typeface = 12,
    /// A shared glyph run.
    TextBlob = 13,
    /// A shared byte blob.
    Data = 14,
    /// A shared font registry.
    FontManager = 15,
}

impl Kind {
    /// Look up a kind by its tag.
    pub const fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            1 => Self::PathBuilder,
            2 => Self::Path,
            3 => Self::Paint,
            4 => Self::Surface,
            5 => Self::Canvas,
            6 => Self::Font,
            7 => Self::ParagraphBuilder,
            8 => Self::Paragraph,
            9 => Self::Image,
            10 => Self::Shader,
            11 => Self::ColorFilter,
            12 => Self::Typeface,
            13 => Self::TextBlob,
            14 => Self::Data,
            15 => Self::FontManager,
            _ => return None,
        })
    }

    /// Whether objects of this kind are reference counted.
    pub const fn is_shared(self) -> bool {
        matches!(
            self,
            Self::Image
                | Self::Shader
                | Self::ColorFilter
                | Self::Typeface
                | Self::TextBlob
                | Self::Data
                | Self::FontManager
        )
    }
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
    /// Generation of the handle whose object was consumed from this slot.
    consumed: Option<u32>,
}

/// Objects of one kind, addressed by generation-checked handles.
#[derive(Debug)]
pub(crate) struct Arena<T> {
    kind: Kind,
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
}

impl<T> Arena<T> {
    pub(crate) const fn new(kind: Kind) -> Self {
        Self {
            kind,
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Store `value`, reusing a freed slot when one exists.
    pub(crate) fn insert(&mut self, value: T) -> Result<Handle, KitError> {
        if let Some(slot) = self.free.pop() {
            let entry = &mut self.slots[slot];
            entry.value = Some(value);
            return Ok(Handle::new(slot, self.kind, entry.generation));
        }
        if self.slots.len() >= MAX_SLOTS {
            return Err(KitError::ArenaFull(self.kind));
        }
        self.slots.push(Slot {
            generation: 1,
            value: Some(value),
            consumed: None,
        });
        Ok(Handle::new(self.slots.len() - 1, self.kind, 1))
    }

    pub(crate) fn get(&self, handle: Handle) -> Result<&T, KitError> {
        let slot = self.locate(handle)?;
        self.slots[slot]
            .value
            .as_ref()
            .ok_or(KitError::StaleHandle(self.kind))
    }

    pub(crate) fn get_mut(&mut self, handle: Handle) -> Result<&mut T, KitError> {
        let slot = self.locate(handle)?;
        self.slots[slot]
            .value
            .as_mut()
            .ok_or(KitError::StaleHandle(self.kind))
    }

    /// Delete the object, invalidating every handle to it.
    pub(crate) fn remove(&mut self, handle: Handle) -> Result<T, KitError> {
        self.release(handle, false)
    }

    /// Move the object out for a terminal operation. Later use of the handle
    /// reports [`KitError::Consumed`].
    pub(crate) fn consume(&mut self, handle: Handle) -> Result<T, KitError> {
        self.release(handle, true)
    }

    /// Number of live objects.
    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    fn release(&mut self, handle: Handle, consumed: bool) -> Result<T, KitError> {
        let slot = self.locate(handle)?;
        let entry = &mut self.slots[slot];
        let value = entry.value.take().ok_or(KitError::StaleHandle(self.kind))?;
        entry.consumed = consumed.then_some(entry.generation);
        entry.generation = match entry.generation.wrapping_add(1) {
            0 => 1,
            next => next,
        };
        self.free.push(slot);
        Ok(value)
    }

    fn locate(&self, handle: Handle) -> Result<usize, KitError> {
        if handle.is_null() {
            return Err(KitError::NullHandle(Some(self.kind)));
        }
        if handle.kind() != Some(self.kind) {
            return Err(KitError::WrongKind {
                expected: self.kind,
                found: handle.kind_code(),
            });
        }
        let stale = KitError::StaleHandle(self.kind);
        let slot = handle.slot().ok_or(stale)?;
        let entry = self.slots.get(slot).ok_or(KitError::StaleHandle(self.kind))?;
        if entry.generation == handle.generation() && entry.value.is_some() {
            Ok(slot)
        } else if entry.consumed == Some(handle.generation()) {
            Err(KitError::Consumed(self.kind))
        } else {
            Err(KitError::StaleHandle(self.kind))
        }
    }
}
