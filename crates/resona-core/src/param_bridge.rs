//! Lock-free knob handoff between a control thread and the audio thread.
//!
//! The control side writes knobs into a [`KnobBank`]; the audio side calls
//! [`KnobBank::sync`] once per block, which forwards only the slots written
//! since the last sync. Neither side blocks.
//!
//! ```rust
//! use std::sync::Arc;
//! use resona_core::KnobBank;
//!
//! let bank = Arc::new(KnobBank::with_len(3));
//! let writer = Arc::clone(&bank);
//! std::thread::spawn(move || writer.set(1, 0.25)).join().unwrap();
//! assert_eq!(bank.get(1), Some(0.25));
//! assert!(bank.is_dirty(1));
//! ```

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::param_info::{ParamDescriptor, ParameterInfo};

/// One atomic knob slot per parameter index, plus a dirty flag.
///
/// Knobs are stored as `f32` bits in an `AtomicU32`.
#[derive(Debug)]
pub struct KnobBank {
    knobs: Vec<AtomicU32>,
    dirty: Vec<AtomicBool>,
}

impl KnobBank {
    /// A bank of `len` slots, all at knob 0 and clean.
    pub fn with_len(len: usize) -> Self {
        Self {
            knobs: (0..len).map(|_| AtomicU32::new(0.0f32.to_bits())).collect(),
            dirty: (0..len).map(|_| AtomicBool::new(false)).collect(),
        }
    }

    /// A bank seeded with each descriptor's default knob. All slots start clean.
    pub fn from_descriptors<I>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = ParamDescriptor>,
    {
        let knobs: Vec<AtomicU32> = descriptors
            .into_iter()
            .map(|d| AtomicU32::new(d.default_knob().to_bits()))
            .collect();
        let dirty = (0..knobs.len()).map(|_| AtomicBool::new(false)).collect();
        Self { knobs, dirty }
    }

    /// A bank mirroring the current knobs of `effect`.
    pub fn from_effect<P: ParameterInfo + ?Sized>(effect: &P) -> Self {
        let knobs: Vec<AtomicU32> = (0..effect.param_count())
            .map(|i| AtomicU32::new(effect.get_param(i).to_bits()))
            .collect();
        let dirty = (0..knobs.len()).map(|_| AtomicBool::new(false)).collect();
        Self { knobs, dirty }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.knobs.len()
    }

    /// `true` if the bank has no slots.
    pub fn is_empty(&self) -> bool {
        self.knobs.is_empty()
    }

    /// Writes a knob from the control thread.
    ///
    /// The knob is clamped to `[0, 1]`. Non-finite values and unknown
    /// indices are dropped.
    pub fn set(&self, index: usize, knob: f32) {
        if !knob.is_finite() {
            return;
        }
        let (Some(slot), Some(flag)) = (self.knobs.get(index), self.dirty.get(index)) else {
            return;
        };
        slot.store(knob.clamp(0.0, 1.0).to_bits(), Ordering::Release);
        flag.store(true, Ordering::Release);
    }

    /// Last knob written to `index`.
    pub fn get(&self, index: usize) -> Option<f32> {
        self.knobs
            .get(index)
            .map(|slot| f32::from_bits(slot.load(Ordering::Acquire)))
    }

    /// `true` if `index` was written since the last sync.
    pub fn is_dirty(&self, index: usize) -> bool {
        self.dirty
            .get(index)
            .is_some_and(|flag| flag.load(Ordering::Acquire))
    }

    /// Forwards every dirty slot to `effect` and clears its flag.
    ///
    /// Audio thread, once per block. Returns the number of slots forwarded.
    pub fn sync<P: ParameterInfo + ?Sized>(&self, effect: &mut P) -> usize {
        let mut forwarded = 0;
        for (index, (slot, flag)) in self.knobs.iter().zip(&self.dirty).enumerate() {
            if flag.swap(false, Ordering::Acquire) {
                effect.set_param(index, f32::from_bits(slot.load(Ordering::Acquire)));
                forwarded += 1;
            }
        }
        forwarded
    }
}
