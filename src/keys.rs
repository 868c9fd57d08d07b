//! Modifier mask constants and helpers.
//!
//! The windowing layer reports the modifier state alongside every key
//! event; the mask travels with the event rather than living in any
//! ambient global.

/// Shift key mask.
pub const MASK_SHIFT: u32 = 1 << 0;
/// Control key mask.
pub const MASK_CTRL: u32 = 1 << 1;
/// Alt/Option key mask.
pub const MASK_ALT: u32 = 1 << 2;
/// Meta/Command/Super key mask.
pub const MASK_META: u32 = 1 << 3;

/// All modifier masks combined.
pub const MASK_ALL_MODIFIERS: u32 = MASK_SHIFT | MASK_CTRL | MASK_ALT | MASK_META;

/// Check if Shift is held in `mask`.
#[inline]
pub fn is_shift_held(mask: u32) -> bool {
    mask & MASK_SHIFT != 0
}

/// Check if Control is held in `mask`.
#[inline]
pub fn is_ctrl_held(mask: u32) -> bool {
    mask & MASK_CTRL != 0
}

/// Check if Alt/Option is held in `mask`.
#[inline]
pub fn is_alt_held(mask: u32) -> bool {
    mask & MASK_ALT != 0
}

/// Check if Meta/Command/Super is held in `mask`.
#[inline]
pub fn is_meta_held(mask: u32) -> bool {
    mask & MASK_META != 0
}
