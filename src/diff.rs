//! First-difference detection between two byte strings.
//!
//! Insertion needs to know where a new key stops agreeing with a stored
//! fragment and which bits of that byte disagree. Two scanners produce the
//! same answer: [`diff_words`] XORs whole machine words at a time and is used
//! on targets where unaligned word loads are cheap, [`diff_bytes`] walks one
//! byte at a time and is the portable fallback. [`diff`] picks one at compile
//! time (the `byte-diff` feature forces the byte scanner everywhere).

use std::mem::size_of;

const WORD: usize = size_of::<usize>();

/// Result of comparing two byte strings over their common length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diff {
    /// No byte differs within the shorter length (one string prefixes the other).
    pub equal: bool,
    /// Index of the first differing byte, or the shorter length when `equal`.
    pub position: usize,
    /// `a[position] ^ b[position]`, or 0 when `equal`.
    pub byte: u8,
}

impl Diff {
    #[inline]
    fn same(len: usize) -> Self {
        Self {
            equal: true,
            position: len,
            byte: 0,
        }
    }

    #[inline]
    fn at(position: usize, byte: u8) -> Self {
        Self {
            equal: false,
            position,
            byte,
        }
    }

    /// Single-bit mask of the most significant differing bit (0 when equal).
    #[inline]
    pub fn mask(self) -> u8 {
        branch_mask(self.byte)
    }
}

/// Highest set bit of `d`, or 0 if `d` is 0.
///
/// Branching on the most significant differing bit keeps left/right order
/// identical to lexicographic byte order.
#[inline]
pub fn branch_mask(d: u8) -> u8 {
    if d == 0 {
        0
    } else {
        0x80 >> d.leading_zeros()
    }
}

/// Bits strictly more significant than the single bit `mask`.
#[inline]
pub(crate) fn bits_above(mask: u8) -> u8 {
    !(mask.wrapping_shl(1).wrapping_sub(1))
}

/// Compare `a` and `b`, using the fastest scanner for the target.
#[inline]
pub fn diff(a: &[u8], b: &[u8]) -> Diff {
    #[cfg(all(
        not(feature = "byte-diff"),
        any(
            target_arch = "x86",
            target_arch = "x86_64",
            target_arch = "aarch64",
            target_arch = "powerpc64",
            target_arch = "s390x"
        )
    ))]
    {
        diff_words(a, b)
    }
    #[cfg(not(all(
        not(feature = "byte-diff"),
        any(
            target_arch = "x86",
            target_arch = "x86_64",
            target_arch = "aarch64",
            target_arch = "powerpc64",
            target_arch = "s390x"
        )
    )))]
    {
        diff_bytes(a, b)
    }
}

/// Byte-at-a-time scan.
pub fn diff_bytes(a: &[u8], b: &[u8]) -> Diff {
    let n = a.len().min(b.len());
    for i in 0..n {
        let d = a[i] ^ b[i];
        if d != 0 {
            return Diff::at(i, d);
        }
    }
    Diff::same(n)
}

/// Word-at-a-time scan.
///
/// Words are assembled little-endian regardless of the host byte order, so
/// the lowest non-zero byte of the XOR is always the earliest in memory.
pub fn diff_words(a: &[u8], b: &[u8]) -> Diff {
    let n = a.len().min(b.len());
    let (a, b) = (&a[..n], &b[..n]);

    let mut wa = [0u8; WORD];
    let mut wb = [0u8; WORD];
    for (i, (ca, cb)) in a.chunks_exact(WORD).zip(b.chunks_exact(WORD)).enumerate() {
        wa.copy_from_slice(ca);
        wb.copy_from_slice(cb);
        let x = usize::from_le_bytes(wa) ^ usize::from_le_bytes(wb);
        if x != 0 {
            let j = (x.trailing_zeros() / 8) as usize;
            return Diff::at(i * WORD + j, (x >> (j * 8)) as u8);
        }
    }

    let tail = n - n % WORD;
    for i in tail..n {
        let d = a[i] ^ b[i];
        if d != 0 {
            return Diff::at(i, d);
        }
    }
    Diff::same(n)
}
