//! Vectorized reverse+complement run primitive
//!
//! [`revcomp_run`] reverses a run of symbol bytes while substituting each
//! with its complement: the source is consumed tail to head, the
//! destination written head to tail. The bulk of a run goes through a
//! 16-byte SIMD kernel; remainders use the packed pair table.
//!
//! # Platform Support
//!
//! - **x86_64**: SSSE3 kernel, feature-detected at runtime
//! - **aarch64**: NEON kernel (always available on ARM64)
//! - **Other platforms**: packed-pair scalar path only
//!
//! The kernels are total over all 256 byte values: a letter-class mask
//! routes anything outside the recognized alphabet to the sentinel, so the
//! wide and scalar paths agree byte for byte. Correctness never depends on
//! the batch width; the scalar remainder handles whatever the kernel
//! cannot fill.

#![allow(unsafe_op_in_unsafe_fn)]

use crate::operations::complement::{COMPLEMENT, COMPLEMENT_PAIR, SENTINEL};

/// Bytes processed per wide-kernel batch.
pub const WIDE_WIDTH: usize = 16;

/// True when a 16-byte reverse+complement kernel exists on this CPU.
///
/// Detect once and pass the result to [`revcomp_run`]; the check behind
/// this call is cheap but not free.
pub fn wide_kernel_available() -> bool {
    #[cfg(target_arch = "x86_64")]
    {
        is_x86_feature_detected!("ssse3")
    }

    #[cfg(target_arch = "aarch64")]
    {
        true
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        false
    }
}

/// Reverse an even-length run of bytes, complementing each element.
///
/// `src` and `dst` must have the same even length. `wide` selects the
/// 16-byte kernel and must only be `true` when
/// [`wide_kernel_available`] returned `true`; remainders shorter than a
/// batch fall back to the packed pair table either way.
///
/// # Example
///
/// ```
/// use revflow::operations::revcomp::{revcomp_run, wide_kernel_available};
///
/// let src = b"AACGTT";
/// let mut dst = [0u8; 6];
/// revcomp_run(src, &mut dst, wide_kernel_available());
/// assert_eq!(&dst, b"AACGTT");
/// ```
pub fn revcomp_run(src: &[u8], dst: &mut [u8], wide: bool) {
    debug_assert_eq!(src.len(), dst.len());
    debug_assert_eq!(src.len() % 2, 0);

    let mut ip = src.len();
    let mut op = 0;

    if wide {
        while ip >= WIDE_WIDTH {
            ip -= WIDE_WIDTH;
            // SAFETY: `wide` implies the kernel's instruction set was
            // detected, and both ranges hold WIDE_WIDTH bytes.
            unsafe {
                revcomp16(src.as_ptr().add(ip), dst.as_mut_ptr().add(op));
            }
            op += WIDE_WIDTH;
        }
    }

    while ip > 0 {
        ip -= 2;
        let packed = COMPLEMENT_PAIR[usize::from(u16::from_le_bytes([src[ip], src[ip + 1]]))];
        dst[op..op + 2].copy_from_slice(&packed.to_le_bytes());
        op += 2;
    }
}

/// Reverse-complement a whole sequence into a fresh buffer.
///
/// Convenience wrapper over [`revcomp_run`] that also handles odd lengths.
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; seq.len()];
    let wide = wide_kernel_available();
    let even = seq.len() & !1;
    revcomp_run(&seq[seq.len() - even..], &mut out[..even], wide);
    if even < seq.len() {
        out[even] = COMPLEMENT[seq[0] as usize];
    }
    out
}

#[cfg(target_arch = "x86_64")]
#[inline]
unsafe fn revcomp16(src: *const u8, dst: *mut u8) {
    revcomp16_ssse3(src, dst);
}

#[cfg(target_arch = "aarch64")]
#[inline]
unsafe fn revcomp16(src: *const u8, dst: *mut u8) {
    revcomp16_neon(src, dst);
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
unsafe fn revcomp16(src: *const u8, dst: *mut u8) {
    // Never taken: `wide_kernel_available()` is false on these targets.
    for i in 0..WIDE_WIDTH {
        *dst.add(i) = COMPLEMENT[*src.add(WIDE_WIDTH - 1 - i) as usize];
    }
}

/// SSSE3 reverse+complement of one 16-byte batch.
///
/// Reverses the register with a byte shuffle, then complements via two
/// 16-entry lookups over the 0x1f byte class: classes below 16 hit the low
/// table, classes 16..32 are rebased and hit the high table (out-of-range
/// indices shuffle to zero on their own). A letter mask plus a
/// nonzero-entry mask blends the sentinel over every byte the tables do
/// not cover.
///
/// # Safety
///
/// Requires SSSE3 (caller checks via `is_x86_feature_detected!`); `src`
/// and `dst` must each point at 16 readable/writable bytes.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "ssse3")]
unsafe fn revcomp16_ssse3(src: *const u8, dst: *mut u8) {
    use std::arch::x86_64::*;

    let input = _mm_loadu_si128(src as *const __m128i);
    let reversed = _mm_shuffle_epi8(
        input,
        _mm_set_epi8(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15),
    );

    // 5-bit class: folds case and compresses the alphabet into 32 slots so
    // two shuffles cover the whole lookup.
    let classes = _mm_and_si128(reversed, _mm_set1_epi8(0x1f));

    let lt16 = _mm_cmplt_epi8(classes, _mm_set1_epi8(16));
    let lo_idx = _mm_and_si128(classes, lt16);
    let lo_lut = _mm_set_epi8(
        0,
        b'N' as i8,
        b'K' as i8,
        0,
        b'M' as i8,
        0,
        0,
        b'D' as i8,
        b'C' as i8,
        0,
        0,
        b'H' as i8,
        b'G' as i8,
        b'V' as i8,
        b'T' as i8,
        0,
    );
    let lo_vals = _mm_shuffle_epi8(lo_lut, lo_idx);

    // Classes below 16 go negative after the rebase; the shuffle zeroes
    // them because the index's high bit is set.
    let hi_idx = _mm_sub_epi8(classes, _mm_set1_epi8(16));
    let hi_lut = _mm_set_epi8(
        0,
        0,
        0,
        0,
        0,
        0,
        b'R' as i8,
        0,
        b'W' as i8,
        b'B' as i8,
        b'A' as i8,
        b'A' as i8,
        b'S' as i8,
        b'Y' as i8,
        0,
        0,
    );
    let hi_vals = _mm_shuffle_epi8(hi_lut, hi_idx);

    let mapped = _mm_or_si128(lo_vals, hi_vals);

    // Sentinel blend: only ASCII letters whose class has a table entry
    // keep their mapping.
    let folded = _mm_or_si128(reversed, _mm_set1_epi8(0x20));
    let letter = _mm_and_si128(
        _mm_cmpgt_epi8(folded, _mm_set1_epi8((b'a' - 1) as i8)),
        _mm_cmplt_epi8(folded, _mm_set1_epi8((b'z' + 1) as i8)),
    );
    let unmapped = _mm_cmpeq_epi8(mapped, _mm_setzero_si128());
    let keep = _mm_andnot_si128(unmapped, letter);
    let result = _mm_or_si128(
        _mm_and_si128(keep, mapped),
        _mm_andnot_si128(keep, _mm_set1_epi8(SENTINEL as i8)),
    );

    _mm_storeu_si128(dst as *mut __m128i, result);
}

/// NEON reverse+complement of one 16-byte batch.
///
/// Same structure as the SSSE3 kernel; the 32-entry class lookup fits a
/// single two-register `tbl`.
///
/// # Safety
///
/// `src` and `dst` must each point at 16 readable/writable bytes. NEON is
/// baseline on aarch64.
#[cfg(target_arch = "aarch64")]
unsafe fn revcomp16_neon(src: *const u8, dst: *mut u8) {
    use std::arch::aarch64::*;

    const REVERSE_IDX: [u8; 16] = [15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0];
    #[rustfmt::skip]
    const CLASS_LUT: [u8; 32] = [
        0, b'T', b'V', b'G', b'H', 0, 0, b'C', b'D', 0, 0, b'M', 0, b'K', b'N', 0,
        0, 0, b'Y', b'S', b'A', b'A', b'B', b'W', 0, b'R', 0, 0, 0, 0, 0, 0,
    ];

    let input = vld1q_u8(src);
    let reversed = vqtbl1q_u8(input, vld1q_u8(REVERSE_IDX.as_ptr()));

    let classes = vandq_u8(reversed, vdupq_n_u8(0x1f));
    let table = uint8x16x2_t(
        vld1q_u8(CLASS_LUT.as_ptr()),
        vld1q_u8(CLASS_LUT.as_ptr().add(16)),
    );
    let mapped = vqtbl2q_u8(table, classes);

    let folded = vorrq_u8(reversed, vdupq_n_u8(0x20));
    let letter = vandq_u8(
        vcgeq_u8(folded, vdupq_n_u8(b'a')),
        vcleq_u8(folded, vdupq_n_u8(b'z')),
    );
    let keep = vandq_u8(letter, vtstq_u8(mapped, mapped));
    let result = vbslq_u8(keep, mapped, vdupq_n_u8(SENTINEL));

    vst1q_u8(dst, result);
}
