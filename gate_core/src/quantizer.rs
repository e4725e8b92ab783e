//! Saturating N-bit conversion between a continuous range and integer codes.
//!
//! Out-of-range and non-finite inputs never wrap: values clamp to the range
//! ends and NaN reads as the low end.

/// Largest code representable in `bits` bits. `bits` is clamped to `1..=32`.
#[inline]
pub fn max_code(bits: u32) -> u32 {
    match bits.clamp(1, 32) {
        32 => u32::MAX,
        b => (1u32 << b) - 1,
    }
}

/// `round((clamp(value) - lo) / (hi - lo) * max_code)`.
///
/// A degenerate range (`hi <= lo`, or NaN bounds) encodes everything as 0.
pub fn encode(value: f64, lo: f64, hi: f64, bits: u32) -> u32 {
    if !(hi > lo) {
        return 0;
    }
    let max = max_code(bits);
    let v = if value.is_nan() { lo } else { value.clamp(lo, hi) };
    let scaled = ((v - lo) / (hi - lo) * f64::from(max)).round();
    if scaled <= 0.0 {
        0
    } else if scaled >= f64::from(max) {
        max
    } else {
        scaled as u32
    }
}

/// Inverse of [`encode`]; codes above `max_code(bits)` saturate to `hi`.
pub fn decode(code: u32, lo: f64, hi: f64, bits: u32) -> f64 {
    if !(hi > lo) {
        return lo;
    }
    let max = max_code(bits);
    let code = code.min(max);
    if code == max {
        return hi;
    }
    lo + (hi - lo) * (f64::from(code) / f64::from(max))
}

/// A fixed range and bit width, e.g. the 8-bit output DAC over `[0, 120]` V.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantizer {
    lo: f64,
    hi: f64,
    bits: u32,
}

impl Quantizer {
    pub fn new(lo: f64, hi: f64, bits: u32) -> Self {
        Self {
            lo,
            hi,
            bits: bits.clamp(1, 32),
        }
    }

    /// `[0, vmax]` converter, the shape of both port converters.
    pub fn unipolar(vmax: f64, bits: u32) -> Self {
        Self::new(0.0, vmax, bits)
    }

    #[inline]
    pub fn encode(&self, value: f64) -> u32 {
        encode(value, self.lo, self.hi, self.bits)
    }

    #[inline]
    pub fn decode(&self, code: u32) -> f64 {
        decode(code, self.lo, self.hi, self.bits)
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn max_code(&self) -> u32 {
        max_code(self.bits)
    }

    /// Width of one code step.
    pub fn lsb(&self) -> f64 {
        (self.hi - self.lo) / f64::from(self.max_code())
    }
}
