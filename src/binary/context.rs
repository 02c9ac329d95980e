/*
    Rounding context
*/

use super::exceptions::TRAP_ORDER;
use super::round::Rounded;
use super::{BigFloat, Flags, RoundingMode, TrapError};

/** A rounding and exception-signaling context.
 *
 * A `Context` parameterizes every arithmetic operation: the working
 * precision in significant bits (0 means unbounded), the rounding mode,
 * and optional bounds on the adjusted exponent. It also accumulates the
 * condition flags operations raise (when flag recording is enabled) and
 * holds the trap mask that decides which conditions escalate into a
 * [`TrapError`] instead of returning normally.
 *
 * Contexts are plain values. Operations take `&mut Context`, so two
 * threads cannot accumulate flags into one context without synchronizing
 * first; the trap subsystem snapshots by cloning.
 */
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Context {
    precision: u64,
    rounding: RoundingMode,
    emin: Option<i64>,
    emax: Option<i64>,
    flags: Flags,
    traps: Flags,
    record_flags: bool,
    clamp_exponent: bool,
    adjust_exponent: bool,
}

impl Context {
    /// Creates a context with unbounded precision, no exponent range,
    /// half-even rounding, and no traps.
    pub fn unlimited() -> Self {
        Self {
            precision: 0,
            rounding: RoundingMode::NearestEven,
            emin: None,
            emax: None,
            flags: Flags::empty(),
            traps: Flags::empty(),
            record_flags: false,
            clamp_exponent: false,
            adjust_exponent: true,
        }
    }

    /// Creates a context rounding to `precision` significant bits with
    /// half-even rounding, no exponent range, and no traps.
    pub fn for_precision(precision: u64) -> Self {
        Self {
            precision,
            ..Self::unlimited()
        }
    }

    /// Sets the rounding mode.
    pub fn rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    /// Bounds the adjusted exponent to `[emin, emax]`.
    pub fn exponent_range(mut self, emin: i64, emax: i64) -> Self {
        self.emin = Some(emin);
        self.emax = Some(emax);
        self
    }

    /// Sets the trap mask: any condition in `traps` raises a
    /// [`TrapError`] when newly set by an operation.
    pub fn traps(mut self, traps: Flags) -> Self {
        self.traps = traps;
        self
    }

    /// Enables flag recording, starting from a blank flag set.
    pub fn with_flags(mut self) -> Self {
        self.record_flags = true;
        self.flags = Flags::empty();
        self
    }

    /// Sets whether high out-of-range exponents are clamped to the top of
    /// the representable range (padding the mantissa) instead of being
    /// left where rounding put them.
    pub fn clamp_exponent(mut self, clamp: bool) -> Self {
        self.clamp_exponent = clamp;
        self
    }

    /// Sets whether the exponent range applies to the adjusted exponent
    /// (the exponent of the most significant bit) or to the raw scale
    /// exponent.
    pub fn adjust_exponent(mut self, adjust: bool) -> Self {
        self.adjust_exponent = adjust;
        self
    }

    /// Returns the working precision in bits; 0 means unbounded.
    pub fn precision(&self) -> u64 {
        self.precision
    }

    /// Returns the rounding mode.
    pub fn rounding_mode(&self) -> RoundingMode {
        self.rounding
    }

    /// Returns the minimum adjusted exponent, if bounded.
    pub fn emin(&self) -> Option<i64> {
        self.emin
    }

    /// Returns the maximum adjusted exponent, if bounded.
    pub fn emax(&self) -> Option<i64> {
        self.emax
    }

    /// Returns the conditions accumulated so far.
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Clears the accumulated conditions.
    pub fn clear_flags(&mut self) {
        self.flags = Flags::empty();
    }

    /// Returns true if this context records condition flags.
    pub fn records_flags(&self) -> bool {
        self.record_flags
    }

    /// Returns the trap mask.
    pub fn trap_mask(&self) -> Flags {
        self.traps
    }

    pub(crate) fn is_clamping(&self) -> bool {
        self.clamp_exponent
    }

    pub(crate) fn is_adjusting(&self) -> bool {
        self.adjust_exponent
    }

    // Completes one operation: merges the newly raised flags into the
    // accumulated set (when recording), then delivers the highest-priority
    // trapped condition, if any. The trap gate tests the flags raised by
    // this operation only, never previously accumulated ones.
    pub(crate) fn resolve(&mut self, rounded: Rounded) -> Result<BigFloat, TrapError> {
        if self.record_flags {
            self.flags |= rounded.flags;
        }
        for &flag in TRAP_ORDER.iter() {
            if rounded.flags.contains(flag) && self.traps.contains(flag) {
                tracing::debug!(flag = flag.name(), "arithmetic trap raised");
                return Err(TrapError::new(flag, Some(self), rounded.value));
            }
        }
        Ok(rounded.value)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl crate::Context for Context {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factories() {
        let ctx = Context::unlimited();
        assert_eq!(ctx.precision(), 0);
        assert_eq!(ctx.rounding_mode(), RoundingMode::NearestEven);
        assert_eq!(ctx.emin(), None);
        assert_eq!(ctx.emax(), None);
        assert!(!ctx.records_flags());

        let ctx = Context::for_precision(53)
            .rounding(RoundingMode::ToZero)
            .exponent_range(-1022, 1023);
        assert_eq!(ctx.precision(), 53);
        assert_eq!(ctx.rounding_mode(), RoundingMode::ToZero);
        assert_eq!(ctx.emin(), Some(-1022));
        assert_eq!(ctx.emax(), Some(1023));
    }

    #[test]
    fn flags_only_recorded_when_enabled() {
        let mut silent = Context::unlimited();
        let rounded = Rounded {
            value: BigFloat::one(),
            flags: Flags::INEXACT,
        };
        assert!(silent.resolve(rounded.clone()).is_ok());
        assert_eq!(silent.flags(), Flags::empty());

        let mut recording = Context::unlimited().with_flags();
        assert!(recording.resolve(rounded).is_ok());
        assert_eq!(recording.flags(), Flags::INEXACT);
    }

    #[test]
    fn trap_prefers_priority_order() {
        let mut ctx = Context::unlimited()
            .traps(Flags::INEXACT | Flags::INVALID)
            .with_flags();
        let rounded = Rounded {
            value: BigFloat::one(),
            flags: Flags::INEXACT | Flags::INVALID | Flags::ROUNDED,
        };
        let err = ctx.resolve(rounded).unwrap_err();
        assert_eq!(err.flag(), Flags::INVALID);
        // flags are recorded even though the trap fired
        assert!(ctx.flags().contains(Flags::ROUNDED));
    }
}
