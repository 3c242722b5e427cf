//! Generic register abstraction for type-safe MSR programming

/// Trait for register layouts that can be converted to/from raw MSR values
///
/// Implementors describe one 64-bit register as named fields. Decoding must
/// ignore bits outside the documented fields; encoding must leave them zero.
///
/// # Example
///
/// ```ignore
/// use pwrtune_raw::RegisterLayout;
///
/// #[derive(Debug, Default)]
/// struct RatioLimit {
///     max_ratio: u8,
///     min_ratio: u8,
/// }
///
/// impl RegisterLayout for RatioLimit {
///     fn to_msr_value(&self) -> u64 {
///         (self.max_ratio as u64 & 0x7F) | ((self.min_ratio as u64 & 0x7F) << 8)
///     }
///
///     fn from_msr_value(value: u64) -> Self {
///         Self {
///             max_ratio: (value & 0x7F) as u8,
///             min_ratio: ((value >> 8) & 0x7F) as u8,
///         }
///     }
/// }
/// ```
pub trait RegisterLayout: Sized {
    /// Convert this register layout to a raw MSR value
    fn to_msr_value(&self) -> u64;

    /// Parse a raw MSR value into this register layout
    fn from_msr_value(value: u64) -> Self;

    /// Validate that the field values fit their bit widths
    ///
    /// Returns `Ok(())` if valid, or an error message if invalid.
    fn validate(&self) -> Result<(), &'static str> {
        Ok(())
    }
}
