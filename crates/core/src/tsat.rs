//! Transferrin saturation derived from serum iron and TIBC.

use anemia_types::LabValue;

/// Computes `round(serum_iron / tibc * 100)`.
///
/// Returns `None` (leave TSAT as entered) when either input is absent or TIBC is zero.
pub fn derive_transferrin_saturation(
    serum_iron: Option<LabValue>,
    total_iron_binding_capacity: Option<LabValue>,
) -> Option<u32> {
    let iron = serum_iron?.get();
    let tibc = total_iron_binding_capacity?.get();
    if tibc == 0.0 {
        return None;
    }
    let percent = (iron / tibc * 100.0).round();
    // Both inputs are finite and non-negative, so only overflow needs clamping.
    Some(if percent >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        percent as u32
    })
}
