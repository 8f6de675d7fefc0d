//! Control/actuation coordinate conversion

/// Bidirectional mapping between logical and native coordinates
///
/// The two directions are expected to be inverses of each other up to
/// integer rounding of the native side. Slices always have the machine
/// dimension as length.
pub trait GeometricModel {
    /// Logical position (e.g. millimetres) to native position (e.g. steps)
    fn control_to_actuation(&self, control: &[f32], actuation: &mut [i32]);

    /// Native position back to logical position
    fn actuation_to_control(&self, actuation: &[i32], control: &mut [f32]);
}
