/// Unit tests for StateController

use super::*;
use crate::graphics_device::MockGraphicsDevice;

fn controller() -> (StateController, MockGraphicsDevice) {
    let mut device = MockGraphicsDevice::new();
    let mut controller = StateController::new();
    controller.reset(&mut device);
    (controller, device)
}

#[test]
fn test_reset_disables_everything() {
    let (controller, device) = controller();

    for attribute in Attribute::ALL {
        assert!(!device.is_enabled(attribute));
        assert!(!controller.state().is_enabled(attribute));
    }
    assert_eq!(device.blend_function(), Some(ALPHA_BLEND));
    assert_eq!(device.current_clear_color(), [0.0; 4]);
    assert_eq!(controller.state(), &PipelineState::default());
}

#[test]
fn test_blend_on_then_off_leaves_no_trace() {
    let (mut controller, mut never_enabled) = controller();
    let mut device = MockGraphicsDevice::new();
    let mut other = StateController::new();
    other.reset(&mut device);

    other.enable(&mut device, Attribute::Blend, true);
    assert!(device.is_enabled(Attribute::Blend));
    other.enable(&mut device, Attribute::Blend, false);

    assert_eq!(other.state(), controller.state());
    assert_eq!(device.is_enabled(Attribute::Blend), never_enabled.is_enabled(Attribute::Blend));
    assert_eq!(device.blend_function(), never_enabled.blend_function());

    // The untouched controller still behaves the same
    controller.enable(&mut never_enabled, Attribute::Blend, false);
    assert_eq!(never_enabled.state_changes(), device.state_changes() - 2);
}

#[test]
fn test_enable_is_idempotent() {
    let (mut controller, mut device) = controller();
    let before = device.state_changes();

    controller.enable(&mut device, Attribute::DepthTest, true);
    controller.enable(&mut device, Attribute::DepthTest, true);
    controller.enable(&mut device, Attribute::Cull, false);

    assert_eq!(device.state_changes(), before + 1);
    assert!(device.is_enabled(Attribute::DepthTest));
    assert!(controller.state().depth_test);
}

#[test]
fn test_clear_color_cached() {
    let (mut controller, mut device) = controller();
    let before = device.state_changes();

    controller.set_clear_color(&mut device, 0.2, 0.2, 0.4, 1.0);
    controller.set_clear_color(&mut device, 0.2, 0.2, 0.4, 1.0);

    assert_eq!(device.state_changes(), before + 1);
    assert_eq!(device.current_clear_color(), [0.2, 0.2, 0.4, 1.0]);
}

#[test]
fn test_viewport_rejects_non_positive() {
    let (mut controller, mut device) = controller();

    assert_eq!(
        controller.set_viewport(&mut device, 0, 600),
        Err(Error::ViewportError { width: 0, height: 600 })
    );
    assert_eq!(
        controller.set_viewport(&mut device, 800, -1),
        Err(Error::ViewportError { width: 800, height: -1 })
    );
    assert_eq!(device.current_viewport(), None);
    assert_eq!(controller.viewport(), None);
}

#[test]
fn test_viewport_idempotent() {
    let (mut controller, mut device) = controller();

    assert!(controller.set_viewport(&mut device, 800, 600).is_ok());
    let after_first = device.state_changes();
    assert!(controller.set_viewport(&mut device, 800, 600).is_ok());

    assert_eq!(device.state_changes(), after_first);
    assert_eq!(device.current_viewport(), Some((0, 0, 800, 600)));
    assert_eq!(controller.viewport(), Some((800, 600)));
}

#[test]
fn test_clear_uses_color_and_depth() {
    let (controller, mut device) = controller();
    controller.clear(&mut device);
    controller.clear(&mut device);

    assert_eq!(device.clear_count(), 2);
    assert!(device.commands.iter().any(|c| c.starts_with("clear(") && c.contains("COLOR") && c.contains("DEPTH")));
}
