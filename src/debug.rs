use crate::transition::Pose;
use crate::vehicle::Advance;
use crate::VehicleId;
use serde_json::json;
use slotmap::Key;

thread_local!(
    static DEBUG_FRAME: std::cell::RefCell<Vec<serde_json::Value>> = Default::default();
);

/// Records a vehicle moving onto a new segment, or leaving the junction.
pub fn debug_event(vehicle_id: VehicleId, advance: Advance, pose: Pose) {
    DEBUG_FRAME.with(|frame| {
        frame.borrow_mut().push(json!({
            "type": format!("{:?}", advance).to_lowercase(),
            "vehicle": vehicle_id.data().as_ffi(),
            "pos": [pose.position.x, pose.position.y],
            "heading": pose.heading,
        }))
    })
}

pub fn take_debug_frame() -> serde_json::Value {
    json!(DEBUG_FRAME.with(|frame| frame.take()))
}
