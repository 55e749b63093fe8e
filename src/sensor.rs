//! Device motion subscription
//!
//! Reports the x component of `accelerationIncludingGravity` for every
//! `devicemotion` event. Throttling to the update interval happens in
//! [`crate::sim::TiltSampler`]; this module only delivers raw values.
//! Dropping the subscription removes the listener. Browser only; native
//! builds have no sensor and keep the tilt flat.

use wasm_bindgen::{JsCast, closure::Closure};

/// Live `devicemotion` listener
pub struct MotionSubscription {
    window: web_sys::Window,
    closure: Closure<dyn FnMut(web_sys::DeviceMotionEvent)>,
}

impl MotionSubscription {
    const EVENT: &'static str = "devicemotion";

    /// Start listening. `on_sample` receives the raw x value. Returns `None`
    /// if the listener could not be attached; the tilt then stays flat.
    pub fn subscribe(mut on_sample: impl FnMut(f32) + 'static) -> Option<Self> {
        let window = web_sys::window()?;
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::DeviceMotionEvent| {
            // Some browsers fire events with null axes before the sensor warms up
            if let Some(x) = event.acceleration_including_gravity().and_then(|a| a.x()) {
                on_sample(x as f32);
            }
        });

        if let Err(e) = window
            .add_event_listener_with_callback(Self::EVENT, closure.as_ref().unchecked_ref())
        {
            log::warn!("Failed to subscribe to device motion: {:?}", e);
            return None;
        }

        log::info!("Subscribed to device motion");
        Some(Self { window, closure })
    }
}

impl Drop for MotionSubscription {
    fn drop(&mut self) {
        let _ = self.window.remove_event_listener_with_callback(
            Self::EVENT,
            self.closure.as_ref().unchecked_ref(),
        );
        log::info!("Unsubscribed from device motion");
    }
}
