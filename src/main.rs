//! Tilt Coin entry point
//!
//! On the web this wires the DOM, the motion sensor and the frame loop to a
//! `CoinState`. Natively it runs a headless harness that prints flips.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, MouseEvent};

    use tilt_coin::sensor::MotionSubscription;
    use tilt_coin::sim::{CoinState, FlipEvent};
    use tilt_coin::{HapticManager, Settings};

    // iOS only delivers devicemotion after a permission prompt, and the
    // prompt has to come from a user gesture.
    #[wasm_bindgen(inline_js = "
        export function request_motion_permission() {
            if (typeof DeviceMotionEvent !== 'undefined'
                && typeof DeviceMotionEvent.requestPermission === 'function') {
                DeviceMotionEvent.requestPermission()
                    .then(state => console.log('Motion permission:', state))
                    .catch(e => console.warn('Motion permission failed:', e));
            }
        }
    ")]
    extern "C" {
        fn request_motion_permission();
    }

    /// Milliseconds on the page's monotonic clock
    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    /// DOM elements the app draws into
    struct View {
        coin: HtmlElement,
        face: Element,
        text: HtmlElement,
        button: Element,
    }

    impl View {
        fn find(document: &Document) -> Option<Self> {
            let html = |id: &str| {
                document
                    .get_element_by_id(id)
                    .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            };
            Some(Self {
                coin: html("coin")?,
                face: document.get_element_by_id("coin-face")?,
                text: html("result-text")?,
                button: document.get_element_by_id("flip-btn")?,
            })
        }
    }

    /// App instance holding all state
    struct App {
        state: CoinState,
        settings: Settings,
        haptics: HapticManager,
        view: View,
        motion: Option<MotionSubscription>,
        last_time: f64,
        permission_requested: bool,
    }

    impl App {
        fn new(seed: u64, settings: Settings, view: View) -> Self {
            Self {
                state: CoinState::with_options(
                    seed,
                    settings.sensor_interval_ms,
                    settings.effective_spins(),
                ),
                haptics: HapticManager::new(&settings),
                settings,
                view,
                motion: None,
                last_time: 0.0,
                permission_requested: false,
            }
        }

        fn on_sample(&mut self, x: f32) {
            if self.state.on_sensor_sample(x, now_ms()) && self.settings.log_sensor_samples {
                log::debug!("Tilt x: {:.2}", x);
            }
        }

        fn on_background_tap(&mut self) {
            self.state.on_background_tap(now_ms());
        }

        fn on_flip_press(&mut self) {
            if !self.permission_requested {
                self.permission_requested = true;
                request_motion_permission();
            }

            let Some(start) = self.state.request_flip() else {
                return;
            };
            if let Some(pulse) = start.haptic {
                self.haptics.fire(pulse);
            }
        }

        /// Advance animations
        fn update(&mut self, dt_ms: f32) {
            for event in self.state.tick(dt_ms) {
                match event {
                    FlipEvent::StageEntered(stage) => log::debug!("Stage: {}", stage.as_str()),
                    FlipEvent::Revealed(_) => {}
                    FlipEvent::TextHidden => log::debug!("Flip complete"),
                }
            }
        }

        /// Push the current poses into the DOM
        fn render(&self) {
            let pose = self.state.coin_pose();
            let _ = self
                .view
                .coin
                .style()
                .set_property("transform", &pose.css_transform());
            self.view
                .face
                .set_class_name(&format!("coin {}", self.state.displayed_face().as_str()));

            let text = self.state.text_pose();
            let style = self.view.text.style();
            match self.state.result() {
                Some(face) if text.visible => {
                    self.view.text.set_text_content(Some(face.label()));
                    self.view
                        .text
                        .set_class_name(&format!("result-text {}", face.as_str()));
                    let _ = style.set_property("display", "block");
                    let _ = style.set_property("transform", &format!("scale({:.3})", text.scale));
                    let _ = style.set_property("opacity", &format!("{:.3}", text.opacity));
                }
                _ => {
                    let _ = style.set_property("display", "none");
                }
            }

            let _ = self
                .view
                .button
                .class_list()
                .toggle_with_force("busy", self.state.is_flipping());
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        log::info!("Tilt Coin starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document");
            return;
        };
        let Some(view) = View::find(&document) else {
            log::error!("Missing #coin, #coin-face, #result-text or #flip-btn");
            return;
        };

        let seed = js_sys::Date::now() as u64;
        let settings = Settings::load();
        let app = Rc::new(RefCell::new(App::new(seed, settings, view)));
        log::info!("Coin initialized with seed: {}", app.borrow().state.seed());

        let motion = {
            let app = app.clone();
            MotionSubscription::subscribe(move |x| app.borrow_mut().on_sample(x))
        };
        app.borrow_mut().motion = motion;

        setup_input_handlers(&document, app.clone());
        setup_unsubscribe(app.clone());

        app.borrow().render();
        request_animation_frame(app);

        log::info!("Tilt Coin running!");
    }

    fn setup_input_handlers(document: &Document, app: Rc<RefCell<App>>) {
        // Background tap (the hidden cheat toggle)
        if let Some(root) = document.get_element_by_id("app") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().on_background_tap();
            });
            let _ = root.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Flip button
        if let Some(btn) = document.get_element_by_id("flip-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                // Button presses are not background taps
                event.stop_propagation();
                app.borrow_mut().on_flip_press();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Drop the sensor listener when the page goes away
    fn setup_unsubscribe(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::PageTransitionEvent| {
            let motion = app.borrow_mut().motion.take();
            drop(motion);
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();

            let dt_ms = if a.last_time > 0.0 {
                (time - a.last_time) as f32
            } else {
                0.0
            };
            a.last_time = time;

            a.update(dt_ms);
            a.render();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod harness {
    use std::path::PathBuf;

    use clap::Parser;
    use serde::Serialize;

    use tilt_coin::consts::{DOUBLE_TAP_WINDOW_MS, SIM_FRAME_MS};
    use tilt_coin::sim::{CoinState, Face, FlipEvent, FlipStage, HapticPulse};
    use tilt_coin::{HapticManager, Settings};

    #[derive(Parser, Debug, Clone, PartialEq)]
    #[command(
        name = "tilt-coin",
        version,
        about = "Tilt Coin - flip the coin headlessly on a simulated 60 Hz clock"
    )]
    pub struct Args {
        /// Tilt reading to hold during every flip (flat when omitted)
        #[arg(long, allow_negative_numbers = true)]
        pub tilt: Option<f32>,

        /// Double-tap cheat mode off before flipping
        #[arg(long)]
        pub no_cheat: bool,

        /// RNG seed
        #[arg(long, default_value_t = 1)]
        pub seed: u64,

        /// Number of flips
        #[arg(long, default_value_t = 1)]
        pub flips: u32,

        /// Settings JSON file
        #[arg(long)]
        pub settings: Option<PathBuf>,

        /// Output one JSON object per flip
        #[arg(long)]
        pub json: bool,
    }

    /// One revealed flip
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct FlipRecord {
        pub flip: u32,
        pub tilt: f32,
        pub cheat: bool,
        pub haptic: Option<HapticPulse>,
        pub face: Face,
    }

    impl FlipRecord {
        fn print(&self, json: bool) {
            if json {
                match serde_json::to_string(self) {
                    Ok(line) => println!("{}", line),
                    Err(e) => log::warn!("Could not serialize flip {}: {}", self.flip, e),
                }
                return;
            }
            println!(
                "flip {:>3}: tilt {:>6.2}  cheat {:<3}  haptic {:<5}  {}",
                self.flip,
                self.tilt,
                if self.cheat { "on" } else { "off" },
                self.haptic.map(|p| format!("{:?}", p)).unwrap_or_else(|| "-".into()),
                self.face.label()
            );
        }
    }

    /// Run the requested flips on a simulated 60 Hz clock
    pub fn run(args: &Args) {
        let settings = args
            .settings
            .as_deref()
            .map(Settings::load_from_path)
            .unwrap_or_default();
        let mut state = CoinState::with_options(
            args.seed,
            settings.sensor_interval_ms,
            settings.effective_spins(),
        );
        log::info!("Tilt Coin (native) starting with seed {}", state.seed());
        let mut haptics = HapticManager::new(&settings);
        let mut clock_ms = 0.0f64;

        if args.no_cheat {
            state.on_background_tap(clock_ms);
            clock_ms += DOUBLE_TAP_WINDOW_MS / 2.0;
            state.on_background_tap(clock_ms);
        }

        if args.tilt.is_none() {
            log::info!("No --tilt given and no motion sensor here - tilt stays flat");
        }

        let (mut heads, mut tails) = (0u32, 0u32);
        for n in 1..=args.flips {
            if let Some(x) = args.tilt {
                state.on_sensor_sample(x, clock_ms);
            }
            let Some(start) = state.request_flip() else {
                log::warn!("Flip {} dropped", n);
                continue;
            };
            let haptic = start.haptic.filter(|p| haptics.fire(*p));

            while state.stage() != FlipStage::Idle {
                clock_ms += SIM_FRAME_MS as f64;
                for event in state.tick(SIM_FRAME_MS) {
                    match event {
                        FlipEvent::StageEntered(stage) => {
                            log::debug!("[{:>7.1}ms] {}", clock_ms, stage.as_str())
                        }
                        FlipEvent::Revealed(face) => {
                            match face {
                                Face::Heads => heads += 1,
                                Face::Tails => tails += 1,
                            }
                            FlipRecord {
                                flip: n,
                                tilt: start.tilt,
                                cheat: state.cheat_enabled(),
                                haptic,
                                face,
                            }
                            .print(args.json);
                        }
                        FlipEvent::TextHidden => {}
                    }
                }
            }
        }

        log::info!("{} heads, {} tails", heads, tails);
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use clap::error::ErrorKind;

        fn parse(list: &[&str]) -> Result<Args, clap::Error> {
            Args::try_parse_from(std::iter::once("tilt-coin").chain(list.iter().copied()))
        }

        #[test]
        fn test_defaults() {
            let args = parse(&[]).unwrap();
            assert_eq!(args.tilt, None);
            assert!(!args.no_cheat);
            assert_eq!((args.seed, args.flips), (1, 1));
            assert_eq!(args.settings, None);
            assert!(!args.json);
        }

        #[test]
        fn test_all_flags() {
            let args = parse(&[
                "--tilt", "-7.5", "--no-cheat", "--seed", "9", "--flips", "3", "--settings",
                "s.json", "--json",
            ])
            .unwrap();
            assert_eq!(
                args,
                Args {
                    tilt: Some(-7.5),
                    no_cheat: true,
                    seed: 9,
                    flips: 3,
                    settings: Some(PathBuf::from("s.json")),
                    json: true,
                }
            );
        }

        #[test]
        fn test_bad_values_are_rejected() {
            assert_eq!(parse(&["--seed", "abc"]).unwrap_err().kind(), ErrorKind::ValueValidation);
            assert!(parse(&["--tilt"]).is_err());
            assert!(parse(&["--bogus"]).is_err());
        }

        #[test]
        fn test_help() {
            let err = parse(&["--flips", "2", "--help"]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        }

        #[test]
        fn test_record_json() {
            let record = FlipRecord {
                flip: 2,
                tilt: -10.0,
                cheat: true,
                haptic: Some(HapticPulse::Light),
                face: Face::Heads,
            };
            assert_eq!(
                serde_json::to_string(&record).unwrap(),
                r#"{"flip":2,"tilt":-10.0,"cheat":true,"haptic":"light","face":"heads"}"#
            );
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = harness::Args::parse();
    harness::run(&args);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
